//! Poisson depletion over integer levels with restocking to the ceiling.
//!
//! Each step the level falls by the number of Poisson events. A level that
//! would fall below the floor is restocked to the ceiling. From the ceiling
//! itself, zero events also leave the level on the ceiling.
//!
//! ```text
//!   j < k, j <= i :  P(N = i - j)
//!   j < k, j > i  :  0
//!   i < k, j = k  :  1 - Σ_{m=0..=i-floor} P(N = m)
//!   i = k, j = k  :  (1 - Σ_{m=0..=k-floor} P(N = m)) + P(N = 0)
//! ```
//!
//! With gaps in the levels the ceiling column is computed as the mass not
//! assigned to a lower level, which keeps every row stochastic and agrees with
//! the table above for contiguous levels.

use orkit_stats::poisson_pmf;

use crate::error::MarkovError;
use crate::model::TransitionModel;
use crate::state::StateSpace;

/// Depletion chain over integer levels whose maximum level absorbs restocks.
#[derive(Debug, Clone)]
pub struct CeilingRestockChain {
    states: StateSpace<u32>,
    lambda: f64,
    ceiling: u32,
    floor: u32,
}

impl CeilingRestockChain {
    /// Creates the model over `levels` with Poisson rate `lambda`.
    ///
    /// The order of `levels` fixes matrix indices; the ceiling is the largest
    /// level and the floor the smallest.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidRate`] if `lambda` is negative or not
    /// finite, and the [`StateSpace::new`] errors for empty or repeated levels.
    pub fn new(levels: Vec<u32>, lambda: f64) -> Result<Self, MarkovError> {
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(MarkovError::InvalidRate {
                name: "lambda",
                value: lambda,
            });
        }
        let states = StateSpace::new(levels)?;
        let ceiling = states
            .iter()
            .copied()
            .max()
            .ok_or(MarkovError::EmptyStateSpace)?;
        let floor = states
            .iter()
            .copied()
            .min()
            .ok_or(MarkovError::EmptyStateSpace)?;
        Ok(Self {
            states,
            lambda,
            ceiling,
            floor,
        })
    }

    /// Poisson event rate per step.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// The largest level.
    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// The smallest level.
    pub fn floor(&self) -> u32 {
        self.floor
    }

    /// One-step probability of moving from level `from` to level `to`.
    ///
    /// Returns 0.0 if either level is not in the state space.
    pub fn probability(&self, from: u32, to: u32) -> f64 {
        if !self.states.contains(&from) || !self.states.contains(&to) {
            return 0.0;
        }
        if to == self.ceiling {
            self.restock(from)
        } else {
            self.depletion(from, to)
        }
    }

    /// Probability of falling from `from` to a level below the ceiling.
    fn depletion(&self, from: u32, to: u32) -> f64 {
        if to <= from {
            poisson_pmf(self.lambda, from - to)
        } else {
            0.0
        }
    }

    /// Mass from `from` not assigned to any level below the ceiling.
    fn restock(&self, from: u32) -> f64 {
        let assigned: f64 = self
            .states
            .iter()
            .filter(|&&to| to < self.ceiling)
            .map(|&to| self.depletion(from, to))
            .sum();
        (1.0 - assigned).max(0.0)
    }
}

impl TransitionModel for CeilingRestockChain {
    type State = u32;

    fn states(&self) -> &StateSpace<u32> {
        &self.states
    }

    fn outcomes(&self, from: &u32) -> Vec<(u32, f64)> {
        self.states
            .iter()
            .map(|&to| (to, self.probability(*from, to)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use orkit_stats::poisson_cdf;

    fn model() -> CeilingRestockChain {
        CeilingRestockChain::new(vec![2, 3, 4, 5], 3.0).unwrap()
    }

    #[test]
    fn ceiling_and_floor() {
        let m = model();
        assert_eq!(m.ceiling(), 5);
        assert_eq!(m.floor(), 2);
        assert_eq!(m.lambda(), 3.0);
    }

    #[test]
    fn depletion_is_poisson() {
        let m = model();
        assert_abs_diff_eq!(m.probability(2, 2), poisson_pmf(3.0, 0), epsilon = 1e-15);
        assert_abs_diff_eq!(m.probability(4, 2), poisson_pmf(3.0, 2), epsilon = 1e-15);
        assert_abs_diff_eq!(m.probability(4, 3), poisson_pmf(3.0, 1), epsilon = 1e-15);
        assert_abs_diff_eq!(m.probability(5, 2), poisson_pmf(3.0, 3), epsilon = 1e-15);
    }

    #[test]
    fn no_increase_below_ceiling() {
        let m = model();
        assert_eq!(m.probability(2, 4), 0.0);
        assert_eq!(m.probability(3, 4), 0.0);
    }

    #[test]
    fn shortfall_restocks_to_ceiling() {
        let m = model();
        for from in [2u32, 3, 4] {
            let expected = 1.0 - poisson_cdf(3.0, from - 2);
            assert_abs_diff_eq!(m.probability(from, 5), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn ceiling_self_loop() {
        let m = model();
        let expected = (1.0 - poisson_cdf(3.0, 3)) + poisson_pmf(3.0, 0);
        assert_abs_diff_eq!(m.probability(5, 5), expected, epsilon = 1e-12);
    }

    #[test]
    fn unknown_levels_have_zero_probability() {
        let m = model();
        assert_eq!(m.probability(1, 2), 0.0);
        assert_eq!(m.probability(2, 9), 0.0);
    }

    #[test]
    fn zero_rate_is_identity() {
        let m = CeilingRestockChain::new(vec![0, 1, 2], 0.0).unwrap();
        for i in 0..3u32 {
            for j in 0..3u32 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(m.probability(i, j), expected, epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn single_level_is_absorbing() {
        let m = CeilingRestockChain::new(vec![7], 2.0).unwrap();
        assert_abs_diff_eq!(m.probability(7, 7), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn gaps_keep_rows_stochastic() {
        let m = CeilingRestockChain::new(vec![0, 2, 5], 1.5).unwrap();
        for &from in &[0u32, 2, 5] {
            let sum: f64 = m.outcomes(&from).iter().map(|(_, p)| p).sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rejects_invalid_rate() {
        for lambda in [-0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                CeilingRestockChain::new(vec![1, 2], lambda),
                Err(MarkovError::InvalidRate { name: "lambda", .. })
            ));
        }
    }

    #[test]
    fn rejects_duplicate_levels() {
        assert!(matches!(
            CeilingRestockChain::new(vec![2, 3, 3], 1.0),
            Err(MarkovError::DuplicateState { .. })
        ));
    }
}
