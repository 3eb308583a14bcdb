//! Single-server queue whose service rate depends on the number in system.

use tracing::debug;

use crate::error::QueueError;
use crate::mmsk::check_rate;
use crate::steady::SteadyState;

/// Birth-death queue with constant arrival rate `λ` and service rate `μₙ`
/// when `n` customers are present.
///
/// The capacity is the number of service rates: with rates `μ₁..μ_K` the
/// system holds at most `K` customers. Balance gives
/// `πₙ = π₀ · λⁿ / (μ₁ ⋯ μₙ)`.
#[derive(Clone, Debug, PartialEq)]
pub struct StateDependentQueue {
    lambda: f64,
    service_rates: Vec<f64>,
}

impl StateDependentQueue {
    /// Creates the queue; `service_rates[n - 1]` is the rate with `n` present.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EmptyServiceRates`] if no rates are given and
    /// [`QueueError::InvalidRate`] for any rate that is not finite and
    /// positive.
    pub fn new(lambda: f64, service_rates: Vec<f64>) -> Result<Self, QueueError> {
        check_rate("lambda", lambda)?;
        if service_rates.is_empty() {
            return Err(QueueError::EmptyServiceRates);
        }
        for &mu in &service_rates {
            check_rate("mu", mu)?;
        }
        Ok(Self {
            lambda,
            service_rates,
        })
    }

    /// Arrival rate.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Service rates `μ₁..μ_K`.
    pub fn service_rates(&self) -> &[f64] {
        &self.service_rates
    }

    /// Maximum customers in the system.
    pub fn capacity(&self) -> usize {
        self.service_rates.len()
    }

    /// Steady-state distribution over `0..=K` customers.
    #[tracing::instrument(skip_all, fields(capacity = self.capacity()))]
    pub fn steady_state(&self) -> SteadyState {
        let ln_lambda = self.lambda.ln();
        let mut log_weights = Vec::with_capacity(self.capacity() + 1);
        let mut lw = 0.0;
        log_weights.push(lw);
        for mu in &self.service_rates {
            lw += ln_lambda - mu.ln();
            log_weights.push(lw);
        }
        let ss = SteadyState::from_log_weights(&log_weights, self.lambda, 1);
        debug!(p0 = ss.p0(), "state-dependent queue solved");
        ss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmsk::MmsK;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn barber() -> StateDependentQueue {
        StateDependentQueue::new(
            5.0,
            vec![60.0 / 9.0, 60.0 / 10.0, 60.0 / 10.0, 60.0 / 13.0, 60.0 / 20.0],
        )
        .unwrap()
    }

    #[test]
    fn balance_equations_hold() {
        let q = barber();
        let ss = q.steady_state();
        assert_eq!(ss.capacity(), 5);
        for (n, mu) in q.service_rates().iter().enumerate() {
            // λ πₙ = μₙ₊₁ πₙ₊₁
            assert_relative_eq!(
                q.lambda() * ss.prob(n),
                mu * ss.prob(n + 1),
                max_relative = 1e-12
            );
        }
        assert_abs_diff_eq!(ss.probabilities().iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_probability_by_hand() {
        let ss = barber().steady_state();
        let mut product = 1.0;
        let mut total = 1.0;
        for mu in [60.0 / 9.0, 6.0, 6.0, 60.0 / 13.0, 3.0] {
            product *= 5.0 / mu;
            total += product;
        }
        assert_relative_eq!(ss.p0(), 1.0 / total, max_relative = 1e-12);
    }

    #[test]
    fn constant_rates_reduce_to_mm1k() {
        let dependent = StateDependentQueue::new(2.0, vec![3.0; 4]).unwrap().steady_state();
        let mm1k = MmsK::new(2.0, 3.0, 1, 4).unwrap().steady_state();
        for (a, b) in dependent.probabilities().iter().zip(mm1k.probabilities()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(
            StateDependentQueue::new(1.0, vec![]),
            Err(QueueError::EmptyServiceRates)
        ));
        assert!(matches!(
            StateDependentQueue::new(1.0, vec![1.0, -2.0]),
            Err(QueueError::InvalidRate { name: "mu", .. })
        ));
        assert!(matches!(
            StateDependentQueue::new(f64::INFINITY, vec![1.0]),
            Err(QueueError::InvalidRate { name: "lambda", .. })
        ));
    }
}
