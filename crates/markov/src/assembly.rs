//! Two-machine assembly line with bounded part buffers.

use std::fmt;

use crate::error::MarkovError;
use crate::model::TransitionModel;
use crate::state::StateSpace;

/// Default number of good parts each buffer can hold.
pub const DEFAULT_CAPACITY: u8 = 2;

/// Good parts waiting in front of the assembly station, one count per machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Buffers {
    /// Parts from machine 1.
    pub first: u8,
    /// Parts from machine 2.
    pub second: u8,
}

impl Buffers {
    /// Creates a buffer state.
    pub fn new(first: u8, second: u8) -> Self {
        Self { first, second }
    }

    /// Consumes one part from each buffer if both hold at least one.
    pub fn assemble(self) -> Self {
        if self.first >= 1 && self.second >= 1 {
            Self::new(self.first - 1, self.second - 1)
        } else {
            self
        }
    }
}

impl fmt::Display for Buffers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.first, self.second)
    }
}

/// Two machines feeding an instantaneous assembly station.
///
/// Each step, a pair of parts is assembled first if both buffers are
/// non-empty. Then each machine whose buffer is below capacity produces a
/// good part with its yield probability. A machine with a full buffer is
/// blocked and contributes a factor of 1.
#[derive(Debug, Clone)]
pub struct AssemblyLine {
    states: StateSpace<Buffers>,
    yield_first: f64,
    yield_second: f64,
    capacity: u8,
}

impl AssemblyLine {
    /// Creates a line with the default buffer capacity of 2.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidProbability`] if a yield lies outside
    /// `[0, 1]`.
    pub fn new(yield_first: f64, yield_second: f64) -> Result<Self, MarkovError> {
        Self::with_capacity(yield_first, yield_second, DEFAULT_CAPACITY)
    }

    /// Creates a line whose buffers hold up to `capacity` parts.
    ///
    /// States are enumerated first-buffer-major: `(0,0), (0,1), ...,
    /// (capacity,capacity)`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidProbability`] if a yield lies outside
    /// `[0, 1]` and [`MarkovError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_capacity(
        yield_first: f64,
        yield_second: f64,
        capacity: u8,
    ) -> Result<Self, MarkovError> {
        check_probability("yield_first", yield_first)?;
        check_probability("yield_second", yield_second)?;
        if capacity == 0 {
            return Err(MarkovError::InvalidCapacity { value: capacity });
        }
        let labels = (0..=capacity)
            .flat_map(|first| (0..=capacity).map(move |second| Buffers::new(first, second)))
            .collect();
        Ok(Self {
            states: StateSpace::new(labels)?,
            yield_first,
            yield_second,
            capacity,
        })
    }

    /// Probability that machine 1 produces a good part.
    pub fn yield_first(&self) -> f64 {
        self.yield_first
    }

    /// Probability that machine 2 produces a good part.
    pub fn yield_second(&self) -> f64 {
        self.yield_second
    }

    /// Buffer capacity per machine.
    pub fn capacity(&self) -> u8 {
        self.capacity
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), MarkovError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MarkovError::InvalidProbability { name, value })
    }
}

/// Probability factor of one machine's production outcome.
fn production_factor(yield_prob: f64, can_produce: bool, produces: bool) -> f64 {
    match (can_produce, produces) {
        (false, _) => 1.0,
        (true, true) => yield_prob,
        (true, false) => 1.0 - yield_prob,
    }
}

impl TransitionModel for AssemblyLine {
    type State = Buffers;

    fn states(&self) -> &StateSpace<Buffers> {
        &self.states
    }

    fn outcomes(&self, from: &Buffers) -> Vec<(Buffers, f64)> {
        let staged = from.assemble();
        let can_first = staged.first < self.capacity;
        let can_second = staged.second < self.capacity;

        let mut out = Vec::with_capacity(4);
        for produce_first in [false, true] {
            if produce_first && !can_first {
                continue;
            }
            for produce_second in [false, true] {
                if produce_second && !can_second {
                    continue;
                }
                let p = production_factor(self.yield_first, can_first, produce_first)
                    * production_factor(self.yield_second, can_second, produce_second);
                let next = Buffers::new(
                    (staged.first + u8::from(produce_first)).min(self.capacity),
                    (staged.second + u8::from(produce_second)).min(self.capacity),
                );
                out.push((next, p));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn line() -> AssemblyLine {
        AssemblyLine::new(0.8, 0.7).unwrap()
    }

    fn outcome(line: &AssemblyLine, from: Buffers, to: Buffers) -> f64 {
        line.outcomes(&from)
            .iter()
            .filter(|(s, _)| *s == to)
            .map(|(_, p)| p)
            .sum()
    }

    #[test]
    fn enumerates_nine_states_in_order() {
        let l = line();
        assert_eq!(l.states().len(), 9);
        assert_eq!(l.states().label(0), Some(&Buffers::new(0, 0)));
        assert_eq!(l.states().label(1), Some(&Buffers::new(0, 1)));
        assert_eq!(l.states().label(3), Some(&Buffers::new(1, 0)));
        assert_eq!(l.states().label(8), Some(&Buffers::new(2, 2)));
    }

    #[test]
    fn assemble_consumes_a_pair() {
        assert_eq!(Buffers::new(2, 1).assemble(), Buffers::new(1, 0));
        assert_eq!(Buffers::new(2, 0).assemble(), Buffers::new(2, 0));
        assert_eq!(Buffers::new(0, 0).assemble(), Buffers::new(0, 0));
    }

    #[test]
    fn empty_buffers_stay_empty_when_nothing_is_produced() {
        let l = line();
        let p = outcome(&l, Buffers::new(0, 0), Buffers::new(0, 0));
        assert_abs_diff_eq!(p, 0.2 * 0.3, epsilon = 1e-15);
    }

    #[test]
    fn both_machines_produce() {
        let l = line();
        let p = outcome(&l, Buffers::new(0, 0), Buffers::new(1, 1));
        assert_abs_diff_eq!(p, 0.8 * 0.7, epsilon = 1e-15);
    }

    #[test]
    fn blocked_machine_contributes_factor_one() {
        let l = line();
        // (2,0): no assembly, machine 1 blocked.
        let out = l.outcomes(&Buffers::new(2, 0));
        assert_eq!(out.len(), 2);
        assert_abs_diff_eq!(
            outcome(&l, Buffers::new(2, 0), Buffers::new(2, 0)),
            0.3,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            outcome(&l, Buffers::new(2, 0), Buffers::new(2, 1)),
            0.7,
            epsilon = 1e-15
        );
    }

    #[test]
    fn full_buffers_assemble_before_producing() {
        let l = line();
        // (2,2) assembles to (1,1); both machines free.
        assert_abs_diff_eq!(
            outcome(&l, Buffers::new(2, 2), Buffers::new(2, 2)),
            0.8 * 0.7,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            outcome(&l, Buffers::new(2, 2), Buffers::new(1, 1)),
            0.2 * 0.3,
            epsilon = 1e-15
        );
    }

    #[test]
    fn every_row_sums_to_one() {
        let l = AssemblyLine::with_capacity(0.35, 0.9, 3).unwrap();
        for from in l.states() {
            let sum: f64 = l.outcomes(from).iter().map(|(_, p)| p).sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn outcomes_stay_inside_state_space() {
        let l = line();
        for from in l.states() {
            for (to, _) in l.outcomes(from) {
                assert!(l.states().contains(&to), "{from} -> {to} leaves the space");
            }
        }
    }

    #[test]
    fn display() {
        assert_eq!(Buffers::new(1, 2).to_string(), "(1,2)");
    }

    #[test]
    fn rejects_invalid_yield() {
        assert!(matches!(
            AssemblyLine::new(1.2, 0.5),
            Err(MarkovError::InvalidProbability {
                name: "yield_first",
                ..
            })
        ));
        assert!(matches!(
            AssemblyLine::new(0.5, f64::NAN),
            Err(MarkovError::InvalidProbability {
                name: "yield_second",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(matches!(
            AssemblyLine::with_capacity(0.5, 0.5, 0),
            Err(MarkovError::InvalidCapacity { value: 0 })
        ));
    }
}
