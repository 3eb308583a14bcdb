//! The model contract and the generic chain builder.

use std::fmt;

use tracing::{debug, warn};

use crate::error::MarkovError;
use crate::state::StateSpace;
use crate::transition::{DEFAULT_TOLERANCE, RowViolation, TransitionMatrix};

/// A discrete-time Markov model that can be turned into a transition matrix.
///
/// Implementors enumerate their states and, for each from-state, list the
/// reachable to-states with their one-step probabilities. A to-state may be
/// listed more than once; the builder adds the probabilities up.
pub trait TransitionModel {
    /// State label type.
    type State: Clone + PartialEq + fmt::Debug;

    /// The ordered state space; its order fixes matrix indices.
    fn states(&self) -> &StateSpace<Self::State>;

    /// One-step outcomes from `from` as `(to, probability)` pairs.
    fn outcomes(&self, from: &Self::State) -> Vec<(Self::State, f64)>;
}

/// A state space together with its transition matrix.
#[derive(Debug, Clone)]
pub struct MarkovChain<S> {
    states: StateSpace<S>,
    matrix: TransitionMatrix,
    violations: Vec<RowViolation>,
}

impl<S: PartialEq + fmt::Debug> MarkovChain<S> {
    /// Returns the probability of moving from `from` to `to`, or `None` if
    /// either label is not in the state space.
    pub fn prob(&self, from: &S, to: &S) -> Option<f64> {
        let i = self.states.index_of(from)?;
        let j = self.states.index_of(to)?;
        Some(self.matrix.prob(i, j))
    }
}

impl<S> MarkovChain<S> {
    /// Returns the state space.
    pub fn states(&self) -> &StateSpace<S> {
        &self.states
    }

    /// Returns the transition matrix.
    pub fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }

    /// Rows that failed validation at build time.
    pub fn violations(&self) -> &[RowViolation] {
        &self.violations
    }

    /// Returns `true` if every row passed validation at build time.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Splits the chain into its state space and matrix.
    pub fn into_parts(self) -> (StateSpace<S>, TransitionMatrix) {
        (self.states, self.matrix)
    }
}

/// Builds the transition matrix of `model`, validated at [`DEFAULT_TOLERANCE`].
///
/// # Errors
///
/// See [`build_chain_with_tolerance`].
pub fn build_chain<M: TransitionModel>(model: &M) -> Result<MarkovChain<M::State>, MarkovError> {
    build_chain_with_tolerance(model, DEFAULT_TOLERANCE)
}

/// Builds the transition matrix of `model`, validating rows against `tolerance`.
///
/// Every from-state is visited in index order and its outcomes are
/// accumulated into the matrix. Failing rows are logged at `warn` and kept on
/// the chain (see [`MarkovChain::violations`]) rather than turned into an
/// error, so the caller decides whether they are fatal.
///
/// # Errors
///
/// Returns [`MarkovError::InvalidTolerance`] if `tolerance` is negative or not
/// finite, and [`MarkovError::UnknownState`] if an outcome targets a state
/// that is not in the model's state space.
#[tracing::instrument(skip_all, fields(n_states = model.states().len()))]
pub fn build_chain_with_tolerance<M: TransitionModel>(
    model: &M,
    tolerance: f64,
) -> Result<MarkovChain<M::State>, MarkovError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(MarkovError::InvalidTolerance { value: tolerance });
    }
    let states = model.states();
    let mut matrix = TransitionMatrix::zeros(states.len());

    for (from_idx, from) in states.iter().enumerate() {
        for (to, p) in model.outcomes(from) {
            let to_idx = states
                .index_of(&to)
                .ok_or_else(|| MarkovError::UnknownState {
                    label: format!("{to:?}"),
                })?;
            matrix.add(from_idx, to_idx, p);
        }
    }

    let violations = matrix.invalid_rows(tolerance);
    for v in &violations {
        warn!(
            row = v.row,
            state = ?states.label(v.row),
            sum = v.sum,
            bad_entry = v.bad_entry,
            "row is not a probability distribution"
        );
    }
    debug!(n_invalid = violations.len(), "transition matrix built");

    Ok(MarkovChain {
        states: states.clone(),
        matrix,
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-state flip-flop with configurable leak, used to exercise the builder.
    struct Toggle {
        states: StateSpace<char>,
        stay: f64,
        stray_target: Option<char>,
    }

    impl TransitionModel for Toggle {
        type State = char;

        fn states(&self) -> &StateSpace<char> {
            &self.states
        }

        fn outcomes(&self, from: &char) -> Vec<(char, f64)> {
            let other = if *from == 'a' { 'b' } else { 'a' };
            let mut out = vec![(*from, self.stay), (other, 1.0 - self.stay)];
            if let Some(t) = self.stray_target {
                out.push((t, 0.0));
            }
            out
        }
    }

    fn toggle(stay: f64) -> Toggle {
        Toggle {
            states: StateSpace::new(vec!['a', 'b']).unwrap(),
            stay,
            stray_target: None,
        }
    }

    #[test]
    fn builds_expected_matrix() {
        let chain = build_chain(&toggle(0.25)).unwrap();
        assert_eq!(chain.matrix().row(0), &[0.25, 0.75]);
        assert_eq!(chain.matrix().row(1), &[0.75, 0.25]);
        assert_eq!(chain.prob(&'a', &'b'), Some(0.75));
        assert_eq!(chain.prob(&'a', &'z'), None);
        assert!(chain.is_valid());
    }

    #[test]
    fn repeated_targets_accumulate() {
        struct Split(StateSpace<u8>);
        impl TransitionModel for Split {
            type State = u8;
            fn states(&self) -> &StateSpace<u8> {
                &self.0
            }
            fn outcomes(&self, _from: &u8) -> Vec<(u8, f64)> {
                vec![(0, 0.2), (1, 0.3), (0, 0.5)]
            }
        }
        let chain = build_chain(&Split(StateSpace::new(vec![0, 1]).unwrap())).unwrap();
        assert!((chain.matrix().prob(0, 0) - 0.7).abs() < 1e-12);
        assert!((chain.matrix().prob(1, 1) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn unknown_target_is_an_error() {
        let mut model = toggle(0.5);
        model.stray_target = Some('z');
        let result = build_chain(&model);
        match result {
            Err(MarkovError::UnknownState { label }) => assert_eq!(label, "'z'"),
            other => panic!("expected UnknownState, got {other:?}"),
        }
    }

    #[test]
    fn invalid_rows_are_reported_not_fatal() {
        let chain = build_chain(&toggle(1.5)).unwrap();
        assert!(!chain.is_valid());
        let rows: Vec<usize> = chain.violations().iter().map(|v| v.row).collect();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn tolerance_decides_which_rows_fail() {
        struct Drift(StateSpace<u8>);
        impl TransitionModel for Drift {
            type State = u8;
            fn states(&self) -> &StateSpace<u8> {
                &self.0
            }
            fn outcomes(&self, _from: &u8) -> Vec<(u8, f64)> {
                vec![(0, 0.5), (1, 0.5 + 1e-6)]
            }
        }
        let model = Drift(StateSpace::new(vec![0, 1]).unwrap());

        let loose = build_chain_with_tolerance(&model, 1e-3).unwrap();
        assert!(loose.is_valid());

        let strict = build_chain(&model).unwrap();
        let rows: Vec<usize> = strict.violations().iter().map(|v| v.row).collect();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn rejects_invalid_tolerance() {
        for tol in [-1e-9, f64::NAN] {
            assert!(matches!(
                build_chain_with_tolerance(&toggle(0.5), tol),
                Err(MarkovError::InvalidTolerance { .. })
            ));
        }
    }

    #[test]
    fn building_is_deterministic() {
        let a = build_chain(&toggle(0.3)).unwrap();
        let b = build_chain(&toggle(0.3)).unwrap();
        assert_eq!(a.matrix(), b.matrix());
    }

    #[test]
    fn into_parts_returns_both_halves() {
        let (states, matrix) = build_chain(&toggle(0.5)).unwrap().into_parts();
        assert_eq!(states.len(), 2);
        assert_eq!(matrix.len(), 2);
    }
}
