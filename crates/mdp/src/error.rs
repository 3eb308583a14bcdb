//! Error types for the MDP crate.

/// Errors that can occur when building or solving an MDP.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MdpError {
    /// Returned when the discount factor is outside `[0, 1)`.
    #[error("invalid discount factor: {value} (must be in [0, 1))")]
    InvalidDiscount {
        /// The rejected value.
        value: f64,
    },

    /// Returned when a probability is negative, above one or not finite.
    #[error("invalid probability: {value} (must be in [0, 1])")]
    InvalidProbability {
        /// The rejected value.
        value: f64,
    },

    /// Returned when the demand distribution has no levels.
    #[error("demand distribution is empty")]
    EmptyDemand,

    /// Returned when the demand probabilities do not add up to one.
    #[error("demand probabilities sum to {sum}, expected 1")]
    DemandNotNormalised {
        /// Sum of the demand probabilities.
        sum: f64,
    },

    /// Returned when a state-action pair's transition row is not a distribution.
    #[error("transition row of state {state}, action {action} sums to {sum}")]
    RowNotStochastic {
        /// State of the offending pair.
        state: usize,
        /// Action of the offending pair.
        action: usize,
        /// Row sum.
        sum: f64,
    },

    /// Returned when a state has no admissible action.
    #[error("state {state} has no admissible action")]
    NoActions {
        /// The state without actions.
        state: usize,
    },

    /// Returned when a state index is outside the state space.
    #[error("state {state} out of range for {n} states")]
    StateOutOfRange {
        /// The requested state.
        state: usize,
        /// Number of states.
        n: usize,
    },

    /// Returned when a linear system has no unique solution.
    #[error("linear system is singular (pivot {pivot:e} in column {column})")]
    SingularSystem {
        /// Column where elimination failed.
        column: usize,
        /// Magnitude of the best available pivot.
        pivot: f64,
    },

    /// Returned when an iterative solver hits its iteration limit.
    #[error("{solver} did not converge after {iterations} iterations")]
    NoConvergence {
        /// Solver name.
        solver: &'static str,
        /// Iterations performed.
        iterations: usize,
    },

    /// Returned when a vector or matrix has the wrong dimension.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
}
