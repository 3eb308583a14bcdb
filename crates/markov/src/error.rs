//! Error types for the orkit-markov crate.

/// Error type for all fallible operations in the orkit-markov crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarkovError {
    /// Returned when a state space has no states.
    #[error("state space is empty")]
    EmptyStateSpace,

    /// Returned when a state label appears more than once.
    #[error("duplicate state {label} at index {index}")]
    DuplicateState {
        /// Debug rendering of the repeated label.
        label: String,
        /// Index of the second occurrence.
        index: usize,
    },

    /// Returned when a model produces a target outside its state space.
    #[error("unknown state: {label}")]
    UnknownState {
        /// Debug rendering of the offending label.
        label: String,
    },

    /// Returned when a rate parameter is negative or not finite.
    #[error("invalid rate {name}: {value} (must be finite and >= 0)")]
    InvalidRate {
        /// Parameter name.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// Returned when a probability parameter lies outside `[0, 1]`.
    #[error("invalid probability {name}: {value} (must be in [0, 1])")]
    InvalidProbability {
        /// Parameter name.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// Returned when a buffer capacity is zero.
    #[error("invalid capacity: {value} (must be >= 1)")]
    InvalidCapacity {
        /// The invalid value.
        value: u8,
    },

    /// Returned when a convergence tolerance is non-finite or non-positive.
    #[error("invalid tolerance: {value} (must be finite and > 0)")]
    InvalidTolerance {
        /// The invalid value.
        value: f64,
    },

    /// Returned when an iteration limit is zero.
    #[error("invalid iteration limit: must be at least 1")]
    InvalidIterationLimit,

    /// Returned when rows of a matrix are not probability distributions.
    #[error("matrix is not row-stochastic: rows {rows:?} fail validation")]
    NotStochastic {
        /// Zero-based indices of every failing row.
        rows: Vec<usize>,
    },

    /// Returned when a matrix or vector has the wrong dimension.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a state index is outside the matrix.
    #[error("state index {index} out of range for {n} states")]
    StateOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of states.
        n: usize,
    },

    /// Returned when power iteration does not settle.
    #[error("stationary distribution did not converge after {iterations} iterations")]
    NoConvergence {
        /// Iterations performed.
        iterations: usize,
    },
}
