//! Configuration for chain validation and analysis.

use crate::error::MarkovError;
use crate::transition::DEFAULT_TOLERANCE;

/// Configuration for row validation and stationary-distribution iteration.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use orkit_markov::ChainConfig;
///
/// let config = ChainConfig::new()
///     .with_tolerance(1e-12)
///     .with_max_iterations(50_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct ChainConfig {
    tolerance: f64,
    max_iterations: usize,
}

impl ChainConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `tolerance = 1e-9`, `max_iterations = 10_000`.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: 10_000,
        }
    }

    /// Sets the tolerance used for row sums and convergence.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the power-iteration limit.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Returns the tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the power-iteration limit.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Validates this configuration.
    ///
    /// The tolerance must be finite and positive and the iteration limit at
    /// least one.
    pub fn validate(&self) -> Result<(), MarkovError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(MarkovError::InvalidTolerance {
                value: self.tolerance,
            });
        }
        if self.max_iterations == 0 {
            return Err(MarkovError::InvalidIterationLimit);
        }
        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::new()
    }
}
