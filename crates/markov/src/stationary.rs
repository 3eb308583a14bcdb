//! Long-run behaviour of a chain.

use tracing::debug;

use crate::config::ChainConfig;
use crate::error::MarkovError;
use crate::transition::TransitionMatrix;

/// Computes a stationary distribution by power iteration.
///
/// Starts from the uniform distribution and repeatedly applies `π ← πP`
/// until the L1 change between iterates drops below the configured
/// tolerance. For a reducible chain the result is the limit reached from the
/// uniform start, which is one of possibly several stationary distributions.
///
/// # Errors
///
/// Returns [`MarkovError::EmptyStateSpace`] for an empty matrix, the
/// [`ChainConfig::validate`] errors, [`MarkovError::NotStochastic`] if any row
/// fails validation, and [`MarkovError::NoConvergence`] if the iteration limit
/// is reached (periodic chains never settle).
#[tracing::instrument(skip_all, fields(n_states = matrix.len()))]
pub fn stationary_distribution(
    matrix: &TransitionMatrix,
    config: &ChainConfig,
) -> Result<Vec<f64>, MarkovError> {
    if matrix.is_empty() {
        return Err(MarkovError::EmptyStateSpace);
    }
    config.validate()?;
    matrix.ensure_stochastic(config.tolerance())?;

    let n = matrix.len();
    let mut pi = vec![1.0 / n as f64; n];
    for iteration in 1..=config.max_iterations() {
        let mut next = matrix.step(&pi)?;
        let total: f64 = next.iter().sum();
        if total > 0.0 {
            next.iter_mut().for_each(|p| *p /= total);
        }
        let change: f64 = next.iter().zip(&pi).map(|(a, b)| (a - b).abs()).sum();
        pi = next;
        if change < config.tolerance() {
            debug!(iteration, change, "power iteration converged");
            return Ok(pi);
        }
    }
    Err(MarkovError::NoConvergence {
        iterations: config.max_iterations(),
    })
}
