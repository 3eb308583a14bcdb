//! Markov chain path simulation.

use crate::error::MarkovError;
use crate::transition::TransitionMatrix;

/// Simulates `steps` transitions starting from state index `initial`.
///
/// # Arguments
///
/// * `matrix` - Transition matrix to sample rows from.
/// * `initial` - The state before the first simulated step.
/// * `steps` - Number of transitions to draw.
/// * `rng` - Random number generator.
///
/// # Returns
///
/// The visited state indices, one per step; `initial` itself is not included.
///
/// # Errors
///
/// Returns [`MarkovError::StateOutOfRange`] if `initial` is not a valid index.
pub fn simulate_path(
    matrix: &TransitionMatrix,
    initial: usize,
    steps: usize,
    rng: &mut impl rand::Rng,
) -> Result<Vec<usize>, MarkovError> {
    let mut out = vec![0; steps];
    simulate_path_into(matrix, initial, rng, &mut out)?;
    Ok(out)
}

/// Simulates a path into a pre-allocated buffer, one transition per slot.
///
/// # Errors
///
/// Returns [`MarkovError::StateOutOfRange`] if `initial` is not a valid index.
pub fn simulate_path_into(
    matrix: &TransitionMatrix,
    initial: usize,
    rng: &mut impl rand::Rng,
    out: &mut [usize],
) -> Result<(), MarkovError> {
    if initial >= matrix.len() {
        return Err(MarkovError::StateOutOfRange {
            index: initial,
            n: matrix.len(),
        });
    }
    let mut prev = initial;
    for slot in out.iter_mut() {
        let next = matrix.sample(prev, rng);
        *slot = next;
        prev = next;
    }
    Ok(())
}

/// Fraction of steps spent in each state.
///
/// # Errors
///
/// Returns [`MarkovError::StateOutOfRange`] if the path visits an index
/// outside `0..n`.
pub fn occupancy(path: &[usize], n: usize) -> Result<Vec<f64>, MarkovError> {
    let mut counts = vec![0usize; n];
    for &s in path {
        let slot = counts
            .get_mut(s)
            .ok_or(MarkovError::StateOutOfRange { index: s, n })?;
        *slot += 1;
    }
    let total = path.len().max(1) as f64;
    Ok(counts.into_iter().map(|c| c as f64 / total).collect())
}
