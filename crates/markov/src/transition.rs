//! Dense row-stochastic transition matrices.

use std::fmt;

use crate::error::MarkovError;

/// Default tolerance for row-sum checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// An `n x n` transition matrix stored row-major.
///
/// Row `i`, column `j` holds the one-step probability of moving from state
/// `i` to state `j`. Every row is expected to sum to 1.0; use
/// [`TransitionMatrix::invalid_rows`] to check.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    n: usize,
    probs: Vec<f64>,
}

/// A row that is not a probability distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowViolation {
    /// Zero-based row index.
    pub row: usize,
    /// Sum of the row's entries.
    pub sum: f64,
    /// Whether the row holds a negative or non-finite entry.
    pub bad_entry: bool,
}

impl TransitionMatrix {
    /// Creates an all-zero `n x n` matrix for builders to accumulate into.
    pub(crate) fn zeros(n: usize) -> Self {
        Self {
            n,
            probs: vec![0.0; n * n],
        }
    }

    /// Adds `p` to entry `(from, to)`.
    pub(crate) fn add(&mut self, from: usize, to: usize, p: f64) {
        self.probs[from * self.n + to] += p;
    }

    /// Constructs a matrix from explicit rows.
    ///
    /// The rows are not required to be stochastic; validate separately.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::EmptyStateSpace`] for zero rows and
    /// [`MarkovError::DimensionMismatch`] if any row length differs from the
    /// number of rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MarkovError> {
        let n = rows.len();
        if n == 0 {
            return Err(MarkovError::EmptyStateSpace);
        }
        let mut probs = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(MarkovError::DimensionMismatch {
                    expected: n,
                    got: row.len(),
                });
            }
            probs.extend(row);
        }
        Ok(Self { n, probs })
    }

    /// Number of states (rows).
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always `false` for matrices built by this crate.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns the probability of moving from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn prob(&self, from: usize, to: usize) -> f64 {
        assert!(
            from < self.n && to < self.n,
            "index ({from}, {to}) out of range for {} states",
            self.n
        );
        self.probs[from * self.n + to]
    }

    /// Returns the outgoing probabilities of state `from`.
    ///
    /// # Panics
    ///
    /// Panics if `from` is out of range.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.probs[from * self.n..(from + 1) * self.n]
    }

    /// Iterates over rows in state order.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.probs.chunks_exact(self.n)
    }

    /// Returns the sum of every row.
    pub fn row_sums(&self) -> Vec<f64> {
        self.rows().map(|row| row.iter().sum()).collect()
    }

    /// Returns every row that is not a probability distribution.
    ///
    /// A row fails if it holds a negative or non-finite entry, or if its sum
    /// differs from 1.0 by more than `tolerance`. All rows are checked; the
    /// result is empty for a valid matrix.
    pub fn invalid_rows(&self, tolerance: f64) -> Vec<RowViolation> {
        self.rows()
            .enumerate()
            .filter_map(|(row, probs)| {
                let bad_entry = probs.iter().any(|p| !p.is_finite() || *p < 0.0);
                let sum: f64 = probs.iter().sum();
                let sums_to_one = (sum - 1.0).abs() <= tolerance;
                if bad_entry || !sums_to_one {
                    Some(RowViolation {
                        row,
                        sum,
                        bad_entry,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Returns `true` if every row is a probability distribution.
    pub fn is_stochastic(&self, tolerance: f64) -> bool {
        self.invalid_rows(tolerance).is_empty()
    }

    /// Fails if any row is not a probability distribution.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::NotStochastic`] listing every failing row.
    pub fn ensure_stochastic(&self, tolerance: f64) -> Result<(), MarkovError> {
        let rows: Vec<usize> = self
            .invalid_rows(tolerance)
            .into_iter()
            .map(|v| v.row)
            .collect();
        if rows.is_empty() {
            Ok(())
        } else {
            Err(MarkovError::NotStochastic { rows })
        }
    }

    /// Propagates a distribution one step: returns `dist * P`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::DimensionMismatch`] if `dist.len()` differs from
    /// the number of states.
    pub fn step(&self, dist: &[f64]) -> Result<Vec<f64>, MarkovError> {
        if dist.len() != self.n {
            return Err(MarkovError::DimensionMismatch {
                expected: self.n,
                got: dist.len(),
            });
        }
        let mut next = vec![0.0; self.n];
        for (w, row) in dist.iter().zip(self.rows()) {
            if *w == 0.0 {
                continue;
            }
            for (acc, p) in next.iter_mut().zip(row) {
                *acc += w * p;
            }
        }
        Ok(next)
    }

    /// Samples the next state index given the current one.
    ///
    /// Draws a uniform number and walks the row's cumulative distribution,
    /// returning the first state whose cumulative probability meets the draw.
    /// Falls back to the last state with positive probability if rounding
    /// prevents a match.
    ///
    /// # Panics
    ///
    /// Panics if `from` is out of range.
    pub fn sample(&self, from: usize, rng: &mut impl rand::Rng) -> usize {
        let u: f64 = rng.random();
        let row = self.row(from);
        let mut cumulative = 0.0;
        for (to, &p) in row.iter().enumerate() {
            cumulative += p;
            if p > 0.0 && cumulative >= u {
                return to;
            }
        }
        row.iter().rposition(|&p| p > 0.0).unwrap_or(self.n - 1)
    }
}

/// Renders the matrix one row per line.
///
/// The formatter precision sets the number of decimals (default 3), so
/// `format!("{m:.5}")` prints five.
impl fmt::Display for TransitionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(3);
        let width = precision + 3;
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, p) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{p:>width$.precision$}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
