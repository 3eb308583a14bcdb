//! Dense linear solves for policy evaluation.

use crate::error::MdpError;

/// Pivots smaller than this are treated as zero.
const PIVOT_EPS: f64 = 1e-12;

/// Row-major `n x n` matrix.
#[derive(Clone, Debug)]
pub(crate) struct DenseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Returns the `n x n` identity.
    pub(crate) fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self { n, data }
    }

    /// Returns the element at `(row, col)`.
    #[inline]
    pub(crate) fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    /// Adds `val` to the element at `(row, col)`.
    #[inline]
    pub(crate) fn add(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.n + col] += val;
    }

    /// Solves `self * x = b` by Gaussian elimination with partial pivoting.
    ///
    /// # Errors
    ///
    /// Returns [`MdpError::DimensionMismatch`] if `b` has the wrong length and
    /// [`MdpError::SingularSystem`] if no usable pivot exists in some column.
    pub(crate) fn solve(mut self, mut b: Vec<f64>) -> Result<Vec<f64>, MdpError> {
        let n = self.n;
        if b.len() != n {
            return Err(MdpError::DimensionMismatch {
                expected: n,
                got: b.len(),
            });
        }

        for col in 0..n {
            let (pivot_row, pivot) = (col..n)
                .map(|r| (r, self.get(r, col).abs()))
                .fold((col, -1.0), |best, cand| if cand.1 > best.1 { cand } else { best });
            if pivot < PIVOT_EPS {
                return Err(MdpError::SingularSystem { column: col, pivot });
            }
            if pivot_row != col {
                for c in 0..n {
                    self.data.swap(col * n + c, pivot_row * n + c);
                }
                b.swap(col, pivot_row);
            }

            let diag = self.get(col, col);
            for r in col + 1..n {
                let factor = self.get(r, col) / diag;
                if factor == 0.0 {
                    continue;
                }
                for c in col..n {
                    let v = self.get(col, c);
                    self.add(r, c, -factor * v);
                }
                b[r] -= factor * b[col];
            }
        }

        let mut x = vec![0.0; n];
        for row in (0..n).rev() {
            let tail: f64 = (row + 1..n).map(|c| self.get(row, c) * x[c]).sum();
            x[row] = (b[row] - tail) / self.get(row, row);
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn from_rows(rows: &[&[f64]]) -> DenseMatrix {
        let n = rows.len();
        let mut m = DenseMatrix::identity(n);
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                let current = m.get(i, j);
                m.add(i, j, v - current);
            }
        }
        m
    }

    #[test]
    fn solves_small_system() {
        // 2x + y = 5, x + 3y = 10 → x = 1, y = 3
        let m = from_rows(&[&[2.0, 1.0], &[1.0, 3.0]]);
        let x = m.solve(vec![5.0, 10.0]).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn needs_pivoting() {
        // Zero on the first diagonal entry.
        let m = from_rows(&[&[0.0, 1.0, 2.0], &[1.0, 0.0, 1.0], &[2.0, 1.0, 0.0]]);
        let x = m.solve(vec![8.0, 4.0, 4.0]).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn identity_returns_rhs() {
        let x = DenseMatrix::identity(4).solve(vec![1.0, -2.0, 3.5, 0.0]).unwrap();
        assert_eq!(x, vec![1.0, -2.0, 3.5, 0.0]);
    }

    #[test]
    fn singular_is_an_error() {
        let m = from_rows(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert!(matches!(
            m.solve(vec![1.0, 2.0]),
            Err(MdpError::SingularSystem { column: 1, .. })
        ));
    }

    #[test]
    fn wrong_rhs_length() {
        assert!(matches!(
            DenseMatrix::identity(2).solve(vec![1.0]),
            Err(MdpError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        ));
    }
}
