//! Direct O(n) solver for tridiagonal systems (Thomas algorithm).

use crate::error::EngineError;

/// Pivots smaller than this in magnitude are treated as singular.
const PIVOT_EPSILON: f64 = 1e-300;

/// Tridiagonal matrix in band storage.
///
/// Row `i` reads `lower[i]·x[i−1] + diag[i]·x[i] + upper[i]·x[i+1]`;
/// `lower[0]` and `upper[n−1]` are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalSystem {
    /// Sub-diagonal.
    pub lower: Vec<f64>,
    /// Main diagonal.
    pub diag: Vec<f64>,
    /// Super-diagonal.
    pub upper: Vec<f64>,
}

impl TridiagonalSystem {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diag.len()
    }

    /// Whether the system has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    /// Solve `A·x = rhs`.
    ///
    /// # Errors
    ///
    /// `SingularKernel` on a zero or non-finite pivot; `GridMismatch` when the
    /// bands or `rhs` disagree in length.
    pub fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, EngineError> {
        let n = self.len();
        for len in [self.lower.len(), self.upper.len(), rhs.len()] {
            if len != n {
                return Err(EngineError::GridMismatch {
                    expected: n,
                    actual: len,
                });
            }
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut c = vec![0.0; n];
        let mut d = vec![0.0; n];

        let pivot = checked_pivot(0, self.diag[0])?;
        c[0] = self.upper[0] / pivot;
        d[0] = rhs[0] / pivot;

        for i in 1..n {
            let pivot = checked_pivot(i, self.diag[i] - self.lower[i] * c[i - 1])?;
            c[i] = if i + 1 < n { self.upper[i] / pivot } else { 0.0 };
            d[i] = (rhs[i] - self.lower[i] * d[i - 1]) / pivot;
        }

        let mut x = d;
        for i in (0..n - 1).rev() {
            x[i] -= c[i] * x[i + 1];
        }
        Ok(x)
    }
}

fn checked_pivot(row: usize, pivot: f64) -> Result<f64, EngineError> {
    if pivot.is_finite() && pivot.abs() > PIVOT_EPSILON {
        Ok(pivot)
    } else {
        Err(EngineError::SingularKernel { row, pivot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_known_system() {
        // [2 1 0; 1 3 1; 0 1 2] x = [3, 5, 3] ⇒ x = [1, 1, 1]
        let system = TridiagonalSystem {
            lower: vec![0.0, 1.0, 1.0],
            diag: vec![2.0, 3.0, 2.0],
            upper: vec![1.0, 1.0, 0.0],
        };
        let x = system.solve(&[3.0, 5.0, 3.0]).unwrap();
        for v in x {
            assert!((v - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_pivot_is_singular() {
        let system = TridiagonalSystem {
            lower: vec![0.0, 1.0],
            diag: vec![0.0, 1.0],
            upper: vec![1.0, 0.0],
        };
        let err = system.solve(&[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, EngineError::SingularKernel { row: 0, .. }));
        assert!(err.is_numeric_defect());
    }

    #[test]
    fn elimination_zero_pivot_is_singular() {
        // Second pivot: 1 − 1·(1/1) = 0
        let system = TridiagonalSystem {
            lower: vec![0.0, 1.0, 1.0],
            diag: vec![1.0, 1.0, 1.0],
            upper: vec![1.0, 1.0, 0.0],
        };
        let err = system.solve(&[1.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, EngineError::SingularKernel { row: 1, .. }));
    }

    #[test]
    fn rhs_length_mismatch() {
        let system = TridiagonalSystem {
            lower: vec![0.0; 3],
            diag: vec![1.0; 3],
            upper: vec![0.0; 3],
        };
        assert!(matches!(
            system.solve(&[1.0]),
            Err(EngineError::GridMismatch { expected: 3, actual: 1 })
        ));
    }
}
