use crate::decomposition::{back_substitute_lt, forward_substitute, square_buffer};
use crate::error::{LinalgError, Result};
use crate::math::{new_storage, Matrix, MatrixRead, Vector};

/// Cholesky factor of a symmetric positive-definite matrix: `A = L * L^T`.
///
/// Only the lower triangle of the input is read.
///
/// ```
/// use redeem_linalg::math::{Matrix, MatrixRead, Vector};
///
/// let a = Matrix::from_rows(vec![vec![4.0, 2.0], vec![2.0, 3.0]]).unwrap();
/// let chol = a.cholesky().unwrap();
/// let x = chol.solve(&Vector::from_vec(vec![8.0, 7.0])).unwrap();
/// assert!((x.get(0).unwrap() - 1.25).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Cholesky {
    l: Matrix,
}

impl Cholesky {
    /// Factor `a`. Fails with `SingularMatrix` as soon as a pivot, after the
    /// updates from earlier columns, is not strictly positive.
    pub fn new(a: &impl MatrixRead) -> Result<Self> {
        let (n, mut l) = square_buffer(a, "cholesky")?;
        cholesky_in_place(&mut l, n)?;
        Ok(Self {
            l: Matrix::from_storage(n, n, new_storage(l)),
        })
    }

    /// The lower-triangular factor.
    pub fn l(&self) -> &Matrix {
        &self.l
    }

    pub fn into_l(self) -> Matrix {
        self.l
    }

    pub fn dim(&self) -> usize {
        self.l.nrows()
    }

    /// Solve `A x = b` by forward then backward substitution.
    pub fn solve(&self, b: &Vector) -> Result<Vector> {
        let n = self.dim();
        if b.len() != n {
            return Err(LinalgError::length_mismatch("cholesky solve", n, b.len()));
        }
        let l = self.l.to_vec();
        let z = forward_substitute(&l, n, &b.to_vec());
        Ok(Vector::from_vec(back_substitute_lt(&l, n, &z)))
    }

    /// `det(A) = prod(diag(L))^2`.
    pub fn determinant(&self) -> f64 {
        let p = self.l.diag().product();
        p * p
    }
}

/// Right-looking outer-product Cholesky on a row-major `n x n` buffer.
///
/// For each column k: take the square root of the pivot, scale the column
/// below it, then subtract the rank-1 update from the trailing lower
/// triangle. The strict upper triangle is zeroed at the end.
pub(crate) fn cholesky_in_place(a: &mut [f64], n: usize) -> Result<()> {
    for k in 0..n {
        let pivot = a[k * n + k];
        if !(pivot > 0.0) {
            return Err(LinalgError::SingularMatrix);
        }
        let lkk = pivot.sqrt();
        a[k * n + k] = lkk;
        for i in (k + 1)..n {
            a[i * n + k] /= lkk;
        }
        for j in (k + 1)..n {
            let ljk = a[j * n + k];
            if ljk == 0.0 {
                continue;
            }
            for i in j..n {
                a[i * n + j] -= a[i * n + k] * ljk;
            }
        }
    }

    for i in 0..n {
        for j in (i + 1)..n {
            a[i * n + j] = 0.0;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_factor() {
        let a = Matrix::from_rows(vec![
            vec![4.0, 12.0, -16.0],
            vec![12.0, 37.0, -43.0],
            vec![-16.0, -43.0, 98.0],
        ])
        .unwrap();
        let chol = Cholesky::new(&a).unwrap();
        let expected = Matrix::from_rows(vec![
            vec![2.0, 0.0, 0.0],
            vec![6.0, 1.0, 0.0],
            vec![-8.0, 5.0, 3.0],
        ])
        .unwrap();
        assert!(chol.l().approx_eq(&expected, 1e-12));
        assert!((chol.determinant() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_pivot_is_singular() {
        let a = Matrix::from_rows(vec![vec![1.0, 5.0], vec![5.0, 1.0]]).unwrap();
        assert_eq!(Cholesky::new(&a).unwrap_err(), LinalgError::SingularMatrix);
        let z = Matrix::from_rows(vec![vec![0.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(Cholesky::new(&z).unwrap_err(), LinalgError::SingularMatrix);
    }

    #[test]
    fn non_square_is_mismatch() {
        let a = Matrix::zeros(2, 3);
        assert!(matches!(
            Cholesky::new(&a),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }
}
