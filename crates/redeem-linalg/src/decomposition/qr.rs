use crate::decomposition::{back_substitute_upper, square_buffer};
use crate::error::{LinalgError, Result};
use crate::math::{new_storage, Matrix, MatrixRead, Vector};

/// QR factorization of a square matrix by modified Gram-Schmidt:
/// `A = Q * R` with orthonormal `Q` and upper-triangular `R`.
///
/// A column that is linearly dependent on the earlier ones leaves a zero
/// column in `Q` and a zero on the diagonal of `R`.
#[derive(Debug, Clone)]
pub struct Qr {
    q: Matrix,
    r: Matrix,
}

impl Qr {
    pub fn new(a: &impl MatrixRead) -> Result<Self> {
        let (n, mut work) = square_buffer(a, "qr")?;
        let mut q = vec![0.0; n * n];
        let mut r = vec![0.0; n * n];

        for k in 0..n {
            let norm = (0..n).map(|i| work[i * n + k] * work[i * n + k]).sum::<f64>().sqrt();
            r[k * n + k] = norm;
            if norm == 0.0 {
                continue;
            }
            for i in 0..n {
                q[i * n + k] = work[i * n + k] / norm;
            }
            // orthogonalize the remaining columns against q_k
            for j in (k + 1)..n {
                let rkj: f64 = (0..n).map(|i| q[i * n + k] * work[i * n + j]).sum();
                r[k * n + j] = rkj;
                for i in 0..n {
                    work[i * n + j] -= rkj * q[i * n + k];
                }
            }
        }

        Ok(Self {
            q: Matrix::from_storage(n, n, new_storage(q)),
            r: Matrix::from_storage(n, n, new_storage(r)),
        })
    }

    pub fn q(&self) -> &Matrix {
        &self.q
    }

    pub fn r(&self) -> &Matrix {
        &self.r
    }

    pub fn into_parts(self) -> (Matrix, Matrix) {
        (self.q, self.r)
    }

    /// Solve `A x = b` as `R x = Q^T b`.
    pub fn solve(&self, b: &Vector) -> Result<Vector> {
        let n = self.r.nrows();
        if b.len() != n {
            return Err(LinalgError::length_mismatch("qr solve", n, b.len()));
        }
        let r = self.r.to_vec();
        if (0..n).any(|i| r[i * n + i] == 0.0) {
            return Err(LinalgError::SingularMatrix);
        }
        let qtb = b.mul_matrix(&self.q)?;
        Ok(Vector::from_vec(back_substitute_upper(&r, n, &qtb.to_vec())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstructs_and_is_orthonormal() {
        let a = Matrix::from_rows(vec![
            vec![12.0, -51.0, 4.0],
            vec![6.0, 167.0, -68.0],
            vec![-4.0, 24.0, -41.0],
        ])
        .unwrap();
        let qr = Qr::new(&a).unwrap();
        assert!(qr.q().matmul(qr.r()).unwrap().approx_eq(&a, 1e-9));
        let qtq = qr.q().transpose().matmul(qr.q()).unwrap();
        assert!(qtq.approx_eq(&Matrix::identity(3), 1e-12));
        let r = qr.r();
        for i in 0..3 {
            for j in 0..i {
                assert_eq!(r.at(i, j), 0.0);
            }
        }
        assert!((r.at(0, 0) - 14.0).abs() < 1e-12);
    }

    #[test]
    fn solve_matches_direct() {
        let a = Matrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
        let x = Qr::new(&a).unwrap().solve(&Vector::from_vec(vec![3.0, 5.0])).unwrap();
        assert!(x.approx_eq(&Vector::from_vec(vec![0.8, 1.4]), 1e-12));
    }
}
