//! Linear system solvers.
use crate::config::LinalgConfig;
use crate::decomposition::{inverse_with_config, Cholesky};
use crate::error::{LinalgError, Result};
use crate::math::{Matrix, MatrixRead, Vector};

/// Solve `A x = b`.
///
/// Square systems are solved as `inverse(A) * b`. Rectangular systems are
/// solved in the least-squares sense through the normal equations, see
/// [`solve_least_squares`].
///
/// ```
/// use redeem_linalg::math::{Matrix, Vector};
/// use redeem_linalg::solve::solve;
///
/// let a = Matrix::from_rows(vec![vec![2.0, 0.0], vec![0.0, 2.0]]).unwrap();
/// let x = solve(&a, &Vector::from_vec(vec![4.0, 6.0])).unwrap();
/// assert_eq!(x.to_vec(), vec![2.0, 3.0]);
/// ```
pub fn solve(a: &impl MatrixRead, b: &Vector) -> Result<Vector> {
    solve_with_config(a, b, &LinalgConfig::default())
}

/// [`solve`] with square systems inverted under `config.pivot_epsilon`.
pub fn solve_with_config(a: &impl MatrixRead, b: &Vector, config: &LinalgConfig) -> Result<Vector> {
    let (rows, cols) = a.shape();
    if rows != b.len() {
        return Err(LinalgError::length_mismatch("solve", rows, b.len()));
    }
    if rows == cols {
        log::debug!("solve: {}x{} system via Gauss-Jordan inverse", rows, cols);
        inverse_with_config(a, config)?.mul_vector(b)
    } else {
        log::debug!("solve: {}x{} system via normal equations", rows, cols);
        solve_least_squares(a, b)
    }
}

/// Least-squares solution of `A x = b` from the normal equations
/// `A^T A x = A^T b`, factoring `A^T A = L L^T` and substituting forward then
/// backward.
///
/// Fails with `SingularMatrix` when the columns of `A` are linearly
/// dependent.
pub fn solve_least_squares(a: &impl MatrixRead, b: &Vector) -> Result<Vector> {
    let (rows, cols) = a.shape();
    if rows != b.len() {
        return Err(LinalgError::length_mismatch("solve_least_squares", rows, b.len()));
    }
    let values = a.to_row_major();
    let mut ata = vec![0.0; cols * cols];
    for i in 0..cols {
        for j in i..cols {
            let v: f64 = (0..rows).map(|k| values[k * cols + i] * values[k * cols + j]).sum();
            ata[i * cols + j] = v;
            ata[j * cols + i] = v;
        }
    }
    let atb = b.mul_matrix(a)?;

    Cholesky::new(&Matrix::from_shape_vec((cols, cols), ata)?)?.solve(&atb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_system() {
        let a = Matrix::from_rows(vec![vec![3.0, 2.0, -1.0], vec![2.0, -2.0, 4.0], vec![-1.0, 0.5, -1.0]]).unwrap();
        let x = solve(&a, &Vector::from_vec(vec![1.0, -2.0, 0.0])).unwrap();
        assert!(x.approx_eq(&Vector::from_vec(vec![1.0, -2.0, -2.0]), 1e-10));
    }

    #[test]
    fn overdetermined_line_fit() {
        // y = 1 + 2x sampled without noise
        let a = Matrix::from_rows(vec![
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![1.0, 2.0],
            vec![1.0, 3.0],
        ])
        .unwrap();
        let b = Vector::from_vec(vec![1.0, 3.0, 5.0, 7.0]);
        let x = solve(&a, &b).unwrap();
        assert!(x.approx_eq(&Vector::from_vec(vec![1.0, 2.0]), 1e-10));
    }

    #[test]
    fn least_squares_residual_is_orthogonal() {
        let a = Matrix::from_rows(vec![vec![1.0, 1.0], vec![1.0, 2.0], vec![1.0, 4.0]]).unwrap();
        let b = Vector::from_vec(vec![2.0, 1.0, 5.0]);
        let x = solve_least_squares(&a, &b).unwrap();
        let residual = b.try_sub(&a.mul_vector(&x).unwrap()).unwrap();
        let at_r = residual.mul_matrix(&a).unwrap();
        assert!(at_r.approx_eq(&Vector::zeros(2), 1e-10));
    }

    #[test]
    fn rank_deficient_columns_are_singular() {
        let a = Matrix::from_rows(vec![vec![1.0, 1.0], vec![0.0, 0.0], vec![0.0, 0.0]]).unwrap();
        let err = solve(&a, &Vector::from_vec(vec![1.0, 2.0, 3.0])).unwrap_err();
        assert_eq!(err, LinalgError::SingularMatrix);
    }

    #[test]
    fn config_pivot_epsilon_reaches_square_solve() {
        let a = Matrix::from_rows(vec![vec![1e-12, 0.0], vec![0.0, 1.0]]).unwrap();
        let b = Vector::from_vec(vec![1e-12, 3.0]);
        assert_eq!(solve(&a, &b).unwrap_err(), LinalgError::SingularMatrix);

        let config = LinalgConfig {
            pivot_epsilon: 1e-14,
            ..LinalgConfig::default()
        };
        let x = solve_with_config(&a, &b, &config).unwrap();
        assert!(x.approx_eq(&Vector::from_vec(vec![1.0, 3.0]), 1e-9));
    }

    #[test]
    fn row_count_must_match() {
        let a = Matrix::identity(3);
        assert!(matches!(
            solve(&a, &Vector::zeros(2)),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }
}
