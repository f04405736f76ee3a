use crate::config::LinalgConfig;
use crate::decomposition::square_buffer;
use crate::error::{LinalgError, Result};
use crate::math::{new_storage, Matrix, MatrixRead};

/// Inverse by Gauss-Jordan elimination with partial pivoting.
///
/// Pivots smaller in magnitude than `LinalgConfig::DEFAULT_PIVOT_EPSILON`
/// raise `SingularMatrix`.
pub fn inverse(a: &impl MatrixRead) -> Result<Matrix> {
    inverse_with_epsilon(a, LinalgConfig::DEFAULT_PIVOT_EPSILON)
}

/// [`inverse`] using `config.pivot_epsilon` as the near-zero pivot threshold.
pub fn inverse_with_config(a: &impl MatrixRead, config: &LinalgConfig) -> Result<Matrix> {
    inverse_with_epsilon(a, config.pivot_epsilon)
}

/// [`inverse`] with an explicit near-zero pivot threshold.
pub fn inverse_with_epsilon(a: &impl MatrixRead, pivot_epsilon: f64) -> Result<Matrix> {
    let (n, values) = square_buffer(a, "inverse")?;
    let width = 2 * n;

    // [A | I]
    let mut aug = vec![0.0; n * width];
    for i in 0..n {
        aug[i * width..i * width + n].copy_from_slice(&values[i * n..(i + 1) * n]);
        aug[i * width + n + i] = 1.0;
    }

    // forward elimination
    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_abs = aug[col * width + col].abs();
        for row in (col + 1)..n {
            let candidate = aug[row * width + col].abs();
            if candidate > pivot_abs {
                pivot_abs = candidate;
                pivot_row = row;
            }
        }
        if !(pivot_abs >= pivot_epsilon) {
            return Err(LinalgError::SingularMatrix);
        }
        if pivot_row != col {
            swap_rows(&mut aug, width, pivot_row, col);
        }

        let pivot = aug[col * width + col];
        for v in &mut aug[col * width..(col + 1) * width] {
            *v /= pivot;
        }
        for row in (col + 1)..n {
            let factor = aug[row * width + col];
            if factor != 0.0 {
                eliminate(&mut aug, width, row, col, factor);
            }
        }
    }

    // back substitution: clear everything above each pivot
    for col in (0..n).rev() {
        for row in 0..col {
            let factor = aug[row * width + col];
            if factor != 0.0 {
                eliminate(&mut aug, width, row, col, factor);
            }
        }
    }

    let mut out = Vec::with_capacity(n * n);
    for row in 0..n {
        out.extend_from_slice(&aug[row * width + n..(row + 1) * width]);
    }
    Ok(Matrix::from_storage(n, n, new_storage(out)))
}

fn swap_rows(aug: &mut [f64], width: usize, a: usize, b: usize) {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let (head, tail) = aug.split_at_mut(hi * width);
    head[lo * width..(lo + 1) * width].swap_with_slice(&mut tail[..width]);
}

/// `row -= factor * pivot_row`.
fn eliminate(aug: &mut [f64], width: usize, row: usize, pivot_row: usize, factor: f64) {
    for k in 0..width {
        let p = aug[pivot_row * width + k];
        aug[row * width + k] -= factor * p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_pivoting() {
        let a = Matrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let inv = inverse(&a).unwrap();
        assert_eq!(inv, a);
    }

    #[test]
    fn config_sets_pivot_threshold() {
        let a = Matrix::from_rows(vec![vec![1e-12, 0.0], vec![0.0, 2.0]]).unwrap();
        assert_eq!(
            inverse_with_config(&a, &LinalgConfig::default()),
            Err(LinalgError::SingularMatrix)
        );
        let config = LinalgConfig {
            pivot_epsilon: 1e-14,
            ..LinalgConfig::default()
        };
        let inv = inverse_with_config(&a, &config).unwrap();
        assert!((inv.get(0, 0).unwrap() - 1e12).abs() < 1.0);
        assert_eq!(inv.get(1, 1).unwrap(), 0.5);
    }

    #[test]
    fn singular_is_rejected() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        assert_eq!(inverse(&a).unwrap_err(), LinalgError::SingularMatrix);
    }

    #[test]
    fn inverse_of_transpose_view() {
        let a = Matrix::from_rows(vec![vec![4.0, 7.0], vec![2.0, 6.0]]).unwrap();
        let inv_t = inverse(&a.transpose()).unwrap();
        let expected = inverse(&a).unwrap().deep_transpose();
        assert!(inv_t.approx_eq(&expected, 1e-12));
    }
}
