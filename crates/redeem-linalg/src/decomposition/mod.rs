//! Matrix factorizations and the routines built directly on them.
//!
//! Every routine copies its input into a private row-major buffer, works on
//! that buffer, and returns freshly allocated results, so inputs (including
//! transpose views) are never modified.
pub mod cholesky;
pub mod determinant;
pub mod evd;
pub mod inverse;
pub mod qr;

pub use cholesky::Cholesky;
pub use determinant::determinant;
pub use evd::Evd;
pub use inverse::{inverse, inverse_with_config, inverse_with_epsilon};
pub use qr::Qr;

use crate::error::{LinalgError, Result};
use crate::math::MatrixRead;

/// Row-major copy of a square matrix, or `DimensionMismatch`.
pub(crate) fn square_buffer(a: &impl MatrixRead, op: &'static str) -> Result<(usize, Vec<f64>)> {
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(LinalgError::mismatch(op, (rows, rows), (rows, cols)));
    }
    Ok((rows, a.to_row_major()))
}

/// Solve `L x = b` for lower-triangular row-major `l`.
pub(crate) fn forward_substitute(l: &[f64], n: usize, b: &[f64]) -> Vec<f64> {
    let mut x = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i * n + j] * x[j];
        }
        x[i] = sum / l[i * n + i];
    }
    x
}

/// Solve `L^T x = b` for lower-triangular row-major `l`.
pub(crate) fn back_substitute_lt(l: &[f64], n: usize, b: &[f64]) -> Vec<f64> {
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= l[j * n + i] * x[j];
        }
        x[i] = sum / l[i * n + i];
    }
    x
}

/// Solve `U x = b` for upper-triangular row-major `u`.
pub(crate) fn back_substitute_upper(u: &[f64], n: usize, b: &[f64]) -> Vec<f64> {
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= u[i * n + j] * x[j];
        }
        x[i] = sum / u[i * n + i];
    }
    x
}
