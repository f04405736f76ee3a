use crate::decomposition::{square_buffer, Qr};
use crate::error::Result;
use crate::math::{Matrix, MatrixRead};

/// Determinant of a square matrix.
///
/// Sizes up to 3 use the closed-form expansions. Larger matrices go through
/// the QR factorization: `det(A) = det(Q) * prod(diag(R))`, where `det(Q)`
/// is `+1` or `-1` and is recovered by elimination on `Q`.
pub fn determinant(a: &impl MatrixRead) -> Result<f64> {
    let (n, m) = square_buffer(a, "determinant")?;
    let det = match n {
        0 => 1.0,
        1 => m[0],
        2 => m[0] * m[3] - m[1] * m[2],
        3 => {
            m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
                + m[2] * (m[3] * m[7] - m[4] * m[6])
        }
        _ => {
            let qr = Qr::new(a)?;
            let r_diag = qr.r().diag().product();
            if r_diag == 0.0 {
                return Ok(0.0);
            }
            orthogonal_sign(qr.q()) * r_diag
        }
    };
    log::trace!("determinant of {}x{} matrix: {}", n, n, det);
    Ok(det)
}

/// Sign of the determinant of an orthogonal matrix, by partial-pivot
/// elimination. The product of the pivots is `+-1` up to rounding.
fn orthogonal_sign(q: &Matrix) -> f64 {
    let n = q.nrows();
    let mut m = q.to_vec();
    let mut det: f64 = 1.0;
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| m[a * n + col].abs().total_cmp(&m[b * n + col].abs()))
            .unwrap_or(col);
        if pivot_row != col {
            for k in 0..n {
                m.swap(col * n + k, pivot_row * n + k);
            }
            det = -det;
        }
        let pivot = m[col * n + col];
        if pivot == 0.0 {
            return 0.0;
        }
        det *= pivot;
        for row in (col + 1)..n {
            let factor = m[row * n + col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                m[row * n + k] -= factor * m[col * n + k];
            }
        }
    }
    det.signum()
}
