//! Symmetric eigen-decomposition by Jacobi rotations.
//!
//! Each rotation zeroes one off-diagonal pair `(p, q)` through the similarity
//! transform `A <- J^T A J` and accumulates `V <- V J`. Sweeps repeat until
//! the off-diagonal Frobenius norm drops below `eig_tolerance * max(1, ||A||_F)`.
use rayon::prelude::*;

use crate::config::{JacobiStrategy, LinalgConfig};
use crate::decomposition::square_buffer;
use crate::error::{LinalgError, Result};
use crate::math::{Matrix, MatrixRead, Vector};

/// Eigenvalues in descending order with the matching unit eigenvectors stored
/// as the columns of `eigenvectors`.
#[derive(Debug, Clone)]
pub struct Evd {
    eigenvalues: Vector,
    eigenvectors: Matrix,
    sweeps: usize,
}

impl Evd {
    /// Decompose with the default tolerances and the cyclic strategy.
    pub fn new(a: &impl MatrixRead) -> Result<Self> {
        Self::with_config(a, &LinalgConfig::default())
    }

    pub fn with_config(a: &impl MatrixRead, config: &LinalgConfig) -> Result<Self> {
        let (n, mut work) = square_buffer(a, "evd")?;
        let scale = a.frobenius_norm().max(1.0);
        let threshold = config.eig_tolerance * scale;
        if !a.is_symmetric(threshold) {
            return Err(LinalgError::NotSymmetric);
        }

        let mut v = vec![0.0; n * n];
        for i in 0..n {
            v[i * n + i] = 1.0;
        }
        let rounds = match config.jacobi_strategy {
            JacobiStrategy::Cyclic => Vec::new(),
            JacobiStrategy::RoundRobin => round_robin_rounds(n),
        };

        let mut sweeps = 0;
        loop {
            let off = off_diagonal_norm(&work, n);
            if off <= threshold {
                break;
            }
            if sweeps >= config.max_sweeps {
                log::warn!(
                    "jacobi gave up after {} sweeps on {}x{} matrix (off-diagonal norm {:e})",
                    sweeps,
                    n,
                    n,
                    off
                );
                return Err(LinalgError::ConvergenceFailure { sweeps, off_norm: off });
            }
            match config.jacobi_strategy {
                JacobiStrategy::Cyclic => cyclic_sweep(&mut work, &mut v, n),
                JacobiStrategy::RoundRobin => {
                    for pairs in &rounds {
                        parallel_round(&mut work, &mut v, n, pairs);
                    }
                }
            }
            sweeps += 1;
        }
        log::debug!(
            "jacobi ({:?}) converged after {} sweeps on {}x{} matrix",
            config.jacobi_strategy,
            sweeps,
            n,
            n
        );

        let values: Vector = (0..n).map(|i| work[i * n + i]).collect();
        let order = values.sort_order();
        let mut eigenvectors = Matrix::zeros(n, n);
        for (dst, &src) in order.iter().enumerate() {
            let mut column: Vector = (0..n).map(|k| v[k * n + src]).collect();
            column.normalize()?;
            eigenvectors.set_col(dst, &column)?;
        }

        Ok(Self {
            eigenvalues: values.select(&order)?,
            eigenvectors,
            sweeps,
        })
    }

    pub fn eigenvalues(&self) -> &Vector {
        &self.eigenvalues
    }

    /// Eigenvectors as columns, in the order of [`Evd::eigenvalues`].
    pub fn eigenvectors(&self) -> &Matrix {
        &self.eigenvectors
    }

    /// Copy of the eigenvector paired with the `index`-th eigenvalue.
    pub fn eigenvector(&self, index: usize) -> Result<Vector> {
        self.eigenvectors.copy_col(index)
    }

    /// Number of full sweeps that were needed.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    pub fn into_parts(self) -> (Vector, Matrix) {
        (self.eigenvalues, self.eigenvectors)
    }
}

fn off_diagonal_norm(a: &[f64], n: usize) -> f64 {
    let mut sum: f64 = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += a[i * n + j] * a[i * n + j];
            }
        }
    }
    sum.sqrt()
}

/// Cosine and sine of the rotation that annihilates `a_pq`.
fn rotation(app: f64, aqq: f64, apq: f64) -> (f64, f64) {
    let tau = (aqq - app) / (2.0 * apq);
    let t = if tau == 0.0 {
        1.0
    } else {
        tau.signum() / (tau.abs() + (1.0 + tau * tau).sqrt())
    };
    let c = 1.0 / (1.0 + t * t).sqrt();
    (c, t * c)
}

#[derive(Debug, Clone, Copy)]
struct Rotation {
    p: usize,
    q: usize,
    c: f64,
    s: f64,
}

impl Rotation {
    /// Apply to columns p and q of one row-major row.
    #[inline]
    fn rotate_columns(&self, row: &mut [f64]) {
        let (kp, kq) = (row[self.p], row[self.q]);
        row[self.p] = self.c * kp - self.s * kq;
        row[self.q] = self.s * kp + self.c * kq;
    }
}

fn cyclic_sweep(a: &mut [f64], v: &mut [f64], n: usize) {
    for p in 0..n {
        for q in (p + 1)..n {
            let apq = a[p * n + q];
            if apq == 0.0 {
                continue;
            }
            let (c, s) = rotation(a[p * n + p], a[q * n + q], apq);
            let rot = Rotation { p, q, c, s };
            for row in a.chunks_mut(n) {
                rot.rotate_columns(row);
            }
            for k in 0..n {
                let (pk, qk) = (a[p * n + k], a[q * n + k]);
                a[p * n + k] = c * pk - s * qk;
                a[q * n + k] = s * pk + c * qk;
            }
            for row in v.chunks_mut(n) {
                rot.rotate_columns(row);
            }
            a[p * n + q] = 0.0;
            a[q * n + p] = 0.0;
        }
    }
}

/// One tournament round: all rotations use angles from the matrix as it
/// stood at the start of the round. The pairs are disjoint, so the column,
/// row and `V` phases each run in parallel, with a collect between phases.
fn parallel_round(a: &mut [f64], v: &mut [f64], n: usize, pairs: &[(usize, usize)]) {
    let rotations: Vec<Rotation> = {
        let a_ref: &[f64] = a;
        pairs
            .par_iter()
            .filter(|&&(p, q)| a_ref[p * n + q] != 0.0)
            .map(|&(p, q)| {
                let (c, s) = rotation(a_ref[p * n + p], a_ref[q * n + q], a_ref[p * n + q]);
                Rotation { p, q, c, s }
            })
            .collect()
    };
    if rotations.is_empty() {
        return;
    }

    // A <- A J
    a.par_chunks_mut(n).for_each(|row| {
        for rot in &rotations {
            rot.rotate_columns(row);
        }
    });

    // A <- J^T A
    let new_rows: Vec<(usize, usize, Vec<f64>, Vec<f64>)> = {
        let a_ref: &[f64] = a;
        rotations
            .par_iter()
            .map(|rot| {
                let row_p = &a_ref[rot.p * n..(rot.p + 1) * n];
                let row_q = &a_ref[rot.q * n..(rot.q + 1) * n];
                let new_p: Vec<f64> = row_p.iter().zip(row_q).map(|(x, y)| rot.c * x - rot.s * y).collect();
                let new_q: Vec<f64> = row_p.iter().zip(row_q).map(|(x, y)| rot.s * x + rot.c * y).collect();
                (rot.p, rot.q, new_p, new_q)
            })
            .collect()
    };
    for (p, q, new_p, new_q) in new_rows {
        a[p * n..(p + 1) * n].copy_from_slice(&new_p);
        a[q * n..(q + 1) * n].copy_from_slice(&new_q);
    }

    // V <- V J
    v.par_chunks_mut(n).for_each(|row| {
        for rot in &rotations {
            rot.rotate_columns(row);
        }
    });

    for rot in &rotations {
        a[rot.p * n + rot.q] = 0.0;
        a[rot.q * n + rot.p] = 0.0;
    }
}

/// Circle-method schedule: `m - 1` rounds of `m / 2` disjoint pairs, where
/// `m` is `n` rounded up to even. Pairs touching the padding index are
/// dropped. Every `(p, q)` with `p < q < n` appears exactly once per sweep.
fn round_robin_rounds(n: usize) -> Vec<Vec<(usize, usize)>> {
    let m = n + n % 2;
    let mut order: Vec<usize> = (0..m).collect();
    let mut rounds = Vec::with_capacity(m.saturating_sub(1));
    for _ in 1..m {
        let pairs = (0..m / 2)
            .map(|i| (order[i], order[m - 1 - i]))
            .filter(|&(x, y)| x < n && y < n)
            .map(|(x, y)| (x.min(y), x.max(y)))
            .collect();
        rounds.push(pairs);
        order[1..].rotate_right(1);
    }
    rounds
}
