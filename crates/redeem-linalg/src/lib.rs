//! redeem-linalg: dense linear algebra for the ReDeeM learning models.
//!
//! The crate provides `Vector` and `Matrix` types whose row, column and
//! transpose views alias the parent's storage, the factorizations the models
//! rely on (Cholesky, QR, Gauss-Jordan inverse, determinant and the Jacobi
//! symmetric eigen-decomposition), a linear solver, a seeded random source
//! and a plain-text persistence format.
//!
//! Matrices are single-threaded handles. Parallel work (covariance,
//! correlation and the round-robin Jacobi strategy) runs on plain buffers
//! copied out of the matrix, with results written back on the calling thread.
pub mod config;
pub mod decomposition;
pub mod error;
pub mod io;
pub mod math;
pub mod random;
pub mod solve;

pub use config::{JacobiStrategy, LinalgConfig};
pub use decomposition::{determinant, inverse, Cholesky, Evd, Qr};
pub use error::{LinalgError, Result};
pub use math::{Matrix, MatrixRead, Orientation, Placement, TransposeView, Vector};
pub use random::Random;
pub use solve::{solve, solve_least_squares, solve_with_config};
