use std::error::Error;
use std::fmt;

/// Errors raised by vector, matrix and decomposition routines.
#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Operand shapes are incompatible. Shapes are reported as (rows, cols);
    /// vectors report their length in the first slot and 1 in the second.
    DimensionMismatch {
        op: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// A pivot or diagonal value fell at or below the stability threshold.
    SingularMatrix,
    /// A write was attempted through a read-only view.
    ImmutableView,
    /// Row, column or element index outside bounds.
    IndexOutOfRange { index: usize, len: usize },
    /// An iterative routine hit its sweep cap before reaching tolerance.
    ConvergenceFailure { sweeps: usize, off_norm: f64 },
    /// Input to a symmetric-only routine was not symmetric.
    NotSymmetric,
    /// A scalar argument is outside its domain (norm order, distribution parameter, ...).
    InvalidArgument(String),
}

impl LinalgError {
    pub(crate) fn mismatch(op: &'static str, expected: (usize, usize), found: (usize, usize)) -> Self {
        LinalgError::DimensionMismatch { op, expected, found }
    }

    pub(crate) fn length_mismatch(op: &'static str, expected: usize, found: usize) -> Self {
        LinalgError::DimensionMismatch {
            op,
            expected: (expected, 1),
            found: (found, 1),
        }
    }
}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LinalgError::DimensionMismatch { op, expected, found } => write!(
                f,
                "dimension mismatch in {}: expected {}x{}, found {}x{}",
                op, expected.0, expected.1, found.0, found.1
            ),
            LinalgError::SingularMatrix => write!(f, "matrix is singular or not positive definite"),
            LinalgError::ImmutableView => write!(f, "cannot write through a read-only transpose view"),
            LinalgError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            LinalgError::ConvergenceFailure { sweeps, off_norm } => write!(
                f,
                "no convergence after {} sweeps (off-diagonal norm {:e})",
                sweeps, off_norm
            ),
            LinalgError::NotSymmetric => write!(f, "matrix is not symmetric"),
            LinalgError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl Error for LinalgError {}

pub type Result<T> = std::result::Result<T, LinalgError>;
