//! Dense `Vector` and `Matrix` types.
//!
//! Both types keep their values in a shared, row-major `f64` buffer so that
//! row/column views and transpose views can alias a parent matrix without
//! copying. The buffer is reference counted and single-threaded; a matrix
//! and all of its views must stay on one thread, which the compiler
//! enforces because the handle is neither `Send` nor `Sync`.
use std::cell::RefCell;
use std::rc::Rc;

pub mod matrix;
pub mod ops;
pub mod stats;
pub mod vector;
pub mod view;

pub use matrix::Matrix;
pub use vector::Vector;
pub use view::{MatrixRead, TransposeView};

pub(crate) type Storage = Rc<RefCell<Vec<f64>>>;

pub(crate) fn new_storage(data: Vec<f64>) -> Storage {
    Rc::new(RefCell::new(data))
}

/// Whether an operation works on rows or on columns.
///
/// Reductions produce one value per row (`Row`) or per column (`Col`);
/// structural operations insert, remove or select rows or columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Row,
    Col,
}

/// Side of the anchor index on which `Matrix::insert` places the new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}
