//! Reading and writing matrices.
pub mod matrix_text;

pub use matrix_text::{load, load_from_path, save, save_to_path};
