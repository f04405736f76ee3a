//! Read access shared by owning matrices and transpose views.
use crate::decomposition::{determinant, Cholesky, Evd, Qr};
use crate::error::{LinalgError, Result};
use crate::math::{new_storage, Matrix, Storage, Vector};

/// Read-only matrix access.
///
/// Everything a decomposition or solver needs is expressed through this
/// trait, so the same routines accept a [`Matrix`] or a [`TransposeView`].
pub trait MatrixRead {
    fn nrows(&self) -> usize;

    fn ncols(&self) -> usize;

    /// Unchecked element read; callers guarantee the indices are in range.
    fn at(&self, row: usize, col: usize) -> f64;

    fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    fn get(&self, row: usize, col: usize) -> Result<f64> {
        if row >= self.nrows() {
            return Err(LinalgError::IndexOutOfRange {
                index: row,
                len: self.nrows(),
            });
        }
        if col >= self.ncols() {
            return Err(LinalgError::IndexOutOfRange {
                index: col,
                len: self.ncols(),
            });
        }
        Ok(self.at(row, col))
    }

    /// Values in row-major order of this matrix's logical layout.
    fn to_row_major(&self) -> Vec<f64> {
        let (rows, cols) = self.shape();
        let mut out = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                out.push(self.at(i, j));
            }
        }
        out
    }

    /// Independent owning copy.
    fn to_matrix(&self) -> Matrix {
        Matrix::from_storage(self.nrows(), self.ncols(), new_storage(self.to_row_major()))
    }

    fn copy_row(&self, row: usize) -> Result<Vector> {
        if row >= self.nrows() {
            return Err(LinalgError::IndexOutOfRange {
                index: row,
                len: self.nrows(),
            });
        }
        Ok((0..self.ncols()).map(|j| self.at(row, j)).collect())
    }

    fn copy_col(&self, col: usize) -> Result<Vector> {
        if col >= self.ncols() {
            return Err(LinalgError::IndexOutOfRange {
                index: col,
                len: self.ncols(),
            });
        }
        Ok((0..self.nrows()).map(|i| self.at(i, col)).collect())
    }

    /// Matrix product `self * other`.
    fn matmul(&self, other: &impl MatrixRead) -> Result<Matrix>
    where
        Self: Sized,
    {
        let (n, k) = self.shape();
        let (k2, m) = other.shape();
        if k != k2 {
            return Err(LinalgError::mismatch("matmul", (k, m), (k2, m)));
        }
        let a = self.to_row_major();
        let b = other.to_row_major();
        let mut out = vec![0.0; n * m];
        for i in 0..n {
            let out_row = &mut out[i * m..(i + 1) * m];
            for p in 0..k {
                let aip = a[i * k + p];
                if aip == 0.0 {
                    continue;
                }
                let b_row = &b[p * m..(p + 1) * m];
                for (o, bv) in out_row.iter_mut().zip(b_row) {
                    *o += aip * bv;
                }
            }
        }
        Matrix::from_shape_vec((n, m), out)
    }

    /// Matrix-vector product `self * x`.
    fn mul_vector(&self, x: &Vector) -> Result<Vector> {
        let (rows, cols) = self.shape();
        if cols != x.len() {
            return Err(LinalgError::length_mismatch("matrix * vector", cols, x.len()));
        }
        let xs = x.to_vec();
        Ok((0..rows)
            .map(|i| (0..cols).map(|j| self.at(i, j) * xs[j]).sum())
            .collect())
    }

    fn trace(&self) -> f64 {
        (0..self.nrows().min(self.ncols())).map(|i| self.at(i, i)).sum()
    }

    /// Main diagonal as an owned vector.
    fn diag(&self) -> Vector {
        (0..self.nrows().min(self.ncols())).map(|i| self.at(i, i)).collect()
    }

    fn frobenius_norm(&self) -> f64 {
        self.to_row_major().iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    fn is_symmetric(&self, tol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        (0..n).all(|i| (i + 1..n).all(|j| (self.at(i, j) - self.at(j, i)).abs() <= tol))
    }

    fn approx_eq(&self, other: &impl MatrixRead, tol: f64) -> bool
    where
        Self: Sized,
    {
        self.shape() == other.shape()
            && self
                .to_row_major()
                .iter()
                .zip(other.to_row_major().iter())
                .all(|(a, b)| (a - b).abs() <= tol)
    }

    fn inverse(&self) -> Result<Matrix>
    where
        Self: Sized,
    {
        crate::decomposition::inverse(self)
    }

    fn determinant(&self) -> Result<f64>
    where
        Self: Sized,
    {
        determinant(self)
    }

    fn cholesky(&self) -> Result<Cholesky>
    where
        Self: Sized,
    {
        Cholesky::new(self)
    }

    fn qr(&self) -> Result<Qr>
    where
        Self: Sized,
    {
        Qr::new(self)
    }

    fn evd(&self) -> Result<Evd>
    where
        Self: Sized,
    {
        Evd::new(self)
    }
}

/// O(1) read-only transpose of a [`Matrix`].
///
/// The view shares the parent's buffer, so later writes to the parent show
/// up here. It has no mutating methods; row and column views taken from it
/// reject writes with [`LinalgError::ImmutableView`].
#[derive(Debug, Clone)]
pub struct TransposeView {
    rows: usize,
    cols: usize,
    data: Storage,
}

impl TransposeView {
    /// `rows`/`cols` are the view's dimensions (the parent is `cols x rows`).
    pub(crate) fn new(rows: usize, cols: usize, data: Storage) -> Self {
        Self { rows, cols, data }
    }

    /// Row `i` of the view, i.e. column `i` of the parent, as a read-only alias.
    pub fn view_row(&self, row: usize) -> Result<Vector> {
        if row >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                index: row,
                len: self.rows,
            });
        }
        Ok(Vector::col_view(self.data.clone(), row, self.cols, self.rows, false))
    }

    /// Column `j` of the view, i.e. row `j` of the parent, as a read-only alias.
    pub fn view_col(&self, col: usize) -> Result<Vector> {
        if col >= self.cols {
            return Err(LinalgError::IndexOutOfRange {
                index: col,
                len: self.cols,
            });
        }
        Ok(Vector::row_view(self.data.clone(), col, self.rows, false))
    }

    /// The parent matrix again, sharing its buffer.
    pub fn transpose(&self) -> Matrix {
        Matrix::from_storage(self.cols, self.rows, self.data.clone())
    }

    /// Detached copy in the view's orientation.
    pub fn copy(&self) -> Matrix {
        self.to_matrix()
    }
}

impl MatrixRead for TransposeView {
    fn nrows(&self) -> usize {
        self.rows
    }

    fn ncols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> f64 {
        // parent is cols x rows, row-major with `self.rows` columns
        self.data.borrow()[col * self.rows + row]
    }

    fn to_row_major(&self) -> Vec<f64> {
        let parent = self.data.borrow();
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.push(parent[j * self.rows + i]);
            }
        }
        out
    }
}

impl PartialEq for TransposeView {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.to_row_major() == other.to_row_major()
    }
}

impl PartialEq<Matrix> for TransposeView {
    fn eq(&self, other: &Matrix) -> bool {
        self.shape() == other.shape() && self.to_row_major() == other.to_row_major()
    }
}
