use std::fmt;

use crate::error::{LinalgError, Result};
use crate::math::{new_storage, MatrixRead, Orientation, Placement, Storage, TransposeView, Vector};
use crate::random::Random;

/// Dense row-major `f64` matrix.
///
/// The buffer is shared with any row/column views and transpose views taken
/// from the matrix; its dimensions never change; every structural operation
/// returns a new matrix. `clone()` is a deep copy.
#[derive(Debug)]
pub struct Matrix {
    data: Storage,
    rows: usize,
    cols: usize,
}

impl Matrix {
    pub(crate) fn from_storage(rows: usize, cols: usize, data: Storage) -> Self {
        debug_assert_eq!(data.borrow().len(), rows * cols);
        Self { data, rows, cols }
    }

    pub fn from_shape_vec(shape: (usize, usize), data: Vec<f64>) -> Result<Self> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(LinalgError::mismatch("from_shape_vec", (rows, cols), (data.len(), 1)));
        }
        Ok(Self::from_storage(rows, cols, new_storage(data)))
    }

    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        Self::from_shape_vec((rows, cols), data)
    }

    /// Build from nested rows; all rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(LinalgError::mismatch("from_rows", (nrows, ncols), (nrows, row.len())));
            }
            data.extend(row);
        }
        Self::from_shape_vec((nrows, ncols), data)
    }

    pub fn from_elem(rows: usize, cols: usize, value: f64) -> Self {
        Self::from_storage(rows, cols, new_storage(vec![value; rows * cols]))
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_elem(rows, cols, 0.0)
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::from_elem(rows, cols, 1.0)
    }

    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self::from_storage(n, n, new_storage(data))
    }

    /// Square matrix with `diag` on the main diagonal.
    pub fn from_diag(diag: &Vector) -> Self {
        let values = diag.to_vec();
        let n = values.len();
        let mut data = vec![0.0; n * n];
        for (i, v) in values.into_iter().enumerate() {
            data[i * n + i] = v;
        }
        Self::from_storage(n, n, new_storage(data))
    }

    /// Entries drawn uniformly from `[0, 1)`.
    pub fn random_uniform(rows: usize, cols: usize, rng: &mut Random) -> Self {
        let data = (0..rows * cols).map(|_| rng.uniform()).collect();
        Self::from_storage(rows, cols, new_storage(data))
    }

    pub fn random_normal(rows: usize, cols: usize, mean: f64, std_dev: f64, rng: &mut Random) -> Result<Self> {
        let data = (0..rows * cols)
            .map(|_| rng.normal(mean, std_dev))
            .collect::<Result<Vec<f64>>>()?;
        Self::from_shape_vec((rows, cols), data)
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                index: row,
                len: self.rows,
            });
        }
        Ok(())
    }

    fn check_col(&self, col: usize) -> Result<()> {
        if col >= self.cols {
            return Err(LinalgError::IndexOutOfRange {
                index: col,
                len: self.cols,
            });
        }
        Ok(())
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_row(row)?;
        self.check_col(col)?;
        let offset = self.offset(row, col);
        self.data.borrow_mut()[offset] = value;
        Ok(())
    }

    /// Row `row` as a live alias; writes through it change this matrix.
    pub fn view_row(&self, row: usize) -> Result<Vector> {
        self.check_row(row)?;
        Ok(Vector::row_view(self.data.clone(), row, self.cols, true))
    }

    /// Column `col` as a live alias; writes through it change this matrix.
    pub fn view_col(&self, col: usize) -> Result<Vector> {
        self.check_col(col)?;
        Ok(Vector::col_view(self.data.clone(), col, self.rows, self.cols, true))
    }

    pub fn row_slice(&self, row: usize) -> Result<Vec<f64>> {
        self.check_row(row)?;
        let start = self.offset(row, 0);
        Ok(self.data.borrow()[start..start + self.cols].to_vec())
    }

    pub fn set_row(&mut self, row: usize, values: &Vector) -> Result<()> {
        self.check_row(row)?;
        if values.len() != self.cols {
            return Err(LinalgError::length_mismatch("set_row", self.cols, values.len()));
        }
        let values = values.to_vec();
        let start = self.offset(row, 0);
        self.data.borrow_mut()[start..start + self.cols].copy_from_slice(&values);
        Ok(())
    }

    pub fn set_col(&mut self, col: usize, values: &Vector) -> Result<()> {
        self.check_col(col)?;
        if values.len() != self.rows {
            return Err(LinalgError::length_mismatch("set_col", self.rows, values.len()));
        }
        let values = values.to_vec();
        let mut data = self.data.borrow_mut();
        for (row, v) in values.into_iter().enumerate() {
            data[row * self.cols + col] = v;
        }
        Ok(())
    }

    /// O(1) read-only transpose sharing this matrix's buffer.
    pub fn transpose(&self) -> TransposeView {
        TransposeView::new(self.cols, self.rows, self.data.clone())
    }

    /// Transposed deep copy.
    pub fn deep_transpose(&self) -> Matrix {
        self.transpose().to_matrix()
    }

    /// Deep copy.
    pub fn copy(&self) -> Matrix {
        self.clone()
    }

    pub fn as_slice(&self) -> std::cell::Ref<'_, Vec<f64>> {
        self.data.borrow()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.borrow().clone()
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        let data = self.data.borrow();
        (0..self.rows)
            .map(|r| data[r * self.cols..(r + 1) * self.cols].to_vec())
            .collect()
    }

    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: FnMut(&f64) -> f64,
    {
        let data = self.data.borrow().iter().map(f).collect();
        Self::from_storage(self.rows, self.cols, new_storage(data))
    }

    /// Apply `f` to every element in place; visible through views.
    pub fn apply<F>(&mut self, mut f: F)
    where
        F: FnMut(f64) -> f64,
    {
        // views of this matrix may be read inside `f`
        let updated: Vec<f64> = self.to_vec().into_iter().map(&mut f).collect();
        *self.data.borrow_mut() = updated;
    }

    pub fn fill(&mut self, value: f64) {
        self.apply(|_| value);
    }

    /// New matrix with `line` inserted before or after row/column `index`.
    pub fn insert(&self, line: &Vector, index: usize, orientation: Orientation, placement: Placement) -> Result<Matrix> {
        let values = line.to_vec();
        match orientation {
            Orientation::Row => {
                if values.len() != self.cols {
                    return Err(LinalgError::length_mismatch("insert row", self.cols, values.len()));
                }
                let at = insert_position(index, self.rows, placement)?;
                let data = self.data.borrow();
                let mut out = Vec::with_capacity((self.rows + 1) * self.cols);
                out.extend_from_slice(&data[..at * self.cols]);
                out.extend_from_slice(&values);
                out.extend_from_slice(&data[at * self.cols..]);
                Matrix::from_shape_vec((self.rows + 1, self.cols), out)
            }
            Orientation::Col => {
                if values.len() != self.rows {
                    return Err(LinalgError::length_mismatch("insert column", self.rows, values.len()));
                }
                let at = insert_position(index, self.cols, placement)?;
                let data = self.data.borrow();
                let mut out = Vec::with_capacity(self.rows * (self.cols + 1));
                for (r, value) in values.iter().enumerate() {
                    let row = &data[r * self.cols..(r + 1) * self.cols];
                    out.extend_from_slice(&row[..at]);
                    out.push(*value);
                    out.extend_from_slice(&row[at..]);
                }
                Matrix::from_shape_vec((self.rows, self.cols + 1), out)
            }
        }
    }

    /// New matrix without row/column `index`.
    pub fn remove(&self, index: usize, orientation: Orientation) -> Result<Matrix> {
        match orientation {
            Orientation::Row => {
                self.check_row(index)?;
                let keep: Vec<usize> = (0..self.rows).filter(|&r| r != index).collect();
                self.slice(&keep, Orientation::Row)
            }
            Orientation::Col => {
                self.check_col(index)?;
                let keep: Vec<usize> = (0..self.cols).filter(|&c| c != index).collect();
                self.slice(&keep, Orientation::Col)
            }
        }
    }

    /// New matrix made of the listed rows or columns, in order.
    pub fn slice(&self, indices: &[usize], orientation: Orientation) -> Result<Matrix> {
        let data = self.data.borrow();
        match orientation {
            Orientation::Row => {
                let mut out = Vec::with_capacity(indices.len() * self.cols);
                for &row in indices {
                    self.check_row(row)?;
                    let start = self.offset(row, 0);
                    out.extend_from_slice(&data[start..start + self.cols]);
                }
                Matrix::from_shape_vec((indices.len(), self.cols), out)
            }
            Orientation::Col => {
                for &col in indices {
                    self.check_col(col)?;
                }
                let mut out = Vec::with_capacity(self.rows * indices.len());
                for row in 0..self.rows {
                    out.extend(indices.iter().map(|&col| data[self.offset(row, col)]));
                }
                Matrix::from_shape_vec((self.rows, indices.len()), out)
            }
        }
    }

    /// Place `other` to the right of this matrix; row counts must match.
    pub fn stack(&self, other: &impl MatrixRead) -> Result<Matrix> {
        if other.nrows() != self.rows {
            return Err(LinalgError::mismatch("stack", (self.rows, other.ncols()), other.shape()));
        }
        let right = other.to_row_major();
        let data = self.data.borrow();
        let total_cols = self.cols + other.ncols();
        let mut out = Vec::with_capacity(self.rows * total_cols);
        for row in 0..self.rows {
            out.extend_from_slice(&data[row * self.cols..(row + 1) * self.cols]);
            out.extend_from_slice(&right[row * other.ncols()..(row + 1) * other.ncols()]);
        }
        Matrix::from_shape_vec((self.rows, total_cols), out)
    }

    /// Place `other` below this matrix; column counts must match.
    pub fn vstack(&self, other: &impl MatrixRead) -> Result<Matrix> {
        if other.ncols() != self.cols {
            return Err(LinalgError::mismatch("vstack", (other.nrows(), self.cols), other.shape()));
        }
        let mut out = self.to_vec();
        out.extend(other.to_row_major());
        Matrix::from_shape_vec((self.rows + other.nrows(), self.cols), out)
    }

    /// Copy the `h x w` block whose top-left corner is row `y`, column `x`.
    ///
    /// With `clip` the block is cut back to the matrix bounds; otherwise a
    /// block reaching past the bounds is an `IndexOutOfRange` error.
    pub fn extract(&self, x: usize, y: usize, w: usize, h: usize, clip: bool) -> Result<Matrix> {
        let (w, h) = if clip {
            (
                w.min(self.cols.saturating_sub(x)),
                h.min(self.rows.saturating_sub(y)),
            )
        } else {
            let right = x.checked_add(w).unwrap_or(usize::MAX);
            if right > self.cols {
                return Err(LinalgError::IndexOutOfRange {
                    index: right,
                    len: self.cols,
                });
            }
            let bottom = y.checked_add(h).unwrap_or(usize::MAX);
            if bottom > self.rows {
                return Err(LinalgError::IndexOutOfRange {
                    index: bottom,
                    len: self.rows,
                });
            }
            (w, h)
        };
        let data = self.data.borrow();
        let mut out = Vec::with_capacity(w * h);
        if w == 0 {
            return Matrix::from_shape_vec((h, 0), out);
        }
        for row in y..y + h {
            let start = self.offset(row, x);
            out.extend_from_slice(&data[start..start + w]);
        }
        Matrix::from_shape_vec((h, w), out)
    }
}

fn insert_position(index: usize, len: usize, placement: Placement) -> Result<usize> {
    // Inserting into an empty dimension only makes sense at 0.
    if len == 0 {
        return if index == 0 {
            Ok(0)
        } else {
            Err(LinalgError::IndexOutOfRange { index, len })
        };
    }
    if index >= len {
        return Err(LinalgError::IndexOutOfRange { index, len });
    }
    Ok(match placement {
        Placement::Before => index,
        Placement::After => index + 1,
    })
}

impl MatrixRead for Matrix {
    fn nrows(&self) -> usize {
        self.rows
    }

    fn ncols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> f64 {
        self.data.borrow()[row * self.cols + col]
    }

    fn to_row_major(&self) -> Vec<f64> {
        self.to_vec()
    }
}

impl Clone for Matrix {
    fn clone(&self) -> Self {
        Self::from_storage(self.rows, self.cols, new_storage(self.to_vec()))
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && *self.data.borrow() == *other.data.borrow()
    }
}

impl PartialEq<TransposeView> for Matrix {
    fn eq(&self, other: &TransposeView) -> bool {
        other == self
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        writeln!(f, "[")?;
        for row in 0..self.rows {
            write!(f, "  [")?;
            for col in 0..self.cols {
                write!(f, "{}", data[row * self.cols + col])?;
                if col + 1 != self.cols {
                    write!(f, ", ")?;
                }
            }
            writeln!(f, "]")?;
        }
        write!(f, "]")
    }
}
