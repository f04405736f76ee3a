use std::fmt;
use std::iter::FromIterator;

use itertools_num::ItertoolsNum;

use crate::error::{LinalgError, Result};
use crate::math::{new_storage, Matrix, Storage};
use crate::random::Random;

/// Where a vector's values live.
#[derive(Debug)]
enum Repr {
    /// Contiguous buffer owned by the vector (and by any 1xn / nx1 matrix
    /// made from it with `as_row_matrix` / `as_col_matrix`).
    Owned(Storage),
    /// Row `row` of a matrix with `cols` columns.
    RowView { matrix: Storage, row: usize, cols: usize },
    /// Column `col` of a `rows` x `cols` matrix.
    ColView {
        matrix: Storage,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// A 1-D `f64` container that either owns its values or views one line of
/// a matrix.
///
/// Writes through a view land in the parent matrix, and writes to the
/// parent are visible through the view. Views taken from a
/// [`TransposeView`](crate::math::TransposeView) are read-only: `set` and the
/// in-place operations return [`LinalgError::ImmutableView`].
///
/// `clone()` always produces an owned, detached copy.
#[derive(Debug)]
pub struct Vector {
    repr: Repr,
    writable: bool,
}

impl Vector {
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            repr: Repr::Owned(new_storage(data)),
            writable: true,
        }
    }

    pub fn from_vec(data: Vec<f64>) -> Self {
        Self::new(data)
    }

    pub(crate) fn row_view(matrix: Storage, row: usize, cols: usize, writable: bool) -> Self {
        Self {
            repr: Repr::RowView { matrix, row, cols },
            writable,
        }
    }

    pub(crate) fn col_view(matrix: Storage, col: usize, rows: usize, cols: usize, writable: bool) -> Self {
        Self {
            repr: Repr::ColView {
                matrix,
                col,
                rows,
                cols,
            },
            writable,
        }
    }

    pub fn from_elem(len: usize, value: f64) -> Self {
        Self::new(vec![value; len])
    }

    pub fn zeros(len: usize) -> Self {
        Self::from_elem(len, 0.0)
    }

    pub fn ones(len: usize) -> Self {
        Self::from_elem(len, 1.0)
    }

    /// `[start, start + 1, ..., end - 1]`; empty when `end <= start`.
    pub fn range(start: i64, end: i64) -> Self {
        (start..end).map(|v| v as f64).collect()
    }

    /// `n` evenly spaced values from `a` to `b` inclusive.
    pub fn linspace(a: f64, b: f64, n: usize) -> Self {
        itertools_num::linspace(a, b, n).collect()
    }

    pub fn random_uniform(len: usize, rng: &mut Random) -> Self {
        (0..len).map(|_| rng.uniform()).collect()
    }

    pub fn random_normal(len: usize, mean: f64, std_dev: f64, rng: &mut Random) -> Result<Self> {
        (0..len).map(|_| rng.normal(mean, std_dev)).collect()
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Owned(data) => data.borrow().len(),
            Repr::RowView { cols, .. } => *cols,
            Repr::ColView { rows, .. } => *rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> (usize,) {
        (self.len(),)
    }

    /// True when the vector aliases a matrix line.
    pub fn is_view(&self) -> bool {
        !matches!(self.repr, Repr::Owned(_))
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    fn storage(&self) -> &Storage {
        match &self.repr {
            Repr::Owned(data) => data,
            Repr::RowView { matrix, .. } | Repr::ColView { matrix, .. } => matrix,
        }
    }

    #[inline]
    fn offset(&self, index: usize) -> usize {
        match &self.repr {
            Repr::Owned(_) => index,
            Repr::RowView { row, cols, .. } => row * cols + index,
            Repr::ColView { col, cols, .. } => index * cols + col,
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(LinalgError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<()> {
        if !self.writable {
            return Err(LinalgError::ImmutableView);
        }
        Ok(())
    }

    pub(crate) fn check_len(&self, op: &'static str, other: &Vector) -> Result<()> {
        if self.len() != other.len() {
            return Err(LinalgError::length_mismatch(op, self.len(), other.len()));
        }
        Ok(())
    }

    /// Unchecked read; callers guarantee `index < len`.
    #[inline]
    pub(crate) fn at(&self, index: usize) -> f64 {
        self.storage().borrow()[self.offset(index)]
    }

    pub fn get(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        Ok(self.at(index))
    }

    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        self.check_writable()?;
        self.check_index(index)?;
        let offset = self.offset(index);
        self.storage().borrow_mut()[offset] = value;
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<f64> {
        match &self.repr {
            Repr::Owned(data) => data.borrow().clone(),
            _ => {
                let data = self.storage().borrow();
                (0..self.len()).map(|i| data[self.offset(i)]).collect()
            }
        }
    }

    /// Iterate over a snapshot of the current values.
    pub fn iter(&self) -> std::vec::IntoIter<f64> {
        self.to_vec().into_iter()
    }

    /// Apply `f` to every element in place.
    pub fn apply<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(f64) -> f64,
    {
        self.check_writable()?;
        // `f` may read the parent matrix, so it runs on a snapshot
        let updated: Vec<f64> = self.to_vec().into_iter().map(&mut f).collect();
        let offsets: Vec<usize> = (0..updated.len()).map(|i| self.offset(i)).collect();
        let mut data = self.storage().borrow_mut();
        for (offset, value) in offsets.into_iter().zip(updated) {
            data[offset] = value;
        }
        Ok(())
    }

    pub fn fill(&mut self, value: f64) -> Result<()> {
        self.apply(|_| value)
    }

    /// Copy `other` into this vector element by element.
    pub fn assign(&mut self, other: &Vector) -> Result<()> {
        self.check_len("assign", other)?;
        let values = other.to_vec();
        let mut iter = values.into_iter();
        self.apply(|_| iter.next().unwrap_or(0.0))
    }

    pub fn map<F>(&self, f: F) -> Vector
    where
        F: FnMut(f64) -> f64,
    {
        self.iter().map(f).collect()
    }

    /// Combine two equal-length vectors element by element.
    pub fn zip_with<F>(&self, other: &Vector, op: &'static str, mut f: F) -> Result<Vector>
    where
        F: FnMut(f64, f64) -> f64,
    {
        self.check_len(op, other)?;
        Ok(self.iter().zip(other.iter()).map(|(a, b)| f(a, b)).collect())
    }

    /// Values at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Vector> {
        let mut selected = Vec::with_capacity(indices.len());
        for &idx in indices {
            selected.push(self.get(idx)?);
        }
        Ok(Vector::from_vec(selected))
    }

    /// Values for which `predicate` holds.
    pub fn filter<P>(&self, mut predicate: P) -> Vector
    where
        P: FnMut(f64) -> bool,
    {
        self.iter().filter(|&v| predicate(v)).collect()
    }

    /// Indices of the values for which `predicate` holds.
    pub fn indices_where<P>(&self, mut predicate: P) -> Vec<usize>
    where
        P: FnMut(f64) -> bool,
    {
        self.iter()
            .enumerate()
            .filter(|(_, v)| predicate(*v))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn dot(&self, other: &Vector) -> Result<f64> {
        self.check_len("dot", other)?;
        Ok(dot_scalar_f64(&self.to_vec(), &other.to_vec()))
    }

    /// Generalised p-norm. `p` must be at least 1; `f64::INFINITY` gives the
    /// largest absolute value and `f64::NEG_INFINITY` the smallest.
    pub fn norm(&self, p: f64) -> Result<f64> {
        let values = self.to_vec();
        if p == f64::INFINITY {
            return Ok(values.iter().fold(0.0, |acc, v| acc.max(v.abs())));
        }
        if p == f64::NEG_INFINITY {
            return Ok(values.iter().fold(f64::INFINITY, |acc, v| acc.min(v.abs())));
        }
        if p.is_nan() || p < 1.0 {
            return Err(LinalgError::InvalidArgument(format!(
                "norm order must be >= 1, got {}",
                p
            )));
        }
        if p == 1.0 {
            return Ok(values.iter().map(|v| v.abs()).sum());
        }
        if p == 2.0 {
            return Ok(values.iter().map(|v| v * v).sum::<f64>().sqrt());
        }
        Ok(values.iter().map(|v| v.abs().powf(p)).sum::<f64>().powf(1.0 / p))
    }

    /// Euclidean norm.
    pub fn norm2(&self) -> f64 {
        self.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// `n x n` matrix with entry (i, j) = self[i] * other[j].
    pub fn outer(&self, other: &Vector) -> Result<Matrix> {
        self.check_len("outer", other)?;
        let x = self.to_vec();
        let y = other.to_vec();
        let mut data = Vec::with_capacity(x.len() * y.len());
        for xi in &x {
            data.extend(y.iter().map(|yj| xi * yj));
        }
        Matrix::from_shape_vec((x.len(), y.len()), data)
    }

    /// Elementwise power.
    pub fn pow(&self, exponent: f64) -> Vector {
        self.map(|v| v.powf(exponent))
    }

    pub fn sum(&self) -> f64 {
        self.iter().sum()
    }

    pub fn product(&self) -> f64 {
        self.iter().product()
    }

    /// Arithmetic mean; `NaN` for an empty vector.
    pub fn mean(&self) -> f64 {
        use statrs::statistics::Statistics;
        self.to_vec().mean()
    }

    /// Sample variance (n - 1 denominator); `NaN` with fewer than two values.
    pub fn variance(&self) -> f64 {
        use statrs::statistics::Statistics;
        self.to_vec().variance()
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Sample covariance with `other`.
    pub fn covariance(&self, other: &Vector) -> Result<f64> {
        use statrs::statistics::Statistics;
        self.check_len("covariance", other)?;
        let a = self.to_vec();
        let b = other.to_vec();
        Ok(a.iter().covariance(b.iter()))
    }

    pub fn max(&self) -> Option<f64> {
        self.max_index().map(|i| self.at(i))
    }

    pub fn min(&self) -> Option<f64> {
        self.min_index().map(|i| self.at(i))
    }

    /// Index of the first largest value.
    pub fn max_index(&self) -> Option<usize> {
        let values = self.to_vec();
        let mut best: Option<usize> = None;
        for (i, v) in values.iter().enumerate() {
            match best {
                Some(b) if values[b] >= *v => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Index of the first smallest value.
    pub fn min_index(&self) -> Option<usize> {
        let values = self.to_vec();
        let mut best: Option<usize> = None;
        for (i, v) in values.iter().enumerate() {
            match best {
                Some(b) if values[b] <= *v => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Indices ordered by descending value; ties keep their original order.
    pub fn sort_order(&self) -> Vec<usize> {
        let values = self.to_vec();
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
        order
    }

    /// Running sums.
    pub fn cumsum(&self) -> Vector {
        self.iter().cumsum().collect()
    }

    /// Divide by the Euclidean norm in place. A zero vector is left unchanged.
    pub fn normalize(&mut self) -> Result<()> {
        let norm = self.norm2();
        if norm == 0.0 {
            self.check_writable()?;
            return Ok(());
        }
        self.apply(|v| v / norm)
    }

    pub fn div_assign_scalar(&mut self, divisor: f64) -> Result<()> {
        self.apply(|v| v / divisor)
    }

    pub fn scale_in_place(&mut self, factor: f64) -> Result<()> {
        self.apply(|v| v * factor)
    }

    pub fn add_assign_vector(&mut self, other: &Vector) -> Result<()> {
        self.check_len("add_assign", other)?;
        let rhs = other.to_vec();
        let mut i = 0;
        self.apply(|v| {
            let out = v + rhs[i];
            i += 1;
            out
        })
    }

    pub fn sub_assign_vector(&mut self, other: &Vector) -> Result<()> {
        self.check_len("sub_assign", other)?;
        let rhs = other.to_vec();
        let mut i = 0;
        self.apply(|v| {
            let out = v - rhs[i];
            i += 1;
            out
        })
    }

    /// Elementwise division by `other` in place.
    pub fn div_assign_vector(&mut self, other: &Vector) -> Result<()> {
        self.check_len("div_assign", other)?;
        let rhs = other.to_vec();
        let mut i = 0;
        self.apply(|v| {
            let out = v / rhs[i];
            i += 1;
            out
        })
    }

    /// The vector as a `1 x n` matrix. Owned vectors share their buffer with
    /// the result; views return a copy because a matrix cannot address a
    /// strided line of another matrix.
    pub fn as_row_matrix(&self) -> Matrix {
        let len = self.len();
        match &self.repr {
            Repr::Owned(data) => Matrix::from_storage(1, len, data.clone()),
            _ => Matrix::from_storage(1, len, new_storage(self.to_vec())),
        }
    }

    /// The vector as an `n x 1` matrix, sharing storage like `as_row_matrix`.
    pub fn as_col_matrix(&self) -> Matrix {
        let len = self.len();
        match &self.repr {
            Repr::Owned(data) => Matrix::from_storage(len, 1, data.clone()),
            _ => Matrix::from_storage(len, 1, new_storage(self.to_vec())),
        }
    }

    pub fn approx_eq(&self, other: &Vector, tol: f64) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| (a - b).abs() <= tol)
    }
}

fn dot_scalar_f64(lhs: &[f64], rhs: &[f64]) -> f64 {
    lhs.iter().zip(rhs.iter()).map(|(a, b)| a * b).sum()
}

impl Clone for Vector {
    fn clone(&self) -> Self {
        Vector::from_vec(self.to_vec())
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.to_vec() == other.to_vec()
    }
}

impl From<Vec<f64>> for Vector {
    fn from(value: Vec<f64>) -> Self {
        Vector::from_vec(value)
    }
}

impl From<&[f64]> for Vector {
    fn from(value: &[f64]) -> Self {
        Vector::from_vec(value.to_vec())
    }
}

impl From<Vector> for Vec<f64> {
    fn from(value: Vector) -> Self {
        value.to_vec()
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Vector::from_vec(iter.into_iter().collect())
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.to_vec();
        write!(f, "[")?;
        for (idx, value) in values.iter().enumerate() {
            write!(f, "{}", value)?;
            if idx + 1 != values.len() {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::MatrixRead;

    #[test]
    fn norm_orders() {
        let v = Vector::from_vec(vec![3.0, -4.0]);
        assert_eq!(v.norm(1.0).unwrap(), 7.0);
        assert_eq!(v.norm(2.0).unwrap(), 5.0);
        assert_eq!(v.norm(f64::INFINITY).unwrap(), 4.0);
        assert_eq!(v.norm(f64::NEG_INFINITY).unwrap(), 3.0);
        assert!((v.norm(3.0).unwrap() - 91f64.powf(1.0 / 3.0)).abs() < 1e-12);
        assert!(matches!(v.norm(0.5), Err(LinalgError::InvalidArgument(_))));
    }

    #[test]
    fn owned_row_matrix_shares_buffer() {
        let mut v = Vector::from_vec(vec![1.0, 2.0, 3.0]);
        let m = v.as_row_matrix();
        v.set(1, 20.0).unwrap();
        assert_eq!(m.get(0, 1).unwrap(), 20.0);
        assert_eq!(m.shape(), (1, 3));
    }

    #[test]
    fn clone_detaches() {
        let v = Vector::from_vec(vec![1.0, 2.0]);
        let mut c = v.clone();
        c.set(0, 9.0).unwrap();
        assert_eq!(v.get(0).unwrap(), 1.0);
    }

    #[test]
    fn statistics_use_sample_denominator() {
        let v = Vector::from_vec(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((v.mean() - 5.0).abs() < 1e-12);
        assert!((v.variance() - 32.0 / 7.0).abs() < 1e-12);
        let w = Vector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert!(v.covariance(&w).unwrap() > 0.0);
    }

    #[test]
    fn cumsum_and_linspace() {
        assert_eq!(Vector::range(1, 5).cumsum().to_vec(), vec![1.0, 3.0, 6.0, 10.0]);
        let l = Vector::linspace(0.0, 1.0, 5);
        assert_eq!(l.len(), 5);
        assert!((l.get(4).unwrap() - 1.0).abs() < 1e-12);
    }
}
