//! Arithmetic on vectors and matrices.
//!
//! Fallible methods (`try_add`, `matmul`, ...) report shape problems as
//! `LinalgError::DimensionMismatch`. The `std::ops` operators call them and
//! panic with the same message on mismatch, so use the methods whenever
//! shapes are not known to agree.
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::{LinalgError, Result};
use crate::math::{new_storage, Matrix, MatrixRead, TransposeView, Vector};

// ---------------------------------------------------------------------------
// Vector
// ---------------------------------------------------------------------------

impl Vector {
    pub fn try_add(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector add", |a, b| a + b)
    }

    pub fn try_sub(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector sub", |a, b| a - b)
    }

    /// Elementwise product.
    pub fn try_mul(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector mul", |a, b| a * b)
    }

    /// Elementwise quotient.
    pub fn try_div(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector div", |a, b| a / b)
    }

    /// Row-vector times matrix, `x^T * A`.
    pub fn mul_matrix(&self, a: &impl MatrixRead) -> Result<Vector> {
        let (rows, cols) = a.shape();
        if rows != self.len() {
            return Err(LinalgError::length_mismatch("vector * matrix", rows, self.len()));
        }
        let x = self.to_vec();
        Ok((0..cols)
            .map(|j| (0..rows).map(|i| x[i] * a.at(i, j)).sum())
            .collect())
    }
}

macro_rules! vector_binop {
    ($trait:ident, $method:ident, $checked:ident, $op:tt) => {
        impl<'a, 'b> $trait<&'b Vector> for &'a Vector {
            type Output = Vector;

            fn $method(self, rhs: &'b Vector) -> Vector {
                match self.$checked(rhs) {
                    Ok(v) => v,
                    Err(err) => panic!("{}", err),
                }
            }
        }

        impl<'a> $trait<f64> for &'a Vector {
            type Output = Vector;

            fn $method(self, rhs: f64) -> Vector {
                self.map(|v| v $op rhs)
            }
        }

        impl $trait<f64> for Vector {
            type Output = Vector;

            fn $method(self, rhs: f64) -> Vector {
                (&self).$method(rhs)
            }
        }
    };
}

vector_binop!(Add, add, try_add, +);
vector_binop!(Sub, sub, try_sub, -);
vector_binop!(Mul, mul, try_mul, *);
vector_binop!(Div, div, try_div, /);

impl<'a> Mul<&'a Vector> for f64 {
    type Output = Vector;

    fn mul(self, rhs: &'a Vector) -> Vector {
        rhs.map(|v| self * v)
    }
}

impl<'a> Neg for &'a Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.map(|v| -v)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        -&self
    }
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

fn zip_matrices<F>(lhs: &impl MatrixRead, rhs: &impl MatrixRead, op: &'static str, f: F) -> Result<Matrix>
where
    F: Fn(f64, f64) -> f64,
{
    if lhs.shape() != rhs.shape() {
        return Err(LinalgError::mismatch(op, lhs.shape(), rhs.shape()));
    }
    let a = lhs.to_row_major();
    let b = rhs.to_row_major();
    let data = a.iter().zip(b.iter()).map(|(x, y)| f(*x, *y)).collect();
    Ok(Matrix::from_storage(lhs.nrows(), lhs.ncols(), new_storage(data)))
}

impl Matrix {
    pub fn try_add(&self, other: &impl MatrixRead) -> Result<Matrix> {
        zip_matrices(self, other, "matrix add", |a, b| a + b)
    }

    pub fn try_sub(&self, other: &impl MatrixRead) -> Result<Matrix> {
        zip_matrices(self, other, "matrix sub", |a, b| a - b)
    }

    /// Elementwise (Hadamard) product.
    pub fn hadamard(&self, other: &impl MatrixRead) -> Result<Matrix> {
        zip_matrices(self, other, "hadamard", |a, b| a * b)
    }

    pub fn add_scalar(&self, value: f64) -> Matrix {
        self.map(|v| v + value)
    }

    pub fn sub_scalar(&self, value: f64) -> Matrix {
        self.map(|v| v - value)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|v| v * factor)
    }

    /// `self += other` elementwise; visible through views of `self`.
    pub fn add_assign_matrix(&mut self, other: &impl MatrixRead) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(LinalgError::mismatch("add_assign", self.shape(), other.shape()));
        }
        // snapshot first: `other` may alias this buffer
        let rhs = other.to_row_major();
        let mut i = 0;
        self.apply(|v| {
            let out = v + rhs[i];
            i += 1;
            out
        });
        Ok(())
    }

    pub fn sub_assign_matrix(&mut self, other: &impl MatrixRead) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(LinalgError::mismatch("sub_assign", self.shape(), other.shape()));
        }
        let rhs = other.to_row_major();
        let mut i = 0;
        self.apply(|v| {
            let out = v - rhs[i];
            i += 1;
            out
        });
        Ok(())
    }

    pub fn scale_in_place(&mut self, factor: f64) {
        self.apply(|v| v * factor);
    }

    /// Integer power of a square matrix.
    ///
    /// `n = 0` gives the identity, `n = -1` the inverse and `n < -1` the
    /// inverse of `A^|n|`.
    pub fn power(&self, n: i32) -> Result<Matrix> {
        if !self.is_square() {
            return Err(LinalgError::mismatch("power", (self.nrows(), self.nrows()), self.shape()));
        }
        match n {
            0 => Ok(Matrix::identity(self.nrows())),
            -1 => self.inverse(),
            n if n < -1 => self.positive_power(n.unsigned_abs())?.inverse(),
            n => self.positive_power(n as u32),
        }
    }

    /// Exponentiation by squaring.
    fn positive_power(&self, mut exp: u32) -> Result<Matrix> {
        let mut result = Matrix::identity(self.nrows());
        let mut base = self.clone();
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.matmul(&base)?;
            }
            exp >>= 1;
            if exp > 0 {
                base = base.matmul(&base)?;
            }
        }
        Ok(result)
    }
}

fn expect_shape<T>(result: Result<T>) -> T {
    match result {
        Ok(v) => v,
        Err(err) => panic!("{}", err),
    }
}

impl<'a, 'b> Add<&'b Matrix> for &'a Matrix {
    type Output = Matrix;

    fn add(self, rhs: &'b Matrix) -> Matrix {
        expect_shape(self.try_add(rhs))
    }
}

impl<'a, 'b> Sub<&'b Matrix> for &'a Matrix {
    type Output = Matrix;

    fn sub(self, rhs: &'b Matrix) -> Matrix {
        expect_shape(self.try_sub(rhs))
    }
}

impl<'a, 'b> Mul<&'b Matrix> for &'a Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &'b Matrix) -> Matrix {
        expect_shape(self.matmul(rhs))
    }
}

impl<'a, 'b> Mul<&'b TransposeView> for &'a Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &'b TransposeView) -> Matrix {
        expect_shape(self.matmul(rhs))
    }
}

impl<'a, 'b> Mul<&'b Matrix> for &'a TransposeView {
    type Output = Matrix;

    fn mul(self, rhs: &'b Matrix) -> Matrix {
        expect_shape(self.matmul(rhs))
    }
}

impl<'a, 'b> Mul<&'b Vector> for &'a Matrix {
    type Output = Vector;

    fn mul(self, rhs: &'b Vector) -> Vector {
        expect_shape(self.mul_vector(rhs))
    }
}

impl<'a, 'b> Mul<&'b Matrix> for &'a Vector {
    type Output = Vector;

    fn mul(self, rhs: &'b Matrix) -> Vector {
        expect_shape(self.mul_matrix(rhs))
    }
}

impl<'a> Add<f64> for &'a Matrix {
    type Output = Matrix;

    fn add(self, rhs: f64) -> Matrix {
        self.add_scalar(rhs)
    }
}

impl<'a> Sub<f64> for &'a Matrix {
    type Output = Matrix;

    fn sub(self, rhs: f64) -> Matrix {
        self.sub_scalar(rhs)
    }
}

impl<'a> Mul<f64> for &'a Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f64) -> Matrix {
        self.scale(rhs)
    }
}

impl<'a> Div<f64> for &'a Matrix {
    type Output = Matrix;

    fn div(self, rhs: f64) -> Matrix {
        self.map(|v| v / rhs)
    }
}

impl<'a> Mul<&'a Matrix> for f64 {
    type Output = Matrix;

    fn mul(self, rhs: &'a Matrix) -> Matrix {
        rhs.scale(self)
    }
}

impl<'a> Neg for &'a Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        self.map(|v| -v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_cases() {
        let a = Matrix::from_rows(vec![vec![2.0, 1.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(a.power(0).unwrap(), Matrix::identity(2));
        assert_eq!(a.power(3).unwrap(), &(&a * &a) * &a);
        let inv = a.power(-1).unwrap();
        assert!(a.matmul(&inv).unwrap().approx_eq(&Matrix::identity(2), 1e-12));
        let inv2 = a.power(-2).unwrap();
        let a2 = a.power(2).unwrap();
        assert!(a2.matmul(&inv2).unwrap().approx_eq(&Matrix::identity(2), 1e-12));
        assert!(Matrix::zeros(2, 3).power(2).is_err());
    }

    #[test]
    fn vector_times_matrix() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let x = Vector::from_vec(vec![1.0, 0.0, -1.0]);
        assert_eq!((&x * &a).to_vec(), vec![-4.0, -4.0]);
        let y = Vector::from_vec(vec![1.0, 1.0]);
        assert_eq!((&a * &y).to_vec(), vec![3.0, 7.0, 11.0]);
    }

    #[test]
    fn add_assign_through_alias() {
        let mut a = Matrix::ones(2, 2);
        let t = a.transpose();
        a.add_assign_matrix(&t).unwrap();
        assert_eq!(a, Matrix::from_elem(2, 2, 2.0));
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn operator_panics_on_mismatch() {
        let a = Vector::zeros(3);
        let b = Vector::zeros(4);
        let _ = &a + &b;
    }
}
