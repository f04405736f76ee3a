//! Row-wise and column-wise reductions over a `Matrix`.
//!
//! `Orientation::Row` yields one value per row, `Orientation::Col` one value
//! per column. For `covariance` and `correlation` the orientation names the
//! variables: with `Col`, every column is a variable and every row a sample.
use rayon::prelude::*;

use crate::math::{Matrix, Orientation, Vector};

impl Matrix {
    /// The lines being reduced, each as a plain `Vec`.
    fn lines(&self, orientation: Orientation) -> Vec<Vec<f64>> {
        match orientation {
            Orientation::Row => self.to_rows(),
            Orientation::Col => self.deep_transpose().to_rows(),
        }
    }

    fn reduce<F>(&self, orientation: Orientation, f: F) -> Vector
    where
        F: Fn(&[f64]) -> f64,
    {
        self.lines(orientation).iter().map(|line| f(line)).collect()
    }

    pub fn sum(&self, orientation: Orientation) -> Vector {
        self.reduce(orientation, |line| line.iter().sum())
    }

    /// Largest value per line; `-inf` for empty lines.
    pub fn max(&self, orientation: Orientation) -> Vector {
        self.reduce(orientation, |line| line.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)))
    }

    /// Smallest value per line; `+inf` for empty lines.
    pub fn min(&self, orientation: Orientation) -> Vector {
        self.reduce(orientation, |line| line.iter().fold(f64::INFINITY, |a, &b| a.min(b)))
    }

    pub fn mean(&self, orientation: Orientation) -> Vector {
        self.reduce(orientation, |line| line.iter().sum::<f64>() / line.len() as f64)
    }

    /// Sample standard deviation per line.
    pub fn std_dev(&self, orientation: Orientation) -> Vector {
        self.reduce(orientation, |line| sample_covariance(line, line).sqrt())
    }

    /// Sample covariance matrix between the variables named by `orientation`.
    ///
    /// Each (i, j) entry of the upper triangle is computed as an independent
    /// rayon task; the lower triangle is filled by symmetry.
    pub fn covariance(&self, orientation: Orientation) -> Matrix {
        let vars = self.lines(orientation);
        let n = vars.len();
        let pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();
        let values: Vec<f64> = pairs
            .par_iter()
            .map(|&(i, j)| sample_covariance(&vars[i], &vars[j]))
            .collect();

        let mut out = vec![0.0; n * n];
        for (&(i, j), v) in pairs.iter().zip(values) {
            out[i * n + j] = v;
            out[j * n + i] = v;
        }
        Matrix::from_storage(n, n, crate::math::new_storage(out))
    }

    /// Pearson correlation matrix. The diagonal is 1; pairs involving a
    /// constant variable are `NaN`.
    pub fn correlation(&self, orientation: Orientation) -> Matrix {
        let cov = self.covariance(orientation).to_rows();
        let n = cov.len();
        let sd: Vec<f64> = (0..n).map(|i| cov[i][i].sqrt()).collect();
        let data: Vec<f64> = (0..n * n)
            .into_par_iter()
            .map(|k| {
                let (i, j) = (k / n, k % n);
                if i == j {
                    1.0
                } else {
                    cov[i][j] / (sd[i] * sd[j])
                }
            })
            .collect();
        Matrix::from_storage(n, n, crate::math::new_storage(data))
    }
}

/// Sample covariance (n - 1 denominator) of two equal-length slices; `NaN`
/// with fewer than two samples.
fn sample_covariance(a: &[f64], b: &[f64]) -> f64 {
    use statrs::statistics::Statistics;
    a.iter().covariance(b.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::MatrixRead;

    fn data() -> Matrix {
        Matrix::from_rows(vec![
            vec![1.0, 2.0, 0.0],
            vec![2.0, 4.0, 0.0],
            vec![3.0, 6.0, 1.0],
            vec![4.0, 8.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn sums_by_orientation() {
        let m = data();
        assert_eq!(m.sum(Orientation::Col).to_vec(), vec![10.0, 20.0, 1.0]);
        assert_eq!(m.sum(Orientation::Row).to_vec(), vec![3.0, 6.0, 10.0, 12.0]);
        assert_eq!(m.max(Orientation::Col).to_vec(), vec![4.0, 8.0, 1.0]);
        assert_eq!(m.min(Orientation::Row).to_vec(), vec![0.0, 0.0, 1.0, 0.0]);
        assert_eq!(m.mean(Orientation::Col).to_vec(), vec![2.5, 5.0, 0.25]);
    }

    #[test]
    fn covariance_matches_vector_covariance() {
        let m = data();
        let cov = m.covariance(Orientation::Col);
        assert_eq!(cov.shape(), (3, 3));
        for i in 0..3 {
            for j in 0..3 {
                let expected = m.copy_col(i).unwrap().covariance(&m.copy_col(j).unwrap()).unwrap();
                assert!((cov.at(i, j) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn correlation_of_proportional_columns_is_one() {
        let m = data();
        let corr = m.correlation(Orientation::Col);
        assert!((corr.at(0, 1) - 1.0).abs() < 1e-12);
        assert!((corr.at(1, 0) - 1.0).abs() < 1e-12);
        assert!((corr.at(2, 2) - 1.0).abs() < 1e-12);
        let std = m.std_dev(Orientation::Col);
        assert!((std.get(0).unwrap() - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn single_sample_has_nan_covariance() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        let cov = m.covariance(Orientation::Col);
        assert!(cov.to_vec().iter().all(|v| v.is_nan()));
    }
}
