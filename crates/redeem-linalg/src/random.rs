//! Seeded scalar random source.
//!
//! `Random` wraps a `StdRng` and samples derived distributions through
//! `statrs`. There is no process-wide state: anything that needs randomness
//! takes a `&mut Random`.
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use statrs::distribution::{Beta, ChiSquared, Exp, Gamma, Normal};

use crate::error::{LinalgError, Result};

#[derive(Debug, Clone)]
pub struct Random {
    rng: StdRng,
}

impl Random {
    /// Deterministic generator; the same seed always yields the same stream.
    pub fn seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_system_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform sample in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform sample in `[low, high)`.
    pub fn uniform_range(&mut self, low: f64, high: f64) -> Result<f64> {
        if !(low < high) || !low.is_finite() || !high.is_finite() {
            return Err(LinalgError::InvalidArgument(format!(
                "uniform range requires finite low < high, got [{}, {})",
                low, high
            )));
        }
        Ok(Uniform::new(low, high).sample(&mut self.rng))
    }

    /// Uniform integer in `[low, high)`.
    pub fn uniform_int(&mut self, low: usize, high: usize) -> Result<usize> {
        if low >= high {
            return Err(LinalgError::InvalidArgument(format!(
                "integer range requires low < high, got [{}, {})",
                low, high
            )));
        }
        Ok(self.rng.gen_range(low..high))
    }

    pub fn normal(&mut self, mean: f64, std_dev: f64) -> Result<f64> {
        let dist = Normal::new(mean, std_dev).map_err(invalid("normal"))?;
        Ok(dist.sample(&mut self.rng))
    }

    /// Sample from `N(0, 1)`.
    pub fn standard_normal(&mut self) -> Result<f64> {
        self.normal(0.0, 1.0)
    }

    pub fn exponential(&mut self, rate: f64) -> Result<f64> {
        let dist = Exp::new(rate).map_err(invalid("exponential"))?;
        Ok(dist.sample(&mut self.rng))
    }

    /// Gamma sample parameterised by shape and scale (`scale = 1 / rate`).
    pub fn gamma(&mut self, shape: f64, scale: f64) -> Result<f64> {
        if !(scale > 0.0) {
            return Err(LinalgError::InvalidArgument(format!(
                "gamma scale must be positive, got {}",
                scale
            )));
        }
        let dist = Gamma::new(shape, 1.0 / scale).map_err(invalid("gamma"))?;
        Ok(dist.sample(&mut self.rng))
    }

    pub fn beta(&mut self, alpha: f64, beta: f64) -> Result<f64> {
        let dist = Beta::new(alpha, beta).map_err(invalid("beta"))?;
        Ok(dist.sample(&mut self.rng))
    }

    pub fn chi_squared(&mut self, freedom: f64) -> Result<f64> {
        let dist = ChiSquared::new(freedom).map_err(invalid("chi-squared"))?;
        Ok(dist.sample(&mut self.rng))
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// A random permutation of `0..n`.
    pub fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        self.shuffle(&mut order);
        order
    }
}

/// Map a distribution constructor error into `InvalidArgument`.
fn invalid<E: std::fmt::Display>(name: &'static str) -> impl Fn(E) -> LinalgError {
    move |err| LinalgError::InvalidArgument(format!("{} distribution: {}", name, err))
}
