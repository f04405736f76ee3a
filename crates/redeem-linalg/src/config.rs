use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Numeric tolerances shared by the decompositions.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LinalgConfig {
    /// Off-diagonal Frobenius norm (relative to `max(1, ||A||_F)`) at which a
    /// Jacobi eigen-decomposition is considered converged.
    pub eig_tolerance: f64,
    /// Upper bound on Jacobi sweeps before `ConvergenceFailure` is raised.
    pub max_sweeps: usize,
    /// Pivots with magnitude below this value are treated as zero by
    /// Gauss-Jordan inversion.
    pub pivot_epsilon: f64,

    #[serde(default)]
    pub jacobi_strategy: JacobiStrategy,
}

/// Order in which Jacobi rotations are applied within a sweep.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum JacobiStrategy {
    /// Row-by-row over every (p, q) pair with p < q, one rotation at a time.
    #[default]
    Cyclic,
    /// Tournament pairing: each round rotates a set of disjoint pairs at
    /// once on the rayon pool, with a barrier between rounds.
    RoundRobin,
}

impl FromStr for JacobiStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "cyclic" => Ok(JacobiStrategy::Cyclic),
            "round_robin" | "roundrobin" | "parallel" => Ok(JacobiStrategy::RoundRobin),
            _ => Err(format!(
                "Unknown Jacobi strategy: {}. Expected one of `cyclic` or `round_robin`",
                s
            )),
        }
    }
}

impl LinalgConfig {
    pub const DEFAULT_EIG_TOLERANCE: f64 = 1e-10;
    pub const DEFAULT_MAX_SWEEPS: usize = 100;
    pub const DEFAULT_PIVOT_EPSILON: f64 = 1e-11;

    pub fn new(eig_tolerance: f64, max_sweeps: usize, jacobi_strategy: JacobiStrategy) -> Self {
        Self {
            eig_tolerance,
            max_sweeps,
            jacobi_strategy,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, jacobi_strategy: JacobiStrategy) -> Self {
        self.jacobi_strategy = jacobi_strategy;
        self
    }
}

impl Default for LinalgConfig {
    fn default() -> Self {
        Self {
            eig_tolerance: Self::DEFAULT_EIG_TOLERANCE,
            max_sweeps: Self::DEFAULT_MAX_SWEEPS,
            pivot_epsilon: Self::DEFAULT_PIVOT_EPSILON,
            jacobi_strategy: JacobiStrategy::Cyclic,
        }
    }
}
