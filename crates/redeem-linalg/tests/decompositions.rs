use redeem_linalg::decomposition::inverse_with_epsilon;
use redeem_linalg::{
    determinant, inverse, solve, solve_least_squares, solve_with_config, Cholesky, Evd, JacobiStrategy, LinalgConfig,
    LinalgError, Matrix, MatrixRead, Orientation, Random, Vector,
};

/// Symmetric positive-definite test matrix: `B^T B + n I` for a seeded `B`.
fn spd(n: usize, seed: u64) -> Matrix {
    let mut rng = Random::seed(seed);
    let b = Matrix::random_uniform(n, n, &mut rng);
    let mut a = b.transpose().matmul(&b).expect("square product");
    a.add_assign_matrix(&Matrix::identity(n).scale(n as f64)).unwrap();
    a
}

// ---------------------------------------------------------------------------
// Cholesky
// ---------------------------------------------------------------------------

#[test]
fn test_cholesky_end_to_end() {
    let a = Matrix::from_rows(vec![
        vec![4.0, 12.0, -16.0],
        vec![12.0, 37.0, -43.0],
        vec![-16.0, -43.0, 98.0],
    ])
    .unwrap();
    let chol = a.cholesky().expect("matrix is positive definite");
    let l = chol.l();
    let rebuilt = l.matmul(&l.transpose()).unwrap();
    assert!(rebuilt.approx_eq(&a, 1e-10));

    let b = Vector::from_vec(vec![1.0, 2.0, 3.0]);
    let x = chol.solve(&b).unwrap();
    assert!(a.mul_vector(&x).unwrap().approx_eq(&b, 1e-10));
    assert!((chol.determinant() - a.determinant().unwrap()).abs() < 1e-8);
}

#[test]
fn test_cholesky_random_spd() {
    let a = spd(6, 17);
    let chol = Cholesky::new(&a).unwrap();
    let l = chol.l();
    for i in 0..6 {
        assert!(l.at(i, i) > 0.0);
        for j in (i + 1)..6 {
            assert_eq!(l.at(i, j), 0.0);
        }
    }
    assert!(l.matmul(&l.transpose()).unwrap().approx_eq(&a, 1e-9));
}

// ---------------------------------------------------------------------------
// QR, inverse, determinant
// ---------------------------------------------------------------------------

#[test]
fn test_qr_properties() {
    let a = spd(5, 3);
    let qr = a.qr().unwrap();
    assert!(qr.q().matmul(qr.r()).unwrap().approx_eq(&a, 1e-10));
    assert!(qr
        .q()
        .transpose()
        .matmul(qr.q())
        .unwrap()
        .approx_eq(&Matrix::identity(5), 1e-10));
}

#[test]
fn test_inverse_properties() {
    let mut rng = Random::seed(99);
    let mut a = Matrix::random_uniform(5, 5, &mut rng);
    a.add_assign_matrix(&Matrix::identity(5).scale(3.0)).unwrap();

    let inv = inverse(&a).unwrap();
    assert!(a.matmul(&inv).unwrap().approx_eq(&Matrix::identity(5), 1e-8));
    assert!(inverse(&inv).unwrap().approx_eq(&a, 1e-8));

    let det = determinant(&a).unwrap();
    let det_inv = determinant(&inv).unwrap();
    assert!((det * det_inv - 1.0).abs() < 1e-8);
}

#[test]
fn test_inverse_rejects_singular() {
    let a = Matrix::from_rows(vec![
        vec![1.0, 2.0, 3.0],
        vec![2.0, 4.0, 6.0],
        vec![0.0, 1.0, 1.0],
    ])
    .unwrap();
    assert_eq!(inverse(&a).unwrap_err(), LinalgError::SingularMatrix);

    // tiny but exact pivots pass with a smaller threshold
    let tiny = Matrix::from_diag(&Vector::from_vec(vec![1e-12, 1.0]));
    assert_eq!(inverse(&tiny).unwrap_err(), LinalgError::SingularMatrix);
    let inv = inverse_with_epsilon(&tiny, 1e-15).unwrap();
    assert!((inv.at(0, 0) - 1e12).abs() < 1.0);
}

#[test]
fn test_determinant_consistency_across_sizes() {
    for n in 1..=6 {
        let a = spd(n, 40 + n as u64);
        let via_cholesky = Cholesky::new(&a).unwrap().determinant();
        let direct = determinant(&a).unwrap();
        assert!(
            (via_cholesky - direct).abs() < 1e-8 * direct.abs(),
            "n = {}: {} vs {}",
            n,
            via_cholesky,
            direct
        );
    }
}

// ---------------------------------------------------------------------------
// Solve
// ---------------------------------------------------------------------------

#[test]
fn test_solve_diagonal_system() {
    let a = Matrix::from_rows(vec![vec![2.0, 0.0], vec![0.0, 2.0]]).unwrap();
    let x = solve(&a, &Vector::from_vec(vec![4.0, 6.0])).unwrap();
    assert_eq!(x.to_vec(), vec![2.0, 3.0]);
}

#[test]
fn test_solve_transpose_view() {
    let a = Matrix::from_rows(vec![vec![4.0, 1.0], vec![2.0, 3.0]]).unwrap();
    let b = Vector::from_vec(vec![1.0, 2.0]);
    let x = solve(&a.transpose(), &b).unwrap();
    assert!(a.transpose().mul_vector(&x).unwrap().approx_eq(&b, 1e-12));
}

#[test]
fn test_least_squares_on_square_system_matches_solve() {
    let a = spd(4, 21);
    let b = Vector::from_vec(vec![1.0, -2.0, 0.5, 3.0]);
    let direct = solve(&a, &b).unwrap();
    let normal = solve_least_squares(&a, &b).unwrap();
    assert!(direct.approx_eq(&normal, 1e-8));
    assert!(a.mul_vector(&normal).unwrap().approx_eq(&b, 1e-8));
}

#[test]
fn test_solve_with_config_uses_pivot_epsilon() {
    let a = Matrix::from_diag(&Vector::from_vec(vec![1e-12, 2.0, 4.0]));
    let b = Vector::from_vec(vec![2e-12, 2.0, 4.0]);
    assert_eq!(solve(&a, &b).unwrap_err(), LinalgError::SingularMatrix);
    let config = LinalgConfig {
        pivot_epsilon: 1e-13,
        ..LinalgConfig::default()
    };
    let x = solve_with_config(&a, &b, &config).unwrap();
    assert!(x.approx_eq(&Vector::from_vec(vec![2.0, 1.0, 1.0]), 1e-9));
}

// ---------------------------------------------------------------------------
// Eigen-decomposition
// ---------------------------------------------------------------------------

#[test]
fn test_evd_of_covariance() {
    let mut rng = Random::seed(2024);
    let data = Matrix::random_normal(50, 4, 0.0, 1.0, &mut rng).unwrap();
    let cov = data.covariance(Orientation::Col);
    let evd = Evd::new(&cov).unwrap();

    let values = evd.eigenvalues().to_vec();
    assert!(values.windows(2).all(|w| w[0] >= w[1]));
    assert!(values.iter().all(|&v| v > 0.0));

    let v = evd.eigenvectors();
    let d = Matrix::from_diag(evd.eigenvalues());
    let rebuilt = v.matmul(&d).unwrap().matmul(&v.transpose()).unwrap();
    assert!(rebuilt.approx_eq(&cov, 1e-8));
}

#[test]
fn test_evd_strategies_agree() {
    let a = spd(7, 5);
    let cyclic = Evd::new(&a).unwrap();
    let config = LinalgConfig::default().with_strategy(JacobiStrategy::RoundRobin);
    let round_robin = Evd::with_config(&a, &config).unwrap();
    assert!(cyclic.eigenvalues().approx_eq(round_robin.eigenvalues(), 1e-8));
    for i in 0..7 {
        let x = round_robin.eigenvector(i).unwrap();
        let lambda = round_robin.eigenvalues().get(i).unwrap();
        assert!(a.mul_vector(&x).unwrap().approx_eq(&(&x * lambda), 1e-7));
    }
}

#[test]
fn test_evd_sweep_cap() {
    let a = spd(4, 8);
    let config = LinalgConfig {
        max_sweeps: 1,
        eig_tolerance: 1e-300,
        ..LinalgConfig::default()
    };
    assert!(matches!(
        Evd::with_config(&a, &config),
        Err(LinalgError::ConvergenceFailure { sweeps: 1, .. })
    ));
}
