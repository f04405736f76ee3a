use std::str::FromStr;

use redeem_linalg::{JacobiStrategy, LinalgConfig, Matrix, Random, Vector};

#[test]
fn test_config_defaults() {
    let config = LinalgConfig::default();
    assert_eq!(config.eig_tolerance, 1e-10);
    assert_eq!(config.max_sweeps, 100);
    assert_eq!(config.pivot_epsilon, 1e-11);
    assert_eq!(config.jacobi_strategy, JacobiStrategy::Cyclic);
}

#[test]
fn test_config_json_round_trip() {
    let config = LinalgConfig::new(1e-8, 20, JacobiStrategy::RoundRobin);
    let json = serde_json::to_string(&config).expect("failed to serialize config");
    assert!(json.contains("\"round_robin\""));
    let parsed: LinalgConfig = serde_json::from_str(&json).expect("failed to parse config");
    assert_eq!(parsed, config);

    // strategy is optional in config files
    let partial: LinalgConfig =
        serde_json::from_str(r#"{"eig_tolerance": 1e-9, "max_sweeps": 10, "pivot_epsilon": 1e-12}"#).unwrap();
    assert_eq!(partial.jacobi_strategy, JacobiStrategy::Cyclic);
}

#[test]
fn test_strategy_from_str() {
    assert_eq!(JacobiStrategy::from_str("cyclic").unwrap(), JacobiStrategy::Cyclic);
    assert_eq!(JacobiStrategy::from_str("Round-Robin").unwrap(), JacobiStrategy::RoundRobin);
    assert_eq!(JacobiStrategy::from_str("parallel").unwrap(), JacobiStrategy::RoundRobin);
    assert!(JacobiStrategy::from_str("lanczos").is_err());
}

#[test]
fn test_seeded_matrices_are_reproducible() {
    let a = Matrix::random_uniform(3, 4, &mut Random::seed(77));
    let b = Matrix::random_uniform(3, 4, &mut Random::seed(77));
    assert_eq!(a, b);
    assert!(a.to_vec().iter().all(|v| (0.0..1.0).contains(v)));

    let c = Matrix::random_uniform(3, 4, &mut Random::seed(78));
    assert_ne!(a, c);
}

#[test]
fn test_random_vectors_and_invalid_parameters() {
    let mut rng = Random::seed(1);
    let v = Vector::random_normal(5_000, 10.0, 0.5, &mut rng).unwrap();
    assert!((v.mean() - 10.0).abs() < 0.05);
    assert!((v.std_dev() - 0.5).abs() < 0.05);

    assert!(Vector::random_normal(3, 0.0, -1.0, &mut rng).is_err());
    assert!(rng.exponential(0.0).is_err());
    assert!(rng.chi_squared(3.0).unwrap() > 0.0);
    assert!(rng.uniform_int(5, 5).is_err());
    let k = rng.uniform_int(2, 4).unwrap();
    assert!((2..4).contains(&k));
}

#[test]
fn test_shuffle_keeps_elements() {
    let mut rng = Random::seed(9);
    let mut items: Vec<u32> = (0..20).collect();
    rng.shuffle(&mut items);
    items.sort_unstable();
    assert_eq!(items, (0..20).collect::<Vec<_>>());
}
