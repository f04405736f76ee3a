use std::str::FromStr;

use redeem_linalg::{Evd, JacobiStrategy, LinalgConfig, Matrix, MatrixRead, Orientation, Random, Vector};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Optional first argument picks the Jacobi strategy: `cyclic` or `round_robin`
    let strategy = match std::env::args().nth(1) {
        Some(arg) => JacobiStrategy::from_str(&arg).map_err(anyhow::Error::msg)?,
        None => JacobiStrategy::Cyclic,
    };

    // 200 samples of 3 features; the third is a noisy mix of the first two
    let mut rng = Random::seed(42);
    let n_samples = 200;
    let mut data = Matrix::zeros(n_samples, 3);
    for i in 0..n_samples {
        let a = rng.normal(0.0, 2.0)?;
        let b = rng.normal(1.0, 0.5)?;
        let noise = rng.normal(0.0, 0.1)?;
        data.set_row(i, &Vector::from_vec(vec![a, b, 0.7 * a - 0.3 * b + noise]))?;
    }
    println!("Data shape: {:?}", data.shape());

    // Center each column
    let means = data.mean(Orientation::Col);
    for j in 0..data.ncols() {
        let mut col = data.view_col(j)?;
        let mean = means.get(j)?;
        col.apply(|v| v - mean)?;
    }

    let cov = data.covariance(Orientation::Col);
    println!("Covariance:\n{}", cov);

    let config = LinalgConfig::default().with_strategy(strategy);
    let evd = Evd::with_config(&cov, &config)?;
    println!("Jacobi strategy {:?} converged in {} sweeps", strategy, evd.sweeps());

    let total = evd.eigenvalues().sum();
    let explained = evd.eigenvalues().map(|v| v / total);
    println!("Eigenvalues: {}", evd.eigenvalues());
    println!("Explained variance ratio: {}", explained);
    println!("Cumulative: {}", explained.cumsum());

    // Project onto the two leading components
    let components = evd.eigenvectors().slice(&[0, 1], Orientation::Col)?;
    let scores = data.matmul(&components)?;
    println!("Scores shape: {:?}", scores.shape());
    println!("Score variances: {}", scores.std_dev(Orientation::Col).pow(2.0));

    let path = std::env::temp_dir().join("redeem_linalg_pca_components.txt");
    redeem_linalg::io::save_to_path(&components, &path)?;
    let reloaded = redeem_linalg::io::load_from_path(&path)?;
    println!(
        "Components written to {} and reloaded unchanged: {}",
        path.display(),
        reloaded == components
    );

    Ok(())
}
