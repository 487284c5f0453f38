//! Common test utilities and data generators.

#![allow(dead_code)]

use faer::{Col, Mat};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Generate linear data with an intercept column: y = 1 + X beta + noise.
///
/// Returns (design including intercept, y, true coefficients including intercept).
pub fn generate_linear_data(
    n_samples: usize,
    n_features: usize,
    noise_std: f64,
    seed: u64,
) -> (Mat<f64>, Col<f64>, Col<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, noise_std).expect("valid noise std");

    let true_coefficients = Col::from_fn(n_features + 1, |j| if j == 0 { 1.0 } else { j as f64 });

    let mut x = Mat::zeros(n_samples, n_features + 1);
    let mut y = Col::zeros(n_samples);

    for i in 0..n_samples {
        x[(i, 0)] = 1.0;
        let mut yi = true_coefficients[0];
        for j in 1..=n_features {
            x[(i, j)] = rng.random_range(-1.0..1.0);
            yi += x[(i, j)] * true_coefficients[j];
        }
        y[i] = yi + noise.sample(&mut rng);
    }

    (x, y, true_coefficients)
}

/// Heteroskedastic data: y = 1 + 2x + e with x ~ U(0, 10) and sd(e | x) = 0.01 x³.
///
/// Returns (single-column covariate matrix, y).
pub fn generate_heteroskedastic_data(n_samples: usize, seed: u64) -> (Mat<f64>, Col<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let standard = Normal::new(0.0, 1.0).expect("valid normal");

    let mut x = Mat::zeros(n_samples, 1);
    let mut y = Col::zeros(n_samples);

    for i in 0..n_samples {
        let xi: f64 = rng.random_range(0.0..10.0);
        let sd = 0.01 * xi.powi(3);
        x[(i, 0)] = xi;
        y[i] = 1.0 + 2.0 * xi + sd * standard.sample(&mut rng);
    }

    (x, y)
}

/// Panel with cluster-level shocks: G clusters of m observations.
///
/// x = u_g + v_i and y = 1 + 0.5 x + s_g + w_i with u, v, s, w iid N(0, 1),
/// so both the covariate and the errors are correlated within clusters.
///
/// Returns (single-column covariate matrix, y, cluster labels).
pub fn generate_clustered_panel(
    n_clusters: usize,
    cluster_size: usize,
    seed: u64,
) -> (Mat<f64>, Col<f64>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let standard = Normal::new(0.0, 1.0).expect("valid normal");

    let n = n_clusters * cluster_size;
    let mut x = Mat::zeros(n, 1);
    let mut y = Col::zeros(n);
    let mut labels = Vec::with_capacity(n);

    for g in 0..n_clusters {
        let u_g = standard.sample(&mut rng);
        let s_g = standard.sample(&mut rng);
        for m in 0..cluster_size {
            let i = g * cluster_size + m;
            let xi = u_g + standard.sample(&mut rng);
            x[(i, 0)] = xi;
            y[i] = 1.0 + 0.5 * xi + s_g + standard.sample(&mut rng);
            labels.push(g);
        }
    }

    (x, y, labels)
}

/// Building blocks for errors with controlled intra-cluster correlation.
///
/// The covariate is mostly cluster-level. Responses for any correlation
/// `rho` are built from the same draws via [`EquicorrelatedPanel::response`],
/// so the marginal error variance stays 1 while only the within-cluster
/// correlation changes.
pub struct EquicorrelatedPanel {
    pub x: Mat<f64>,
    pub labels: Vec<usize>,
    cluster_shock: Vec<f64>,
    idiosyncratic: Vec<f64>,
}

impl EquicorrelatedPanel {
    pub fn new(n_clusters: usize, cluster_size: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let standard = Normal::new(0.0, 1.0).expect("valid normal");

        let n = n_clusters * cluster_size;
        let mut x = Mat::zeros(n, 1);
        let mut labels = Vec::with_capacity(n);
        let mut cluster_shock = Vec::with_capacity(n);
        let mut idiosyncratic = Vec::with_capacity(n);

        for g in 0..n_clusters {
            let x_g = standard.sample(&mut rng);
            let u_g = standard.sample(&mut rng);
            for m in 0..cluster_size {
                let i = g * cluster_size + m;
                x[(i, 0)] = x_g + 0.25 * standard.sample(&mut rng);
                labels.push(g);
                cluster_shock.push(u_g);
                idiosyncratic.push(standard.sample(&mut rng));
            }
        }

        Self {
            x,
            labels,
            cluster_shock,
            idiosyncratic,
        }
    }

    /// y = 1 + 0.5 x + sqrt(rho) u_g + sqrt(1 - rho) v_i
    pub fn response(&self, rho: f64) -> Col<f64> {
        Col::from_fn(self.labels.len(), |i| {
            1.0 + 0.5 * self.x[(i, 0)]
                + rho.sqrt() * self.cluster_shock[i]
                + (1.0 - rho).sqrt() * self.idiosyncratic[i]
        })
    }
}

/// Data with a duplicated covariate column (design includes intercept).
pub fn generate_duplicated_column_data(n_samples: usize) -> (Mat<f64>, Col<f64>) {
    let mut x = Mat::zeros(n_samples, 3);
    let mut y = Col::zeros(n_samples);

    for i in 0..n_samples {
        x[(i, 0)] = 1.0;
        x[(i, 1)] = (i as f64).sqrt();
        x[(i, 2)] = (i as f64).sqrt();
        y[i] = 1.0 + 2.0 * x[(i, 1)] + 0.1 * (i % 3) as f64;
    }

    (x, y)
}

/// Data with a column that is a linear combination of two others.
pub fn generate_collinear_data(n_samples: usize) -> (Mat<f64>, Col<f64>) {
    let mut x = Mat::zeros(n_samples, 4);
    let mut y = Col::zeros(n_samples);

    for i in 0..n_samples {
        x[(i, 0)] = 1.0;
        x[(i, 1)] = i as f64;
        x[(i, 2)] = (i * i) as f64;
        x[(i, 3)] = 2.0 * x[(i, 1)] - 0.5 * x[(i, 2)];
        y[i] = 1.0 + 2.0 * x[(i, 1)] + 3.0 * x[(i, 2)];
    }

    (x, y)
}

/// Design [1, x] and response whose OLS residuals are exactly ±0.5.
///
/// The signs follow the Thue–Morse sequence, which is orthogonal to both
/// the constant and the linear trend over 8 points.
pub fn equal_magnitude_residual_data() -> (Mat<f64>, Col<f64>) {
    const SIGNS: [f64; 8] = [1.0, -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0];
    let x = Mat::from_fn(8, 2, |i, j| if j == 0 { 1.0 } else { i as f64 });
    let y = Col::from_fn(8, |i| 1.0 + 2.0 * i as f64 + 0.5 * SIGNS[i]);
    (x, y)
}

/// Approximate equality check for floating point values.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
