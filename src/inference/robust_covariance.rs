//! Classical, heteroskedasticity-consistent and cluster-robust covariance estimators.
//!
//! The robust estimators share the sandwich form
//! `V = (X'X)^-1 M (X'X)^-1`
//! and differ only in the meat `M`:
//!
//! - HC: `M = Σ_i e_i² x_i x_i'`
//! - CR: `M = Σ_g s_g s_g'` with cluster scores `s_g = Σ_{i∈g} e_i x_i`
//!
//! # References
//!
//! - White, H. (1980). "A Heteroskedasticity-Consistent Covariance Matrix Estimator
//!   and a Direct Test for Heteroskedasticity." *Econometrica*, 48(4), 817–838.
//! - Liang, K.-Y. & Zeger, S.L. (1986). "Longitudinal data analysis using
//!   generalized linear models." *Biometrika*, 73(1), 13–22.
//! - Cameron, A.C. & Miller, D.L. (2015). "A Practitioner's Guide to
//!   Cluster-Robust Inference." *Journal of Human Resources*, 50(2), 317–372.

use crate::core::{
    CovarianceMatrix, CovarianceOptions, CovarianceType, DEFAULT_VARIANCE_TOLERANCE,
};
use crate::inference::cluster::ClusterIndex;
use crate::solvers::{FittedOls, FittedRegressor, RegressionError};
use crate::utils::{add_outer_product, sandwich};
use faer::{Col, Mat};
use std::hash::Hash;

/// Below this many clusters cluster-robust standard errors are noticeably biased downwards.
const FEW_CLUSTERS: usize = 30;

/// Classical covariance `σ̂² (X'X)^-1` with `σ̂² = e'e / df`.
///
/// `df` is `n - k` for OLS and `n - G - k` for a fixed-effects fit.
pub fn classical_covariance(fitted: &FittedOls) -> CovarianceMatrix {
    let sigma2 = fitted.result().mse;
    let bread = fitted.xtx_inverse();
    let k = bread.nrows();
    let matrix = Mat::from_fn(k, k, |i, j| sigma2 * bread[(i, j)]);

    CovarianceMatrix::new(
        CovarianceType::Classical,
        matrix,
        None,
        DEFAULT_VARIANCE_TOLERANCE,
    )
}

/// Heteroskedasticity-consistent sandwich covariance.
///
/// `V = (X'X)^-1 (Σ_i e_i² x_i x_i') (X'X)^-1`, scaled by `n / df` when the
/// small-sample correction is enabled (HC1), unscaled otherwise (HC0).
pub fn heteroskedasticity_robust_covariance(
    fitted: &FittedOls,
    options: &CovarianceOptions,
) -> CovarianceMatrix {
    let x = fitted.design();
    let residuals = fitted.residuals();
    let n = x.nrows();
    let k = x.ncols();

    let mut meat = Mat::zeros(k, k);
    let mut row = vec![0.0; k];
    for i in 0..n {
        for (j, v) in row.iter_mut().enumerate() {
            *v = x[(i, j)];
        }
        add_outer_product(&mut meat, &row, residuals[i] * residuals[i]);
    }

    let (kind, scale) = if options.small_sample_correction() {
        let df = fitted.residual_df() as f64;
        (CovarianceType::HC1, n as f64 / df)
    } else {
        (CovarianceType::HC0, 1.0)
    };

    let matrix = sandwich(fitted.xtx_inverse(), &meat, scale);
    CovarianceMatrix::new(kind, matrix, None, options.variance_tolerance())
}

/// One-way cluster-robust sandwich covariance.
///
/// `cluster_labels` holds one label per observation, aligned with the rows of
/// the design matrix. Clusters need not be contiguous or balanced; scores are
/// accumulated in order of first appearance of each label.
///
/// With the small-sample correction (CR1) the meat is scaled by
/// `G / (G - 1) * (n - 1) / (n - k)`.
///
/// # Errors
/// - [`RegressionError::ClusterLengthMismatch`] if the label count differs from `n`.
/// - [`RegressionError::InsufficientClusters`] if `G <= k`.
pub fn cluster_robust_covariance<L: Eq + Hash>(
    fitted: &FittedOls,
    cluster_labels: &[L],
    options: &CovarianceOptions,
) -> Result<CovarianceMatrix, RegressionError> {
    let n = fitted.n_observations();
    if cluster_labels.len() != n {
        return Err(RegressionError::ClusterLengthMismatch {
            n_observations: n,
            n_labels: cluster_labels.len(),
        });
    }

    let index = ClusterIndex::new(cluster_labels);
    cluster_robust_covariance_with_index(fitted, &index, options)
}

/// Cluster-robust covariance for a prebuilt [`ClusterIndex`].
pub fn cluster_robust_covariance_with_index(
    fitted: &FittedOls,
    index: &ClusterIndex,
    options: &CovarianceOptions,
) -> Result<CovarianceMatrix, RegressionError> {
    let x = fitted.design();
    let residuals = fitted.residuals();
    let n = x.nrows();
    let k = x.ncols();
    let g = index.n_clusters();

    if index.n_observations() != n {
        return Err(RegressionError::ClusterLengthMismatch {
            n_observations: n,
            n_labels: index.n_observations(),
        });
    }
    if g <= k {
        return Err(RegressionError::InsufficientClusters {
            n_clusters: g,
            n_parameters: k,
        });
    }
    if g < FEW_CLUSTERS {
        log::warn!(
            "cluster-robust covariance with only {} clusters; standard errors may be biased downwards",
            g
        );
    }

    let mut meat = Mat::zeros(k, k);
    let mut score = vec![0.0; k];
    for members in index.iter() {
        score.iter_mut().for_each(|s| *s = 0.0);
        for &i in members {
            let e_i = residuals[i];
            for (j, s) in score.iter_mut().enumerate() {
                *s += x[(i, j)] * e_i;
            }
        }
        add_outer_product(&mut meat, &score, 1.0);
    }

    let (kind, scale) = if options.small_sample_correction() {
        let g_f = g as f64;
        let n_f = n as f64;
        let k_f = k as f64;
        (
            CovarianceType::CR1,
            (g_f / (g_f - 1.0)) * ((n_f - 1.0) / (n_f - k_f)),
        )
    } else {
        (CovarianceType::CR0, 1.0)
    };

    log::debug!(
        "cluster-robust covariance: G = {}, n = {}, k = {}, correction = {:.6}",
        g,
        n,
        k,
        scale
    );

    let matrix = sandwich(fitted.xtx_inverse(), &meat, scale);
    Ok(CovarianceMatrix::new(
        kind,
        matrix,
        Some(g),
        options.variance_tolerance(),
    ))
}

/// Standard errors: square roots of the covariance diagonal.
///
/// Negative diagonal entries whose magnitude is within the matrix's relative
/// variance tolerance of zero are treated as zero.
///
/// # Errors
/// [`RegressionError::NegativeVariance`] for a diagonal entry that is
/// negative beyond tolerance or NaN.
pub fn standard_errors(covariance: &CovarianceMatrix) -> Result<Col<f64>, RegressionError> {
    let k = covariance.dim();
    let largest = (0..k)
        .map(|j| covariance.variance(j).abs())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let threshold = covariance.variance_tolerance() * largest;

    let mut se = Col::zeros(k);
    for j in 0..k {
        let variance = covariance.variance(j);
        if variance >= 0.0 {
            se[j] = variance.sqrt();
        } else if variance >= -threshold {
            log::warn!(
                "clamping negative variance {:e} of coefficient {} to zero",
                variance,
                j
            );
            se[j] = 0.0;
        } else {
            return Err(RegressionError::NegativeVariance { index: j, variance });
        }
    }

    Ok(se)
}
