//! Ordinary Least Squares regression solver.

use crate::core::{
    CovarianceMatrix, CovarianceOptions, RegressionOptions, RegressionOptionsBuilder,
    RegressionResult,
};
use crate::inference::{
    classical_covariance, cluster_robust_covariance, heteroskedasticity_robust_covariance,
    CoefficientTable,
};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{
    invert_upper_triangular, numerical_rank, prepend_intercept, solve_normal_with_factor,
    upper_triangular_factor,
};
use faer::{Col, Mat};
use std::hash::Hash;

/// Ordinary Least Squares regression estimator.
///
/// Rank is checked with a column-pivoted QR decomposition; a rank-deficient
/// design is rejected with [`RegressionError::SingularDesign`]. Coefficients
/// are obtained from the R factor of the QR decomposition of X, so `X'X` is
/// never formed or inverted explicitly.
///
/// # Example
///
/// ```rust,ignore
/// use robust_ols::prelude::*;
/// use faer::{Mat, Col};
///
/// let x = Mat::from_fn(100, 1, |i, _| i as f64);
/// let y = Col::from_fn(100, |i| 1.0 + 2.0 * i as f64);
///
/// let fitted = OlsRegressor::builder()
///     .with_intercept(true)
///     .build()
///     .fit(&x, &y)?;
///
/// let hc1 = fitted.hc_covariance(&CovarianceOptions::default());
/// println!("HC1 SE: {:?}", hc1.standard_errors()?);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    /// Create a new OLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    /// Get the options of this regressor.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// Check if a matrix has full column rank.
    pub fn is_full_rank(x: &Mat<f64>, tolerance: f64) -> bool {
        numerical_rank(x, tolerance) == x.ncols()
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;

        if x.nrows() != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }

        let design = if self.options.with_intercept {
            prepend_intercept(x)
        } else {
            x.clone()
        };

        fit_design(design, y.clone(), &self.options, 0)
    }
}

/// Fit OLS on a complete design matrix.
///
/// `absorbed_effects` counts parameters removed from the design by a prior
/// within transformation; they reduce the residual degrees of freedom.
pub(crate) fn fit_design(
    design: Mat<f64>,
    response: Col<f64>,
    options: &RegressionOptions,
    absorbed_effects: usize,
) -> Result<FittedOls, RegressionError> {
    let n_samples = design.nrows();
    let n_params = design.ncols();

    if design.nrows() != response.nrows() {
        return Err(RegressionError::DimensionMismatch {
            x_rows: design.nrows(),
            y_len: response.nrows(),
        });
    }

    let finite = response.iter().all(|v| v.is_finite())
        && (0..n_params).all(|j| (0..n_samples).all(|i| design[(i, j)].is_finite()));
    if !finite {
        return Err(RegressionError::NonFiniteInput);
    }

    if n_params == 0 {
        return Err(RegressionError::SingularDesign {
            rank: 0,
            n_columns: 0,
        });
    }

    // Need at least one residual degree of freedom for any variance estimate
    let needed = n_params + absorbed_effects + 1;
    if n_samples < needed {
        return Err(RegressionError::InsufficientObservations {
            needed,
            got: n_samples,
        });
    }

    let rank = numerical_rank(&design, options.rank_tolerance);
    log::debug!(
        "ols fit: n = {}, k = {}, rank = {}, absorbed = {}",
        n_samples,
        n_params,
        rank,
        absorbed_effects
    );
    if rank < n_params {
        return Err(RegressionError::SingularDesign {
            rank,
            n_columns: n_params,
        });
    }

    let r = upper_triangular_factor(&design);
    let r_inv = invert_upper_triangular(&r).ok_or(RegressionError::SingularDesign {
        rank,
        n_columns: n_params,
    })?;

    // Semi-normal equations R'R b = X'y, followed by one refinement step
    let mut coefficients = solve_normal_with_factor(&r, &(design.transpose() * &response));
    let first_pass = &design * &coefficients;
    let correction_rhs = design.transpose() * &(&response - &first_pass);
    let delta = solve_normal_with_factor(&r, &correction_rhs);
    for j in 0..n_params {
        coefficients[j] += delta[j];
    }

    let fitted_values = &design * &coefficients;
    let residuals = &response - &fitted_values;

    // (X'X)^-1 = R^-1 R^-T
    let xtx_inverse = &r_inv * r_inv.transpose();

    let mut result = RegressionResult::empty(n_params, n_samples);
    result.coefficients = coefficients;
    result.residuals = residuals;
    result.fitted_values = fitted_values;
    result.absorbed_effects = absorbed_effects;
    result.rank_tolerance = options.rank_tolerance;
    result.confidence_level = options.confidence_level;
    compute_statistics(&response, &mut result);

    Ok(FittedOls {
        options: options.clone(),
        result,
        design,
        response,
        xtx_inverse,
    })
}

/// Fill in the fit statistics of `result` from its residuals.
fn compute_statistics(y: &Col<f64>, result: &mut RegressionResult) {
    let n = y.nrows();

    let y_mean: f64 = y.iter().sum::<f64>() / n as f64;
    let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
    let rss: f64 = result.residuals.iter().map(|&r| r.powi(2)).sum();

    let r_squared = if tss > 0.0 {
        (1.0 - rss / tss).clamp(0.0, 1.0)
    } else if rss < 1e-10 {
        1.0
    } else {
        0.0
    };

    let df_total = (n - 1) as f64;
    let df_resid = result.residual_df() as f64;
    let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
        1.0 - (1.0 - r_squared) * df_total / df_resid
    } else {
        f64::NAN
    };

    let mse = if df_resid > 0.0 {
        rss / df_resid
    } else {
        f64::NAN
    };

    result.rss = rss;
    result.mse = mse;
    result.rmse = mse.sqrt();
    result.r_squared = r_squared;
    result.adj_r_squared = adj_r_squared;
}

/// A fitted OLS regression model.
///
/// Owns copies of the design matrix and response it was fit on, so
/// covariance estimates can be computed at any later point without the
/// caller keeping the inputs alive.
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    result: RegressionResult,
    design: Mat<f64>,
    response: Col<f64>,
    /// (X'X)⁻¹, the bread of every sandwich estimator
    xtx_inverse: Mat<f64>,
}

impl FittedOls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// The design matrix the model was fit on (including any prepended intercept).
    pub fn design(&self) -> &Mat<f64> {
        &self.design
    }

    /// The response vector the model was fit on.
    pub fn response(&self) -> &Col<f64> {
        &self.response
    }

    /// `(X'X)^-1` of the design matrix.
    pub fn xtx_inverse(&self) -> &Mat<f64> {
        &self.xtx_inverse
    }

    /// Fitted values on the training data.
    pub fn fitted_values(&self) -> &Col<f64> {
        &self.result.fitted_values
    }

    /// Number of observations `n`.
    pub fn n_observations(&self) -> usize {
        self.result.n_observations
    }

    /// Number of estimated coefficients `k`.
    pub fn n_parameters(&self) -> usize {
        self.result.n_parameters
    }

    /// Residual degrees of freedom.
    pub fn residual_df(&self) -> usize {
        self.result.residual_df()
    }

    /// Classical covariance `σ̂² (X'X)^-1`.
    pub fn classical_covariance(&self) -> CovarianceMatrix {
        classical_covariance(self)
    }

    /// Heteroskedasticity-consistent covariance (HC1 by default, HC0 uncorrected).
    pub fn hc_covariance(&self, options: &CovarianceOptions) -> CovarianceMatrix {
        heteroskedasticity_robust_covariance(self, options)
    }

    /// One-way cluster-robust covariance (CR1 by default, CR0 uncorrected).
    pub fn cluster_covariance<L: Eq + Hash>(
        &self,
        cluster_labels: &[L],
        options: &CovarianceOptions,
    ) -> Result<CovarianceMatrix, RegressionError> {
        cluster_robust_covariance(self, cluster_labels, options)
    }

    /// Coefficient inference (SE, t, p, confidence intervals) using `covariance`.
    pub fn inference(
        &self,
        covariance: &CovarianceMatrix,
    ) -> Result<CoefficientTable, RegressionError> {
        CoefficientTable::new(
            &self.result.coefficients,
            covariance,
            self.inference_df(covariance),
            self.options.confidence_level,
        )
    }

    /// Degrees of freedom for t-based inference with `covariance`.
    ///
    /// `G - 1` for cluster-robust estimators, the residual df otherwise.
    pub fn inference_df(&self, covariance: &CovarianceMatrix) -> f64 {
        match covariance.n_clusters() {
            Some(g) if covariance.kind().is_cluster() => g.saturating_sub(1) as f64,
            _ => self.residual_df() as f64,
        }
    }
}

impl FittedRegressor for FittedOls {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let design = if self.options.with_intercept {
            prepend_intercept(x)
        } else {
            x.clone()
        };
        &design * &self.result.coefficients
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to prepend an intercept column to X.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    /// Set the relative rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    /// Build the OLS regressor. Options are validated when fitting.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}
