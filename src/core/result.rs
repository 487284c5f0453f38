//! Regression result structures.

use faer::Col;

/// Point estimates and fit statistics from a least squares fit.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    // ========== Core Results ==========
    /// Estimated coefficients, one per design matrix column.
    pub coefficients: Col<f64>,

    /// Residuals (y - fitted_values).
    pub residuals: Col<f64>,

    /// Fitted values (predictions on training data).
    pub fitted_values: Col<f64>,

    // ========== Dimensions ==========
    /// Number of estimated coefficients (design matrix columns).
    pub n_parameters: usize,

    /// Number of observations.
    pub n_observations: usize,

    /// Number of group effects absorbed by a within transformation (0 for plain OLS).
    pub absorbed_effects: usize,

    /// Tolerance used for rank determination.
    pub rank_tolerance: f64,

    // ========== Fit Statistics ==========
    /// Residual sum of squares.
    pub rss: f64,

    /// Mean squared error, `rss / residual_df`.
    pub mse: f64,

    /// Root mean squared error.
    pub rmse: f64,

    /// Coefficient of determination (R²).
    pub r_squared: f64,

    /// Adjusted R².
    pub adj_r_squared: f64,

    /// Confidence level used for intervals.
    pub confidence_level: f64,
}

impl RegressionResult {
    /// Create a new empty result (used internally by solvers).
    pub(crate) fn empty(n_parameters: usize, n_observations: usize) -> Self {
        Self {
            coefficients: Col::zeros(n_parameters),
            residuals: Col::zeros(n_observations),
            fitted_values: Col::zeros(n_observations),
            n_parameters,
            n_observations,
            absorbed_effects: 0,
            rank_tolerance: 0.0,
            rss: f64::NAN,
            mse: f64::NAN,
            rmse: f64::NAN,
            r_squared: f64::NAN,
            adj_r_squared: f64::NAN,
            confidence_level: 0.95,
        }
    }

    /// Residual degrees of freedom, `n - k - absorbed_effects`.
    pub fn residual_df(&self) -> usize {
        self.n_observations
            .saturating_sub(self.n_parameters + self.absorbed_effects)
    }
}
