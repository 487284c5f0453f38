//! Regression and covariance options.

use thiserror::Error;

/// Default relative tolerance for rank determination.
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-10;

/// Default relative tolerance below which a negative variance is treated as zero.
pub const DEFAULT_VARIANCE_TOLERANCE: f64 = 1e-12;

/// Configuration options for fitting a least squares model.
#[derive(Debug, Clone)]
pub struct RegressionOptions {
    /// Whether to prepend a column of ones to the design matrix (default: false).
    ///
    /// When false the design matrix is used as supplied and is expected to
    /// already contain an intercept column if one is wanted.
    pub with_intercept: bool,
    /// Rank tolerance, relative to the largest pivot of a column-pivoted QR.
    pub rank_tolerance: f64,
    /// Confidence level for confidence intervals (default: 0.95).
    pub confidence_level: f64,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            with_intercept: false,
            rank_tolerance: DEFAULT_RANK_TOLERANCE,
            confidence_level: 0.95,
        }
    }
}

/// Errors that can occur when validating options.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OptionsError {
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("rank_tolerance must be in [0, 1), got {0}")]
    InvalidRankTolerance(f64),
    #[error("variance_tolerance must be finite and non-negative, got {0}")]
    InvalidVarianceTolerance(f64),
}

impl RegressionOptions {
    /// Create a new builder for regression options.
    pub fn builder() -> RegressionOptionsBuilder {
        RegressionOptionsBuilder::default()
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(OptionsError::InvalidConfidenceLevel(self.confidence_level));
        }
        if !(0.0..1.0).contains(&self.rank_tolerance) {
            return Err(OptionsError::InvalidRankTolerance(self.rank_tolerance));
        }
        Ok(())
    }
}

/// Builder for `RegressionOptions`.
#[derive(Debug, Clone, Default)]
pub struct RegressionOptionsBuilder {
    options: RegressionOptions,
}

impl RegressionOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to prepend an intercept column.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.options.with_intercept = include;
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Set the relative rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<RegressionOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> RegressionOptions {
        self.options
    }
}

/// Options shared by the robust covariance estimators.
///
/// Fields are private: values come from [`Default`], [`CovarianceOptions::uncorrected`]
/// or the validating [`CovarianceOptionsBuilder::build`], so every instance
/// holds a valid variance tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CovarianceOptions {
    small_sample_correction: bool,
    variance_tolerance: f64,
}

impl Default for CovarianceOptions {
    fn default() -> Self {
        Self {
            small_sample_correction: true,
            variance_tolerance: DEFAULT_VARIANCE_TOLERANCE,
        }
    }
}

impl CovarianceOptions {
    /// Create a new builder for covariance options.
    pub fn builder() -> CovarianceOptionsBuilder {
        CovarianceOptionsBuilder::default()
    }

    /// Whether the finite-sample correction is applied (default: true).
    ///
    /// Heteroskedasticity-robust: scale the meat by `n / (n - k)` (HC1).
    /// Cluster-robust: scale by `G / (G - 1) * (n - 1) / (n - k)` (CR1).
    pub fn small_sample_correction(&self) -> bool {
        self.small_sample_correction
    }

    /// Negative diagonal entries smaller in magnitude than
    /// `variance_tolerance * max_j |V_jj|` are clamped to zero.
    pub fn variance_tolerance(&self) -> f64 {
        self.variance_tolerance
    }

    /// Options without any finite-sample correction (HC0 / CR0).
    pub fn uncorrected() -> Self {
        Self {
            small_sample_correction: false,
            ..Default::default()
        }
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.variance_tolerance.is_finite() || self.variance_tolerance < 0.0 {
            return Err(OptionsError::InvalidVarianceTolerance(
                self.variance_tolerance,
            ));
        }
        Ok(())
    }
}

/// Builder for `CovarianceOptions`.
#[derive(Debug, Clone, Default)]
pub struct CovarianceOptionsBuilder {
    options: CovarianceOptions,
}

impl CovarianceOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the finite-sample correction.
    pub fn small_sample_correction(mut self, enabled: bool) -> Self {
        self.options.small_sample_correction = enabled;
        self
    }

    /// Set the relative tolerance for negative variances.
    pub fn variance_tolerance(mut self, tol: f64) -> Self {
        self.options.variance_tolerance = tol;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<CovarianceOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }
}
