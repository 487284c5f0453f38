//! Variance-covariance matrices of coefficient estimates.

use super::options::DEFAULT_VARIANCE_TOLERANCE;
use faer::{Col, Mat};
use std::fmt;

/// Which estimator produced a covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CovarianceType {
    /// `σ̂² (X'X)^-1` with `σ̂² = e'e / (n - k)`.
    ///
    /// Assumes homoskedastic, uncorrelated errors.
    Classical,
    /// White's heteroskedasticity-consistent estimator without correction.
    HC0,
    /// HC0 scaled by `n / (n - k)`.
    HC1,
    /// One-way cluster-robust (Liang–Zeger) estimator without correction.
    CR0,
    /// CR0 scaled by `G / (G - 1) * (n - 1) / (n - k)`.
    CR1,
}

impl CovarianceType {
    /// Whether the estimator is robust to heteroskedasticity.
    pub fn is_robust(&self) -> bool {
        !matches!(self, CovarianceType::Classical)
    }

    /// Whether the estimator is cluster-robust.
    pub fn is_cluster(&self) -> bool {
        matches!(self, CovarianceType::CR0 | CovarianceType::CR1)
    }

    /// Whether a finite-sample correction was applied.
    pub fn is_corrected(&self) -> bool {
        matches!(self, CovarianceType::HC1 | CovarianceType::CR1)
    }

    /// Short conventional name.
    pub fn name(&self) -> &'static str {
        match self {
            CovarianceType::Classical => "classical",
            CovarianceType::HC0 => "HC0",
            CovarianceType::HC1 => "HC1",
            CovarianceType::CR0 => "CR0",
            CovarianceType::CR1 => "CR1",
        }
    }
}

impl fmt::Display for CovarianceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A coefficient covariance matrix tagged with the estimator that produced it.
///
/// Immutable once constructed; several matrices may be computed from the
/// same fitted model.
#[derive(Debug, Clone)]
pub struct CovarianceMatrix {
    kind: CovarianceType,
    matrix: Mat<f64>,
    n_clusters: Option<usize>,
    variance_tolerance: f64,
}

impl CovarianceMatrix {
    /// Wrap a square matrix produced by the estimator `kind`.
    pub(crate) fn new(
        kind: CovarianceType,
        matrix: Mat<f64>,
        n_clusters: Option<usize>,
        variance_tolerance: f64,
    ) -> Self {
        debug_assert_eq!(matrix.nrows(), matrix.ncols());
        Self {
            kind,
            matrix,
            n_clusters,
            variance_tolerance,
        }
    }

    /// Build a covariance matrix from raw values, e.g. one computed elsewhere.
    ///
    /// Returns `None` if `matrix` is not square.
    pub fn from_matrix(kind: CovarianceType, matrix: Mat<f64>) -> Option<Self> {
        if matrix.nrows() != matrix.ncols() {
            return None;
        }
        Some(Self::new(kind, matrix, None, DEFAULT_VARIANCE_TOLERANCE))
    }

    /// The estimator that produced this matrix.
    pub fn kind(&self) -> CovarianceType {
        self.kind
    }

    /// The underlying `k × k` matrix.
    pub fn matrix(&self) -> &Mat<f64> {
        &self.matrix
    }

    /// Number of coefficients.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of clusters, for cluster-robust estimators.
    pub fn n_clusters(&self) -> Option<usize> {
        self.n_clusters
    }

    /// Relative tolerance used when extracting standard errors.
    pub fn variance_tolerance(&self) -> f64 {
        self.variance_tolerance
    }

    /// Variance of coefficient `j`.
    pub fn variance(&self, j: usize) -> f64 {
        self.matrix[(j, j)]
    }

    /// Covariance between coefficients `i` and `j`.
    pub fn covariance(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    /// Diagonal of the matrix.
    pub fn diagonal(&self) -> Col<f64> {
        Col::from_fn(self.dim(), |j| self.matrix[(j, j)])
    }

    /// Square roots of the diagonal.
    ///
    /// See [`crate::inference::standard_errors`].
    pub fn standard_errors(&self) -> Result<Col<f64>, crate::solvers::RegressionError> {
        crate::inference::standard_errors(self)
    }
}
