//! Ordinary least squares with robust covariance estimation.
//!
//! Fits OLS once and computes any number of coefficient covariance
//! estimates from the same fit:
//!
//! - **Classical**: `σ̂² (X'X)^-1`, valid under homoskedastic, uncorrelated errors.
//! - **Heteroskedasticity-consistent** (HC0/HC1): White's sandwich estimator.
//! - **Cluster-robust** (CR0/CR1): one-way Liang–Zeger sandwich estimator,
//!   valid under arbitrary correlation within clusters.
//!
//! The choice of covariance estimator never changes the point estimates.
//!
//! # Example
//!
//! ```rust,ignore
//! use robust_ols::prelude::*;
//!
//! // Fit once
//! let fitted = OlsRegressor::builder()
//!     .with_intercept(true)
//!     .build()
//!     .fit(&x, &y)?;
//!
//! // Compare standard errors
//! let classical = fitted.classical_covariance().standard_errors()?;
//! let hc1 = fitted.hc_covariance(&CovarianceOptions::default()).standard_errors()?;
//! let cr1 = fitted
//!     .cluster_covariance(&player_ids, &CovarianceOptions::default())?
//!     .standard_errors()?;
//!
//! // Full coefficient table with robust inference
//! let table = fitted.inference(&fitted.hc_covariance(&CovarianceOptions::default()))?;
//! println!("p-values: {:?}", table.p_values);
//! ```

pub mod core;
pub mod diagnostics;
pub mod inference;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        CovarianceMatrix, CovarianceOptions, CovarianceType, OptionsError, RegressionOptions,
        RegressionResult,
    };
    pub use crate::diagnostics::{breusch_pagan, BreuschPaganResult};
    pub use crate::inference::{
        classical_covariance, cluster_robust_covariance, heteroskedasticity_robust_covariance,
        standard_errors, ClusterIndex, CoefficientTable,
    };
    pub use crate::solvers::{
        FittedOls, FittedRegressor, FixedEffectsRegressor, OlsRegressor, RegressionError,
        Regressor,
    };
}

pub use crate::core::{
    CovarianceMatrix, CovarianceOptions, CovarianceType, OptionsError, RegressionOptions,
    RegressionResult,
};
pub use crate::solvers::{
    FittedOls, FittedRegressor, FixedEffectsRegressor, OlsRegressor, RegressionError, Regressor,
};
