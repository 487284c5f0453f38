//! Core types for regression analysis.

mod covariance;
mod options;
mod result;

pub use covariance::{CovarianceMatrix, CovarianceType};
pub use options::{
    CovarianceOptions, CovarianceOptionsBuilder, OptionsError, RegressionOptions,
    RegressionOptionsBuilder, DEFAULT_RANK_TOLERANCE, DEFAULT_VARIANCE_TOLERANCE,
};
pub use result::RegressionResult;
