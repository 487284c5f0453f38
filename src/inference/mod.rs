//! Statistical inference: covariance estimators, standard errors, p-values and
//! confidence intervals.

mod cluster;
mod coefficient;
mod robust_covariance;

pub use cluster::ClusterIndex;
pub use coefficient::{CoefficientInference, CoefficientTable};
pub use robust_covariance::{
    classical_covariance, cluster_robust_covariance, cluster_robust_covariance_with_index,
    heteroskedasticity_robust_covariance, standard_errors,
};
