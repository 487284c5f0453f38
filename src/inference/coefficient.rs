//! Coefficient inference calculations.

use crate::core::{CovarianceMatrix, CovarianceType};
use crate::inference::robust_covariance::standard_errors;
use crate::solvers::RegressionError;
use faer::Col;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Compute t-statistics for coefficients.
    ///
    /// t_j = β_j / SE(β_j)
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        let n = coefficients.nrows();
        let mut t_stats = Col::zeros(n);

        for j in 0..n {
            if std_errors[j].is_nan() || std_errors[j] == 0.0 {
                t_stats[j] = f64::NAN;
            } else {
                t_stats[j] = coefficients[j] / std_errors[j];
            }
        }

        t_stats
    }

    /// Compute p-values from t-statistics.
    ///
    /// p_j = 2 * P(|T| > |t_j|) where T ~ t(df)
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Col<f64> {
        let n = t_statistics.nrows();
        let mut p_vals = Col::zeros(n);

        let t_dist = if df > 0.0 {
            StudentsT::new(0.0, 1.0, df).ok()
        } else {
            None
        };

        for j in 0..n {
            p_vals[j] = match &t_dist {
                Some(d) if !t_statistics[j].is_nan() => {
                    // Two-tailed test
                    2.0 * (1.0 - d.cdf(t_statistics[j].abs()))
                }
                _ => f64::NAN,
            };
        }

        p_vals
    }

    /// Compute confidence intervals for coefficients.
    ///
    /// CI_j = β_j ± t_{α/2, df} * SE(β_j)
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let n = coefficients.nrows();
        let mut lower = Col::zeros(n);
        let mut upper = Col::zeros(n);

        let t_crit = if df > 0.0 {
            StudentsT::new(0.0, 1.0, df)
                .map(|d| d.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0))
                .unwrap_or(f64::NAN)
        } else {
            f64::NAN
        };

        for j in 0..n {
            if std_errors[j].is_nan() || t_crit.is_nan() {
                lower[j] = f64::NAN;
                upper[j] = f64::NAN;
            } else {
                let margin = t_crit * std_errors[j];
                lower[j] = coefficients[j] - margin;
                upper[j] = coefficients[j] + margin;
            }
        }

        (lower, upper)
    }
}

/// Coefficient table computed from one covariance estimate.
#[derive(Debug, Clone)]
pub struct CoefficientTable {
    /// Which covariance estimator the standard errors come from.
    pub covariance_type: CovarianceType,
    /// Point estimates.
    pub coefficients: Col<f64>,
    /// Standard errors.
    pub std_errors: Col<f64>,
    /// t-statistics.
    pub t_statistics: Col<f64>,
    /// Two-sided p-values from the t-distribution.
    pub p_values: Col<f64>,
    /// Lower bounds of confidence intervals.
    pub conf_interval_lower: Col<f64>,
    /// Upper bounds of confidence intervals.
    pub conf_interval_upper: Col<f64>,
    /// Degrees of freedom of the reference t-distribution.
    pub df: f64,
    /// Confidence level used (e.g., 0.95).
    pub confidence_level: f64,
}

impl CoefficientTable {
    /// Build the table for `coefficients` with standard errors from `covariance`.
    pub fn new(
        coefficients: &Col<f64>,
        covariance: &CovarianceMatrix,
        df: f64,
        confidence_level: f64,
    ) -> Result<Self, RegressionError> {
        if covariance.dim() != coefficients.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: covariance.dim(),
                y_len: coefficients.nrows(),
            });
        }

        let std_errors = standard_errors(covariance)?;
        let t_statistics = CoefficientInference::t_statistics(coefficients, &std_errors);
        let p_values = CoefficientInference::p_values(&t_statistics, df);
        let (conf_interval_lower, conf_interval_upper) = CoefficientInference::confidence_intervals(
            coefficients,
            &std_errors,
            df,
            confidence_level,
        );

        Ok(Self {
            covariance_type: covariance.kind(),
            coefficients: coefficients.clone(),
            std_errors,
            t_statistics,
            p_values,
            conf_interval_lower,
            conf_interval_upper,
            df,
            confidence_level,
        })
    }

    /// Number of coefficients.
    pub fn len(&self) -> usize {
        self.coefficients.nrows()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
