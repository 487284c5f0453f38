//! Tests for heteroskedastic errors.

use crate::core::RegressionOptions;
use crate::solvers::{fit_design, FittedOls, FittedRegressor, RegressionError};
use crate::utils::detect_constant_columns;
use faer::Col;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Relative spread of squared residuals below which they count as equal.
const EQUAL_SPREAD_TOLERANCE: f64 = 1e-10;

/// Result of a Breusch–Pagan test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreuschPaganResult {
    /// LM statistic `n R²` of the auxiliary regression.
    pub statistic: f64,
    /// Degrees of freedom (number of non-constant regressors).
    pub df: usize,
    /// Upper-tail χ² p-value.
    pub p_value: f64,
}

impl BreuschPaganResult {
    /// Whether homoskedasticity is rejected at level `alpha`.
    pub fn rejects(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Koenker's studentized Breusch–Pagan test.
///
/// Regresses the squared residuals on the model's own design matrix and
/// compares `n R²` of that auxiliary regression with χ²(k - 1). The design
/// must contain a constant column.
///
/// # Errors
/// [`RegressionError::NoInterceptColumn`] if no column of the design is a
/// non-zero constant.
pub fn breusch_pagan(fitted: &FittedOls) -> Result<BreuschPaganResult, RegressionError> {
    let design = fitted.design();
    let n = design.nrows();
    let k = design.ncols();

    let constant = detect_constant_columns(design, 1e-12);
    let has_intercept = (0..k).any(|j| constant[j] && design[(0, j)] != 0.0);
    if !has_intercept {
        return Err(RegressionError::NoInterceptColumn);
    }

    let df = k - 1;
    if df == 0 {
        return Ok(BreuschPaganResult {
            statistic: 0.0,
            df,
            p_value: 1.0,
        });
    }

    let residuals = fitted.residuals();
    let squared = Col::from_fn(n, |i| residuals[i] * residuals[i]);

    // Equal squared residuals carry no evidence of heteroskedasticity
    let mean = squared.iter().sum::<f64>() / n as f64;
    let spread = squared
        .iter()
        .map(|&v| (v - mean).abs())
        .fold(0.0_f64, f64::max);
    if spread <= EQUAL_SPREAD_TOLERANCE * mean || mean == 0.0 {
        return Ok(BreuschPaganResult {
            statistic: 0.0,
            df,
            p_value: 1.0,
        });
    }

    let options = RegressionOptions {
        with_intercept: false,
        ..fitted.options().clone()
    };
    let auxiliary = fit_design(design.clone(), squared, &options, 0)?;

    let statistic = n as f64 * auxiliary.r_squared();
    let p_value = ChiSquared::new(df as f64)
        .map(|d| 1.0 - d.cdf(statistic))
        .unwrap_or(f64::NAN);

    log::debug!(
        "breusch-pagan: LM = {:.4}, df = {}, p = {:.4}",
        statistic,
        df,
        p_value
    );

    Ok(BreuschPaganResult {
        statistic,
        df,
        p_value,
    })
}
