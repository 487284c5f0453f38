//! Least squares solvers.

mod fixed_effects;
mod ols;
mod traits;

pub use fixed_effects::{FixedEffectsRegressor, FixedEffectsRegressorBuilder, within_transform};
pub(crate) use ols::fit_design;
pub use ols::{FittedOls, OlsRegressor, OlsRegressorBuilder};
pub use traits::{FittedRegressor, RegressionError, Regressor};
