//! One-way fixed-effects ("within") regression.
//!
//! Each group gets its own intercept. The intercepts are absorbed by
//! demeaning X and y within groups and running OLS on the demeaned data,
//! which yields the same slope estimates as including one dummy column per
//! group.
//!
//! # References
//!
//! - Wooldridge, *Econometric Analysis of Cross Section and Panel Data*, Ch. 10.

use crate::core::{RegressionOptions, RegressionOptionsBuilder};
use crate::inference::ClusterIndex;
use crate::solvers::ols::{fit_design, FittedOls};
use crate::solvers::traits::RegressionError;
use faer::{Col, Mat};
use std::hash::Hash;

/// Fixed-effects regression estimator.
///
/// The design matrix must not contain an intercept column: a constant column
/// is constant within every group, demeans to zero and is rejected as a
/// singular design.
///
/// # Example
///
/// ```rust,ignore
/// use robust_ols::prelude::*;
///
/// let fitted = FixedEffectsRegressor::builder().build().fit(&x, &y, &player_ids)?;
/// let cr1 = fitted.cluster_covariance(&player_ids, &CovarianceOptions::default())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedEffectsRegressor {
    options: RegressionOptions,
}

impl FixedEffectsRegressor {
    /// Create a new fixed-effects regressor with the given options.
    ///
    /// `with_intercept` is ignored; group intercepts are always absorbed.
    pub fn new(options: RegressionOptions) -> Self {
        Self {
            options: RegressionOptions {
                with_intercept: false,
                ..options
            },
        }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> FixedEffectsRegressorBuilder {
        FixedEffectsRegressorBuilder::default()
    }

    /// Fit the within estimator with one fixed effect per distinct group label.
    ///
    /// The returned model's residual degrees of freedom are `n - G - k`.
    pub fn fit<L: Eq + Hash>(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        groups: &[L],
    ) -> Result<FittedOls, RegressionError> {
        self.options.validate()?;

        if x.nrows() != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }
        if groups.len() != y.nrows() {
            return Err(RegressionError::ClusterLengthMismatch {
                n_observations: y.nrows(),
                n_labels: groups.len(),
            });
        }

        let index = ClusterIndex::new(groups);
        let (mut x_within, y_within) = within_transform(x, y, &index);
        let invariant =
            zero_group_invariant_columns(x, &mut x_within, self.options.rank_tolerance);

        log::debug!(
            "fixed effects: absorbing {} group intercepts from {} observations ({} group-invariant columns)",
            index.n_clusters(),
            index.n_observations(),
            invariant
        );

        fit_design(x_within, y_within, &self.options, index.n_clusters())
    }
}

/// Demean every column of `x` and `y` within the groups of `index`.
pub fn within_transform(
    x: &Mat<f64>,
    y: &Col<f64>,
    index: &ClusterIndex,
) -> (Mat<f64>, Col<f64>) {
    let p = x.ncols();
    let mut x_dm = Mat::zeros(x.nrows(), p);
    let mut y_dm = Col::zeros(y.nrows());

    for members in index.iter() {
        let size = members.len() as f64;

        let y_mean = members.iter().map(|&i| y[i]).sum::<f64>() / size;
        for &i in members {
            y_dm[i] = y[i] - y_mean;
        }

        for j in 0..p {
            let x_mean = members.iter().map(|&i| x[(i, j)]).sum::<f64>() / size;
            for &i in members {
                x_dm[(i, j)] = x[(i, j)] - x_mean;
            }
        }
    }

    (x_dm, y_dm)
}

/// Zero every demeaned column whose norm is at most `tolerance` times the
/// norm of the original column, returning how many were zeroed.
///
/// A column constant within every group demeans to rounding residue only;
/// it must reach the rank check as an exact zero column.
fn zero_group_invariant_columns(
    x: &Mat<f64>,
    x_within: &mut Mat<f64>,
    tolerance: f64,
) -> usize {
    let n = x.nrows();
    let mut zeroed = 0;

    for j in 0..x.ncols() {
        let scale = (0..n).map(|i| x[(i, j)] * x[(i, j)]).sum::<f64>().sqrt();
        let within = (0..n)
            .map(|i| x_within[(i, j)] * x_within[(i, j)])
            .sum::<f64>()
            .sqrt();

        if within <= tolerance * scale {
            for i in 0..n {
                x_within[(i, j)] = 0.0;
            }
            zeroed += 1;
        }
    }

    zeroed
}

/// Builder for `FixedEffectsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct FixedEffectsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl FixedEffectsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
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

    /// Build the fixed-effects regressor.
    pub fn build(self) -> FixedEffectsRegressor {
        FixedEffectsRegressor::new(self.builder.build_unchecked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::FittedRegressor;

    #[test]
    fn test_within_transform_zero_group_means() {
        let x = Mat::from_fn(6, 1, |i, _| (i * i) as f64);
        let y = Col::from_fn(6, |i| i as f64);
        let index = ClusterIndex::new(&["a", "b", "a", "b", "a", "b"]);

        let (x_dm, y_dm) = within_transform(&x, &y, &index);

        for members in index.iter() {
            let sx: f64 = members.iter().map(|&i| x_dm[(i, 0)]).sum();
            let sy: f64 = members.iter().map(|&i| y_dm[i]).sum();
            assert!(sx.abs() < 1e-12);
            assert!(sy.abs() < 1e-12);
        }
    }

    #[test]
    fn test_two_groups_exact_slope() {
        // Group 1: y = 2x, group 2: y = 10 + 2x
        let groups = [1, 1, 1, 2, 2, 2];
        let x = Mat::from_fn(6, 1, |i, _| [1.0, 2.0, 3.0, 10.0, 20.0, 30.0][i]);
        let y = Col::from_fn(6, |i| {
            let offset = if i < 3 { 0.0 } else { 10.0 };
            offset + 2.0 * x[(i, 0)]
        });

        let fitted = FixedEffectsRegressor::default()
            .fit(&x, &y, &groups)
            .expect("fit should succeed");

        assert!((fitted.coefficients()[0] - 2.0).abs() < 1e-10);
        assert_eq!(fitted.result().absorbed_effects, 2);
        assert_eq!(fitted.residual_df(), 3);
    }

    #[test]
    fn test_zero_group_invariant_columns() {
        let groups = ["a", "a", "a", "b", "b", "b"];
        let x = Mat::from_fn(6, 2, |i, j| {
            let g = if i < 3 { 0.1 } else { 0.7 };
            if j == 0 {
                g + 0.01 * i as f64
            } else {
                1e7 * g
            }
        });
        let y = Col::from_fn(6, |i| i as f64);
        let index = ClusterIndex::new(&groups);

        let (mut x_dm, _) = within_transform(&x, &y, &index);
        let zeroed = zero_group_invariant_columns(&x, &mut x_dm, 1e-10);

        assert_eq!(zeroed, 1);
        assert!((0..6).all(|i| x_dm[(i, 1)] == 0.0));
        assert!((0..6).any(|i| x_dm[(i, 0)] != 0.0));
    }

    #[test]
    fn test_fractional_group_invariant_covariate_is_singular() {
        let groups = [0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3];
        let x = Mat::from_fn(12, 1, |i, _| [0.1, 0.7, 0.3, 1.1][groups[i]]);
        let y = Col::from_fn(12, |i| 0.5 * i as f64 + [0.0, 1.0, -1.0, 2.0][i % 4]);

        let err = FixedEffectsRegressor::default()
            .fit(&x, &y, &groups)
            .unwrap_err();
        assert_eq!(
            err,
            RegressionError::SingularDesign {
                rank: 0,
                n_columns: 1
            }
        );
    }

    #[test]
    fn test_group_length_mismatch() {
        let x = Mat::from_fn(4, 1, |i, _| i as f64);
        let y = Col::from_fn(4, |i| i as f64);

        let err = FixedEffectsRegressor::default()
            .fit(&x, &y, &[1, 2, 3])
            .unwrap_err();
        assert_eq!(
            err,
            RegressionError::ClusterLengthMismatch {
                n_observations: 4,
                n_labels: 3
            }
        );
    }
}
