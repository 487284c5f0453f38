//! Shared numerical helpers.

mod matrix;

pub use matrix::{
    add_outer_product, detect_constant_columns, invert_upper_triangular,
    numerical_rank, prepend_intercept, sandwich, solve_normal_with_factor,
    upper_triangular_factor,
};
