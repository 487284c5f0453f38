//! Matrix utility functions.

use faer::{Col, Mat};

/// Detect columns that are constant (zero variance).
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    let n_cols = x.ncols();
    let n_rows = x.nrows();

    if n_rows == 0 {
        return vec![true; n_cols];
    }

    let mut constant = vec![false; n_cols];

    for j in 0..n_cols {
        let first = x[(0, j)];
        let all_same = (1..n_rows).all(|i| (x[(i, j)] - first).abs() < tolerance);
        constant[j] = all_same;
    }

    constant
}

/// Prepend a column of ones to a design matrix.
pub fn prepend_intercept(x: &Mat<f64>) -> Mat<f64> {
    Mat::from_fn(x.nrows(), x.ncols() + 1, |i, j| {
        if j == 0 {
            1.0
        } else {
            x[(i, j - 1)]
        }
    })
}

/// Numerical rank of `x` from the diagonal of a column-pivoted QR factor.
///
/// A pivot counts towards the rank when its magnitude exceeds
/// `tolerance * |R_00|`. Pivoting sorts the diagonal by decreasing
/// magnitude, so counting stops at the first pivot below the threshold.
pub fn numerical_rank(x: &Mat<f64>, tolerance: f64) -> usize {
    let size = x.ncols().min(x.nrows());
    if size == 0 {
        return 0;
    }

    let qr = x.col_piv_qr();
    let r = qr.R();

    let largest = r[(0, 0)].abs();
    if largest == 0.0 || !largest.is_finite() {
        return 0;
    }

    (0..size)
        .take_while(|&i| r[(i, i)].abs() > tolerance * largest)
        .count()
}

/// Upper-triangular `k × k` factor R of the thin QR decomposition of `x`.
pub fn upper_triangular_factor(x: &Mat<f64>) -> Mat<f64> {
    let k = x.ncols();
    let qr = x.qr();
    let r = qr.R();
    Mat::from_fn(k, k, |i, j| if j >= i { r[(i, j)] } else { 0.0 })
}

/// Invert an upper-triangular matrix by back-substitution.
///
/// Returns `None` when a diagonal entry is zero.
pub fn invert_upper_triangular(r: &Mat<f64>) -> Option<Mat<f64>> {
    let k = r.nrows();
    if (0..k).any(|i| r[(i, i)] == 0.0) {
        return None;
    }

    let mut inv = Mat::zeros(k, k);
    for col in 0..k {
        inv[(col, col)] = 1.0 / r[(col, col)];
        for i in (0..col).rev() {
            let mut sum = 0.0;
            for j in (i + 1)..=col {
                sum += r[(i, j)] * inv[(j, col)];
            }
            inv[(i, col)] = -sum / r[(i, i)];
        }
    }

    Some(inv)
}

/// Solve `R'R b = rhs` for upper-triangular `R` (forward then back substitution).
pub fn solve_normal_with_factor(r: &Mat<f64>, rhs: &Col<f64>) -> Col<f64> {
    let k = r.nrows();

    // R' z = rhs
    let mut z = Col::zeros(k);
    for i in 0..k {
        let mut sum = rhs[i];
        for j in 0..i {
            sum -= r[(j, i)] * z[j];
        }
        z[i] = sum / r[(i, i)];
    }

    // R b = z
    let mut b = Col::zeros(k);
    for i in (0..k).rev() {
        let mut sum = z[i];
        for j in (i + 1)..k {
            sum -= r[(i, j)] * b[j];
        }
        b[i] = sum / r[(i, i)];
    }

    b
}

/// Add `weight * v v'` to the square matrix `m`.
pub fn add_outer_product(m: &mut Mat<f64>, v: &[f64], weight: f64) {
    let k = v.len();
    for r in 0..k {
        let wr = weight * v[r];
        for c in 0..k {
            m[(r, c)] += wr * v[c];
        }
    }
}

/// Sandwich product `scale * B M B` for a symmetric bread `B`.
///
/// The result is symmetrised to remove rounding asymmetry.
pub fn sandwich(bread: &Mat<f64>, meat: &Mat<f64>, scale: f64) -> Mat<f64> {
    let v = bread * meat * bread;
    let k = v.nrows();
    Mat::from_fn(k, k, |i, j| scale * 0.5 * (v[(i, j)] + v[(j, i)]))
}
