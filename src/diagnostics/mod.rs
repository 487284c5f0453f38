//! Regression diagnostics.
//!
//! - **Heteroskedasticity**: Koenker's studentized Breusch–Pagan test, a
//!   check for whether robust standard errors are likely to matter.
//!
//! # Example
//!
//! ```rust,ignore
//! use robust_ols::diagnostics::breusch_pagan;
//!
//! let bp = breusch_pagan(&fitted)?;
//! if bp.rejects(0.05) {
//!     let hc1 = fitted.hc_covariance(&CovarianceOptions::default());
//! }
//! ```

mod heteroskedasticity;

pub use heteroskedasticity::{breusch_pagan, BreuschPaganResult};
