/// Single-pass univariate statistics and column standardization.
pub mod calc;

/// Seeded synthesis of the bivariate height/weight sample.
pub mod sample;

/// Principal components analysis: covariance eigendecomposition,
/// ordered orthonormal directions and projection to the rotated basis.
pub mod basis;

/// Two-panel rendering of the standardized and projected samples.
pub mod plot;

/// Fixed run parameters and the synthesize -> standardize -> decompose pipeline.
pub mod figure;

mod error;

pub use error::{Error, Result};
