//! Numerical building blocks.
//!
//! - [`correlation`]: `CorrelationMatrix` validation and semi-definite
//!   Cholesky factorisation
//! - [`distributions`]: standard normal CDF, its inverse, default thresholds
//! - [`statistics`]: compensated means, empirical quantiles, histograms

pub mod correlation;
pub mod distributions;
pub mod statistics;

pub use correlation::{CholeskyFactor, CorrelationMatrix};
pub use distributions::{
    default_threshold, default_thresholds, standard_normal_cdf, standard_normal_inverse_cdf,
};
pub use statistics::{
    compensated_sum, empirical_quantile, mean, sorted_copy, std_dev, validate_quantile_level,
    LossHistogram, QuantileMethod,
};
