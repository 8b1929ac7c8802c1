//! Standard normal distribution helpers.
//!
//! Thin wrappers over `statrs` error functions giving the standard normal
//! CDF and its inverse, plus the default-threshold calibration used by the
//! Gaussian copula: an obligor with marginal default probability `p`
//! defaults when its latent normal falls below `Φ⁻¹(p)`.

use std::f64::consts::SQRT_2;

use statrs::function::erf::{erfc, erfc_inv};

use crate::types::{SimulationError, SimulationResult};

/// Standard normal cumulative distribution function `Φ(x)`.
///
/// # Examples
///
/// ```
/// use loss_core::math::standard_normal_cdf;
///
/// assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-12);
/// ```
#[inline]
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Inverse standard normal CDF `Φ⁻¹(p)` for `p` in [0, 1].
///
/// Returns `-inf` at 0 and `+inf` at 1; NaN for inputs outside [0, 1].
#[inline]
pub fn standard_normal_inverse_cdf(p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    -SQRT_2 * erfc_inv(2.0 * p)
}

/// Default threshold for a marginal default probability.
///
/// `P(Z < threshold) = p` for `Z ~ N(0, 1)`, whatever the correlation of
/// `Z` with other obligors. Probability 0 maps to `-inf` and probability 1
/// to `+inf`.
///
/// # Errors
///
/// `InvalidProbability` (reported against `index`) if `p` is outside
/// [0, 1] or NaN.
///
/// # Examples
///
/// ```
/// use loss_core::math::default_threshold;
///
/// let t = default_threshold(0, 0.5).unwrap();
/// assert!(t.abs() < 1e-12);
/// assert_eq!(default_threshold(0, 0.0).unwrap(), f64::NEG_INFINITY);
/// ```
pub fn default_threshold(index: usize, p: f64) -> SimulationResult<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SimulationError::InvalidProbability { index, value: p });
    }
    Ok(standard_normal_inverse_cdf(p))
}

/// Default thresholds for a vector of probabilities.
///
/// # Errors
///
/// The first `InvalidProbability` encountered, with its index.
pub fn default_thresholds(probabilities: &[f64]) -> SimulationResult<Vec<f64>> {
    probabilities
        .iter()
        .enumerate()
        .map(|(index, &p)| default_threshold(index, p))
        .collect()
}
