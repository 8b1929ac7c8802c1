//! Empirical statistics over simulated losses.
//!
//! - Compensated (Neumaier) summation for means over large trial counts
//! - Empirical quantiles under an explicit [`QuantileMethod`]
//! - Equal-width histograms with probability densities
//!
//! # Quantile conventions
//!
//! With sorted sample `x[0] <= ... <= x[n-1]` and level `q`, every method
//! starts from the fractional rank `h = (n - 1) * q`:
//!
//! | Method | Result |
//! |--------|--------|
//! | `Linear` | `x[⌊h⌋] + (h - ⌊h⌋) * (x[⌈h⌉] - x[⌊h⌋])` |
//! | `Lower` | `x[⌊h⌋]` |
//! | `Higher` | `x[⌈h⌉]` |
//! | `Nearest` | `x[round_half_even(h)]` |
//! | `Midpoint` | `(x[⌊h⌋] + x[⌈h⌉]) / 2` |
//!
//! `Linear` is the default and matches the common "type 7" estimator.

use std::fmt;
use std::str::FromStr;

use crate::types::{SimulationError, SimulationResult};

/// Interpolation rule between order statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum QuantileMethod {
    /// Linear interpolation between the two nearest order statistics.
    #[default]
    Linear,
    /// Lower of the two nearest order statistics.
    Lower,
    /// Higher of the two nearest order statistics.
    Higher,
    /// Nearest order statistic, ties to the even rank.
    Nearest,
    /// Average of the two nearest order statistics.
    Midpoint,
}

impl QuantileMethod {
    /// Returns the lowercase method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuantileMethod::Linear => "linear",
            QuantileMethod::Lower => "lower",
            QuantileMethod::Higher => "higher",
            QuantileMethod::Nearest => "nearest",
            QuantileMethod::Midpoint => "midpoint",
        }
    }
}

impl fmt::Display for QuantileMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantileMethod {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(QuantileMethod::Linear),
            "lower" => Ok(QuantileMethod::Lower),
            "higher" => Ok(QuantileMethod::Higher),
            "nearest" => Ok(QuantileMethod::Nearest),
            "midpoint" => Ok(QuantileMethod::Midpoint),
            other => Err(SimulationError::InvalidParameter {
                name: "quantile_method",
                value: format!(
                    "unknown method '{}', expected one of: linear, lower, higher, nearest, midpoint",
                    other
                ),
            }),
        }
    }
}

/// Neumaier-compensated sum.
///
/// Keeps the rounding error of a running sum in a separate accumulator,
/// so the result stays accurate for millions of terms of mixed magnitude.
pub fn compensated_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for &v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

/// Arithmetic mean using compensated summation.
///
/// # Errors
///
/// `EmptyScenarioSet` if `values` is empty.
pub fn mean(values: &[f64]) -> SimulationResult<f64> {
    if values.is_empty() {
        return Err(SimulationError::EmptyScenarioSet);
    }
    Ok(compensated_sum(values) / values.len() as f64)
}

/// Sample standard deviation (divisor `n - 1`); zero for a single value.
///
/// # Errors
///
/// `EmptyScenarioSet` if `values` is empty.
pub fn std_dev(values: &[f64], mean: f64) -> SimulationResult<f64> {
    match values.len() {
        0 => Err(SimulationError::EmptyScenarioSet),
        1 => Ok(0.0),
        n => {
            let squares: Vec<f64> = values.iter().map(|v| (v - mean) * (v - mean)).collect();
            Ok((compensated_sum(&squares) / (n - 1) as f64).sqrt())
        }
    }
}

/// Checks that a quantile level lies in [0, 1].
///
/// # Errors
///
/// `InvalidQuantile` for levels outside [0, 1] or NaN.
#[inline]
pub fn validate_quantile_level(q: f64) -> SimulationResult<()> {
    if (0.0..=1.0).contains(&q) {
        Ok(())
    } else {
        Err(SimulationError::InvalidQuantile(q))
    }
}

/// Returns an ascending copy of `values`; the input is untouched.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Empirical quantile of an ascending sample.
///
/// `sorted` must already be in ascending order (see [`sorted_copy`]).
///
/// # Errors
///
/// - `InvalidQuantile` if `q` is outside [0, 1]
/// - `EmptyScenarioSet` if `sorted` is empty
///
/// # Examples
///
/// ```
/// use loss_core::math::{empirical_quantile, QuantileMethod};
///
/// let sorted = [0.0, 10.0, 20.0, 30.0];
/// // h = 3 * 0.5 = 1.5 -> halfway between 10 and 20
/// let median = empirical_quantile(&sorted, 0.5, QuantileMethod::Linear).unwrap();
/// assert_eq!(median, 15.0);
/// ```
pub fn empirical_quantile(sorted: &[f64], q: f64, method: QuantileMethod) -> SimulationResult<f64> {
    validate_quantile_level(q)?;
    if sorted.is_empty() {
        return Err(SimulationError::EmptyScenarioSet);
    }

    let last = sorted.len() - 1;
    let h = last as f64 * q;
    let lo = (h.floor() as usize).min(last);
    let hi = (h.ceil() as usize).min(last);
    let (x_lo, x_hi) = (sorted[lo], sorted[hi]);

    let value = match method {
        QuantileMethod::Linear => {
            if lo == hi {
                x_lo
            } else {
                x_lo + (h - lo as f64) * (x_hi - x_lo)
            }
        }
        QuantileMethod::Lower => x_lo,
        QuantileMethod::Higher => x_hi,
        QuantileMethod::Nearest => sorted[(h.round_ties_even() as usize).min(last)],
        QuantileMethod::Midpoint => {
            if lo == hi {
                x_lo
            } else {
                0.5 * (x_lo + x_hi)
            }
        }
    };
    Ok(value)
}

/// Equal-width histogram of a loss sample.
///
/// Bins are half-open `[edge_k, edge_{k+1})` except the last, which also
/// includes the upper edge. A degenerate sample (all values equal) is
/// binned over `[value - 0.5, value + 0.5]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LossHistogram {
    lower: f64,
    bin_width: f64,
    counts: Vec<usize>,
    total: usize,
}

impl LossHistogram {
    /// Bins `losses` into `bins` equal-width bins over their range.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `bins` is zero
    /// - `EmptyScenarioSet` if `losses` is empty
    pub fn from_losses(losses: &[f64], bins: usize) -> SimulationResult<Self> {
        if bins == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "bins",
                value: "must be at least 1".to_string(),
            });
        }
        if losses.is_empty() {
            return Err(SimulationError::EmptyScenarioSet);
        }

        let min = losses.iter().copied().fold(f64::INFINITY, f64::min);
        let max = losses.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (lower, upper) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };
        let bin_width = (upper - lower) / bins as f64;

        let mut counts = vec![0usize; bins];
        for &loss in losses {
            let idx = (((loss - lower) / bin_width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self {
            lower,
            bin_width,
            counts,
            total: losses.len(),
        })
    }

    /// Number of bins.
    #[inline]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Width shared by every bin.
    #[inline]
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Observation count per bin.
    #[inline]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Bin edges, `bins() + 1` values.
    pub fn edges(&self) -> Vec<f64> {
        (0..=self.counts.len())
            .map(|k| self.lower + k as f64 * self.bin_width)
            .collect()
    }

    /// Probability density per bin: `count / (total * width)`.
    ///
    /// Densities integrate to one over the histogram range.
    pub fn densities(&self) -> Vec<f64> {
        let norm = self.total as f64 * self.bin_width;
        self.counts.iter().map(|&c| c as f64 / norm).collect()
    }
}
