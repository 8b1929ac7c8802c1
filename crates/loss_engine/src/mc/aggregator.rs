//! Loss aggregation and distribution summaries.
//!
//! The portfolio loss in trial `t` is `L_t = Σ_i LGD_i · D_{i,t}` with
//! `LGD_i = exposure_i · (1 − recovery_i)`. Every `L_t` therefore lies in
//! `[0, Σ_i LGD_i]`.

use rayon::prelude::*;

use loss_core::math::{
    empirical_quantile, mean, sorted_copy, std_dev, validate_quantile_level,
    LossHistogram, QuantileMethod,
};
use loss_core::types::{SimulationError, SimulationResult};

use super::classifier::DefaultIndicators;
use crate::rng::TRIALS_PER_STREAM;

/// Per-trial portfolio losses, in trial order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LossVector {
    losses: Vec<f64>,
}

impl LossVector {
    /// Wraps per-trial losses.
    ///
    /// # Errors
    ///
    /// `EmptyScenarioSet` if `losses` is empty.
    pub fn new(losses: Vec<f64>) -> SimulationResult<Self> {
        if losses.is_empty() {
            return Err(SimulationError::EmptyScenarioSet);
        }
        Ok(Self { losses })
    }

    /// Losses in trial order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.losses
    }

    /// Number of trials.
    #[inline]
    pub fn len(&self) -> usize {
        self.losses.len()
    }

    /// Always false; a loss vector holds at least one trial.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.losses.is_empty()
    }

    /// Iterates over losses in trial order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.losses.iter().copied()
    }

    /// Ascending copy of the losses.
    pub fn sorted(&self) -> Vec<f64> {
        sorted_copy(&self.losses)
    }

    /// Equal-width histogram of the losses.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `bins` is zero.
    pub fn histogram(&self, bins: usize) -> SimulationResult<LossHistogram> {
        LossHistogram::from_losses(&self.losses, bins)
    }
}

/// Reduces each trial's indicators to a portfolio loss.
///
/// # Errors
///
/// - `DimensionMismatch` if `loss_given_default.len() != indicators.obligors()`
/// - `InvalidParameter` if any loss-given-default is negative or not finite
///
/// # Examples
///
/// ```rust
/// use loss_engine::mc::{aggregate_losses, classify_defaults, CorrelatedDraws};
///
/// let draws = CorrelatedDraws::new(2, 2, vec![-5.0, 5.0, -5.0, -5.0]).unwrap();
/// let indicators = classify_defaults(&[0.1, 0.1], &draws).unwrap();
/// let losses = aggregate_losses(&[60.0, 90.0], &indicators).unwrap();
///
/// assert_eq!(losses.as_slice(), &[60.0, 150.0]);
/// ```
pub fn aggregate_losses(
    loss_given_default: &[f64],
    indicators: &DefaultIndicators,
) -> SimulationResult<LossVector> {
    aggregate_losses_with(loss_given_default, indicators, false)
}

/// [`aggregate_losses`] with optional parallel execution over trial blocks.
///
/// # Errors
///
/// See [`aggregate_losses`].
pub fn aggregate_losses_with(
    loss_given_default: &[f64],
    indicators: &DefaultIndicators,
    parallel: bool,
) -> SimulationResult<LossVector> {
    let n = indicators.obligors();
    if loss_given_default.len() != n {
        return Err(SimulationError::DimensionMismatch {
            context: "loss given default vs indicator rows",
            expected: n,
            got: loss_given_default.len(),
        });
    }
    if let Some((index, value)) = loss_given_default
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
    {
        return Err(SimulationError::InvalidParameter {
            name: "loss_given_default",
            value: format!("{} for obligor {} must be non-negative and finite", value, index),
        });
    }

    let trial_loss = |t: usize| -> f64 {
        indicators
            .trial(t)
            .iter()
            .zip(loss_given_default)
            .filter(|(defaulted, _)| **defaulted)
            .fold(0.0, |acc, (_, &lgd)| acc + lgd)
    };

    let mut losses = vec![0.0; indicators.trials()];
    let fill_block = |(block, chunk): (usize, &mut [f64])| {
        let start = block * TRIALS_PER_STREAM;
        for (offset, loss) in chunk.iter_mut().enumerate() {
            *loss = trial_loss(start + offset);
        }
    };

    if parallel {
        losses
            .par_chunks_mut(TRIALS_PER_STREAM)
            .enumerate()
            .for_each(fill_block);
    } else {
        losses
            .chunks_mut(TRIALS_PER_STREAM)
            .enumerate()
            .for_each(fill_block);
    }

    LossVector::new(losses)
}

/// One reported quantile of the loss distribution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QuantilePoint {
    /// Requested level in [0, 1].
    pub level: f64,
    /// Loss at that level.
    pub loss: f64,
}

/// Summary statistics of a simulated loss distribution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LossDistributionSummary {
    /// Number of trials summarised.
    pub trial_count: usize,
    /// Mean loss.
    pub mean: f64,
    /// Sample standard deviation of the loss.
    pub std_dev: f64,
    /// Smallest simulated loss.
    pub min_loss: f64,
    /// Largest simulated loss.
    pub max_loss: f64,
    /// Interpolation rule used for `quantiles`.
    pub quantile_method: QuantileMethod,
    /// Quantiles in request order.
    pub quantiles: Vec<QuantilePoint>,
}

impl LossDistributionSummary {
    /// Loss at exactly `level`, if it was requested.
    pub fn quantile(&self, level: f64) -> Option<f64> {
        self.quantiles
            .iter()
            .find(|point| point.level == level)
            .map(|point| point.loss)
    }

    /// Value-at-risk at `confidence`, i.e. the loss quantile at that level.
    pub fn value_at_risk(&self, confidence: f64) -> Option<f64> {
        self.quantile(confidence)
    }
}

/// Mean, dispersion and quantiles of a loss vector.
///
/// All levels are validated before any quantile is computed. Levels are
/// reported in request order; duplicates are kept.
///
/// # Errors
///
/// `InvalidQuantile` for the first level outside [0, 1].
pub fn summarize(
    losses: &LossVector,
    levels: &[f64],
    method: QuantileMethod,
) -> SimulationResult<LossDistributionSummary> {
    for &level in levels {
        validate_quantile_level(level)?;
    }

    let sorted = losses.sorted();
    let min_loss = sorted[0];
    let max_loss = sorted[sorted.len() - 1];

    // Compensation can push the mean a rounding step outside the sample.
    let mean_loss = mean(losses.as_slice())?.clamp(min_loss, max_loss);
    let std = std_dev(losses.as_slice(), mean_loss)?;

    let quantiles = levels
        .iter()
        .map(|&level| {
            empirical_quantile(&sorted, level, method).map(|loss| QuantilePoint { level, loss })
        })
        .collect::<SimulationResult<Vec<_>>>()?;

    Ok(LossDistributionSummary {
        trial_count: losses.len(),
        mean: mean_loss,
        std_dev: std,
        min_loss,
        max_loss,
        quantile_method: method,
        quantiles,
    })
}
