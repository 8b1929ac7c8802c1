//! Default classifier.
//!
//! Maps correlated draws to default indicators. Obligor `i` defaults in a
//! trial when its draw is strictly below `Φ⁻¹(p_i)`, so the marginal
//! default frequency converges to `p_i`. `p_i = 0` never defaults and
//! `p_i = 1` always does.

use rayon::prelude::*;

use loss_core::math::default_thresholds;
use loss_core::types::{SimulationError, SimulationResult};

use super::sampler::CorrelatedDraws;
use crate::rng::TRIALS_PER_STREAM;

/// N×M matrix of default indicators, laid out like [`CorrelatedDraws`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultIndicators {
    obligors: usize,
    trials: usize,
    data: Vec<bool>,
}

impl DefaultIndicators {
    /// Number of obligors (rows).
    #[inline]
    pub fn obligors(&self) -> usize {
        self.obligors
    }

    /// Number of trials (columns).
    #[inline]
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Whether `obligor` defaulted in `trial`.
    #[inline]
    pub fn get(&self, obligor: usize, trial: usize) -> bool {
        self.data[trial * self.obligors + obligor]
    }

    /// Indicators of every obligor in one trial.
    #[inline]
    pub fn trial(&self, trial: usize) -> &[bool] {
        let start = trial * self.obligors;
        &self.data[start..start + self.obligors]
    }

    /// Number of defaults in `trial`.
    pub fn default_count(&self, trial: usize) -> usize {
        self.trial(trial).iter().filter(|&&d| d).count()
    }

    /// Fraction of trials in which `obligor` defaulted.
    pub fn default_frequency(&self, obligor: usize) -> f64 {
        let defaults = self
            .data
            .iter()
            .skip(obligor)
            .step_by(self.obligors)
            .filter(|&&d| d)
            .count();
        defaults as f64 / self.trials as f64
    }
}

/// Classifies every draw against its obligor's default threshold.
///
/// # Errors
///
/// - `DimensionMismatch` if `probabilities.len() != draws.obligors()`
/// - `InvalidProbability` for the first probability outside [0, 1]
///
/// # Examples
///
/// ```rust
/// use loss_engine::mc::{classify_defaults, CorrelatedDraws};
///
/// let draws = CorrelatedDraws::new(2, 2, vec![-3.0, 0.2, 0.5, -0.1]).unwrap();
/// let indicators = classify_defaults(&[0.05, 0.5], &draws).unwrap();
///
/// assert!(indicators.get(0, 0));
/// assert!(!indicators.get(1, 0));
/// assert!(!indicators.get(0, 1));
/// assert!(indicators.get(1, 1));
/// ```
pub fn classify_defaults(
    probabilities: &[f64],
    draws: &CorrelatedDraws,
) -> SimulationResult<DefaultIndicators> {
    classify_defaults_with(probabilities, draws, false)
}

/// [`classify_defaults`] with optional parallel execution over trial blocks.
///
/// # Errors
///
/// See [`classify_defaults`].
pub fn classify_defaults_with(
    probabilities: &[f64],
    draws: &CorrelatedDraws,
    parallel: bool,
) -> SimulationResult<DefaultIndicators> {
    let n = draws.obligors();
    if probabilities.len() != n {
        return Err(SimulationError::DimensionMismatch {
            context: "default probabilities vs draw rows",
            expected: n,
            got: probabilities.len(),
        });
    }
    let thresholds = default_thresholds(probabilities)?;

    let mut data = vec![false; draws.as_slice().len()];
    let block_len = n * TRIALS_PER_STREAM;

    let classify_block = |(out, values): (&mut [bool], &[f64])| {
        for (out_trial, trial) in out.chunks_exact_mut(n).zip(values.chunks_exact(n)) {
            for ((flag, &w), &threshold) in out_trial.iter_mut().zip(trial).zip(&thresholds) {
                *flag = w < threshold;
            }
        }
    };

    if parallel {
        data.par_chunks_mut(block_len)
            .zip(draws.as_slice().par_chunks(block_len))
            .for_each(classify_block);
    } else {
        data.chunks_mut(block_len)
            .zip(draws.as_slice().chunks(block_len))
            .for_each(classify_block);
    }

    Ok(DefaultIndicators {
        obligors: n,
        trials: draws.trials(),
        data,
    })
}
