//! Correlation sampler.
//!
//! Produces `M` independent draws of an `N`-dimensional standard normal
//! vector whose correlation matrix is the target `C`:
//!
//! ```text
//! Z ~ N(0, I)  (N x M, independent)
//! W = L * Z    with  L * L^T = C
//! ```
//!
//! # Layout
//!
//! [`CorrelatedDraws`] stores the N×M matrix column-major: the `N` values of
//! one trial are contiguous. Trials are generated in blocks of
//! [`TRIALS_PER_STREAM`], each from its own stream of a [`StreamFactory`],
//! so parallel and sequential sampling give identical matrices.

use rayon::prelude::*;
use tracing::debug;

use loss_core::math::{CholeskyFactor, CorrelationMatrix};
use loss_core::types::{SimulationError, SimulationResult};

use crate::rng::{SimulationRng, StreamFactory, TRIALS_PER_STREAM};

/// N×M matrix of correlated standard normal draws.
///
/// Element `(obligor, trial)` is stored at `trial * obligors + obligor`.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelatedDraws {
    obligors: usize,
    trials: usize,
    data: Vec<f64>,
}

impl CorrelatedDraws {
    /// Wraps trial-major data.
    ///
    /// # Errors
    ///
    /// - `EmptyScenarioSet` if `trials` is 0
    /// - `DimensionMismatch` if `obligors` is 0 or
    ///   `data.len() != obligors * trials`
    pub fn new(obligors: usize, trials: usize, data: Vec<f64>) -> SimulationResult<Self> {
        if trials == 0 {
            return Err(SimulationError::EmptyScenarioSet);
        }
        if obligors == 0 {
            return Err(SimulationError::DimensionMismatch {
                context: "draw matrix obligor count",
                expected: 1,
                got: 0,
            });
        }
        if data.len() != obligors * trials {
            return Err(SimulationError::DimensionMismatch {
                context: "draw matrix element count",
                expected: obligors * trials,
                got: data.len(),
            });
        }
        Ok(Self {
            obligors,
            trials,
            data,
        })
    }

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

    /// Draw for `obligor` in `trial`.
    #[inline]
    pub fn get(&self, obligor: usize, trial: usize) -> f64 {
        self.data[trial * self.obligors + obligor]
    }

    /// All obligor draws of one trial.
    #[inline]
    pub fn trial(&self, trial: usize) -> &[f64] {
        let start = trial * self.obligors;
        &self.data[start..start + self.obligors]
    }

    /// Draws of one obligor across all trials.
    pub fn obligor_values(&self, obligor: usize) -> impl Iterator<Item = f64> + '_ {
        self.data
            .iter()
            .skip(obligor)
            .step_by(self.obligors)
            .copied()
    }

    /// Raw trial-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Samples correlated normals from a factorised correlation matrix.
///
/// # Examples
///
/// ```rust
/// use loss_core::math::CorrelationMatrix;
/// use loss_engine::mc::CorrelationSampler;
/// use loss_engine::rng::StreamFactory;
///
/// let corr = CorrelationMatrix::uniform(3, 0.2).unwrap();
/// let sampler = CorrelationSampler::new(&corr).unwrap();
/// let draws = sampler.sample(5_000, &StreamFactory::new(42), true).unwrap();
///
/// assert_eq!(draws.obligors(), 3);
/// assert_eq!(draws.trials(), 5_000);
/// ```
#[derive(Clone, Debug)]
pub struct CorrelationSampler {
    factor: CholeskyFactor,
}

impl CorrelationSampler {
    /// Factorises `correlation` and prepares a sampler.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the matrix is 0×0
    /// - `InvalidCorrelationStructure` if the matrix is not positive
    ///   semi-definite
    pub fn new(correlation: &CorrelationMatrix) -> SimulationResult<Self> {
        if correlation.dim() == 0 {
            return Err(SimulationError::DimensionMismatch {
                context: "correlation matrix dimension",
                expected: 1,
                got: 0,
            });
        }
        let factor = correlation.cholesky()?;
        debug!(
            dim = factor.dim(),
            rank = factor.rank(),
            "Factorised correlation matrix"
        );
        Ok(Self { factor })
    }

    /// Number of obligors sampled per trial.
    #[inline]
    pub fn dim(&self) -> usize {
        self.factor.dim()
    }

    /// Cholesky factor used by the sampler.
    #[inline]
    pub fn factor(&self) -> &CholeskyFactor {
        &self.factor
    }

    /// Draws `trial_count` correlated trials using per-block streams.
    ///
    /// # Errors
    ///
    /// `EmptyScenarioSet` if `trial_count` is 0.
    pub fn sample(
        &self,
        trial_count: usize,
        streams: &StreamFactory,
        parallel: bool,
    ) -> SimulationResult<CorrelatedDraws> {
        if trial_count == 0 {
            return Err(SimulationError::EmptyScenarioSet);
        }

        let n = self.dim();
        let mut data = vec![0.0; n * trial_count];
        let block_len = n * TRIALS_PER_STREAM;

        let fill_block = |(block, chunk): (usize, &mut [f64])| {
            let mut rng = streams.stream(block as u64);
            self.fill_trials(&mut rng, chunk);
        };

        if parallel {
            data.par_chunks_mut(block_len)
                .enumerate()
                .for_each(fill_block);
        } else {
            data.chunks_mut(block_len).enumerate().for_each(fill_block);
        }

        debug!(
            obligors = n,
            trials = trial_count,
            blocks = StreamFactory::streams_for(trial_count),
            parallel,
            "Sampled correlated draws"
        );
        CorrelatedDraws::new(n, trial_count, data)
    }

    /// Draws `trial_count` correlated trials from a single generator.
    ///
    /// # Errors
    ///
    /// `EmptyScenarioSet` if `trial_count` is 0.
    pub fn sample_with_rng(
        &self,
        trial_count: usize,
        rng: &mut SimulationRng,
    ) -> SimulationResult<CorrelatedDraws> {
        if trial_count == 0 {
            return Err(SimulationError::EmptyScenarioSet);
        }
        let n = self.dim();
        let mut data = vec![0.0; n * trial_count];
        self.fill_trials(rng, &mut data);
        CorrelatedDraws::new(n, trial_count, data)
    }

    /// Fills consecutive trials of `out` with `L * Z`.
    fn fill_trials(&self, rng: &mut SimulationRng, out: &mut [f64]) {
        let n = self.dim();
        let mut z = vec![0.0; n];
        for trial in out.chunks_exact_mut(n) {
            rng.fill_normal(&mut z);
            self.factor.transform_into(&z, trial);
        }
    }
}
