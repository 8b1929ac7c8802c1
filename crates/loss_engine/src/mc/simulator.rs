//! End-to-end loss simulation.
//!
//! Chains the three stages: correlation sampling, default classification
//! and loss aggregation. All inputs are validated before any random draw
//! is made.

use std::time::Instant;

use tracing::{debug, info};

use loss_core::math::CorrelationMatrix;
use loss_core::types::{Portfolio, SimulationError, SimulationResult};

use super::aggregator::{aggregate_losses_with, summarize, LossDistributionSummary, LossVector};
use super::classifier::classify_defaults_with;
use super::config::SimulationConfig;
use super::sampler::CorrelationSampler;
use crate::rng::StreamFactory;

/// Result of a full simulation: the summary and the raw per-trial losses.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationRun {
    /// Summary statistics of the loss distribution.
    pub summary: LossDistributionSummary,
    /// Per-trial losses in trial order.
    pub losses: LossVector,
}

/// Runs loss simulations under a fixed configuration.
///
/// # Examples
///
/// ```rust
/// use loss_core::math::CorrelationMatrix;
/// use loss_core::types::Portfolio;
/// use loss_engine::mc::{LossSimulator, SimulationConfig};
///
/// let portfolio = Portfolio::from_columns(
///     &[100.0, 200.0, 300.0],
///     &[0.02, 0.05, 0.10],
///     &[0.4, 0.4, 0.4],
/// ).unwrap();
/// let correlation = CorrelationMatrix::uniform(3, 0.2).unwrap();
///
/// let config = SimulationConfig::builder()
///     .trial_count(20_000)
///     .seed(42)
///     .build()
///     .unwrap();
/// let run = LossSimulator::new(config).run(&portfolio, &correlation).unwrap();
///
/// assert_eq!(run.losses.len(), 20_000);
/// assert!(run.summary.max_loss <= portfolio.total_loss_given_default());
/// ```
#[derive(Clone, Debug, Default)]
pub struct LossSimulator {
    config: SimulationConfig,
}

impl LossSimulator {
    /// Creates a simulator with a validated configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulates the loss distribution of `portfolio`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the matrix dimension differs from the
    ///   obligor count
    /// - `InvalidCorrelationStructure` if the matrix cannot be factorised
    pub fn run(
        &self,
        portfolio: &Portfolio,
        correlation: &CorrelationMatrix,
    ) -> SimulationResult<SimulationRun> {
        let config = &self.config;
        config.validate()?;

        if correlation.dim() != portfolio.len() {
            return Err(SimulationError::DimensionMismatch {
                context: "correlation matrix vs portfolio",
                expected: portfolio.len(),
                got: correlation.dim(),
            });
        }
        let sampler = CorrelationSampler::new(correlation)?;

        info!(
            obligors = portfolio.len(),
            trials = config.trial_count(),
            seed = config.effective_seed(),
            parallel = config.parallel(),
            "Starting loss simulation"
        );
        let start = Instant::now();

        let streams = StreamFactory::new(config.effective_seed());
        let draws = sampler.sample(config.trial_count(), &streams, config.parallel())?;
        let indicators = classify_defaults_with(
            &portfolio.default_probabilities(),
            &draws,
            config.parallel(),
        )?;
        drop(draws);
        let losses = aggregate_losses_with(
            &portfolio.loss_given_default(),
            &indicators,
            config.parallel(),
        )?;
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Losses aggregated");

        let summary = summarize(&losses, config.quantile_levels(), config.quantile_method())?;
        info!(
            mean = summary.mean,
            max_loss = summary.max_loss,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loss simulation complete"
        );

        Ok(SimulationRun { summary, losses })
    }
}

/// Simulates `trial_count` trials and summarises the loss distribution.
///
/// Uses the default quantile levels and interpolation, and runs trial
/// blocks in parallel. Identical inputs and seed give identical output.
///
/// # Errors
///
/// See [`LossSimulator::run`]; additionally `EmptyScenarioSet` if
/// `trial_count` is 0.
///
/// # Examples
///
/// ```rust
/// use loss_core::math::CorrelationMatrix;
/// use loss_core::types::Portfolio;
/// use loss_engine::mc::simulate;
///
/// let portfolio = Portfolio::from_columns(&[100.0, 200.0], &[0.2, 0.1], &[0.4, 0.4]).unwrap();
/// let correlation = CorrelationMatrix::identity(2);
///
/// let a = simulate(&portfolio, &correlation, 5_000, 42).unwrap();
/// let b = simulate(&portfolio, &correlation, 5_000, 42).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn simulate(
    portfolio: &Portfolio,
    correlation: &CorrelationMatrix,
    trial_count: usize,
    seed: u64,
) -> SimulationResult<LossDistributionSummary> {
    let config = SimulationConfig::builder()
        .trial_count(trial_count)
        .seed(seed)
        .build()?;
    LossSimulator::new(config)
        .run(portfolio, correlation)
        .map(|run| run.summary)
}
