//! Loss simulation configuration.
//!
//! This module provides [`SimulationConfig`] and its builder. A config is
//! validated once at `build()`; the engine relies on that and does not
//! re-check trial counts or quantile levels.

use loss_core::math::{validate_quantile_level, QuantileMethod};
use loss_core::types::{SimulationError, SimulationResult};

/// Default number of Monte Carlo trials.
pub const DEFAULT_TRIALS: usize = 10_000;

/// Maximum number of Monte Carlo trials allowed.
pub const MAX_TRIALS: usize = 10_000_000;

/// Quantile levels reported when none are requested.
pub const DEFAULT_QUANTILE_LEVELS: [f64; 4] = [0.01, 0.05, 0.95, 0.99];

/// Loss simulation configuration.
///
/// Immutable configuration specifying simulation parameters.
/// Use [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use loss_engine::mc::SimulationConfig;
/// use loss_core::math::QuantileMethod;
///
/// let config = SimulationConfig::builder()
///     .trial_count(50_000)
///     .seed(42)
///     .quantile_levels(vec![0.95, 0.99, 0.999])
///     .quantile_method(QuantileMethod::Linear)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.trial_count(), 50_000);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationConfig {
    /// Number of trials.
    trial_count: usize,
    /// Optional seed for reproducibility.
    seed: Option<u64>,
    /// Quantile levels to report, in request order.
    quantile_levels: Vec<f64>,
    /// Interpolation rule for quantiles.
    quantile_method: QuantileMethod,
    /// Whether trial blocks run on the rayon pool.
    parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trial_count: DEFAULT_TRIALS,
            seed: None,
            quantile_levels: DEFAULT_QUANTILE_LEVELS.to_vec(),
            quantile_method: QuantileMethod::default(),
            parallel: true,
        }
    }
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the number of trials.
    #[inline]
    pub fn trial_count(&self) -> usize {
        self.trial_count
    }

    /// Returns the optional seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the seed actually used for a run; unseeded configs use 0.
    #[inline]
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(0)
    }

    /// Returns the requested quantile levels.
    #[inline]
    pub fn quantile_levels(&self) -> &[f64] {
        &self.quantile_levels
    }

    /// Returns the quantile interpolation rule.
    #[inline]
    pub fn quantile_method(&self) -> QuantileMethod {
        self.quantile_method
    }

    /// Returns whether trial blocks are processed in parallel.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - `EmptyScenarioSet` if `trial_count` is 0
    /// - `InvalidParameter` if `trial_count` exceeds [`MAX_TRIALS`]
    /// - `InvalidQuantile` for the first level outside [0, 1]
    pub fn validate(&self) -> SimulationResult<()> {
        if self.trial_count == 0 {
            return Err(SimulationError::EmptyScenarioSet);
        }
        if self.trial_count > MAX_TRIALS {
            return Err(SimulationError::InvalidParameter {
                name: "trial_count",
                value: format!(
                    "{} exceeds the maximum of {}",
                    self.trial_count, MAX_TRIALS
                ),
            });
        }
        for &level in &self.quantile_levels {
            validate_quantile_level(level)?;
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// Unset fields fall back to [`SimulationConfig::default`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    trial_count: Option<usize>,
    seed: Option<u64>,
    quantile_levels: Option<Vec<f64>>,
    quantile_method: Option<QuantileMethod>,
    parallel: Option<bool>,
}

impl SimulationConfigBuilder {
    /// Sets the number of trials, in [1, 10_000_000].
    #[inline]
    pub fn trial_count(mut self, trial_count: usize) -> Self {
        self.trial_count = Some(trial_count);
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the seed if one is given.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the quantile levels to report.
    #[inline]
    pub fn quantile_levels(mut self, levels: Vec<f64>) -> Self {
        self.quantile_levels = Some(levels);
        self
    }

    /// Sets the quantile interpolation rule.
    #[inline]
    pub fn quantile_method(mut self, method: QuantileMethod) -> Self {
        self.quantile_method = Some(method);
        self
    }

    /// Enables or disables parallel execution.
    #[inline]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// See [`SimulationConfig::validate`].
    pub fn build(self) -> SimulationResult<SimulationConfig> {
        let defaults = SimulationConfig::default();
        let config = SimulationConfig {
            trial_count: self.trial_count.unwrap_or(defaults.trial_count),
            seed: self.seed,
            quantile_levels: self.quantile_levels.unwrap_or(defaults.quantile_levels),
            quantile_method: self.quantile_method.unwrap_or(defaults.quantile_method),
            parallel: self.parallel.unwrap_or(defaults.parallel),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SimulationConfig::builder().build().unwrap();

        assert_eq!(config.trial_count(), DEFAULT_TRIALS);
        assert_eq!(config.seed(), None);
        assert_eq!(config.effective_seed(), 0);
        assert_eq!(config.quantile_levels(), &DEFAULT_QUANTILE_LEVELS);
        assert_eq!(config.quantile_method(), QuantileMethod::Linear);
        assert!(config.parallel());
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_config_builder_overrides() {
        let config = SimulationConfig::builder()
            .trial_count(1_000)
            .seed(7)
            .quantile_levels(vec![0.5])
            .quantile_method(QuantileMethod::Lower)
            .parallel(false)
            .build()
            .unwrap();

        assert_eq!(config.trial_count(), 1_000);
        assert_eq!(config.effective_seed(), 7);
        assert_eq!(config.quantile_levels(), &[0.5]);
        assert_eq!(config.quantile_method(), QuantileMethod::Lower);
        assert!(!config.parallel());
    }

    #[test]
    fn test_config_maybe_seed() {
        let config = SimulationConfig::builder()
            .maybe_seed(Some(3))
            .build()
            .unwrap();
        assert_eq!(config.seed(), Some(3));
    }

    #[test]
    fn test_config_zero_trials() {
        let result = SimulationConfig::builder().trial_count(0).build();
        assert!(matches!(result, Err(SimulationError::EmptyScenarioSet)));
    }

    #[test]
    fn test_config_too_many_trials() {
        let result = SimulationConfig::builder()
            .trial_count(MAX_TRIALS + 1)
            .build();
        assert!(matches!(
            result,
            Err(SimulationError::InvalidParameter {
                name: "trial_count",
                ..
            })
        ));
    }

    #[test]
    fn test_config_invalid_quantile() {
        let result = SimulationConfig::builder()
            .quantile_levels(vec![0.5, 1.5])
            .build();
        assert!(matches!(result, Err(SimulationError::InvalidQuantile(q)) if q == 1.5));
    }

    #[test]
    fn test_config_empty_levels_allowed() {
        let config = SimulationConfig::builder()
            .quantile_levels(Vec::new())
            .build()
            .unwrap();
        assert!(config.quantile_levels().is_empty());
    }
}
