//! CLI configuration management
//!
//! Handles loading configuration from a TOML file and merging command-line
//! overrides on top of it. Environment variables reach the config through
//! clap's `env` fallbacks on the same flags.
//!
//! ```toml
//! log_level = "info"
//!
//! [simulation]
//! trials = 10000
//! seed = 42
//! quantile_levels = [0.01, 0.05, 0.95, 0.99]
//! quantile_method = "linear"
//! parallel = true
//!
//! [portfolio]
//! obligors = 50
//! correlation = 0.2
//!
//! [output]
//! format = "table"
//! histogram_bins = 50
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use loss_core::math::{validate_quantile_level, QuantileMethod};
use loss_core::types::SimulationResult;
use loss_engine::mc::{SimulationConfig, DEFAULT_QUANTILE_LEVELS, DEFAULT_TRIALS, MAX_TRIALS};
use serde::Deserialize;
use thiserror::Error;

/// Default number of synthetic obligors.
pub const DEFAULT_OBLIGORS: usize = 50;

/// Default pairwise correlation of the synthetic portfolio.
pub const DEFAULT_CORRELATION: f64 = 0.2;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidFormat(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// How simulation results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_output_format<'de, D>(deserializer: D) -> Result<OutputFormat, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    OutputFormat::from_str(&s).map_err(serde::de::Error::custom)
}

/// `[simulation]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    /// Number of Monte Carlo trials
    pub trials: usize,
    /// Seed; unseeded runs use 0
    pub seed: Option<u64>,
    /// Quantile levels to report
    pub quantile_levels: Vec<f64>,
    /// Quantile interpolation rule
    pub quantile_method: QuantileMethod,
    /// Run trial blocks on the rayon pool
    pub parallel: bool,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
            quantile_levels: DEFAULT_QUANTILE_LEVELS.to_vec(),
            quantile_method: QuantileMethod::default(),
            parallel: true,
        }
    }
}

/// `[portfolio]` table
///
/// Without `file`, a synthetic portfolio of `obligors` names is generated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortfolioSection {
    /// CSV file with `exposure,default_probability,recovery_rate` columns
    pub file: Option<PathBuf>,
    /// Number of synthetic obligors
    pub obligors: usize,
    /// Uniform pairwise correlation
    pub correlation: f64,
    /// Seed for synthetic generation; defaults to the simulation seed
    pub seed: Option<u64>,
}

impl Default for PortfolioSection {
    fn default() -> Self {
        Self {
            file: None,
            obligors: DEFAULT_OBLIGORS,
            correlation: DEFAULT_CORRELATION,
            seed: None,
        }
    }
}

/// `[output]` table
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// Summary format
    #[serde(deserialize_with = "deserialize_output_format")]
    pub format: OutputFormat,
    /// Where to write per-trial losses as CSV
    pub losses_file: Option<PathBuf>,
    /// Print a loss histogram with this many bins
    pub histogram_bins: Option<usize>,
}

/// Full CLI configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Log level used when `RUST_LOG` is unset
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Simulation parameters
    pub simulation: SimulationSection,
    /// Portfolio source
    pub portfolio: PortfolioSection,
    /// Output options
    pub output: OutputSection,
}

/// Command-line overrides; `None` keeps the file or default value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub trials: Option<usize>,
    pub seed: Option<u64>,
    pub quantile_levels: Option<Vec<f64>>,
    pub quantile_method: Option<String>,
    pub sequential: bool,
    pub portfolio_file: Option<PathBuf>,
    pub obligors: Option<usize>,
    pub correlation: Option<f64>,
    pub format: Option<String>,
    pub losses_file: Option<PathBuf>,
    pub histogram_bins: Option<usize>,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.trials == 0 || sim.trials > MAX_TRIALS {
            return Err(ConfigError::InvalidValue {
                field: "simulation.trials",
                reason: format!("{} is outside [1, {}]", sim.trials, MAX_TRIALS),
            });
        }
        for &level in &sim.quantile_levels {
            validate_quantile_level(level).map_err(|e| ConfigError::InvalidValue {
                field: "simulation.quantile_levels",
                reason: e.to_string(),
            })?;
        }

        let portfolio = &self.portfolio;
        if portfolio.file.is_none() && portfolio.obligors == 0 {
            return Err(ConfigError::InvalidValue {
                field: "portfolio.obligors",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(-1.0..=1.0).contains(&portfolio.correlation) {
            return Err(ConfigError::InvalidValue {
                field: "portfolio.correlation",
                reason: format!("{} is outside [-1, 1]", portfolio.correlation),
            });
        }

        if self.output.histogram_bins == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "output.histogram_bins",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(trials) = cli.trials {
            self.simulation.trials = trials;
        }
        if cli.seed.is_some() {
            self.simulation.seed = cli.seed;
        }
        if let Some(levels) = &cli.quantile_levels {
            self.simulation.quantile_levels = levels.clone();
        }
        if let Some(method) = &cli.quantile_method {
            self.simulation.quantile_method =
                QuantileMethod::from_str(method).map_err(|e| ConfigError::InvalidValue {
                    field: "simulation.quantile_method",
                    reason: e.to_string(),
                })?;
        }
        if cli.sequential {
            self.simulation.parallel = false;
        }
        if let Some(file) = &cli.portfolio_file {
            self.portfolio.file = Some(file.clone());
        }
        if let Some(obligors) = cli.obligors {
            self.portfolio.obligors = obligors;
        }
        if let Some(correlation) = cli.correlation {
            self.portfolio.correlation = correlation;
        }
        if let Some(format) = &cli.format {
            self.output.format = OutputFormat::from_str(format)?;
        }
        if let Some(file) = &cli.losses_file {
            self.output.losses_file = Some(file.clone());
        }
        if cli.histogram_bins.is_some() {
            self.output.histogram_bins = cli.histogram_bins;
        }
        Ok(())
    }

    /// Engine configuration for this run
    pub fn simulation_config(&self) -> SimulationResult<SimulationConfig> {
        let sim = &self.simulation;
        SimulationConfig::builder()
            .trial_count(sim.trials)
            .maybe_seed(sim.seed)
            .quantile_levels(sim.quantile_levels.clone())
            .quantile_method(sim.quantile_method)
            .parallel(sim.parallel)
            .build()
    }

    /// Seed used to generate a synthetic portfolio
    pub fn portfolio_seed(&self) -> u64 {
        self.portfolio
            .seed
            .or(self.simulation.seed)
            .unwrap_or_default()
    }
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments (and their environment fallbacks)
/// 2. Config file
/// 3. Default values
pub fn build_config(path: Option<&Path>, cli: &CliOverrides) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.simulation.trials, DEFAULT_TRIALS);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.simulation.quantile_levels, DEFAULT_QUANTILE_LEVELS.to_vec());
        assert!(config.simulation.parallel);
        assert_eq!(config.portfolio.obligors, 50);
        assert_eq!(config.portfolio.correlation, 0.2);
        assert_eq!(config.output.format, OutputFormat::Table);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("table").unwrap(), OutputFormat::Table);
        assert!(matches!(
            OutputFormat::from_str("xml"),
            Err(ConfigError::InvalidFormat(_))
        ));
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_parse_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            log_level = "debug"

            [simulation]
            trials = 500
            seed = 9
            quantile_levels = [0.99]
            quantile_method = "nearest"
            parallel = false

            [portfolio]
            obligors = 10
            correlation = 0.35

            [output]
            format = "json"
            histogram_bins = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.simulation.trials, 500);
        assert_eq!(config.simulation.seed, Some(9));
        assert_eq!(config.simulation.quantile_method, QuantileMethod::Nearest);
        assert!(!config.simulation.parallel);
        assert_eq!(config.portfolio.obligors, 10);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.histogram_bins, Some(20));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("[simulation]\ntrials = 123\n").unwrap();
        assert_eq!(config.simulation.trials, 123);
        assert_eq!(config.portfolio, PortfolioSection::default());
        assert_eq!(config.output, OutputSection::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[simulation]\npaths = 10\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.simulation.trials = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "simulation.trials", .. })
        ));

        let mut config = AppConfig::default();
        config.simulation.quantile_levels = vec![1.5];
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.portfolio.correlation = 1.2;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.output.histogram_bins = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut config = AppConfig::default();
        let cli = CliOverrides {
            log_level: Some("error".to_string()),
            trials: Some(2_000),
            seed: Some(5),
            quantile_method: Some("midpoint".to_string()),
            sequential: true,
            obligors: Some(7),
            format: Some("json".to_string()),
            ..Default::default()
        };
        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.simulation.trials, 2_000);
        assert_eq!(config.simulation.seed, Some(5));
        assert_eq!(config.simulation.quantile_method, QuantileMethod::Midpoint);
        assert!(!config.simulation.parallel);
        assert_eq!(config.portfolio.obligors, 7);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.portfolio_seed(), 5);
    }

    #[test]
    fn test_merge_rejects_unknown_method() {
        let mut config = AppConfig::default();
        let cli = CliOverrides {
            quantile_method: Some("median".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.merge_with_cli(&cli),
            Err(ConfigError::InvalidValue { field: "simulation.quantile_method", .. })
        ));
    }

    #[test]
    fn test_simulation_config_from_app_config() {
        let mut config = AppConfig::default();
        config.simulation.seed = Some(11);
        config.simulation.parallel = false;

        let sim = config.simulation_config().unwrap();
        assert_eq!(sim.trial_count(), DEFAULT_TRIALS);
        assert_eq!(sim.seed(), Some(11));
        assert!(!sim.parallel());
    }

    #[test]
    fn test_portfolio_seed_prefers_portfolio_section() {
        let mut config = AppConfig::default();
        assert_eq!(config.portfolio_seed(), 0);
        config.simulation.seed = Some(3);
        assert_eq!(config.portfolio_seed(), 3);
        config.portfolio.seed = Some(8);
        assert_eq!(config.portfolio_seed(), 8);
    }
}
