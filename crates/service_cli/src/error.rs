//! CLI error types.

use std::path::PathBuf;

use loss_core::types::SimulationError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by `tailrisk` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Simulation inputs were rejected by the engine.
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    /// An input file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV file could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON output could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code: 2 for bad input, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::FileNotFound(_) => 2,
            CliError::Simulation(err) if err.is_input_error() => 2,
            _ => 1,
        }
    }
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_error_wrapped() {
        let err: CliError = SimulationError::EmptyScenarioSet.into();
        assert!(err.to_string().starts_with("Simulation error: Scenario set is empty"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_file_not_found_display() {
        let err = CliError::FileNotFound(PathBuf::from("missing.csv"));
        assert_eq!(err.to_string(), "File not found: missing.csv");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_bad_format_is_input_error() {
        let err: CliError = ConfigError::InvalidFormat("xml".to_string()).into();
        assert!(err.to_string().starts_with("Configuration error: Invalid output format"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_io_error_exit_code() {
        let err: CliError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(err.exit_code(), 1);
    }
}
