//! Error types for structured error handling.
//!
//! This module provides:
//! - `CorrelationError`: Defects found while validating or factorising a
//!   correlation matrix
//! - `SimulationError`: The taxonomy surfaced by every loss simulation
//!   operation
//!
//! Every variant describes a precondition violation. None of them is
//! transient, so callers treat any error as fatal to the run.

use thiserror::Error;

/// Defects of a correlation matrix.
///
/// Carries the offending position or value so the input can be fixed.
///
/// # Examples
/// ```
/// use loss_core::types::CorrelationError;
///
/// let err = CorrelationError::NotSymmetric { i: 0, j: 2 };
/// assert_eq!(format!("{}", err), "Matrix is not symmetric at (0, 2)");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorrelationError {
    /// Element count does not match `dim * dim`.
    #[error("Invalid matrix dimensions: expected {expected} elements, got {got}")]
    InvalidDimensions {
        /// Required number of elements.
        expected: usize,
        /// Number of elements supplied.
        got: usize,
    },

    /// Diagonal element differs from 1.0.
    #[error("Diagonal element at index {index} is {value}, expected 1.0")]
    InvalidDiagonal {
        /// Diagonal position.
        index: usize,
        /// Value found.
        value: f64,
    },

    /// `C[i][j]` differs from `C[j][i]`.
    #[error("Matrix is not symmetric at ({i}, {j})")]
    NotSymmetric {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
    },

    /// Off-diagonal element outside [-1, 1].
    #[error("Correlation at ({i}, {j}) is {value}, must be in [-1, 1]")]
    OutOfRange {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// Value found.
        value: f64,
    },

    /// Element is NaN or infinite.
    #[error("Correlation at ({i}, {j}) is not finite")]
    NonFinite {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
    },

    /// Cholesky factorisation broke down at the given pivot.
    #[error("Correlation matrix is not positive semi-definite (factorisation failed at pivot {pivot})")]
    NotPositiveSemiDefinite {
        /// Pivot row at which the factorisation failed.
        pivot: usize,
    },
}

/// Errors raised by loss simulation operations.
///
/// # Examples
/// ```
/// use loss_core::types::SimulationError;
///
/// let err = SimulationError::InvalidQuantile(1.5);
/// assert_eq!(format!("{}", err), "Invalid quantile level 1.5: must be in [0, 1]");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Correlation matrix is malformed or cannot be factorised.
    #[error("Invalid correlation structure: {0}")]
    InvalidCorrelationStructure(#[from] CorrelationError),

    /// Marginal default probability outside [0, 1].
    #[error("Invalid default probability {value} for obligor {index}: must be in [0, 1]")]
    InvalidProbability {
        /// Obligor position in the portfolio.
        index: usize,
        /// Probability supplied.
        value: f64,
    },

    /// Exposure is not a positive finite amount.
    #[error("Invalid exposure {value} for obligor {index}: must be positive and finite")]
    InvalidExposure {
        /// Obligor position in the portfolio.
        index: usize,
        /// Exposure supplied.
        value: f64,
    },

    /// Recovery rate outside [0, 1].
    #[error("Invalid recovery rate {value} for obligor {index}: must be in [0, 1]")]
    InvalidRecovery {
        /// Obligor position in the portfolio.
        index: usize,
        /// Recovery rate supplied.
        value: f64,
    },

    /// Requested quantile level outside [0, 1].
    #[error("Invalid quantile level {0}: must be in [0, 1]")]
    InvalidQuantile(f64),

    /// Zero trials requested.
    #[error("Scenario set is empty: trial count must be at least 1")]
    EmptyScenarioSet,

    /// Obligor counts disagree between inputs.
    #[error("Dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Which inputs were compared.
        context: &'static str,
        /// Dimension required.
        expected: usize,
        /// Dimension supplied.
        got: usize,
    },

    /// Any other configuration value out of range.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl SimulationError {
    /// Returns true when the error stems from caller-supplied input.
    ///
    /// The core performs no I/O, so every error it raises is an input
    /// error; the method exists so service layers can map errors to exit
    /// codes without matching on variants.
    #[inline]
    pub fn is_input_error(&self) -> bool {
        true
    }
}

/// Result alias for loss simulation operations.
pub type SimulationResult<T> = Result<T, SimulationError>;
