//! Core domain types.
//!
//! - [`error`]: `CorrelationError` and `SimulationError`
//! - [`portfolio`]: `Obligor` and `Portfolio`

pub mod error;
pub mod portfolio;

pub use error::{CorrelationError, SimulationError, SimulationResult};
pub use portfolio::{Obligor, Portfolio};
