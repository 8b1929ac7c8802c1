//! # Loss Core (L1: Foundation)
//!
//! Domain types and numerical primitives for portfolio credit loss
//! simulation.
//!
//! This crate provides:
//! - [`types`]: `Obligor`, `Portfolio` and the `SimulationError` taxonomy
//! - [`math`]: correlation matrices with semi-definite Cholesky factors,
//!   inverse normal default thresholds, empirical loss statistics
//!
//! It contains no randomness and no simulation loop; those live in
//! `loss_engine`.
//!
//! ## Example
//!
//! ```
//! use loss_core::math::{CorrelationMatrix, default_thresholds};
//! use loss_core::types::Portfolio;
//!
//! let portfolio = Portfolio::from_columns(
//!     &[100.0, 200.0],
//!     &[0.05, 0.10],
//!     &[0.4, 0.4],
//! ).unwrap();
//!
//! let correlation = CorrelationMatrix::uniform(portfolio.len(), 0.2).unwrap();
//! let factor = correlation.cholesky().unwrap();
//! let thresholds = default_thresholds(&portfolio.default_probabilities()).unwrap();
//!
//! assert_eq!(factor.dim(), 2);
//! assert!(thresholds[0] < thresholds[1]);
//! ```

#![warn(missing_docs)]

pub mod math;
pub mod types;

pub use math::{CorrelationMatrix, QuantileMethod};
pub use types::{CorrelationError, Obligor, Portfolio, SimulationError, SimulationResult};
