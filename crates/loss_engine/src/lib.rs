//! # Loss Engine (L3: Simulation)
//!
//! Correlated-default Monte Carlo engine for portfolio credit loss.
//!
//! This crate provides:
//! - Seeded generators with per-block streams for reproducible parallel runs
//! - Correlation sampling through a semi-definite Cholesky factor
//! - Default classification against inverse normal thresholds
//! - Per-trial loss aggregation and distribution summaries
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            loss_engine (L3)             │
//! ├─────────────────────────────────────────┤
//! │  rng/  - SimulationRng, StreamFactory   │
//! │  mc/   - sampler, classifier,           │
//! │          aggregator, simulator          │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │             loss_core (L1)              │
//! │  Portfolio, CorrelationMatrix, stats    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Performance
//!
//! - Trials are processed in blocks of [`rng::TRIALS_PER_STREAM`]
//! - Blocks run on the Rayon pool; results do not depend on thread count
//! - Draws and indicators are stored trial-major, so each trial is one
//!   contiguous slice
//!
//! ## Example
//!
//! ```
//! use loss_core::math::CorrelationMatrix;
//! use loss_core::types::Portfolio;
//! use loss_engine::simulate;
//!
//! let portfolio = Portfolio::from_columns(
//!     &[100.0, 150.0],
//!     &[0.5, 0.5],
//!     &[0.4, 0.4],
//! ).unwrap();
//! let correlation = CorrelationMatrix::uniform(2, 1.0).unwrap();
//!
//! // Perfectly correlated obligors default together.
//! let summary = simulate(&portfolio, &correlation, 10_000, 1).unwrap();
//! assert_eq!(summary.min_loss, 0.0);
//! assert_eq!(summary.max_loss, portfolio.total_loss_given_default());
//! ```

#![warn(missing_docs)]

pub mod mc;
pub mod rng;

// Re-export commonly used types
pub use mc::{
    simulate, LossDistributionSummary, LossSimulator, LossVector, QuantilePoint,
    SimulationConfig, SimulationRun,
};
pub use rng::{SimulationRng, StreamFactory};
