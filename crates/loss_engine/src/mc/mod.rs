//! # Monte Carlo Loss Simulation
//!
//! The simulation runs in three stages over an N×M grid of obligors and
//! trials:
//!
//! 1. [`CorrelationSampler`]: correlated standard normals `W = L · Z`
//! 2. [`classify_defaults`]: `D = W < Φ⁻¹(p)` per obligor
//! 3. [`aggregate_losses`]: `L_t = Σ_i LGD_i · D_{i,t}` per trial
//!
//! [`summarize`] reduces the loss vector to mean, dispersion and quantiles.
//! [`LossSimulator`] chains all stages under a [`SimulationConfig`], and
//! [`simulate`] is the four-argument entry point.
//!
//! ## Usage Example
//!
//! ```rust
//! use loss_core::math::CorrelationMatrix;
//! use loss_core::types::Portfolio;
//! use loss_engine::mc::simulate;
//!
//! let portfolio = Portfolio::from_columns(
//!     &[500_000.0, 250_000.0],
//!     &[0.05, 0.08],
//!     &[0.4, 0.5],
//! ).unwrap();
//! let correlation = CorrelationMatrix::uniform(2, 0.2).unwrap();
//!
//! let summary = simulate(&portfolio, &correlation, 10_000, 7).unwrap();
//! let var_99 = summary.value_at_risk(0.99).unwrap();
//! assert!(var_99 >= summary.mean);
//! ```

mod aggregator;
mod classifier;
mod config;
mod sampler;
mod simulator;

pub use aggregator::{
    aggregate_losses, aggregate_losses_with, summarize, LossDistributionSummary, LossVector,
    QuantilePoint,
};
pub use classifier::{classify_defaults, classify_defaults_with, DefaultIndicators};
pub use config::{
    SimulationConfig, SimulationConfigBuilder, DEFAULT_QUANTILE_LEVELS, DEFAULT_TRIALS,
    MAX_TRIALS,
};
pub use sampler::{CorrelatedDraws, CorrelationSampler};
pub use simulator::{simulate, LossSimulator, SimulationRun};
