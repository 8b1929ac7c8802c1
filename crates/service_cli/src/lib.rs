//! # Tailrisk CLI library
//!
//! Command implementations behind the `tailrisk` binary, exposed as a
//! library so integration tests can drive them without a subprocess.
//!
//! - [`config`]: TOML configuration and command-line overrides
//! - [`inputs`]: CSV and synthetic portfolios, loss export
//! - [`output`]: summary tables, JSON reports, text histograms
//! - [`commands`]: `simulate` and `check`

pub mod commands;
pub mod config;
pub mod error;
pub mod inputs;
pub mod output;

pub use error::{CliError, Result};
