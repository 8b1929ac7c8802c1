//! Tailrisk CLI - Portfolio Credit Loss Simulation
//!
//! This is the operational entry point for the tailrisk loss simulator.
//!
//! # Commands
//!
//! - `tailrisk simulate` - Simulate the loss distribution of a portfolio
//! - `tailrisk check` - Validate configuration and inputs without simulating
//!
//! # Configuration
//!
//! Settings come from an optional TOML file (`--config`), overridden by
//! command-line flags. Most flags also read a `TAILRISK_*` environment
//! variable. `RUST_LOG` takes precedence over the configured log level.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use service_cli::commands;
use service_cli::config::{build_config, AppConfig, CliOverrides};
use service_cli::Result;

/// Tailrisk portfolio credit loss simulator
#[derive(Parser)]
#[command(name = "tailrisk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TAILRISK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "TAILRISK_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the portfolio loss distribution
    Simulate(SimulateArgs),

    /// Check configuration and inputs without simulating
    Check(InputArgs),
}

/// Portfolio and simulation inputs shared by all commands
#[derive(Args, Debug, Clone, Default)]
struct InputArgs {
    /// Portfolio CSV (exposure,default_probability,recovery_rate); synthetic if omitted
    #[arg(short, long, env = "TAILRISK_PORTFOLIO")]
    portfolio: Option<PathBuf>,

    /// Number of synthetic obligors
    #[arg(short = 'n', long)]
    obligors: Option<usize>,

    /// Uniform pairwise correlation
    #[arg(short = 'r', long, allow_negative_numbers = true)]
    correlation: Option<f64>,

    /// Number of Monte Carlo trials
    #[arg(short, long, env = "TAILRISK_TRIALS")]
    trials: Option<usize>,

    /// Random seed
    #[arg(short, long, env = "TAILRISK_SEED")]
    seed: Option<u64>,

    /// Comma-separated quantile levels, e.g. 0.95,0.99
    #[arg(short, long, value_delimiter = ',')]
    quantiles: Option<Vec<f64>>,

    /// Quantile interpolation (linear, lower, higher, nearest, midpoint)
    #[arg(short, long)]
    method: Option<String>,

    /// Run trial blocks on a single thread
    #[arg(long)]
    sequential: bool,
}

#[derive(Args, Debug, Clone)]
struct SimulateArgs {
    #[command(flatten)]
    inputs: InputArgs,

    /// Output format (table, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Write per-trial losses to this CSV file
    #[arg(long)]
    losses_out: Option<PathBuf>,

    /// Print a loss histogram with this many bins
    #[arg(long)]
    histogram: Option<usize>,
}

impl InputArgs {
    fn overrides(&self, log_level: Option<String>) -> CliOverrides {
        CliOverrides {
            log_level,
            trials: self.trials,
            seed: self.seed,
            quantile_levels: self.quantiles.clone(),
            quantile_method: self.method.clone(),
            sequential: self.sequential,
            portfolio_file: self.portfolio.clone(),
            obligors: self.obligors,
            correlation: self.correlation,
            ..Default::default()
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let log_level = if cli.verbose {
        Some("debug".to_string())
    } else {
        cli.log_level.clone()
    };

    let overrides = match &cli.command {
        Commands::Simulate(args) => CliOverrides {
            format: args.format.clone(),
            losses_file: args.losses_out.clone(),
            histogram_bins: args.histogram,
            ..args.inputs.overrides(log_level)
        },
        Commands::Check(args) => args.overrides(log_level),
    };

    Ok(build_config(cli.config.as_deref(), &overrides)?)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::from(err.exit_code() as u8);
        }
    };

    init_tracing(config.log_level.as_filter_str());
    info!(log_level = %config.log_level, "Tailrisk v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Simulate(_) => commands::simulate::run(&config),
        Commands::Check(_) => commands::check::run(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
