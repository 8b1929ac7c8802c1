//! Check command implementation
//!
//! Validates configuration, portfolio and correlation structure without
//! running a simulation.

use loss_engine::mc::CorrelationSampler;
use tracing::info;

use super::prepare_inputs;
use crate::config::AppConfig;
use crate::output::format_amount;
use crate::Result;

/// Validate all inputs and describe them.
pub fn execute(config: &AppConfig) -> Result<String> {
    info!("Checking configuration...");
    let sim_config = config.simulation_config()?;
    let inputs = prepare_inputs(config)?;
    let sampler = CorrelationSampler::new(&inputs.correlation)?;

    let source = match &config.portfolio.file {
        Some(path) => path.display().to_string(),
        None => format!("synthetic (seed {})", config.portfolio_seed()),
    };

    let lines = [
        "Configuration OK".to_string(),
        format!("  Portfolio:         {}", source),
        format!("  Obligors:          {}", inputs.portfolio.len()),
        format!(
            "  Total exposure:    {}",
            format_amount(inputs.portfolio.total_exposure())
        ),
        format!(
            "  Expected loss:     {}",
            format_amount(inputs.portfolio.expected_loss())
        ),
        format!(
            "  Correlation:       {} (rank {})",
            config.portfolio.correlation,
            sampler.factor().rank()
        ),
        format!("  Trials:            {}", sim_config.trial_count()),
        format!("  Seed:              {}", sim_config.effective_seed()),
        format!("  Quantile method:   {}", sim_config.quantile_method()),
        format!("  Parallel:          {}", sim_config.parallel()),
        format!("  Log level:         {}", config.log_level),
    ];

    info!("Check complete");
    Ok(lines.join("\n"))
}

/// Run the check command
pub fn run(config: &AppConfig) -> Result<()> {
    println!("{}", execute(config)?);
    Ok(())
}
