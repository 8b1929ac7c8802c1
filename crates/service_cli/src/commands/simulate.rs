//! Simulate command implementation
//!
//! Runs the correlated-default simulation and prints mean loss and
//! value-at-risk levels, optionally with a histogram and a loss export.

use loss_engine::mc::{LossSimulator, SimulationRun};
use tracing::info;

use super::{prepare_inputs, SimulationInputs};
use crate::config::{AppConfig, OutputFormat};
use crate::inputs::write_losses_csv;
use crate::output::{render_histogram, render_json, render_table, HistogramReport, SimulationReport};
use crate::Result;

/// Everything the simulate command produced.
#[derive(Debug)]
pub struct SimulationOutcome {
    pub inputs: SimulationInputs,
    pub run: SimulationRun,
    pub rendered: String,
}

/// Run the simulation and render its output without printing it.
pub fn execute(config: &AppConfig) -> Result<SimulationOutcome> {
    let sim_config = config.simulation_config()?;
    let inputs = prepare_inputs(config)?;

    info!(
        trials = sim_config.trial_count(),
        method = %sim_config.quantile_method(),
        "Starting simulation..."
    );
    let run = LossSimulator::new(sim_config.clone()).run(&inputs.portfolio, &inputs.correlation)?;

    let histogram = match config.output.histogram_bins {
        Some(bins) => Some(run.losses.histogram(bins)?),
        None => None,
    };

    let report = SimulationReport {
        obligors: inputs.portfolio.len(),
        total_exposure: inputs.portfolio.total_exposure(),
        expected_loss: inputs.portfolio.expected_loss(),
        seed: sim_config.effective_seed(),
        summary: &run.summary,
        histogram: match (&histogram, config.output.format) {
            (Some(h), OutputFormat::Json) => Some(HistogramReport::from(h)),
            _ => None,
        },
    };

    let rendered = match config.output.format {
        OutputFormat::Json => render_json(&report)?,
        OutputFormat::Table => {
            let mut text = render_table(&report);
            if let Some(h) = &histogram {
                text.push_str("\n\n");
                text.push_str(&render_histogram(h));
            }
            text
        }
    };

    if let Some(path) = &config.output.losses_file {
        write_losses_csv(path, &run.losses)?;
    }

    info!("Simulation complete");
    Ok(SimulationOutcome {
        inputs,
        run,
        rendered,
    })
}

/// Run the simulate command
pub fn run(config: &AppConfig) -> Result<()> {
    let outcome = execute(config)?;
    println!("{}", outcome.rendered.trim_end());
    Ok(())
}
