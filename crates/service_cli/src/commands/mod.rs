//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod simulate;

use loss_core::math::CorrelationMatrix;
use loss_core::types::Portfolio;
use loss_engine::rng::SimulationRng;
use tracing::info;

use crate::config::AppConfig;
use crate::inputs::{load_portfolio_csv, SyntheticPortfolio};
use crate::Result;

/// Portfolio and correlation matrix a command runs against.
#[derive(Debug, Clone)]
pub struct SimulationInputs {
    pub portfolio: Portfolio,
    pub correlation: CorrelationMatrix,
}

/// Load or generate the portfolio and build its uniform correlation matrix.
pub fn prepare_inputs(config: &AppConfig) -> Result<SimulationInputs> {
    let portfolio = match &config.portfolio.file {
        Some(path) => load_portfolio_csv(path)?,
        None => {
            let mut rng = SimulationRng::from_seed(config.portfolio_seed());
            SyntheticPortfolio::with_obligors(config.portfolio.obligors).generate(&mut rng)?
        }
    };
    let correlation = CorrelationMatrix::uniform(portfolio.len(), config.portfolio.correlation)
        .map_err(loss_core::types::SimulationError::from)?;

    info!(
        obligors = portfolio.len(),
        correlation = config.portfolio.correlation,
        "Prepared simulation inputs"
    );
    Ok(SimulationInputs {
        portfolio,
        correlation,
    })
}
