//! Command-line driver for the weekly household finance simulator
//!
//! Loads a YAML scenario and a directory of transaction logs, runs the
//! simulation, and writes the flat per-run ledgers.

use std::path::Path;

use color_eyre::eyre::{Context, Result};
use finmodel_core::model::SimulationResult;

pub mod inputs;
pub mod logging;
pub mod report;
pub mod scenario;
pub mod util;

pub use inputs::load_inputs;
pub use logging::init_logging;
pub use report::write_outputs;
pub use scenario::load_scenario;

/// Load, simulate and write one run
pub fn run_scenario(
    scenario: Option<&Path>,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<SimulationResult> {
    let config = load_scenario(scenario)?;
    let inputs = load_inputs(input_dir)?;

    let result = finmodel_core::simulate(&config, &inputs).wrap_err("Simulation failed")?;

    std::fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create {}", output_dir.display()))?;
    write_outputs(output_dir, &result)?;
    Ok(result)
}
