//! Implementation of the `simulate` command.
//!
//! Computes every frame of the configured session against the default device
//! table and writes them as CSV. Nothing is captured and nothing sleeps.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use super::{build_engine, load_plan, output_dir};
use crate::args::CommonArgs;
use crate::common::constants::DEFAULT_SIMULATION_FILE;
use crate::common::utils::private_path;
use crate::config::Config;
use crate::core::SessionPlan;
use crate::device::DeviceCapability;
use crate::geo::SolarAltitude;
use crate::simulation::SimulationRecorder;

pub fn handle_simulate_command(common: CommonArgs, output: Option<String>) -> Result<()> {
    log_version!();
    let (config, plan) = load_plan(&common)?;
    write_simulation(&config, &plan, output.map(PathBuf::from))
}

/// Write the simulation CSV to `output`, or `simulation.csv` in the output directory.
pub(crate) fn write_simulation(
    config: &Config,
    plan: &SessionPlan,
    output: Option<PathBuf>,
) -> Result<()> {
    plan.log_overview();

    let engine = build_engine(plan, DeviceCapability::default_table())?;
    let recorder = SimulationRecorder::new(plan, &engine, &SolarAltitude);

    let path = output.unwrap_or_else(|| output_dir(config).join(DEFAULT_SIMULATION_FILE));
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create directory {}", private_path(parent))
        })?;
    }

    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", private_path(&path)))?;
    let rows = recorder.write_csv(BufWriter::new(file))?;

    log_block_start!("Wrote {rows} simulated cycles to {}", private_path(&path));
    let skipped = recorder.records().filter(Result::is_err).count();
    if skipped > 0 {
        log_warning!("{skipped} cycles would have been skipped");
    }
    log_end!();
    Ok(())
}
