//! Implementation of the `run` command: a real capture session.

use anyhow::{Context, Result};

use super::{build_engine, load_plan, output_dir};
use crate::args::CommonArgs;
use crate::common::constants::DEFAULT_SESSION_LOG;
use crate::common::utils::private_path;
use crate::core::{Scheduler, SchedulerParams};
use crate::device::{DeviceCapability, DeviceDriver, gphoto2::Gphoto2Driver};
use crate::geo::SolarAltitude;
use crate::io::SessionLog;
use crate::time::RealTimeSource;

/// Run a session against the tethered camera, or hand over to the simulator
/// when the configuration asks for `simulate = true`.
pub fn handle_run_command(common: CommonArgs) -> Result<()> {
    log_version!();
    if common.debug_enabled {
        log_pipe!();
        log_debug!("Debug mode enabled - showing camera commands");
    }

    let (config, plan) = load_plan(&common)?;
    if config.is_simulation() {
        return super::simulate::write_simulation(&config, &plan, None);
    }

    // Sequence numbers restart at 1 every session
    let session_dir = output_dir(&config).join(plan.session_dir_name());
    std::fs::create_dir_all(&session_dir).with_context(|| {
        format!(
            "Failed to create session directory {}",
            private_path(&session_dir)
        )
    })?;
    log_block_start!("Saving images to {}", private_path(&session_dir));

    let mut driver = Gphoto2Driver::new(session_dir.clone(), common.debug_enabled);
    let capability = DeviceCapability::from_driver(&mut driver)?;
    log_block_start!("Camera connected via {}", driver.driver_name());
    log_indented!(
        "{} shutter speeds, {} ISO values (ISO {}-{})",
        capability.shutter_speeds().len(),
        capability.iso_values().len(),
        capability.min_iso(),
        capability.max_iso()
    );
    let engine = build_engine(&plan, capability)?;

    let log_path = session_dir.join(
        config
            .session_log
            .as_deref()
            .unwrap_or(DEFAULT_SESSION_LOG),
    );
    let log = SessionLog::create(&log_path)?;
    log_indented!("Session log: {}", private_path(&log_path));

    plan.log_overview();

    let clock = RealTimeSource::new();
    let scheduler = Scheduler::new(SchedulerParams {
        plan,
        engine,
        driver: &mut driver,
        oracle: &SolarAltitude,
        clock: &clock,
        log,
    })?;
    let report = scheduler.run();
    log_end!();

    if !report.outcomes.is_empty() && report.captured() == 0 {
        anyhow::bail!("No images were captured");
    }
    Ok(())
}
