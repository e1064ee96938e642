//! Implementation of the `probe` command: the exposure for one sun altitude.

use anyhow::Result;

use super::{build_engine, load_plan};
use crate::args::CommonArgs;
use crate::common::utils::format_shutter;
use crate::device::DeviceCapability;

pub fn handle_probe_command(common: CommonArgs, altitude: f64) -> Result<()> {
    log_version!();
    let (_, plan) = load_plan(&common)?;
    let engine = build_engine(&plan, DeviceCapability::default_table())?;

    let target = engine.target(altitude);
    log_block_start!("Sun altitude {altitude:.2}°: {}", engine.phase(altitude));
    log_indented!(
        "Curve: {} ({}mm, {} rule)",
        plan.curve.name(),
        plan.lens.focal_length_mm,
        plan.trail_rule
    );
    log_indented!(
        "Target: {} at ISO {:.0}",
        format_shutter(target.shutter_seconds),
        target.iso_value
    );

    match engine.settings_for(altitude) {
        Ok(settings) => log_indented!(
            "Camera: {} at ISO {}",
            format_shutter(settings.shutter_seconds),
            settings.iso
        ),
        Err(e) => log_warning!("{e}"),
    }
    log_end!();
    Ok(())
}
