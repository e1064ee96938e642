//! Implementation of the `exposures` command.

use anyhow::Result;

use crate::args::CommonArgs;
use crate::common::constants::COMMON_FOCAL_LENGTHS;
use crate::common::utils::format_shutter;
use crate::exposure::TrailRule;

/// Longest untrailed exposure for a focal length under both rules.
pub fn exposure_limits(focal_length_mm: u32) -> (f64, f64) {
    (
        TrailRule::Rule500.max_shutter(focal_length_mm),
        TrailRule::Rule600.max_shutter(focal_length_mm),
    )
}

/// Print the exposure table. The configured lens, if any, is marked.
pub fn handle_exposures_command(common: CommonArgs) -> Result<()> {
    log_version!();
    crate::config::set_config_dir(common.config_dir.clone())?;
    let configured = crate::config::load(&common.overrides)
        .ok()
        .and_then(|config| config.focal_length);

    log_block_start!("Longest exposure before stars trail:");
    log_indented!("{:>6}  {:>9}  {:>9}", "Focal", "500 rule", "600 rule");
    for &focal in COMMON_FOCAL_LENGTHS {
        let (rule_500, rule_600) = exposure_limits(focal);
        let marker = if configured == Some(focal) { " ◀" } else { "" };
        log_indented!(
            "{:>4}mm  {:>9}  {:>9}{marker}",
            focal,
            format_shutter(rule_500),
            format_shutter(rule_600)
        );
    }
    if let Some(focal) = configured
        && !COMMON_FOCAL_LENGTHS.contains(&focal)
    {
        let (rule_500, rule_600) = exposure_limits(focal);
        log_indented!(
            "{:>4}mm  {:>9}  {:>9} ◀",
            focal,
            format_shutter(rule_500),
            format_shutter(rule_600)
        );
    }
    log_end!();
    Ok(())
}
