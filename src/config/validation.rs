//! Configuration validation functionality.
//!
//! Range and consistency checks that run right after a configuration is parsed.
//! Everything here is fatal: a session never starts with an invalid setup.

use anyhow::{Context, Result};
use chrono::NaiveTime;

use super::Config;
use crate::common::constants::*;

/// Validate every configured value against its allowed range.
pub fn validate_config(config: &Config) -> Result<()> {
    let location = config.resolve_location()?;

    if !(-90.0..=90.0).contains(&location.latitude) {
        anyhow::bail!(
            "latitude must be between -90 and 90 degrees (got {})",
            location.latitude
        );
    }
    if !(-180.0..=180.0).contains(&location.longitude) {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            location.longitude
        );
    }

    let mode = config.mode.as_deref().unwrap_or(DEFAULT_MODE);
    match mode {
        "timelapse" => {
            if let Some(interval) = config.interval
                && !(MINIMUM_INTERVAL_SECS..=MAXIMUM_INTERVAL_SECS).contains(&interval)
            {
                anyhow::bail!(
                    "interval ({interval}s) must be between {MINIMUM_INTERVAL_SECS} and {MAXIMUM_INTERVAL_SECS} seconds"
                );
            }
        }
        "star_trails" => validate_star_trail_settings(config)?,
        other => anyhow::bail!("mode must be \"timelapse\" or \"star_trails\" (got \"{other}\")"),
    }

    if let Some(hours) = config.duration_hours
        && !(MINIMUM_DURATION_HOURS..=MAXIMUM_DURATION_HOURS).contains(&hours)
    {
        anyhow::bail!(
            "duration_hours ({hours}) must be between {MINIMUM_DURATION_HOURS} and {MAXIMUM_DURATION_HOURS}"
        );
    }

    if let Some(ref start) = config.start_time {
        parse_start_time(start)?;
    }

    if let Some(focal) = config.focal_length
        && !(MINIMUM_FOCAL_LENGTH..=MAXIMUM_FOCAL_LENGTH).contains(&focal)
    {
        anyhow::bail!(
            "focal_length ({focal}mm) must be between {MINIMUM_FOCAL_LENGTH} and {MAXIMUM_FOCAL_LENGTH} mm"
        );
    }

    if let Some(aperture) = config.aperture
        && !(MINIMUM_APERTURE..=MAXIMUM_APERTURE).contains(&aperture)
    {
        anyhow::bail!(
            "aperture (f/{aperture}) must be between f/{MINIMUM_APERTURE} and f/{MAXIMUM_APERTURE}"
        );
    }

    if let Some(rule) = config.trail_rule
        && !TRAIL_RULES.contains(&rule)
    {
        anyhow::bail!("trail_rule must be 500 or 600 (got {rule})");
    }

    config.exposure_curve()?;

    if let Some(max_iso) = config.max_iso
        && !(MINIMUM_ISO..=MAXIMUM_ISO).contains(&max_iso)
    {
        anyhow::bail!("max_iso ({max_iso}) must be between {MINIMUM_ISO} and {MAXIMUM_ISO}");
    }

    for (phase, value) in config.aggressiveness_for(&location).iter().enumerate() {
        if !(*value > 0.0 && *value <= 1.0) {
            anyhow::bail!(
                "aggressiveness values must be in (0, 1] (phase {} is {value})",
                phase + 1
            );
        }
    }

    Ok(())
}

fn validate_star_trail_settings(config: &Config) -> Result<()> {
    // Missing values are reported when the session plan is built
    if let Some(exposure) = config.exposure
        && !(exposure.is_finite() && exposure > 0.0)
    {
        anyhow::bail!("exposure must be a positive number of seconds (got {exposure})");
    }

    if let Some(gap) = config.gap
        && !(0.0..=MAXIMUM_GAP_SECS).contains(&gap)
    {
        anyhow::bail!("gap ({gap}s) must be between 0 and {MAXIMUM_GAP_SECS} seconds");
    }

    if let Some(iso) = config.iso
        && !(MINIMUM_ISO..=MAXIMUM_ISO).contains(&iso)
    {
        anyhow::bail!("iso ({iso}) must be between {MINIMUM_ISO} and {MAXIMUM_ISO}");
    }

    Ok(())
}

/// Parse an `HH:MM` start time.
pub fn parse_start_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .with_context(|| format!("Invalid start_time '{value}'. Use HH:MM format"))
}
