//! Configuration system for dusklapse.
//!
//! Settings are read from `dusklapse.toml` in `$XDG_CONFIG_HOME/dusklapse/`
//! (or the directory given with `--config`). A commented default file is written
//! on first run. Any field can be overridden for a single invocation with
//! `field=value` arguments on the command line; overrides are parsed as TOML
//! values and merged before the file is deserialized, so they go through the
//! same validation as the file itself.
//!
//! ```toml
//! #[Location]
//! location = "teresin"        # "teresin", "tivoli" or "custom"
//!
//! #[Session]
//! mode = "timelapse"          # "timelapse" or "star_trails"
//! duration_hours = 24         # Session length in hours
//! interval = 1.0              # Seconds between timelapse frames
//! # exposure = 20             # Star trails: fixed exposure in seconds
//! # gap = 1                   # Star trails: pause between exposures in seconds
//! # iso = 800                 # Star trails: fixed ISO
//!
//! #[Lens]
//! focal_length = 35           # Millimetres
//! aperture = 2.0              # f-number, recorded in the simulation log
//! trail_rule = 600            # 500 or 600
//!
//! #[Exposure curve]
//! exposure_curve = "phased"   # "phased" or "logarithmic"
//! apply_day_gradient = false  # Ramp shutter speed down while the sun is high
//! max_iso = 1600
//! ```
//!
//! Validation failures are fatal and happen before any capture.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::common::constants::*;
use crate::exposure::{ExposureCurve, TrailRule};
use crate::geo::Location;

pub use builder::create_default_config;
pub use loading::{
    get_config_path, get_custom_config_dir, load, load_from_path, parse_override, set_config_dir,
};

/// Ramp aggressiveness: one value for every phase, or one per phase
/// (day, low sun, twilight, night).
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum Aggressiveness {
    Uniform(f64),
    PerPhase([f64; 4]),
}

impl Aggressiveness {
    pub fn per_phase(self) -> [f64; 4] {
        match self {
            Aggressiveness::Uniform(value) => [value; 4],
            Aggressiveness::PerPhase(values) => values,
        }
    }
}

/// Configuration structure for dusklapse settings.
///
/// Every field is optional; unset fields fall back to the defaults in
/// [`crate::common::constants`].
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    pub location: Option<String>, // "teresin", "tivoli" or "custom"
    pub latitude: Option<f64>,    // custom location only
    pub longitude: Option<f64>,   // custom location only
    pub timezone: Option<String>, // custom location only, IANA name

    pub mode: Option<String>, // "timelapse" or "star_trails"
    pub duration_hours: Option<f64>,
    pub start_time: Option<String>, // HH:MM in the location's timezone
    pub interval: Option<f64>,      // seconds, timelapse
    pub exposure: Option<f64>,      // seconds, star trails
    pub gap: Option<f64>,           // seconds, star trails
    pub iso: Option<u32>,           // star trails

    pub focal_length: Option<u32>, // millimetres
    pub aperture: Option<f64>,
    pub trail_rule: Option<u32>,

    pub exposure_curve: Option<String>, // "phased" or "logarithmic"
    pub apply_day_gradient: Option<bool>,
    pub aggressiveness: Option<Aggressiveness>,
    pub max_iso: Option<u32>,

    pub simulate: Option<bool>,
    pub output_dir: Option<String>,
    pub session_log: Option<String>, // file name inside output_dir
}

impl Config {
    /// Resolve the configured location into coordinates and a timezone.
    pub fn resolve_location(&self) -> Result<Location> {
        let name = self.location.as_deref().unwrap_or(DEFAULT_LOCATION);

        if name.eq_ignore_ascii_case("custom") {
            let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
                anyhow::bail!("location = \"custom\" requires latitude and longitude");
            };
            let timezone_name = self
                .timezone
                .as_deref()
                .context("location = \"custom\" requires a timezone (for example \"Europe/Warsaw\")")?;
            let timezone: Tz = timezone_name
                .parse()
                .map_err(|_| anyhow::anyhow!("Unknown timezone '{timezone_name}'"))?;
            return Ok(Location::custom(latitude, longitude, timezone));
        }

        Location::named(name).with_context(|| {
            format!(
                "Unknown location '{name}'. Use one of: {}, custom",
                Location::known_names().join(", ")
            )
        })
    }

    /// Per-phase aggressiveness, defaulting to the location's own value.
    pub fn aggressiveness_for(&self, location: &Location) -> [f64; 4] {
        self.aggressiveness
            .map(Aggressiveness::per_phase)
            .unwrap_or([location.default_aggressiveness; 4])
    }

    pub fn trail_rule(&self) -> Result<TrailRule> {
        TrailRule::try_from(self.trail_rule.unwrap_or(DEFAULT_TRAIL_RULE))
            .map_err(|e| anyhow::anyhow!(e))
    }

    pub fn exposure_curve(&self) -> Result<ExposureCurve> {
        let apply_day_gradient = self
            .apply_day_gradient
            .unwrap_or(DEFAULT_APPLY_DAY_GRADIENT);
        match self
            .exposure_curve
            .as_deref()
            .unwrap_or(DEFAULT_EXPOSURE_CURVE)
        {
            "phased" => Ok(ExposureCurve::Phased { apply_day_gradient }),
            "logarithmic" => Ok(ExposureCurve::Logarithmic),
            other => anyhow::bail!(
                "exposure_curve must be \"phased\" or \"logarithmic\" (got \"{other}\")"
            ),
        }
    }

    pub fn is_simulation(&self) -> bool {
        self.simulate.unwrap_or(DEFAULT_SIMULATE)
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");

        match self.resolve_location() {
            Ok(location) => {
                let lat_dir = if location.latitude >= 0.0 { "N" } else { "S" };
                let lon_dir = if location.longitude >= 0.0 { "E" } else { "W" };
                log_indented!(
                    "Location: {} ({:.4}°{}, {:.4}°{}, {})",
                    location.name,
                    location.latitude.abs(),
                    lat_dir,
                    location.longitude.abs(),
                    lon_dir,
                    location.timezone
                );
            }
            Err(e) => log_indented!("Location: {e}"),
        }

        let mode = self.mode.as_deref().unwrap_or(DEFAULT_MODE);
        log_indented!(
            "Mode: {} for {} hours",
            mode,
            self.duration_hours.unwrap_or(DEFAULT_DURATION_HOURS)
        );
        if mode == "star_trails" {
            if let (Some(exposure), Some(gap), Some(iso)) = (self.exposure, self.gap, self.iso) {
                log_indented!("Exposure: {exposure}s, gap {gap}s, ISO {iso}");
            }
        } else {
            log_indented!(
                "Interval: {} seconds",
                self.interval.unwrap_or(DEFAULT_INTERVAL_SECS)
            );
        }

        if let Some(ref start) = self.start_time {
            log_indented!("Start time: {start}");
        }

        log_indented!(
            "Lens: {}mm f/{} ({} rule)",
            self.focal_length.unwrap_or(DEFAULT_FOCAL_LENGTH),
            self.aperture.unwrap_or(DEFAULT_APERTURE),
            self.trail_rule.unwrap_or(DEFAULT_TRAIL_RULE)
        );
        log_indented!(
            "Exposure curve: {}, max ISO {}",
            self.exposure_curve
                .as_deref()
                .unwrap_or(DEFAULT_EXPOSURE_CURVE),
            self.max_iso.unwrap_or(DEFAULT_MAX_ISO)
        );
        if self.is_simulation() {
            log_indented!("Simulation: enabled");
        }
    }
}

#[cfg(test)]
mod tests;
