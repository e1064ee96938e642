//! Default configuration file creation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::common::constants::*;

/// Write a commented default configuration to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let content = default_config_content();
    fs::write(path, content)
        .with_context(|| format!("Failed to write default config to {}", path.display()))
}

/// Commented default configuration text.
pub fn default_config_content() -> String {
    ConfigBuilder::new()
        .add_section("Location")
        .add_setting(
            "location",
            &format!("\"{DEFAULT_LOCATION}\""),
            "\"teresin\", \"tivoli\" or \"custom\"",
        )
        .add_commented_setting("latitude", "52.2202", "Custom location latitude")
        .add_commented_setting("longitude", "20.4366", "Custom location longitude")
        .add_commented_setting(
            "timezone",
            "\"Europe/Warsaw\"",
            "Custom location timezone (IANA name)",
        )
        .add_section("Session")
        .add_setting(
            "mode",
            &format!("\"{DEFAULT_MODE}\""),
            "\"timelapse\" or \"star_trails\"",
        )
        .add_setting(
            "duration_hours",
            &format!("{DEFAULT_DURATION_HOURS:.1}"),
            &format!(
                "Session length in hours ({MINIMUM_DURATION_HOURS}-{MAXIMUM_DURATION_HOURS})"
            ),
        )
        .add_setting(
            "interval",
            &format!("{DEFAULT_INTERVAL_SECS:.1}"),
            &format!(
                "Seconds between timelapse frames ({MINIMUM_INTERVAL_SECS}-{MAXIMUM_INTERVAL_SECS})"
            ),
        )
        .add_commented_setting("start_time", "\"21:30\"", "Wait until HH:MM local time")
        .add_commented_setting("exposure", "20.0", "Star trails: fixed exposure in seconds")
        .add_commented_setting("gap", "1.0", "Star trails: pause between exposures")
        .add_commented_setting("iso", "800", "Star trails: fixed ISO")
        .add_section("Lens")
        .add_setting(
            "focal_length",
            &DEFAULT_FOCAL_LENGTH.to_string(),
            "Focal length in millimetres",
        )
        .add_setting(
            "aperture",
            &format!("{DEFAULT_APERTURE:.1}"),
            "f-number, recorded in the simulation log",
        )
        .add_setting(
            "trail_rule",
            &DEFAULT_TRAIL_RULE.to_string(),
            "Longest exposure is rule / focal length (500 or 600)",
        )
        .add_section("Exposure curve")
        .add_setting(
            "exposure_curve",
            &format!("\"{DEFAULT_EXPOSURE_CURVE}\""),
            "\"phased\" or \"logarithmic\"",
        )
        .add_setting(
            "apply_day_gradient",
            &DEFAULT_APPLY_DAY_GRADIENT.to_string(),
            "Shorten exposures further while the sun is high",
        )
        .add_setting(
            "max_iso",
            &DEFAULT_MAX_ISO.to_string(),
            "ISO ceiling reached at full night",
        )
        .add_commented_setting(
            "aggressiveness",
            "0.7",
            "Ramp speed in (0, 1], or [day, low sun, twilight, night]",
        )
        .add_section("Output")
        .add_setting(
            "simulate",
            &DEFAULT_SIMULATE.to_string(),
            "Write a CSV log instead of capturing",
        )
        .add_setting(
            "output_dir",
            &format!("\"{DEFAULT_OUTPUT_DIR}\""),
            "Where images and logs are written",
        )
        .add_setting(
            "session_log",
            &format!("\"{DEFAULT_SESSION_LOG}\""),
            "Append-only session log inside output_dir",
        )
        .build()
}

struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn add_commented_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("# {key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1; // +1 for one space between setting and comment

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(title);
                    first_section = false;
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        let mut content = result.join("\n");
        content.push('\n');
        content
    }
}
