//! gphoto2 command-line camera driver.
//!
//! Every operation shells out to the `gphoto2` binary:
//!
//! - `--get-config shutterspeed` / `--get-config iso` list the accepted values as
//!   `Choice: <n> <label>` lines. Shutter labels look like `1/125`, `0,7692s` or `30`
//!   depending on the body and locale.
//! - `--set-config <key>=<label>` applies a value using the exact label the camera
//!   reported, so no float formatting round-trips through the camera.
//! - `--capture-image-and-download` takes the exposure and stores it in the output
//!   directory as `IMG_<index>.<ext>`.
//! - `--get-config batterylevel` reports `Current: 85%`.

use regex::Regex;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

use super::{CaptureRequest, CaptureResult, DeviceDriver};
use crate::common::constants::GPHOTO2_BINARY;
use crate::error::DriverError;
use crate::exposure::CameraSettings;

static CHOICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*Choice:\s+\d+\s+(\S+)\s*$").expect("choice pattern is valid")
});

static CURRENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Current:\s*(\d+)\s*%").expect("current pattern is valid"));

static SAVED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Saving file as\s+(\S+)").expect("saving pattern is valid")
});

/// Driver for cameras reachable through gphoto2.
pub struct Gphoto2Driver {
    output_dir: PathBuf,
    debug_enabled: bool,
    /// `(seconds, label)` pairs from the last shutter speed query
    shutter_labels: Vec<(f64, String)>,
    /// `(iso, label)` pairs from the last ISO query
    iso_labels: Vec<(u32, String)>,
}

impl Gphoto2Driver {
    pub fn new(output_dir: PathBuf, debug_enabled: bool) -> Self {
        Self {
            output_dir,
            debug_enabled,
            shutter_labels: Vec::new(),
            iso_labels: Vec::new(),
        }
    }

    fn run(&self, args: &[String]) -> Result<String, DriverError> {
        if self.debug_enabled {
            log_debug!("{} {}", GPHOTO2_BINARY, args.join(" "));
        }

        let output = Command::new(GPHOTO2_BINARY)
            .args(args)
            .output()
            .map_err(|e| DriverError::Spawn {
                program: GPHOTO2_BINARY.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(DriverError::CommandFailed {
                command: format!("{GPHOTO2_BINARY} {}", args.join(" ")),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn get_config(&self, key: &str) -> Result<String, DriverError> {
        self.run(&["--get-config".to_string(), key.to_string()])
    }

    fn set_config(&self, key: &str, label: &str) -> Result<(), DriverError> {
        self.run(&["--set-config".to_string(), format!("{key}={label}")])
            .map(|_| ())
    }

    fn shutter_label(&self, seconds: f64) -> String {
        self.shutter_labels
            .iter()
            .min_by(|(a, _), (b, _)| (a - seconds).abs().total_cmp(&(b - seconds).abs()))
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| format_shutter_label(seconds))
    }

    fn iso_label(&self, iso: u32) -> String {
        self.iso_labels
            .iter()
            .find(|(value, _)| *value == iso)
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| iso.to_string())
    }
}

impl DeviceDriver for Gphoto2Driver {
    fn supported_shutter_speeds(&mut self) -> Result<Vec<f64>, DriverError> {
        let output = self.get_config("shutterspeed")?;
        self.shutter_labels = parse_choices(&output)
            .into_iter()
            .filter_map(|label| parse_shutter_label(&label).map(|secs| (secs, label)))
            .collect();
        Ok(self.shutter_labels.iter().map(|(secs, _)| *secs).collect())
    }

    fn supported_iso_values(&mut self) -> Result<Vec<u32>, DriverError> {
        let output = self.get_config("iso")?;
        self.iso_labels = parse_choices(&output)
            .into_iter()
            .filter_map(|label| label.parse::<u32>().ok().map(|iso| (iso, label)))
            .collect();
        Ok(self.iso_labels.iter().map(|(iso, _)| *iso).collect())
    }

    fn apply_settings(&mut self, settings: &CameraSettings) -> Result<(), DriverError> {
        self.set_config("iso", &self.iso_label(settings.iso))?;
        self.set_config("shutterspeed", &self.shutter_label(settings.shutter_seconds))
    }

    fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureResult, DriverError> {
        self.apply_settings(&request.settings)?;

        let target = self
            .output_dir
            .join(format!("IMG_{:04}.%C", request.sequence_index));
        let output = self.run(&[
            "--capture-image-and-download".to_string(),
            "--force-overwrite".to_string(),
            "--filename".to_string(),
            target.display().to_string(),
        ])?;

        Ok(CaptureResult {
            saved_files: SAVED_PATTERN
                .captures_iter(&output)
                .map(|c| c[1].to_string())
                .collect(),
        })
    }

    fn battery_level(&mut self) -> Option<u8> {
        let output = self.get_config("batterylevel").ok()?;
        parse_battery_level(&output)
    }

    fn driver_name(&self) -> &'static str {
        "gphoto2"
    }
}

/// Extract the labels of every `Choice:` line.
pub fn parse_choices(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| CHOICE_PATTERN.captures(line))
        .map(|c| c[1].to_string())
        .collect()
}

/// Parse a shutter label into seconds. Accepts `1/125`, `0,7692s`, `2.5`, `30s`.
/// Returns `None` for non-numeric choices such as `bulb`.
pub fn parse_shutter_label(label: &str) -> Option<f64> {
    let cleaned = label.trim().trim_end_matches('s').replace(',', ".");

    let seconds = if let Some((num, den)) = cleaned.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den == 0.0 {
            return None;
        }
        num / den
    } else {
        cleaned.parse().ok()?
    };

    (seconds.is_finite() && seconds > 0.0).then_some(seconds)
}

/// Fallback label when the camera's own labels are unknown.
fn format_shutter_label(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("1/{}", (1.0 / seconds).round() as u64)
    } else {
        format!("{seconds}")
    }
}

/// Parse `Current: 85%` from a battery level query.
pub fn parse_battery_level(output: &str) -> Option<u8> {
    CURRENT_PATTERN
        .captures(output)
        .and_then(|c| c[1].parse::<u8>().ok())
}
