//! Configuration loading functionality.
//!
//! Handles locating the configuration file, creating a default one on first
//! run, and merging command-line `field=value` overrides into the parsed file.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::Config;
use super::validation::validate_config;
use crate::common::utils::private_path;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

const CONFIG_FILE_NAME: &str = "dusklapse.toml";

/// Fields accepted in the file and as command-line overrides.
pub const CONFIG_FIELDS: &[&str] = &[
    "location",
    "latitude",
    "longitude",
    "timezone",
    "mode",
    "duration_hours",
    "start_time",
    "interval",
    "exposure",
    "gap",
    "iso",
    "focal_length",
    "aperture",
    "trail_rule",
    "exposure_curve",
    "apply_day_gradient",
    "aggressiveness",
    "max_iso",
    "simulate",
    "output_dir",
    "session_log",
];

const STRING_FIELDS: &[&str] = &[
    "location",
    "timezone",
    "mode",
    "start_time",
    "exposure_curve",
    "output_dir",
    "session_log",
];

const BOOL_FIELDS: &[&str] = &["apply_day_gradient", "simulate"];

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Path of the configuration file, honouring `--config`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("dusklapse").join(CONFIG_FILE_NAME))
}

/// Load configuration using automatic path detection.
///
/// Creates a default configuration file if none exists yet.
pub fn load(overrides: &[(String, String)]) -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        super::builder::create_default_config(&config_path)
            .context("Failed to create default config during load")?;
        log_block_start!(
            "Created default configuration at {}",
            private_path(&config_path)
        );
    }

    load_from_path(&config_path, overrides).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            private_path(&config_path)
        )
    })
}

/// Load configuration from a specific path, applying overrides on top.
///
/// Does NOT create a default config if the path doesn't exist.
pub fn load_from_path(path: &Path, overrides: &[(String, String)]) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found at {}", private_path(path));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let mut table: toml::Table = content
        .parse()
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    for (field, value) in overrides {
        let parsed = parse_override(field, value)
            .with_context(|| format!("Invalid override '{field}={value}'"))?;
        table.insert(field.clone(), parsed);
    }

    let config: Config = toml::Value::Table(table)
        .try_into()
        .context("Configuration has invalid field types")?;

    validate_config(&config)?;

    Ok(config)
}

/// Parse a `field=value` command-line override into a TOML value.
///
/// String fields may be given with or without quotes and boolean fields accept
/// `yes`/`no`, `on`/`off` and `1`/`0` as well.
pub fn parse_override(field: &str, value: &str) -> Result<toml::Value> {
    if !CONFIG_FIELDS.contains(&field) {
        anyhow::bail!(
            "Unknown configuration field '{field}'. Known fields: {}",
            CONFIG_FIELDS.join(", ")
        );
    }

    let toml_value = if STRING_FIELDS.contains(&field) {
        if (value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\''))
        {
            value.to_string()
        } else {
            format!("\"{value}\"")
        }
    } else if BOOL_FIELDS.contains(&field) {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => "true".to_string(),
            "false" | "no" | "off" | "0" => "false".to_string(),
            _ => value.to_string(), // Let TOML parsing handle the error
        }
    } else {
        value.to_string()
    };

    let document: toml::Table = format!("{field} = {toml_value}")
        .parse()
        .with_context(|| format!("Invalid TOML syntax for field '{field}'"))?;

    document
        .get(field)
        .cloned()
        .with_context(|| format!("No value parsed for field '{field}'"))
}
