use super::validation::validate_config;
use super::*;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("dusklapse.toml");
    fs::write(&path, content).unwrap();
    path
}

fn overrides(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
#[serial]
fn test_config_load_default_creation() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("dusklapse").join("dusklapse.toml");

    // Save and restore XDG_CONFIG_HOME
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    crate::common::logger::Log::set_enabled(false);
    let result = load(&[]);

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    let config = result.unwrap();
    assert!(config_path.exists());
    assert_eq!(config.location.as_deref(), Some(DEFAULT_LOCATION));
    assert_eq!(config.trail_rule, Some(DEFAULT_TRAIL_RULE));
}

#[test]
fn test_default_config_round_trips() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("dusklapse.toml");
    create_default_config(&path).unwrap();

    let config = load_from_path(&path, &[]).unwrap();
    assert_eq!(config.mode.as_deref(), Some("timelapse"));
    assert_eq!(config.focal_length, Some(DEFAULT_FOCAL_LENGTH));
    assert_eq!(config.duration_hours, Some(DEFAULT_DURATION_HOURS));
    assert_eq!(config.simulate, Some(false));
    // Commented-out settings stay unset
    assert_eq!(config.exposure, None);
    assert_eq!(config.aggressiveness, None);
}

#[test]
fn test_config_toml_parsing() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(
        temp_dir.path(),
        r#"
location = "tivoli"
mode = "star_trails"
duration_hours = 3
exposure = 20.0
gap = 1
iso = 800
focal_length = 20
trail_rule = 500
aggressiveness = [0.9, 0.8, 0.7, 0.6]
"#,
    );

    let config = load_from_path(&path, &[]).unwrap();
    assert_eq!(config.duration_hours, Some(3.0));
    assert_eq!(config.gap, Some(1.0));
    assert_eq!(
        config.aggressiveness,
        Some(Aggressiveness::PerPhase([0.9, 0.8, 0.7, 0.6]))
    );
    assert_eq!(config.trail_rule().unwrap(), TrailRule::Rule500);
}

#[test]
fn test_config_malformed_toml() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), "location = \"teresin\nmode = ");
    assert!(load_from_path(&path, &[]).is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("absent.toml");
    assert!(load_from_path(&path, &[]).is_err());
}

#[test]
fn test_overrides_replace_file_values() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(
        temp_dir.path(),
        "location = \"teresin\"\nfocal_length = 35\nsimulate = false\n",
    );

    let config = load_from_path(
        &path,
        &overrides(&[
            ("focal_length", "50"),
            ("simulate", "yes"),
            ("location", "tivoli"),
            ("aggressiveness", "0.6"),
        ]),
    )
    .unwrap();

    assert_eq!(config.focal_length, Some(50));
    assert_eq!(config.simulate, Some(true));
    assert_eq!(config.location.as_deref(), Some("tivoli"));
    assert_eq!(config.aggressiveness, Some(Aggressiveness::Uniform(0.6)));
}

#[test]
fn test_override_validation() {
    assert!(parse_override("focal_lenght", "50").is_err());
    assert!(parse_override("focal_length", "fifty").is_err());
    assert_eq!(
        parse_override("mode", "star_trails").unwrap(),
        toml::Value::String("star_trails".to_string())
    );
    assert_eq!(
        parse_override("start_time", "'21:30'").unwrap(),
        toml::Value::String("21:30".to_string())
    );
    assert_eq!(
        parse_override("apply_day_gradient", "off").unwrap(),
        toml::Value::Boolean(false)
    );
}

#[test]
fn test_override_with_invalid_value_fails_validation() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), "location = \"teresin\"\n");
    assert!(load_from_path(&path, &overrides(&[("trail_rule", "550")])).is_err());
    assert!(load_from_path(&path, &overrides(&[("interval", "0.1")])).is_err());
}

#[test]
fn test_config_validation_ranges() {
    let base = Config::default();
    assert!(validate_config(&base).is_ok());

    let cases = [
        Config {
            focal_length: Some(4),
            ..Config::default()
        },
        Config {
            aperture: Some(64.0),
            ..Config::default()
        },
        Config {
            duration_hours: Some(100.0),
            ..Config::default()
        },
        Config {
            max_iso: Some(10),
            ..Config::default()
        },
        Config {
            mode: Some("startrails".to_string()),
            ..Config::default()
        },
        Config {
            exposure_curve: Some("linear".to_string()),
            ..Config::default()
        },
        Config {
            start_time: Some("9pm".to_string()),
            ..Config::default()
        },
        Config {
            aggressiveness: Some(Aggressiveness::Uniform(0.0)),
            ..Config::default()
        },
        Config {
            aggressiveness: Some(Aggressiveness::PerPhase([0.5, 0.5, 1.5, 0.5])),
            ..Config::default()
        },
        Config {
            mode: Some("star_trails".to_string()),
            gap: Some(-1.0),
            ..Config::default()
        },
    ];

    for config in cases {
        assert!(validate_config(&config).is_err(), "accepted {config:?}");
    }
}

#[test]
fn test_custom_location_requires_coordinates_and_timezone() {
    let missing_tz = Config {
        location: Some("custom".to_string()),
        latitude: Some(40.0),
        longitude: Some(-3.7),
        ..Config::default()
    };
    assert!(missing_tz.resolve_location().is_err());

    let bad_tz = Config {
        timezone: Some("Mars/Olympus".to_string()),
        ..missing_tz.clone()
    };
    assert!(bad_tz.resolve_location().is_err());

    let complete = Config {
        timezone: Some("Europe/Madrid".to_string()),
        ..missing_tz.clone()
    };
    let location = complete.resolve_location().unwrap();
    assert_eq!(location.latitude, 40.0);
    assert_eq!(location.timezone, chrono_tz::Tz::Europe__Madrid);

    let out_of_range = Config {
        latitude: Some(95.0),
        ..complete
    };
    assert!(validate_config(&out_of_range).is_err());
}

#[test]
fn test_aggressiveness_defaults_to_location() {
    let config = Config {
        location: Some("tivoli".to_string()),
        ..Config::default()
    };
    let location = config.resolve_location().unwrap();
    assert_eq!(config.aggressiveness_for(&location), [0.5; 4]);

    let config = Config {
        aggressiveness: Some(Aggressiveness::Uniform(0.8)),
        ..config
    };
    assert_eq!(config.aggressiveness_for(&location), [0.8; 4]);
}

#[test]
fn test_exposure_curve_selection() {
    let config = Config {
        apply_day_gradient: Some(true),
        ..Config::default()
    };
    assert_eq!(
        config.exposure_curve().unwrap(),
        ExposureCurve::Phased {
            apply_day_gradient: true
        }
    );

    let config = Config {
        exposure_curve: Some("logarithmic".to_string()),
        ..Config::default()
    };
    assert_eq!(config.exposure_curve().unwrap(), ExposureCurve::Logarithmic);
}
