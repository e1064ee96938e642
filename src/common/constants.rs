//! Application constants and default values for dusklapse.
//!
//! This module contains the configuration defaults, validation limits,
//! device tables and operational constants used throughout the application.

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_LOCATION: &str = "teresin";
pub const DEFAULT_MODE: &str = "timelapse";
pub const DEFAULT_EXPOSURE_CURVE: &str = "phased";
pub const DEFAULT_TRAIL_RULE: u32 = 600;
pub const DEFAULT_FOCAL_LENGTH: u32 = 35; // millimetres
pub const DEFAULT_APERTURE: f64 = 2.0; // f-stop, recorded only
pub const DEFAULT_DURATION_HOURS: f64 = 24.0;
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;
pub const DEFAULT_MAX_ISO: u32 = 1600;
pub const DEFAULT_APPLY_DAY_GRADIENT: bool = false;
pub const DEFAULT_SIMULATE: bool = false;
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_SESSION_LOG: &str = "dusklapse.log";
pub const DEFAULT_SIMULATION_FILE: &str = "simulation.csv";
pub const DEFAULT_AGGRESSIVENESS: f64 = 0.9; // custom locations

// ═══ Validation Limits ═══
// These limits keep user inputs within physically meaningful ranges

pub const TRAIL_RULES: &[u32] = &[500, 600];
pub const MINIMUM_FOCAL_LENGTH: u32 = 8; // millimetres
pub const MAXIMUM_FOCAL_LENGTH: u32 = 1200;
pub const MINIMUM_APERTURE: f64 = 0.95;
pub const MAXIMUM_APERTURE: f64 = 32.0;
pub const MINIMUM_DURATION_HOURS: f64 = 0.01;
pub const MAXIMUM_DURATION_HOURS: f64 = 72.0;
pub const MINIMUM_INTERVAL_SECS: f64 = 0.5;
pub const MAXIMUM_INTERVAL_SECS: f64 = 3600.0;
pub const MAXIMUM_GAP_SECS: f64 = 3600.0;
pub const MINIMUM_ISO: u32 = 50;
pub const MAXIMUM_ISO: u32 = 102_400;

// ═══ Exposure Curve Constants ═══

/// Shortest exposure used by the phased curve while the sun is high.
pub const MAX_DAY_SHUTTER: f64 = 1.0 / 125.0;

/// Shortest exposure of the logarithmic curve at the top of its window.
pub const LOG_CURVE_MIN_SHUTTER: f64 = 1.0 / 4000.0;

/// Altitude window of the logarithmic curve, in degrees.
pub const LOG_CURVE_LOW_ALTITUDE: f64 = -5.0;
pub const LOG_CURVE_HIGH_ALTITUDE: f64 = 55.0;

/// Darkness factor is zero at or above this altitude.
pub const DAYLIGHT_ALTITUDE: f64 = 4.0;
/// Darkness factor is one at or below this altitude.
pub const FULL_NIGHT_ALTITUDE: f64 = -12.0;
/// Day gradient slope spread over the remaining sky (4° to zenith).
pub const DAY_GRADIENT_SLOPE: f64 = -0.1;
pub const ZENITH_ALTITUDE: f64 = 90.0;

/// ISO stays at its floor until the darkness factor passes this point.
pub const ISO_RAMP_START: f64 = 0.5;

// ═══ Default Device Tables ═══
// Used for simulation and whenever a driver reports no capabilities of its own

pub const DEFAULT_SHUTTER_SPEEDS: &[f64] = &[
    1.0 / 4000.0,
    1.0 / 3200.0,
    1.0 / 2500.0,
    1.0 / 2000.0,
    1.0 / 1600.0,
    1.0 / 1250.0,
    1.0 / 1000.0,
    1.0 / 800.0,
    1.0 / 640.0,
    1.0 / 500.0,
    1.0 / 400.0,
    1.0 / 320.0,
    1.0 / 250.0,
    1.0 / 200.0,
    1.0 / 160.0,
    1.0 / 125.0,
    1.0 / 100.0,
    1.0 / 80.0,
    1.0 / 60.0,
    1.0 / 50.0,
    1.0 / 40.0,
    1.0 / 30.0,
    1.0 / 25.0,
    1.0 / 20.0,
    1.0 / 15.0,
    1.0 / 13.0,
    1.0 / 10.0,
    1.0 / 8.0,
    1.0 / 6.0,
    1.0 / 5.0,
    1.0 / 4.0,
    0.3,
    0.4,
    0.5,
    0.6,
    0.8,
    1.0,
    1.3,
    1.6,
    2.0,
    2.5,
    3.2,
    4.0,
    5.0,
    6.0,
    8.0,
    10.0,
    13.0,
    15.0,
    20.0,
    25.0,
    30.0,
];

pub const DEFAULT_ISO_VALUES: &[u32] = &[
    100, 125, 160, 200, 250, 320, 400, 500, 640, 800, 1000, 1250, 1600,
];

/// Focal lengths listed by the `exposures` command.
pub const COMMON_FOCAL_LENGTHS: &[u32] = &[
    14, 15, 17, 20, 24, 35, 40, 50, 85, 105, 135, 200, 250, 300, 430,
];

// ═══ Operational Constants ═══

pub const BATTERY_CHECK_EVERY: u32 = 10; // captures
pub const LOW_BATTERY_PERCENT: u8 = 20;
pub const MOVIE_FRAME_RATES: &[u32] = &[24, 30];
pub const GPHOTO2_BINARY: &str = "gphoto2";

// ═══ Exit Codes ═══

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
