//! Adaptive exposure engine.
//!
//! Maps a continuous sun altitude to a device-legal (shutter, ISO) pair in four steps:
//!
//! - [`curve`]: altitude → continuous [`ExposureTarget`] (phased power-law curve or the
//!   simpler logarithmic curve)
//! - [`clamp`]: caps the target at the anti-trailing shutter limit and the ISO ceiling
//! - [`snap`]: rounds each value to the closest value the camera supports
//! - [`engine`]: bundles the three for one session
//!
//! [`phase`] holds the altitude → phase classification that selects the aggressiveness
//! coefficient used by the phased curve.

pub mod clamp;
pub mod curve;
pub mod engine;
pub mod phase;
pub mod snap;

pub use engine::ExposureEngine;
pub use phase::Phase;

use serde::Deserialize;
use std::fmt;

/// Continuous exposure target, recomputed every cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureTarget {
    pub shutter_seconds: f64,
    pub iso_value: f64,
}

/// Device-legal settings produced by snapping an [`ExposureTarget`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub shutter_seconds: f64,
    pub iso: u32,
}

/// Star trailing heuristic: the longest untrailed exposure is `rule / focal length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u32")]
pub enum TrailRule {
    Rule500,
    Rule600,
}

impl TrailRule {
    pub fn value(self) -> u32 {
        match self {
            TrailRule::Rule500 => 500,
            TrailRule::Rule600 => 600,
        }
    }

    /// Longest exposure in seconds before stars visibly trail at this focal length.
    pub fn max_shutter(self, focal_length_mm: u32) -> f64 {
        f64::from(self.value()) / f64::from(focal_length_mm.max(1))
    }
}

impl TryFrom<u32> for TrailRule {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            500 => Ok(TrailRule::Rule500),
            600 => Ok(TrailRule::Rule600),
            other => Err(format!("trail_rule must be 500 or 600 (got {other})")),
        }
    }
}

impl fmt::Display for TrailRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Which altitude → exposure mapping a session uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExposureCurve {
    /// Night-biased curve shaped by the per-phase aggressiveness coefficients
    Phased { apply_day_gradient: bool },
    /// Log-space interpolation over a fixed altitude window
    Logarithmic,
}

impl ExposureCurve {
    pub fn name(&self) -> &'static str {
        match self {
            ExposureCurve::Phased { .. } => "phased",
            ExposureCurve::Logarithmic => "logarithmic",
        }
    }
}

/// ISO floor (held while it is still bright) and ceiling (reached at full night).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoRange {
    pub floor: f64,
    pub ceiling: f64,
}

/// Lens and rule parameters shared by both curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    pub focal_length_mm: u32,
    pub trail_rule: TrailRule,
    /// One coefficient in (0, 1] per [`Phase`], ordered day → night
    pub aggressiveness: [f64; 4],
    pub iso: IsoRange,
}

impl CurveParams {
    /// Longest exposure allowed for this lens and rule.
    pub fn max_night_shutter(&self) -> f64 {
        self.trail_rule.max_shutter(self.focal_length_mm)
    }
}
