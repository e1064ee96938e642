//! Per-session exposure engine: curve → clamp → snap.

use super::clamp::clamp;
use super::curve::target_for;
use super::snap::snap;
use super::{CameraSettings, CurveParams, ExposureCurve, ExposureTarget, IsoRange, Phase};
use crate::device::DeviceCapability;
use crate::error::{SessionError, SnapError};

/// Everything needed to turn an altitude into camera settings for one session.
#[derive(Debug, Clone)]
pub struct ExposureEngine {
    curve: ExposureCurve,
    params: CurveParams,
    capability: DeviceCapability,
    max_iso: u32,
}

impl ExposureEngine {
    /// Build an engine. The ISO floor is the lowest value the camera supports and the
    /// ceiling is `max_iso`; a ceiling below the floor is a configuration error.
    pub fn new(
        curve: ExposureCurve,
        focal_length_mm: u32,
        trail_rule: super::TrailRule,
        aggressiveness: [f64; 4],
        capability: DeviceCapability,
        max_iso: u32,
    ) -> Result<Self, SessionError> {
        if max_iso < capability.min_iso() {
            return Err(SessionError::Configuration(format!(
                "max_iso {max_iso} is below the lowest ISO the camera supports ({})",
                capability.min_iso()
            )));
        }

        let params = CurveParams {
            focal_length_mm,
            trail_rule,
            aggressiveness,
            iso: IsoRange {
                floor: f64::from(capability.min_iso()),
                ceiling: f64::from(max_iso),
            },
        };

        Ok(Self {
            curve,
            params,
            capability,
            max_iso,
        })
    }

    /// Longest shutter allowed by the trail rule for this lens.
    pub fn max_shutter(&self) -> f64 {
        self.params.max_night_shutter()
    }

    pub fn max_iso(&self) -> u32 {
        self.max_iso
    }

    /// Continuous, unclamped target for an altitude.
    pub fn target(&self, altitude: f64) -> ExposureTarget {
        target_for(self.curve, altitude, &self.params)
    }

    /// Phase an altitude falls into.
    pub fn phase(&self, altitude: f64) -> Phase {
        Phase::classify(altitude)
    }

    /// Device-legal settings for an altitude.
    pub fn settings_for(&self, altitude: f64) -> Result<CameraSettings, SnapError> {
        let target = self.target(altitude);
        self.settle(target)
    }

    /// Snap fixed, user-chosen settings (star trails) to device values.
    pub fn fixed_settings(&self, exposure: f64, iso: u32) -> Result<CameraSettings, SnapError> {
        self.settle(ExposureTarget {
            shutter_seconds: exposure,
            iso_value: f64::from(iso),
        })
    }

    fn settle(&self, target: ExposureTarget) -> Result<CameraSettings, SnapError> {
        let max_shutter = self.max_shutter();
        let bounded = clamp(target, max_shutter, self.max_iso);

        let shutter_seconds = snap(
            bounded.shutter_seconds,
            self.capability.shutter_speeds(),
            Some(max_shutter),
            "shutter speeds",
        )?;
        let iso = snap(
            bounded.iso_value,
            self.capability.iso_values(),
            Some(f64::from(self.max_iso)),
            "ISO values",
        )?;

        Ok(CameraSettings {
            shutter_seconds,
            iso,
        })
    }
}
