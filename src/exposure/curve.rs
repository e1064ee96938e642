//! Altitude → continuous exposure curves.
//!
//! Two curves are available:
//!
//! - **Phased**: a darkness factor in `[0, 1]` rises from 0 at +4° to 1 at -12°,
//!   reshaped by `f^(1/a)` where `a` is the aggressiveness of the current phase.
//!   Shutter blends linearly from [`MAX_DAY_SHUTTER`] to the trail-rule limit;
//!   ISO holds its floor until `f = 0.5` and then ramps to the ceiling.
//! - **Logarithmic**: altitude is normalised over -5°..+55° and shutter and ISO
//!   are interpolated in log space. It is monotonic and location independent.
//!
//! Both return unclamped, unsnapped values.

use super::{CurveParams, ExposureCurve, ExposureTarget, Phase};
use crate::common::constants::{
    DAY_GRADIENT_SLOPE, DAYLIGHT_ALTITUDE, FULL_NIGHT_ALTITUDE, ISO_RAMP_START,
    LOG_CURVE_HIGH_ALTITUDE, LOG_CURVE_LOW_ALTITUDE, LOG_CURVE_MIN_SHUTTER, MAX_DAY_SHUTTER,
    ZENITH_ALTITUDE,
};

/// Compute the target for whichever curve the session uses.
pub fn target_for(curve: ExposureCurve, altitude: f64, params: &CurveParams) -> ExposureTarget {
    match curve {
        ExposureCurve::Phased { apply_day_gradient } => {
            compute_target(altitude, params, apply_day_gradient)
        }
        ExposureCurve::Logarithmic => compute_log_target(altitude, params),
    }
}

/// Phased curve target for one altitude sample.
pub fn compute_target(
    altitude: f64,
    params: &CurveParams,
    apply_day_gradient: bool,
) -> ExposureTarget {
    let aggressiveness = Phase::classify(altitude).select(&params.aggressiveness);
    let factor = darkness_factor(altitude, aggressiveness, apply_day_gradient);

    let max_night = params.max_night_shutter();
    let shutter_seconds = MAX_DAY_SHUTTER + factor * (max_night - MAX_DAY_SHUTTER);

    let iso = params.iso;
    let iso_value = if factor < ISO_RAMP_START {
        iso.floor
    } else {
        let ramp = (factor - ISO_RAMP_START) / (1.0 - ISO_RAMP_START);
        iso.floor + ramp * (iso.ceiling - iso.floor)
    };

    ExposureTarget {
        shutter_seconds,
        iso_value,
    }
}

/// Normalised darkness in `[0, 1]`: 0 in daylight, 1 at full night.
pub fn darkness_factor(altitude: f64, aggressiveness: f64, apply_day_gradient: bool) -> f64 {
    if altitude >= DAYLIGHT_ALTITUDE {
        if apply_day_gradient {
            let gradient = DAY_GRADIENT_SLOPE * (altitude - DAYLIGHT_ALTITUDE)
                / (ZENITH_ALTITUDE - DAYLIGHT_ALTITUDE);
            gradient.max(0.0)
        } else {
            0.0
        }
    } else if altitude <= FULL_NIGHT_ALTITUDE {
        1.0
    } else {
        let span = DAYLIGHT_ALTITUDE - FULL_NIGHT_ALTITUDE;
        let linear = ((DAYLIGHT_ALTITUDE - altitude) / span).clamp(0.0, 1.0);
        linear.powf(1.0 / aggressiveness)
    }
}

/// Logarithmic curve target for one altitude sample.
pub fn compute_log_target(altitude: f64, params: &CurveParams) -> ExposureTarget {
    let window = LOG_CURVE_HIGH_ALTITUDE - LOG_CURVE_LOW_ALTITUDE;
    let brightness = ((altitude - LOG_CURVE_LOW_ALTITUDE) / window).clamp(0.0, 1.0);
    let darkness = 1.0 - brightness;

    ExposureTarget {
        shutter_seconds: log_interpolate(
            LOG_CURVE_MIN_SHUTTER,
            params.max_night_shutter(),
            darkness,
        ),
        iso_value: log_interpolate(params.iso.floor, params.iso.ceiling, darkness),
    }
}

/// Interpolate between `low` and `high` linearly in log10 space.
fn log_interpolate(low: f64, high: f64, t: f64) -> f64 {
    let log_low = low.log10();
    let log_high = high.log10();
    10f64.powf(log_low + (log_high - log_low) * t)
}
