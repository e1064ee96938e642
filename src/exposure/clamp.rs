//! Safety clamp applied to continuous targets before snapping.

use super::ExposureTarget;

/// Cap shutter at `max_shutter` and ISO at `max_iso`. Values are only ever lowered.
pub fn clamp(target: ExposureTarget, max_shutter: f64, max_iso: u32) -> ExposureTarget {
    ExposureTarget {
        shutter_seconds: target.shutter_seconds.min(max_shutter),
        iso_value: target.iso_value.min(f64::from(max_iso)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_lowers_values_above_limits() {
        let target = ExposureTarget {
            shutter_seconds: 30.0,
            iso_value: 6400.0,
        };
        let clamped = clamp(target, 600.0 / 35.0, 1600);
        assert_eq!(clamped.shutter_seconds, 600.0 / 35.0);
        assert_eq!(clamped.iso_value, 1600.0);
    }

    #[test]
    fn test_clamp_never_raises() {
        let target = ExposureTarget {
            shutter_seconds: 0.01,
            iso_value: 100.0,
        };
        assert_eq!(clamp(target, 20.0, 1600), target);
    }

    #[test]
    fn test_clamp_replaces_nan_with_limit() {
        let target = ExposureTarget {
            shutter_seconds: f64::NAN,
            iso_value: f64::NAN,
        };
        let clamped = clamp(target, 10.0, 800);
        assert_eq!(clamped.shutter_seconds, 10.0);
        assert_eq!(clamped.iso_value, 800.0);
    }
}
