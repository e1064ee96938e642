//! Sun altitude calculations.
//!
//! Altitude at an arbitrary instant uses the NOAA solar position equations
//! (Jean Meeus, "Astronomical Algorithms") with the standard atmospheric
//! refraction correction, accurate to a fraction of a degree for the dates a
//! capture session can span. Daily sunrise and sunset come from the `sunrise` crate.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use sunrise::{Coordinates, SolarDay, SolarEvent};

use crate::error::CycleError;

/// Anything that can report the sun's altitude for a place and time.
///
/// Closures with the matching signature implement this trait, which keeps
/// scripted altitude curves in tests short.
pub trait AltitudeOracle {
    fn altitude(&self, latitude: f64, longitude: f64, at: DateTime<Utc>)
    -> Result<f64, CycleError>;
}

impl<F> AltitudeOracle for F
where
    F: Fn(f64, f64, DateTime<Utc>) -> Result<f64, CycleError>,
{
    fn altitude(
        &self,
        latitude: f64,
        longitude: f64,
        at: DateTime<Utc>,
    ) -> Result<f64, CycleError> {
        self(latitude, longitude, at)
    }
}

/// Oracle backed by [`solar_position`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarAltitude;

impl AltitudeOracle for SolarAltitude {
    fn altitude(
        &self,
        latitude: f64,
        longitude: f64,
        at: DateTime<Utc>,
    ) -> Result<f64, CycleError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(CycleError::OracleUnavailable(format!(
                "coordinates out of range: {latitude}, {longitude}"
            )));
        }
        let position = solar_position(latitude, longitude, at);
        if position.altitude.is_finite() {
            Ok(position.altitude)
        } else {
            Err(CycleError::OracleUnavailable(format!(
                "no solar altitude for {}",
                at.to_rfc3339()
            )))
        }
    }
}

/// Intermediate and final values of one solar position calculation, in degrees
/// (equation of time in minutes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub declination: f64,
    pub equation_of_time: f64,
    pub hour_angle: f64,
    pub zenith: f64,
    /// Apparent altitude, refraction included
    pub altitude: f64,
}

pub fn solar_position(latitude: f64, longitude: f64, at: DateTime<Utc>) -> SolarPosition {
    let julian_day = at.timestamp() as f64 / 86_400.0
        + f64::from(at.timestamp_subsec_millis()) / 86_400_000.0
        + 2_440_587.5;
    let t = (julian_day - 2_451_545.0) / 36_525.0;

    let mean_longitude = (280.46646 + t * (36_000.76983 + t * 0.000_303_2)).rem_euclid(360.0);
    let mean_anomaly = 357.52911 + t * (35_999.05029 - 0.000_153_7 * t);
    let eccentricity = 0.016_708_634 - t * (0.000_042_037 + 0.000_000_126_7 * t);

    let m = mean_anomaly.to_radians();
    let center = m.sin() * (1.914_602 - t * (0.004_817 + 0.000_014 * t))
        + (2.0 * m).sin() * (0.019_993 - 0.000_101 * t)
        + (3.0 * m).sin() * 0.000_289;

    let omega = (125.04 - 1934.136 * t).to_radians();
    let apparent_longitude = mean_longitude + center - 0.005_69 - 0.004_78 * omega.sin();

    let mean_obliquity =
        23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.000_59 - t * 0.001_813))) / 60.0) / 60.0;
    let obliquity = (mean_obliquity + 0.002_56 * omega.cos()).to_radians();

    let declination = (obliquity.sin() * apparent_longitude.to_radians().sin()).asin();

    let y = (obliquity / 2.0).tan().powi(2);
    let l0 = mean_longitude.to_radians();
    let equation_of_time = 4.0
        * (y * (2.0 * l0).sin() - 2.0 * eccentricity * m.sin()
            + 4.0 * eccentricity * y * m.sin() * (2.0 * l0).cos()
            - 0.5 * y * y * (4.0 * l0).sin()
            - 1.25 * eccentricity * eccentricity * (2.0 * m).sin())
        .to_degrees();

    let minutes_of_day = f64::from(at.num_seconds_from_midnight()) / 60.0
        + f64::from(at.nanosecond() % 1_000_000_000) / 60_000_000_000.0;
    let true_solar_time = (minutes_of_day + equation_of_time + 4.0 * longitude).rem_euclid(1440.0);
    let hour_angle = true_solar_time / 4.0 - 180.0;

    let lat = latitude.to_radians();
    let cos_zenith = (lat.sin() * declination.sin()
        + lat.cos() * declination.cos() * hour_angle.to_radians().cos())
    .clamp(-1.0, 1.0);
    let zenith = cos_zenith.acos().to_degrees();
    let geometric = 90.0 - zenith;

    SolarPosition {
        declination: declination.to_degrees(),
        equation_of_time,
        hour_angle,
        zenith,
        altitude: geometric + refraction(geometric),
    }
}

/// Atmospheric refraction correction in degrees for a geometric elevation.
fn refraction(elevation: f64) -> f64 {
    if elevation > 85.0 {
        return 0.0;
    }
    let te = elevation.to_radians().tan();
    let arcseconds = if elevation > 5.0 {
        58.1 / te - 0.07 / te.powi(3) + 0.000_086 / te.powi(5)
    } else if elevation > -0.575 {
        1735.0
            + elevation * (-518.2 + elevation * (103.4 + elevation * (-12.79 + elevation * 0.711)))
    } else {
        -20.772 / te
    };
    arcseconds / 3600.0
}

/// Sunrise and sunset (UTC) for a date, or `None` for invalid coordinates.
pub fn day_events(
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let coord = Coordinates::new(latitude, longitude)?;
    let solar_day = SolarDay::new(coord, date);
    Some((
        solar_day.event_time(SolarEvent::Sunrise),
        solar_day.event_time(SolarEvent::Sunset),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::test_constants::*;
    use chrono::TimeZone;

    #[test]
    fn test_summer_solstice_noon_and_midnight() {
        // Solar noon at 20.44°E is about 10:40 UTC
        let noon = Utc.with_ymd_and_hms(2025, 6, 21, 10, 40, 0).unwrap();
        let altitude = SolarAltitude
            .altitude(TEST_LATITUDE, TEST_LONGITUDE, noon)
            .unwrap();
        // 90 - 52.22 + 23.44
        assert!((altitude - 61.2).abs() < 0.5, "noon altitude {altitude}");

        let midnight = Utc.with_ymd_and_hms(2025, 6, 21, 22, 40, 0).unwrap();
        let altitude = SolarAltitude
            .altitude(TEST_LATITUDE, TEST_LONGITUDE, midnight)
            .unwrap();
        assert!((altitude + 14.3).abs() < 0.5, "midnight altitude {altitude}");
    }

    #[test]
    fn test_declination_at_equinox_is_near_zero() {
        let at = Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap();
        let position = solar_position(0.0, 0.0, at);
        assert!(position.declination.abs() < 0.2);
    }

    #[test]
    fn test_invalid_coordinates_are_unavailable() {
        let at = Utc.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
        assert!(matches!(
            SolarAltitude.altitude(95.0, 0.0, at),
            Err(CycleError::OracleUnavailable(_))
        ));
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |_: f64, _: f64, _: DateTime<Utc>| -> Result<f64, CycleError> { Ok(-7.5) };
        let at = Utc.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
        assert_eq!(oracle.altitude(0.0, 0.0, at), Ok(-7.5));
    }

    #[test]
    fn test_day_events_order() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        let (sunrise, sunset) = day_events(TEST_LATITUDE, TEST_LONGITUDE, date).unwrap();
        assert!(sunrise < sunset);
        assert!(day_events(120.0, 0.0, date).is_none());
    }
}
