//! Immutable description of one capture session.

use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};
use std::time::Duration;

use crate::common::constants::*;
use crate::common::utils::{format_duration, format_shutter};
use crate::config::{Config, validation::parse_start_time};
use crate::error::SessionError;
use crate::exposure::{ExposureCurve, TrailRule};
use crate::geo::{Location, day_events};

/// Capture cadence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureMode {
    /// One frame every `interval`, drift compensated
    Timelapse { interval: Duration },
    /// Fixed exposure, gap and ISO for a fixed number of frames
    StarTrails { exposure: f64, gap: f64, iso: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    pub focal_length_mm: u32,
    /// Recorded only; the camera's aperture is set by hand
    pub aperture: f64,
}

/// Everything a session needs, fixed before the first capture.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub mode: CaptureMode,
    pub location: Location,
    pub lens: Lens,
    pub trail_rule: TrailRule,
    pub aggressiveness: [f64; 4],
    pub curve: ExposureCurve,
    pub max_iso: u32,
    pub duration_hours: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl SessionPlan {
    /// Build a plan from a validated configuration.
    ///
    /// A configured `start_time` that has already passed today (in the location's
    /// timezone) is moved to the same time tomorrow.
    pub fn from_config(config: &Config, now: DateTime<Utc>) -> Result<Self, SessionError> {
        let location = config.resolve_location().map_err(configuration)?;
        let trail_rule = config.trail_rule().map_err(configuration)?;
        let curve = config.exposure_curve().map_err(configuration)?;

        let mode = match config.mode.as_deref().unwrap_or(DEFAULT_MODE) {
            "timelapse" => CaptureMode::Timelapse {
                interval: Duration::from_secs_f64(
                    config.interval.unwrap_or(DEFAULT_INTERVAL_SECS),
                ),
            },
            "star_trails" => {
                let (Some(exposure), Some(gap), Some(iso)) =
                    (config.exposure, config.gap, config.iso)
                else {
                    return Err(SessionError::Configuration(
                        "star_trails mode requires exposure, gap and iso".to_string(),
                    ));
                };
                CaptureMode::StarTrails { exposure, gap, iso }
            }
            other => {
                return Err(SessionError::Configuration(format!(
                    "unknown mode \"{other}\""
                )));
            }
        };

        let start_time = match config.start_time.as_deref() {
            Some(value) => {
                let time = parse_start_time(value).map_err(configuration)?;
                next_occurrence(&location, time, now)?
            }
            None => now,
        };

        let plan = Self::new(
            mode,
            location,
            Lens {
                focal_length_mm: config.focal_length.unwrap_or(DEFAULT_FOCAL_LENGTH),
                aperture: config.aperture.unwrap_or(DEFAULT_APERTURE),
            },
            trail_rule,
            curve,
            config.max_iso.unwrap_or(DEFAULT_MAX_ISO),
            config.duration_hours.unwrap_or(DEFAULT_DURATION_HOURS),
            start_time,
        )?;

        let aggressiveness = config.aggressiveness_for(&plan.location);
        Ok(Self {
            aggressiveness,
            ..plan
        })
    }

    /// Build a plan directly. Aggressiveness defaults to the location's own value.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mode: CaptureMode,
        location: Location,
        lens: Lens,
        trail_rule: TrailRule,
        curve: ExposureCurve,
        max_iso: u32,
        duration_hours: f64,
        start_time: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if !(duration_hours.is_finite() && duration_hours > 0.0) {
            return Err(SessionError::Configuration(format!(
                "duration_hours must be positive (got {duration_hours})"
            )));
        }
        let end_time = start_time
            + chrono::Duration::milliseconds((duration_hours * 3_600_000.0).round() as i64);

        let plan = Self {
            mode,
            aggressiveness: [location.default_aggressiveness; 4],
            location,
            lens,
            trail_rule,
            curve,
            max_iso,
            duration_hours,
            start_time,
            end_time,
        };
        plan.preflight()?;
        Ok(plan)
    }

    /// Directory name for this session's images and log, unique per start time:
    /// `timelapse_20250621_200000_teresin` or `startrails_..._teresin`.
    pub fn session_dir_name(&self) -> String {
        let prefix = match self.mode {
            CaptureMode::Timelapse { .. } => "timelapse",
            CaptureMode::StarTrails { .. } => "startrails",
        };
        let local_start = self.start_time.with_timezone(&self.location.timezone);
        format!(
            "{prefix}_{}_{}",
            local_start.format("%Y%m%d_%H%M%S"),
            self.location.name
        )
    }

    /// Longest exposure the trail rule allows for this lens.
    pub fn max_shutter(&self) -> f64 {
        self.trail_rule.max_shutter(self.lens.focal_length_mm)
    }

    pub fn session_secs(&self) -> f64 {
        self.duration_hours * 3600.0
    }

    /// Checks that must pass before anything is captured.
    pub fn preflight(&self) -> Result<(), SessionError> {
        match self.mode {
            CaptureMode::Timelapse { interval } => {
                if interval.is_zero() {
                    return Err(SessionError::Configuration(
                        "interval must be greater than zero".to_string(),
                    ));
                }
            }
            CaptureMode::StarTrails { exposure, gap, .. } => {
                let max_shutter = self.max_shutter();
                if exposure > max_shutter {
                    return Err(SessionError::Configuration(format!(
                        "exposure {exposure}s exceeds the {} rule limit of {:.2}s at {}mm",
                        self.trail_rule, max_shutter, self.lens.focal_length_mm
                    )));
                }
                if !(exposure.is_finite() && exposure > 0.0 && gap.is_finite() && gap >= 0.0) {
                    return Err(SessionError::Configuration(format!(
                        "exposure must be positive and gap non-negative (got {exposure}s, {gap}s)"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of star trail frames: whole `exposure + gap` cycles that fit the session.
    pub fn star_trail_frames(&self) -> Option<u32> {
        match self.mode {
            CaptureMode::StarTrails { exposure, gap, .. } => {
                Some((self.session_secs() / (exposure + gap)).floor() as u32)
            }
            CaptureMode::Timelapse { .. } => None,
        }
    }

    /// Frames the session produces if every cycle fits its budget.
    pub fn expected_frames(&self) -> u32 {
        match self.mode {
            CaptureMode::Timelapse { interval } => {
                (self.session_secs() / interval.as_secs_f64()).ceil() as u32
            }
            CaptureMode::StarTrails { .. } => self.star_trail_frames().unwrap_or(0),
        }
    }

    /// Log the session overview: frame count, movie length, sun times.
    pub fn log_overview(&self) {
        log_block_start!("Session overview");

        match self.mode {
            CaptureMode::Timelapse { interval } => log_indented!(
                "Timelapse: one frame every {}s for {} hours",
                interval.as_secs_f64(),
                self.duration_hours
            ),
            CaptureMode::StarTrails { exposure, gap, iso } => log_indented!(
                "Star trails: {} exposures, {}s gap, ISO {iso}",
                format_shutter(exposure),
                gap
            ),
        }

        let frames = self.expected_frames();
        log_indented!("Images: {frames}");
        for fps in MOVIE_FRAME_RATES {
            let seconds = f64::from(frames) / f64::from(*fps);
            log_indented!(
                "Movie length at {fps} fps: {}",
                format_duration(Duration::from_secs_f64(seconds))
            );
        }

        log_indented!(
            "Longest exposure: {} ({} rule at {}mm)",
            format_shutter(self.max_shutter()),
            self.trail_rule,
            self.lens.focal_length_mm
        );

        let tz = self.location.timezone;
        let local_start = self.start_time.with_timezone(&tz);
        log_indented!(
            "Start: {}, end: {}",
            local_start.format("%Y-%m-%d %H:%M"),
            self.end_time.with_timezone(&tz).format("%Y-%m-%d %H:%M")
        );

        if let Some((sunrise, sunset)) = day_events(
            self.location.latitude,
            self.location.longitude,
            local_start.date_naive(),
        ) {
            log_indented!(
                "Sunrise: {}, sunset: {}",
                sunrise.with_timezone(&tz).format("%H:%M"),
                sunset.with_timezone(&tz).format("%H:%M")
            );
        }
    }
}

fn configuration(error: anyhow::Error) -> SessionError {
    SessionError::Configuration(format!("{error:#}"))
}

/// The next instant `time` occurs in the location's timezone, strictly after `now`.
fn next_occurrence(
    location: &Location,
    time: NaiveTime,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, SessionError> {
    let tz = location.timezone;
    let today = now.with_timezone(&tz).date_naive();

    for date in [Some(today), today.checked_add_days(Days::new(1))]
        .into_iter()
        .flatten()
    {
        if let Some(candidate) = tz.from_local_datetime(&date.and_time(time)).earliest() {
            let candidate = candidate.with_timezone(&Utc);
            if candidate > now {
                return Ok(candidate);
            }
        }
    }

    Err(SessionError::Configuration(format!(
        "start_time {} does not exist in {}",
        time.format("%H:%M"),
        tz
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn now() -> DateTime<Utc> {
        // 20:00 in Warsaw (CEST)
        Utc.with_ymd_and_hms(2025, 6, 21, 18, 0, 0).unwrap()
    }

    fn star_trails_config(exposure: f64) -> Config {
        Config {
            mode: Some("star_trails".to_string()),
            duration_hours: Some(3.0),
            exposure: Some(exposure),
            gap: Some(1.0),
            iso: Some(800),
            focal_length: Some(20),
            trail_rule: Some(500),
            ..Config::default()
        }
    }

    #[test]
    fn test_star_trail_frame_count() {
        let plan = SessionPlan::from_config(&star_trails_config(20.0), now()).unwrap();
        // 10800s / 21s
        assert_eq!(plan.star_trail_frames(), Some(514));
        assert_eq!(plan.expected_frames(), 514);
    }

    #[test]
    fn test_star_trail_frame_count_short_exposures() {
        let config = Config {
            duration_hours: Some(1.0),
            exposure: Some(5.0),
            gap: Some(2.0),
            focal_length: Some(35),
            trail_rule: Some(600),
            ..star_trails_config(5.0)
        };
        let plan = SessionPlan::from_config(&config, now()).unwrap();
        // 3600s / 7s
        assert_eq!(plan.star_trail_frames(), Some(514));
    }

    #[test]
    fn test_star_trail_preflight_rejects_non_finite_timing() {
        let location = Location::named("teresin").unwrap();
        let lens = Lens {
            focal_length_mm: 20,
            aperture: 2.8,
        };
        for (exposure, gap) in [(10.0, f64::INFINITY), (f64::NAN, 1.0), (10.0, f64::NAN)] {
            let result = SessionPlan::new(
                CaptureMode::StarTrails {
                    exposure,
                    gap,
                    iso: 800,
                },
                location.clone(),
                lens,
                TrailRule::Rule500,
                ExposureCurve::Logarithmic,
                1600,
                1.0,
                now(),
            );
            assert!(
                matches!(result, Err(SessionError::Configuration(_))),
                "accepted exposure {exposure}, gap {gap}"
            );
        }
    }

    #[test]
    fn test_session_dir_name_is_local_and_mode_specific() {
        let timelapse = SessionPlan::from_config(&Config::default(), now()).unwrap();
        assert_eq!(timelapse.session_dir_name(), "timelapse_20250621_200000_teresin");

        let star_trails = SessionPlan::from_config(&star_trails_config(20.0), now()).unwrap();
        assert_eq!(star_trails.session_dir_name(), "startrails_20250621_200000_teresin");

        let later = SessionPlan::from_config(
            &Config::default(),
            now() + chrono::Duration::seconds(1),
        )
        .unwrap();
        assert_ne!(later.session_dir_name(), timelapse.session_dir_name());
    }

    #[test]
    fn test_star_trail_preflight_rejects_long_exposure() {
        let config = Config {
            focal_length: Some(35),
            ..star_trails_config(20.0)
        };
        // 500 / 35 = 14.29s
        assert!(matches!(
            SessionPlan::from_config(&config, now()),
            Err(SessionError::Configuration(_))
        ));
    }

    #[test]
    fn test_star_trails_require_fixed_settings() {
        let config = Config {
            iso: None,
            ..star_trails_config(20.0)
        };
        assert!(matches!(
            SessionPlan::from_config(&config, now()),
            Err(SessionError::Configuration(_))
        ));
    }

    #[test]
    fn test_start_time_later_today() {
        let config = Config {
            start_time: Some("21:30".to_string()),
            ..Config::default()
        };
        let plan = SessionPlan::from_config(&config, now()).unwrap();
        assert_eq!(plan.start_time, Utc.with_ymd_and_hms(2025, 6, 21, 19, 30, 0).unwrap());
        assert_eq!(
            plan.end_time - plan.start_time,
            chrono::Duration::hours(DEFAULT_DURATION_HOURS as i64)
        );
    }

    #[test]
    fn test_start_time_already_passed_rolls_to_tomorrow() {
        let config = Config {
            start_time: Some("19:00".to_string()),
            ..Config::default()
        };
        let plan = SessionPlan::from_config(&config, now()).unwrap();
        assert_eq!(plan.start_time, Utc.with_ymd_and_hms(2025, 6, 22, 17, 0, 0).unwrap());
        assert_eq!(plan.start_time.with_timezone(&plan.location.timezone).hour(), 19);
    }

    #[test]
    fn test_no_start_time_starts_now() {
        let plan = SessionPlan::from_config(&Config::default(), now()).unwrap();
        assert_eq!(plan.start_time, now());
        assert_eq!(plan.expected_frames(), 86_400);
        assert_eq!(plan.aggressiveness, [0.7; 4]);
    }
}
