//! Session scheduling.
//!
//! The [`Scheduler`] runs one capture session as an explicit state machine:
//!
//! ```text
//! Idle ──(start in the future)──▶ Waiting ──(start reached)──▶ Running ──▶ Completed
//!   └───────────────(start now)──────────────────────────────────┘
//! ```
//!
//! Every cycle samples the sun, asks the exposure engine for device-legal
//! settings and hands them to the camera driver. A cycle that fails is logged,
//! its sequence index is consumed and the loop carries on; only errors raised
//! before `Running` stop a session.
//!
//! Timelapse cycles are drift compensated: the scheduler sleeps whatever is left
//! of the interval after the cycle's own work. A cycle that overruns its interval
//! is logged and the next one starts immediately, without trying to catch up.

pub mod plan;
pub mod record;

pub use plan::{CaptureMode, Lens, SessionPlan};
pub use record::{CaptureRecord, CycleOutcome, SessionReport, SkippedCycle};

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::common::constants::{BATTERY_CHECK_EVERY, LOW_BATTERY_PERCENT};
use crate::common::utils::{format_duration, format_shutter};
use crate::device::{CaptureRequest, DeviceDriver};
use crate::error::{CycleError, SessionError};
use crate::exposure::{CameraSettings, ExposureEngine};
use crate::geo::{AltitudeOracle, AltitudeSample};
use crate::io::SessionLog;
use crate::time::TimeSource;

/// Where the scheduler is in a session's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulerState {
    Idle,
    Waiting { until: DateTime<Utc> },
    Running,
    Completed,
}

/// Parameters for creating a Scheduler instance.
pub struct SchedulerParams<'a> {
    pub plan: SessionPlan,
    pub engine: ExposureEngine,
    pub driver: &'a mut dyn DeviceDriver,
    pub oracle: &'a dyn AltitudeOracle,
    pub clock: &'a dyn TimeSource,
    pub log: SessionLog,
}

/// Runs one session from start to completion.
pub struct Scheduler<'a> {
    plan: SessionPlan,
    engine: ExposureEngine,
    driver: &'a mut dyn DeviceDriver,
    oracle: &'a dyn AltitudeOracle,
    clock: &'a dyn TimeSource,
    log: SessionLog,
    state: SchedulerState,
    last_index: u32,
    report: SessionReport,
}

impl<'a> Scheduler<'a> {
    /// Create a scheduler, running the plan's pre-flight checks.
    pub fn new(params: SchedulerParams<'a>) -> Result<Self, SessionError> {
        params.plan.preflight()?;

        Ok(Self {
            plan: params.plan,
            engine: params.engine,
            driver: params.driver,
            oracle: params.oracle,
            clock: params.clock,
            log: params.log,
            state: SchedulerState::Idle,
            last_index: 0,
            report: SessionReport::default(),
        })
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Run the session to completion and return every cycle's outcome.
    pub fn run(mut self) -> SessionReport {
        self.log_event(&format!(
            "Session started with {} ({} rule, {}mm)",
            self.driver.driver_name(),
            self.plan.trail_rule,
            self.plan.lens.focal_length_mm
        ));
        if self.clock.is_simulated() {
            log_indented!("Clock is simulated, sleeps return immediately");
            self.log_event("Clock is simulated");
        }

        self.begin();
        if let SchedulerState::Waiting { until } = self.state {
            self.wait_until(until);
        }

        match self.plan.mode {
            CaptureMode::Timelapse { interval } => self.run_timelapse(interval),
            CaptureMode::StarTrails { exposure, gap, iso } => {
                self.run_star_trails(exposure, gap, iso)
            }
        }

        self.state = SchedulerState::Completed;
        let summary = format!(
            "Session completed: {} captured, {} failed, {} skipped",
            self.report.captured(),
            self.report.failed(),
            self.report.skipped()
        );
        log_block_start!("{summary}");
        self.log_event(&summary);

        self.report
    }

    /// Idle → Waiting when the start is in the future, otherwise Idle → Running.
    fn begin(&mut self) {
        let now = self.clock.now();
        self.state = if self.plan.start_time > now {
            SchedulerState::Waiting {
                until: self.plan.start_time,
            }
        } else {
            SchedulerState::Running
        };
    }

    /// Waiting → Running.
    fn wait_until(&mut self, until: DateTime<Utc>) {
        let now = self.clock.now();
        if let Ok(wait) = (until - now).to_std() {
            let local = until.with_timezone(&self.plan.location.timezone);
            log_block_start!(
                "Waiting {} until {}",
                format_duration(wait),
                local.format("%Y-%m-%d %H:%M")
            );
            self.log_event(&format!("Waiting until {}", local.format("%H:%M")));
            self.clock.sleep(wait);
        }
        self.state = SchedulerState::Running;
    }

    fn run_timelapse(&mut self, interval: Duration) {
        log_block_start!("Timelapse running until {}", self.local_time(self.plan.end_time));

        loop {
            let now = self.clock.now();
            if now >= self.plan.end_time {
                break;
            }

            let cycle_started = self.clock.elapsed();
            let outcome = self.timelapse_cycle(now);
            self.finish_cycle(outcome);

            let elapsed = self.clock.elapsed().saturating_sub(cycle_started);
            match interval.checked_sub(elapsed) {
                Some(remaining) if !remaining.is_zero() => self.clock.sleep(remaining),
                Some(_) => {}
                None => {
                    let message = format!(
                        "Cycle {} took {:.2}s, longer than the {:.2}s interval",
                        self.last_index,
                        elapsed.as_secs_f64(),
                        interval.as_secs_f64()
                    );
                    log_warning!("{message}");
                    self.log_event(&message);
                }
            }
        }
    }

    fn timelapse_cycle(&mut self, now: DateTime<Utc>) -> CycleOutcome {
        let index = self.next_index();

        let result = AltitudeSample::take(self.oracle, &self.plan.location, now).and_then(
            |sample| {
                let settings = self.engine.settings_for(sample.degrees)?;
                Ok((sample, settings))
            },
        );

        match result {
            Ok((sample, settings)) => self.capture(CaptureRecord::new(
                index,
                now,
                Some(sample.degrees),
                settings,
            )),
            Err(error) => skipped(index, now, error),
        }
    }

    fn run_star_trails(&mut self, exposure: f64, gap: f64, iso: u32) {
        let total = self.plan.star_trail_frames().unwrap_or(0);
        log_block_start!(
            "Star trails: {total} exposures of {} with {gap}s gaps",
            format_shutter(exposure)
        );

        let gap = Duration::from_secs_f64(gap);
        for iteration in 0..total {
            let now = self.clock.now();
            let index = self.next_index();

            let outcome = match self.engine.fixed_settings(exposure, iso) {
                Ok(settings) => {
                    // Altitude is informational only for star trails
                    let altitude = self
                        .oracle
                        .altitude(
                            self.plan.location.latitude,
                            self.plan.location.longitude,
                            now,
                        )
                        .ok();
                    self.capture(CaptureRecord::new(index, now, altitude, settings))
                }
                Err(error) => skipped(index, now, error.into()),
            };
            self.finish_cycle(outcome);

            if iteration + 1 < total && !gap.is_zero() {
                self.clock.sleep(gap);
            }
        }
    }

    fn next_index(&mut self) -> u32 {
        self.last_index += 1;
        self.last_index
    }

    fn capture(&mut self, record: CaptureRecord) -> CycleOutcome {
        let request = CaptureRequest {
            sequence_index: record.sequence_index,
            settings: record.settings(),
        };

        match self.driver.capture(&request) {
            Ok(result) => {
                if !result.saved_files.is_empty() {
                    log_indented!("Saved {}", result.saved_files.join(", "));
                }
                CycleOutcome::Captured(record)
            }
            Err(e) => CycleOutcome::CaptureFailed {
                record,
                error: CycleError::Capture(e),
            },
        }
    }

    fn finish_cycle(&mut self, outcome: CycleOutcome) {
        match &outcome {
            CycleOutcome::Captured(record) => {
                let message = describe(record);
                log_decorated!("{message}");
                self.log_event(&message);
            }
            CycleOutcome::CaptureFailed { record, error } => {
                let message = format!("{}: {error}", describe(record));
                log_error!("{message}");
                self.log_event(&message);
            }
            CycleOutcome::Skipped(skipped) => {
                let message = format!(
                    "Image {} skipped: {}",
                    skipped.sequence_index, skipped.error
                );
                log_warning!("{message}");
                self.log_event(&message);
            }
        }

        let index = outcome.sequence_index();
        self.report.push(outcome);

        if index % BATTERY_CHECK_EVERY == 0 {
            self.check_battery();
        }
    }

    fn check_battery(&mut self) {
        let Some(level) = self.driver.battery_level() else {
            return;
        };

        let message = format!("Battery: {level}%");
        self.log_event(&message);
        if level < LOW_BATTERY_PERCENT {
            log_warning!("Battery low: {level}%");
        } else {
            log_indented!("{message}");
        }
    }

    fn log_event(&mut self, message: &str) {
        let now = self.clock.now();
        self.log.append(now, message);
    }

    fn local_time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.plan.location.timezone)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}

fn skipped(index: u32, now: DateTime<Utc>, error: CycleError) -> CycleOutcome {
    CycleOutcome::Skipped(SkippedCycle {
        sequence_index: index,
        wall_clock_time: now,
        error,
    })
}

fn describe(record: &CaptureRecord) -> String {
    let settings: CameraSettings = record.settings();
    match record.altitude {
        Some(altitude) => format!(
            "Image {}: altitude {altitude:.2}°, {} at ISO {}",
            record.sequence_index,
            format_shutter(settings.shutter_seconds),
            settings.iso
        ),
        None => format!(
            "Image {}: {} at ISO {}",
            record.sequence_index,
            format_shutter(settings.shutter_seconds),
            settings.iso
        ),
    }
}
