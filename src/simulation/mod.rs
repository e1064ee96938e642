//! Dry-run sessions.
//!
//! The recorder runs the same per-cycle computation as the scheduler but with
//! synthetic timestamps (`start + cadence × (index - 1)`), no sleeping and no
//! capture. Records are produced lazily, and every call to
//! [`SimulationRecorder::records`] starts a fresh pass from the first frame.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::time::Duration;

use crate::core::{CaptureMode, CaptureRecord, SessionPlan, SkippedCycle};
use crate::error::CycleError;
use crate::exposure::ExposureEngine;
use crate::geo::{AltitudeOracle, AltitudeSample};

/// Header row of the simulation CSV.
pub const CSV_HEADER: [&str; 7] = [
    "Image", "Time", "Altitude", "Shutter", "ISO", "Focal", "Aperture",
];

/// One simulated cycle: a record, or the reason it would have been skipped.
pub type SimulatedCycle = Result<CaptureRecord, SkippedCycle>;

pub struct SimulationRecorder<'a> {
    plan: &'a SessionPlan,
    engine: &'a ExposureEngine,
    oracle: &'a dyn AltitudeOracle,
}

impl<'a> SimulationRecorder<'a> {
    pub fn new(
        plan: &'a SessionPlan,
        engine: &'a ExposureEngine,
        oracle: &'a dyn AltitudeOracle,
    ) -> Self {
        Self {
            plan,
            engine,
            oracle,
        }
    }

    /// A lazy pass over every cycle of the session.
    pub fn records(&self) -> SimulatedRecords<'a> {
        let (cadence, limit) = match self.plan.mode {
            CaptureMode::Timelapse { interval } => (interval, None),
            CaptureMode::StarTrails { exposure, gap, .. } => (
                Duration::from_secs_f64(exposure + gap),
                self.plan.star_trail_frames(),
            ),
        };

        SimulatedRecords {
            plan: self.plan,
            engine: self.engine,
            oracle: self.oracle,
            cadence,
            limit,
            next_index: 1,
        }
    }

    /// Write one CSV row per simulated cycle. Returns the number of cycles written.
    ///
    /// A skipped cycle keeps its index and time; its altitude, shutter and ISO
    /// columns are left empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(CSV_HEADER)?;

        let focal = self.plan.lens.focal_length_mm.to_string();
        let aperture = self.plan.lens.aperture.to_string();
        let tz = self.plan.location.timezone;

        let mut rows = 0;
        for cycle in self.records() {
            let row = match cycle {
                Ok(record) => [
                    record.sequence_index.to_string(),
                    record.wall_clock_time.with_timezone(&tz).to_rfc3339(),
                    record
                        .altitude
                        .map(|a| format!("{a:.2}"))
                        .unwrap_or_default(),
                    format!("{:.4}", record.shutter_seconds),
                    record.iso.to_string(),
                    focal.clone(),
                    aperture.clone(),
                ],
                Err(skipped) => [
                    skipped.sequence_index.to_string(),
                    skipped.wall_clock_time.with_timezone(&tz).to_rfc3339(),
                    String::new(),
                    String::new(),
                    String::new(),
                    focal.clone(),
                    aperture.clone(),
                ],
            };
            wtr.write_record(&row)
                .context("Failed to write simulation row")?;
            rows += 1;
        }

        wtr.flush().context("Failed to flush simulation log")?;
        Ok(rows)
    }
}

/// Iterator returned by [`SimulationRecorder::records`].
pub struct SimulatedRecords<'a> {
    plan: &'a SessionPlan,
    engine: &'a ExposureEngine,
    oracle: &'a dyn AltitudeOracle,
    cadence: Duration,
    limit: Option<u32>,
    next_index: u32,
}

impl SimulatedRecords<'_> {
    fn timestamp(&self, index: u32) -> Option<DateTime<Utc>> {
        let offset = self.cadence.checked_mul(index - 1)?;
        let offset = chrono::Duration::from_std(offset).ok()?;
        self.plan.start_time.checked_add_signed(offset)
    }

    fn simulate_cycle(&self, index: u32, at: DateTime<Utc>) -> SimulatedCycle {
        let skip = |error: CycleError| SkippedCycle {
            sequence_index: index,
            wall_clock_time: at,
            error,
        };

        match self.plan.mode {
            CaptureMode::Timelapse { .. } => {
                let sample = AltitudeSample::take(self.oracle, &self.plan.location, at)
                    .map_err(skip)?;
                let settings = self
                    .engine
                    .settings_for(sample.degrees)
                    .map_err(|e| skip(e.into()))?;
                Ok(CaptureRecord::new(index, at, Some(sample.degrees), settings))
            }
            CaptureMode::StarTrails { exposure, iso, .. } => {
                let settings = self
                    .engine
                    .fixed_settings(exposure, iso)
                    .map_err(|e| skip(e.into()))?;
                let altitude = self
                    .oracle
                    .altitude(self.plan.location.latitude, self.plan.location.longitude, at)
                    .ok();
                Ok(CaptureRecord::new(index, at, altitude, settings))
            }
        }
    }
}

impl Iterator for SimulatedRecords<'_> {
    type Item = SimulatedCycle;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index;
        if self.cadence.is_zero() || self.limit.is_some_and(|limit| index > limit) {
            return None;
        }

        let at = self.timestamp(index)?;
        if self.limit.is_none() && at >= self.plan.end_time {
            return None;
        }

        self.next_index += 1;
        Some(self.simulate_cycle(index, at))
    }
}
