//! Per-cycle records and the session report built from them.

use chrono::{DateTime, Utc};

use crate::error::CycleError;
use crate::exposure::CameraSettings;

/// What one capture cycle decided, created once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRecord {
    pub sequence_index: u32,
    pub wall_clock_time: DateTime<Utc>,
    /// `None` for star trail frames taken while the oracle was unavailable
    pub altitude: Option<f64>,
    pub shutter_seconds: f64,
    pub iso: u32,
}

impl CaptureRecord {
    pub fn new(
        sequence_index: u32,
        wall_clock_time: DateTime<Utc>,
        altitude: Option<f64>,
        settings: CameraSettings,
    ) -> Self {
        Self {
            sequence_index,
            wall_clock_time,
            altitude,
            shutter_seconds: settings.shutter_seconds,
            iso: settings.iso,
        }
    }

    pub fn settings(&self) -> CameraSettings {
        CameraSettings {
            shutter_seconds: self.shutter_seconds,
            iso: self.iso,
        }
    }
}

/// A cycle that produced no settings. Its index is still consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCycle {
    pub sequence_index: u32,
    pub wall_clock_time: DateTime<Utc>,
    pub error: CycleError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Captured(CaptureRecord),
    CaptureFailed {
        record: CaptureRecord,
        error: CycleError,
    },
    Skipped(SkippedCycle),
}

impl CycleOutcome {
    pub fn sequence_index(&self) -> u32 {
        match self {
            CycleOutcome::Captured(record) | CycleOutcome::CaptureFailed { record, .. } => {
                record.sequence_index
            }
            CycleOutcome::Skipped(skipped) => skipped.sequence_index,
        }
    }

    pub fn record(&self) -> Option<&CaptureRecord> {
        match self {
            CycleOutcome::Captured(record) | CycleOutcome::CaptureFailed { record, .. } => {
                Some(record)
            }
            CycleOutcome::Skipped(_) => None,
        }
    }
}

/// Every cycle outcome of a session, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionReport {
    pub outcomes: Vec<CycleOutcome>,
}

impl SessionReport {
    pub fn push(&mut self, outcome: CycleOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn captured(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CycleOutcome::Captured(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CycleOutcome::CaptureFailed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CycleOutcome::Skipped(_)))
            .count()
    }

    pub fn records(&self) -> impl Iterator<Item = &CaptureRecord> {
        self.outcomes.iter().filter_map(CycleOutcome::record)
    }
}
