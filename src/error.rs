//! Error types for capture sessions.
//!
//! Errors fall into two groups. [`SessionError`] is fatal and can only occur
//! before a session starts capturing. [`CycleError`] describes a single cycle
//! that could not be completed; the scheduler logs it, consumes the cycle's
//! sequence index and carries on.

use thiserror::Error;

/// Fatal errors raised while building a session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Missing or contradictory session parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The camera reported no usable shutter speeds or ISO values
    #[error("Camera reported no supported {0}")]
    NoDeviceCapabilities(&'static str),
}

/// A cycle that was skipped or whose capture failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CycleError {
    /// The altitude oracle could not produce a sample
    #[error("Sun altitude unavailable: {0}")]
    OracleUnavailable(String),

    /// No device value survived the ceiling filter
    #[error(transparent)]
    NoCandidate(#[from] SnapError),

    /// The camera driver failed to apply settings or capture
    #[error("Capture failed: {0}")]
    Capture(#[from] DriverError),
}

/// Snapping found nothing to choose from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapError {
    #[error("No {kind} at or below {ceiling}")]
    NoCandidate { kind: &'static str, ceiling: f64 },
}

/// Communication failure with the camera.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// The driver process could not be started
    #[error("Failed to run {program}: {reason}")]
    Spawn { program: String, reason: String },

    /// The driver ran but reported failure
    #[error("{command} exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// The driver output could not be understood
    #[error("Unexpected camera response: {0}")]
    Protocol(String),
}
