//! Sun position for a shooting location.
//!
//! ## Module Structure
//!
//! - [`locations`]: built-in shooting locations and custom coordinates
//! - [`solar`]: solar altitude at an instant and daily sunrise/sunset

pub mod locations;
pub mod solar;

pub use locations::Location;
pub use solar::{AltitudeOracle, SolarAltitude, day_events};

use chrono::{DateTime, Utc};

use crate::error::CycleError;

/// One altitude reading, consumed by a single capture cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeSample {
    pub degrees: f64,
    pub timestamp: DateTime<Utc>,
}

impl AltitudeSample {
    /// Ask `oracle` for the altitude at `location` and `at`.
    pub fn take(
        oracle: &dyn AltitudeOracle,
        location: &Location,
        at: DateTime<Utc>,
    ) -> Result<Self, CycleError> {
        let degrees = oracle.altitude(location.latitude, location.longitude, at)?;
        Ok(Self {
            degrees,
            timestamp: at,
        })
    }
}
