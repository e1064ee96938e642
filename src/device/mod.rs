//! Camera driver abstraction.
//!
//! The scheduler talks to the camera only through [`DeviceDriver`]. A driver
//! reports which shutter speeds and ISO values the body accepts, performs one
//! best-effort capture per call, and optionally reports its battery level.
//!
//! ## Implementations
//!
//! - [`gphoto2::Gphoto2Driver`]: drives a USB tethered camera through the `gphoto2` CLI
//!
//! Tests substitute a mock or a fixed capability table.

pub mod capability;
pub mod gphoto2;

pub use capability::DeviceCapability;

use crate::error::DriverError;
use crate::exposure::CameraSettings;

/// One capture the scheduler wants taken.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub sequence_index: u32,
    pub settings: CameraSettings,
}

/// What the driver reports back after a capture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureResult {
    /// Files the camera or driver saved for this capture
    pub saved_files: Vec<String>,
}

/// Trait for camera drivers.
///
/// Drivers perform no retries. A failed call is reported once and the
/// scheduler treats the cycle as consumed.
#[cfg_attr(any(test, feature = "testing-support"), mockall::automock)]
pub trait DeviceDriver {
    /// Shutter speeds the camera accepts, in seconds.
    fn supported_shutter_speeds(&mut self) -> Result<Vec<f64>, DriverError>;

    /// ISO values the camera accepts.
    fn supported_iso_values(&mut self) -> Result<Vec<u32>, DriverError>;

    /// Push shutter speed and ISO to the camera without capturing.
    fn apply_settings(&mut self, settings: &CameraSettings) -> Result<(), DriverError>;

    /// Apply `request.settings` and take one exposure.
    fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureResult, DriverError>;

    /// Battery charge in percent, if the camera reports it.
    fn battery_level(&mut self) -> Option<u8> {
        None
    }

    /// Human-readable driver name.
    fn driver_name(&self) -> &'static str;
}
