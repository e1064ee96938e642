//! Supported shutter speeds and ISO values for one camera.

use super::DeviceDriver;
use crate::common::constants::{DEFAULT_ISO_VALUES, DEFAULT_SHUTTER_SPEEDS};
use crate::error::SessionError;

/// Ordered, read-only capability table, loaded once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCapability {
    shutter_speeds: Vec<f64>,
    iso_values: Vec<u32>,
}

impl DeviceCapability {
    /// Build a table from raw values. Values are sorted ascending and
    /// deduplicated; non-positive or non-finite shutter speeds are dropped.
    pub fn new(shutter_speeds: Vec<f64>, iso_values: Vec<u32>) -> Result<Self, SessionError> {
        let mut shutter_speeds: Vec<f64> = shutter_speeds
            .into_iter()
            .filter(|s| s.is_finite() && *s > 0.0)
            .collect();
        shutter_speeds.sort_by(f64::total_cmp);
        shutter_speeds.dedup();

        let mut iso_values: Vec<u32> = iso_values.into_iter().filter(|iso| *iso > 0).collect();
        iso_values.sort_unstable();
        iso_values.dedup();

        if shutter_speeds.is_empty() {
            return Err(SessionError::NoDeviceCapabilities("shutter speeds"));
        }
        if iso_values.is_empty() {
            return Err(SessionError::NoDeviceCapabilities("ISO values"));
        }

        Ok(Self {
            shutter_speeds,
            iso_values,
        })
    }

    /// The built-in table used for simulation and probing.
    pub fn default_table() -> Self {
        Self {
            shutter_speeds: DEFAULT_SHUTTER_SPEEDS.to_vec(),
            iso_values: DEFAULT_ISO_VALUES.to_vec(),
        }
    }

    /// Query a driver once. Driver failures surface as missing capabilities.
    pub fn from_driver(driver: &mut dyn DeviceDriver) -> Result<Self, SessionError> {
        let shutter_speeds = driver.supported_shutter_speeds().unwrap_or_else(|e| {
            log_warning!("Could not read shutter speeds: {e}");
            Vec::new()
        });
        let iso_values = driver.supported_iso_values().unwrap_or_else(|e| {
            log_warning!("Could not read ISO values: {e}");
            Vec::new()
        });
        Self::new(shutter_speeds, iso_values)
    }

    pub fn shutter_speeds(&self) -> &[f64] {
        &self.shutter_speeds
    }

    pub fn iso_values(&self) -> &[u32] {
        &self.iso_values
    }

    pub fn min_iso(&self) -> u32 {
        self.iso_values[0]
    }

    pub fn max_iso(&self) -> u32 {
        self.iso_values[self.iso_values.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MockDeviceDriver;
    use crate::error::DriverError;

    #[test]
    fn test_new_sorts_and_dedups() {
        let cap = DeviceCapability::new(vec![2.0, 0.5, 2.0, -1.0, f64::NAN], vec![800, 100, 800])
            .unwrap();
        assert_eq!(cap.shutter_speeds(), &[0.5, 2.0]);
        assert_eq!(cap.iso_values(), &[100, 800]);
        assert_eq!(cap.min_iso(), 100);
        assert_eq!(cap.max_iso(), 800);
    }

    #[test]
    fn test_empty_tables_are_rejected() {
        assert_eq!(
            DeviceCapability::new(vec![], vec![100]),
            Err(SessionError::NoDeviceCapabilities("shutter speeds"))
        );
        assert_eq!(
            DeviceCapability::new(vec![1.0], vec![]),
            Err(SessionError::NoDeviceCapabilities("ISO values"))
        );
    }

    #[test]
    fn test_default_table_is_ascending() {
        let cap = DeviceCapability::default_table();
        assert!(cap.shutter_speeds().windows(2).all(|w| w[0] < w[1]));
        assert!(cap.iso_values().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(cap.max_iso(), 1600);
    }

    #[test]
    fn test_from_driver_failure_means_no_capabilities() {
        crate::common::logger::Log::set_enabled(false);
        let mut driver = MockDeviceDriver::new();
        driver
            .expect_supported_shutter_speeds()
            .returning(|| Err(DriverError::Protocol("no camera".into())));
        driver
            .expect_supported_iso_values()
            .returning(|| Ok(vec![100, 200]));

        assert_eq!(
            DeviceCapability::from_driver(&mut driver),
            Err(SessionError::NoDeviceCapabilities("shutter speeds"))
        );
    }
}
