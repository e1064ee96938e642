//! Named shooting locations and custom coordinates.

use chrono_tz::Tz;

use crate::common::constants::DEFAULT_AGGRESSIVENESS;

/// Where the session is shot and how fast exposures ramp there.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
    /// Aggressiveness applied to every phase unless configured otherwise
    pub default_aggressiveness: f64,
}

struct KnownLocation {
    name: &'static str,
    latitude: f64,
    longitude: f64,
    timezone: Tz,
    aggressiveness: f64,
}

// Twilight is shorter near the tropics, so the ramp there is gentler
const KNOWN_LOCATIONS: &[KnownLocation] = &[
    KnownLocation {
        name: "teresin",
        latitude: 52.2202,
        longitude: 20.4366,
        timezone: Tz::Europe__Warsaw,
        aggressiveness: 0.7,
    },
    KnownLocation {
        name: "tivoli",
        latitude: -23.3167,
        longitude: 17.9333,
        timezone: Tz::Africa__Windhoek,
        aggressiveness: 0.5,
    },
];

impl Location {
    /// Look up a built-in location by name (case-insensitive).
    pub fn named(name: &str) -> Option<Self> {
        KNOWN_LOCATIONS
            .iter()
            .find(|known| known.name.eq_ignore_ascii_case(name))
            .map(|known| Self {
                name: known.name.to_string(),
                latitude: known.latitude,
                longitude: known.longitude,
                timezone: known.timezone,
                default_aggressiveness: known.aggressiveness,
            })
    }

    pub fn custom(latitude: f64, longitude: f64, timezone: Tz) -> Self {
        Self {
            name: "custom".to_string(),
            latitude,
            longitude,
            timezone,
            default_aggressiveness: DEFAULT_AGGRESSIVENESS,
        }
    }

    /// Names accepted by [`Location::named`].
    pub fn known_names() -> Vec<&'static str> {
        KNOWN_LOCATIONS.iter().map(|known| known.name).collect()
    }
}
