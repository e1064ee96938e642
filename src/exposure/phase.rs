//! Altitude phase classification.
//!
//! The sky is split into four ordered phases, each carrying its own
//! aggressiveness coefficient. Classification walks a single threshold table
//! sorted from the highest altitude down.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Sun above 6°
    Day,
    /// Sun between 0° (exclusive) and 6°
    LowSun,
    /// Sun between -12° (exclusive) and 0°, civil and nautical twilight together
    Twilight,
    /// Sun at or below -12°
    Night,
}

/// `(exclusive lower bound, phase)`, highest first. Anything not above the last
/// bound is [`Phase::Night`].
const PHASE_THRESHOLDS: [(f64, Phase); 3] = [
    (6.0, Phase::Day),
    (0.0, Phase::LowSun),
    (-12.0, Phase::Twilight),
];

impl Phase {
    pub fn classify(altitude: f64) -> Phase {
        PHASE_THRESHOLDS
            .iter()
            .find(|(bound, _)| altitude > *bound)
            .map(|(_, phase)| *phase)
            .unwrap_or(Phase::Night)
    }

    /// Position of this phase in an aggressiveness tuple.
    pub fn index(self) -> usize {
        match self {
            Phase::Day => 0,
            Phase::LowSun => 1,
            Phase::Twilight => 2,
            Phase::Night => 3,
        }
    }

    /// Pick this phase's coefficient from a per-phase tuple.
    pub fn select(self, coefficients: &[f64; 4]) -> f64 {
        coefficients[self.index()]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Day => "day",
            Phase::LowSun => "low sun",
            Phase::Twilight => "twilight",
            Phase::Night => "night",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(Phase::classify(45.0), Phase::Day);
        assert_eq!(Phase::classify(6.01), Phase::Day);
        assert_eq!(Phase::classify(6.0), Phase::LowSun);
        assert_eq!(Phase::classify(0.01), Phase::LowSun);
        assert_eq!(Phase::classify(0.0), Phase::Twilight);
        assert_eq!(Phase::classify(-6.0), Phase::Twilight);
        assert_eq!(Phase::classify(-11.99), Phase::Twilight);
        assert_eq!(Phase::classify(-12.0), Phase::Night);
        assert_eq!(Phase::classify(-18.0), Phase::Night);
        assert_eq!(Phase::classify(-90.0), Phase::Night);
    }

    #[test]
    fn test_nautical_twilight_shares_civil_phase() {
        assert_eq!(Phase::classify(-3.0), Phase::classify(-9.0));
    }

    #[test]
    fn test_select_uses_phase_index() {
        let coefficients = [0.9, 0.8, 0.7, 0.6];
        assert_eq!(Phase::Day.select(&coefficients), 0.9);
        assert_eq!(Phase::LowSun.select(&coefficients), 0.8);
        assert_eq!(Phase::Twilight.select(&coefficients), 0.7);
        assert_eq!(Phase::Night.select(&coefficients), 0.6);
    }

    #[test]
    fn test_nan_altitude_is_night() {
        assert_eq!(Phase::classify(f64::NAN), Phase::Night);
    }
}
