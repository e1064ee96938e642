//! Clock and sleeper abstraction shared by real and simulated sessions.

pub mod source;

pub use source::{RealTimeSource, SimulatedTimeSource, TimeSource};
