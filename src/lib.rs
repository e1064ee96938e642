//! # Dusklapse Library
//!
//! Internal library for the dusklapse binary application.
//!
//! This library exists to enable testing of the session internals and provide
//! clean separation between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Exposure**: `exposure` maps a sun altitude to device-legal shutter and ISO
//! - **Scheduling**: `core` holds the session plan and the capture state machine
//! - **Devices**: `device` with the `DeviceDriver` seam and the gphoto2 driver
//! - **Geographic**: `geo` for named locations and solar altitude
//! - **Configuration**: `config` for TOML settings with command-line overrides
//! - **Commands**: `commands` for the CLI subcommands (run, simulate, probe, exposures)
//! - **Infrastructure**: `time` clocks, `io` session log, `simulation` CSV dry runs

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

pub mod args;
pub mod commands;
pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod exposure;
pub mod geo;
pub mod io;
pub mod simulation;
pub mod time;
