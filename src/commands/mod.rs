//! Command-line command handlers for dusklapse.
//!
//! Every command loads the configuration (plus any `field=value` overrides)
//! and builds a [`SessionPlan`] from it; they differ in what they do with the plan.

pub mod exposures;
pub mod probe;
pub mod run;
pub mod simulate;

use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;

use crate::args::CommonArgs;
use crate::common::constants::DEFAULT_OUTPUT_DIR;
use crate::config::{self, Config};
use crate::core::SessionPlan;
use crate::device::DeviceCapability;
use crate::exposure::ExposureEngine;

/// Load configuration and build the session plan it describes.
pub(crate) fn load_plan(common: &CommonArgs) -> Result<(Config, SessionPlan)> {
    config::set_config_dir(common.config_dir.clone())?;
    let config = config::load(&common.overrides)?;
    if common.debug_enabled {
        config.log_config();
    }

    let plan = SessionPlan::from_config(&config, Utc::now())?;
    Ok((config, plan))
}

/// Engine for `plan` built on the given capability table.
pub(crate) fn build_engine(
    plan: &SessionPlan,
    capability: DeviceCapability,
) -> Result<ExposureEngine> {
    Ok(ExposureEngine::new(
        plan.curve,
        plan.lens.focal_length_mm,
        plan.trail_rule,
        plan.aggressiveness,
        capability,
        plan.max_iso,
    )?)
}

pub(crate) fn output_dir(config: &Config) -> PathBuf {
    PathBuf::from(config.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR))
}
