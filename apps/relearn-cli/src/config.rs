//! CLI configuration loading.

use anyhow::{Context, Result};
use relearn_retrain::{ConfigResult, RelearnConfig};
use std::path::Path;

/// Load configuration and apply environment overrides.
///
/// Precedence for API keys:
/// 1. Environment variables (`RELEARN_*_API_KEY`, `RELEARN_STORAGE_ACCOUNT_KEY`)
/// 2. The configuration file
///
/// Validation is left to each command, which checks only the sections it uses.
pub fn load_config(explicit: Option<&Path>) -> Result<RelearnConfig> {
    let mut config = RelearnConfig::discover(explicit).context("Failed to load configuration")?;
    config.apply_env_overrides();
    Ok(config)
}

/// Attach the common context to a validation failure.
pub fn validated<T>(result: ConfigResult<T>) -> Result<T> {
    result.context("Invalid configuration")
}
