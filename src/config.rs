// src/config.rs

//! Configuration loading utilities.
//!
//! Convenience wrappers for loading the application configuration and the
//! locale catalog together at startup.

use std::path::Path;

use crate::error::Result;
use crate::models::{Config, LocaleConfig};

/// Load configuration and locale strings, falling back to defaults when a
/// file is missing or unreadable.
pub fn load_all(config_path: &Path, locale_path: &Path) -> (Config, LocaleConfig) {
    let config = Config::load_or_default(config_path);
    let locale = LocaleConfig::load_or_default(locale_path);
    (config, locale)
}

/// Load and validate the configuration, failing on invalid values.
pub fn load_validated(config_path: &Path) -> Result<Config> {
    let config = Config::load(config_path)?;
    config.validate()?;
    Ok(config)
}
