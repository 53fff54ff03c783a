// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file and return the raw, unvalidated form.
///
/// Only TOML deserialization happens here. Use [`load_and_validate`] for
/// anything that is going to talk to AWS.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

pub fn load_from_str(contents: &str) -> Result<RawConfigFile> {
    let config: RawConfigFile = toml::from_str(contents)?;
    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// This is the entry point for the rest of the application. Every check
/// that can fail happens here, before any snapshot activity:
///
/// - provider and resource types are supported,
/// - every tag filter is non-empty and yields at least one condition,
/// - `[backup]` values are in range.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Default config path: `snapctl.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("snapctl.toml")
}
