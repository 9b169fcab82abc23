// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Like [`load_from_path`], but a missing file yields the built-in defaults.
///
/// The editor is usable without any config; only a file that exists and
/// fails to parse is an error.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    if !path.exists() {
        info!(?path, "config file not found; using defaults");
        return Ok(RawConfigFile::default());
    }
    load_from_path(path)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}
