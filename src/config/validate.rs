// src/config/validate.rs

use reqwest::Url;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LivetexError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::LivetexError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.compile, raw.editor, raw.preview))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_endpoint(&cfg.compile.endpoint)?;
    validate_debounce(cfg)?;
    validate_output_name(&cfg.compile.output_name)?;
    Ok(())
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).map_err(|e| {
        LivetexError::ConfigError(format!(
            "[compile].endpoint is not a valid URL ({endpoint:?}): {e}"
        ))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(LivetexError::ConfigError(format!(
            "[compile].endpoint must use http or https (got scheme '{other}')"
        ))),
    }
}

fn validate_debounce(cfg: &RawConfigFile) -> Result<()> {
    if cfg.compile.debounce_ms == 0 {
        return Err(LivetexError::ConfigError(
            "[compile].debounce_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_output_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LivetexError::ConfigError(
            "[compile].output_name must not be empty".to_string(),
        ));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(LivetexError::ConfigError(format!(
            "[compile].output_name must be a bare file name (got '{name}')"
        )));
    }
    Ok(())
}
