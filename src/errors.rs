// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Compile failures reported by the remote compiler are *not* errors at this
//! level: they are values ([`crate::compile::CompileError`]) that end up in
//! the diagnostic console. `LivetexError` covers everything that stops the
//! process itself.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LivetexError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Run-once mode finished with a diagnostic instead of an artifact.
    #[error("Compilation failed: {0}")]
    CompileFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LivetexError>;
