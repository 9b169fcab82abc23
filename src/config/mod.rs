// src/config/mod.rs

//! Configuration loading and validation for livetex.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//! - Validate endpoint, debounce and naming invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{CompileSection, ConfigFile, EditorSection, PreviewSection, RawConfigFile};
