// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::model::RawConfigFile;
use crate::types::RenderOption;

/// Command-line arguments for `livetex`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "livetex",
    version,
    about = "Edit LaTeX source and keep a compiled PDF preview up to date.",
    long_about = None
)]
pub struct CliArgs {
    /// Source file to watch. Its contents replace the saved document text.
    ///
    /// Overrides `[editor].source` from the config file.
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Path to the config file (TOML).
    ///
    /// A missing file means "use the built-in defaults".
    #[arg(long, value_name = "PATH", default_value = "Livetex.toml")]
    pub config: String,

    /// Compile endpoint URL (overrides `[compile].endpoint`).
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Render option / main font, e.g. "Liberation Serif".
    #[arg(long, value_name = "NAME")]
    pub font: Option<RenderOption>,

    /// Quiet period after the last edit before compiling, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Directory receiving preview PDFs (overrides `[preview].output_dir`).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Compile the current document once and exit.
    #[arg(long)]
    pub once: bool,

    /// Do not read editor commands from stdin.
    #[arg(long)]
    pub no_stdin: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LIVETEX_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load + validate config, print it, but don't compile anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Apply CLI overrides on top of the raw (not yet validated) config, so
    /// that overridden values go through the same validation.
    pub fn apply_overrides(&self, raw: &mut RawConfigFile) {
        if let Some(ref endpoint) = self.endpoint {
            raw.compile.endpoint = endpoint.clone();
        }
        if let Some(ms) = self.debounce_ms {
            raw.compile.debounce_ms = ms;
        }
        if let Some(ref source) = self.source {
            raw.editor.source = Some(source.clone());
        }
        if let Some(ref dir) = self.output_dir {
            raw.preview.output_dir = dir.clone();
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
