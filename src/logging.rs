// src/logging.rs

//! Logging setup for `livetex` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `LIVETEX_LOG` environment variable, as a full filter directive
//!    (e.g. "debug" or "livetex::engine=trace,info")
//! 3. default to `info`
//!
//! Unless `LIVETEX_LOG` says otherwise, the HTTP client stack is capped at
//! `warn` so request plumbing does not drown out compile results.
//!
//! Logs are sent to STDERR, next to the diagnostic console output.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "LIVETEX_LOG";

/// Crates whose logs are capped at `warn` by default.
const NOISY_TARGETS: [&str; 4] = ["hyper", "hyper_util", "reqwest", "rustls"];

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Build the log filter from the CLI level and the `LIVETEX_LOG` value.
///
/// An unparsable environment directive is ignored in favour of the default.
pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return default_filter(level_name(lvl));
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|e| {
            eprintln!("livetex: ignoring invalid {LOG_ENV}={directive:?}: {e}");
            default_filter("info")
        }),
        None => default_filter("info"),
    }
}

fn default_filter(level: &str) -> EnvFilter {
    let mut directives = vec![level.to_string()];
    directives.extend(NOISY_TARGETS.iter().map(|target| format!("{target}=warn")));
    EnvFilter::new(directives.join(","))
}

fn level_name(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
