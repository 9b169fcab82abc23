// src/input/mod.rs

//! Editor input sources feeding the runtime.
//!
//! - [`watcher`] turns saves of the source file into `SetText` input.
//! - [`commands`] reads `font`/`console`/`quit` commands from stdin.

pub mod commands;
pub mod watcher;

pub use commands::{parse_command, spawn_stdin_commands, Command};
pub use watcher::{spawn_source_watcher, WatcherHandle};
