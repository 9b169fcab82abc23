// src/engine/mod.rs

//! Compile orchestration engine for livetex.
//!
//! This module ties together:
//! - the debounce bookkeeping (when to consider compiling)
//! - the request tracker (which response is authoritative)
//! - the main runtime event loop that reacts to:
//!   - editor input (text, render option, console toggle)
//!   - elapsed debounce timers
//!   - finished compile calls
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::fmt;
use std::time::Duration;

use crate::compile::CompileResult;
use crate::store::Document;
use crate::types::RenderOption;

/// User input reaching the source store.
#[derive(Clone, PartialEq, Eq)]
pub enum EditorInput {
    SetText(String),
    SetRenderOption(RenderOption),
    ToggleConsole,
}

impl fmt::Debug for EditorInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorInput::SetText(text) => f
                .debug_struct("SetText")
                .field("bytes", &text.len())
                .finish(),
            EditorInput::SetRenderOption(opt) => {
                f.debug_tuple("SetRenderOption").field(opt).finish()
            }
            EditorInput::ToggleConsole => f.write_str("ToggleConsole"),
        }
    }
}

/// Events flowing into the runtime from the watcher, stdin, timers and
/// compile calls.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// The user edited something.
    Input(EditorInput),
    /// A debounce timer ran out.
    DebounceElapsed { generation: u64 },
    /// A compile call resolved (current or stale; the core decides).
    CompileFinished { seq: u64, result: CompileResult },
    /// Graceful shutdown requested (e.g. Ctrl-C, `quit`).
    ShutdownRequested,
}

/// Events understood by the pure core.
#[derive(Debug)]
pub enum CoreEvent {
    /// The document changed (after the source store accepted a mutation).
    DocumentChanged(Document),
    DebounceElapsed { generation: u64 },
    CompileFinished { seq: u64, result: CompileResult },
    /// The presenter could not turn the success just applied into a
    /// preview.
    PreviewFailed,
    ShutdownRequested,
}

/// Observable orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    /// A compile is scheduled but not yet sent.
    Pending,
    /// The latest request is outstanding.
    InFlight,
    /// The latest request is outstanding and a newer edit is debouncing.
    InFlightPendingAgain,
}

/// Options used by both the core and the async shell.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorOptions {
    /// Quiet period after the last mutation.
    pub debounce: Duration,
    /// If true, exit once the orchestrator is idle after its first decision
    /// (used for `--once`).
    pub exit_when_idle: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1000),
            exit_when_idle: false,
        }
    }
}

pub mod core;
pub mod debounce;
pub mod event_handlers;
pub mod runtime;
pub mod tracker;

pub use core::CoreOrchestrator;
pub use debounce::Debouncer;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
pub use tracker::{IssuedRequest, Redundancy, RequestTracker, Resolution};
