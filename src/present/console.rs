// src/present/console.rs

//! Terminal rendering of [`PreviewState`] for the `livetex` binary.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::presenter::PreviewState;

/// Spawn a task that renders preview state changes until the presenter is
/// dropped.
///
/// Preview updates and the compiling flag go to the log; the diagnostic is
/// printed to stderr whenever the console is (or becomes) open.
pub fn spawn_console_reporter(mut state_rx: watch::Receiver<PreviewState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last = state_rx.borrow_and_update().clone();

        while state_rx.changed().await.is_ok() {
            let state = state_rx.borrow_and_update().clone();
            render_change(&last, &state);
            last = state;
        }

        debug!("console reporter finished (presenter dropped)");
    })
}

fn render_change(previous: &PreviewState, current: &PreviewState) {
    if current.compiling && !previous.compiling {
        info!("compiling...");
    }

    if current.artifact != previous.artifact {
        if let Some(ref view) = current.artifact {
            info!(location = %view.location, "preview ready");
        }
    }

    let console_opened = current.console_open && !previous.console_open;
    let diagnostic_changed = current.diagnostic != previous.diagnostic;
    if current.console_open && (console_opened || diagnostic_changed) {
        eprintln!("{}", console_text(current));
    }
}

/// Text shown in the diagnostic console.
pub fn console_text(state: &PreviewState) -> String {
    match state.diagnostic {
        Some(ref text) => format!("---- compiler log ----\n{text}\n----------------------"),
        None => "Build Successful. No errors reported.".to_string(),
    }
}
