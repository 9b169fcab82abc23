// src/present/presenter.rs

use tokio::sync::watch;
use tracing::{info, warn};

use crate::compile::CompileOutcome;

use super::artifact::{ArtifactHandle, ArtifactSink};

/// What the UI may show about the current artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactView {
    pub id: u64,
    pub location: String,
    pub len: usize,
}

impl From<&ArtifactHandle> for ArtifactView {
    fn from(handle: &ArtifactHandle) -> Self {
        Self {
            id: handle.id(),
            location: handle.location().to_string(),
            len: handle.len(),
        }
    }
}

/// Read-only observable presentation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewState {
    /// Current preview, if any compile ever succeeded.
    pub artifact: Option<ArtifactView>,
    /// Current diagnostic text; `None` after a success.
    pub diagnostic: Option<String>,
    /// True while the latest issued compile request is outstanding.
    pub compiling: bool,
    /// Diagnostic console visibility. Closed by default, forced open on
    /// failure, user-togglable otherwise.
    pub console_open: bool,
}

/// Owns the live artifact handle and the diagnostic log.
///
/// Every change is published through a `watch` channel; subscribers only
/// ever see locations of handles that are still live.
pub struct Presenter {
    sink: Box<dyn ArtifactSink>,
    current: Option<ArtifactHandle>,
    state_tx: watch::Sender<PreviewState>,
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("current", &self.current)
            .field("state", &*self.state_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl Presenter {
    pub fn new(sink: Box<dyn ArtifactSink>) -> (Self, watch::Receiver<PreviewState>) {
        let (state_tx, state_rx) = watch::channel(PreviewState::default());
        let presenter = Self {
            sink,
            current: None,
            state_tx,
        };
        (presenter, state_rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<PreviewState> {
        self.state_tx.subscribe()
    }

    /// Apply a resolved outcome. Returns `true` when a new preview was
    /// installed; a success whose preview could not be created returns
    /// `false` and is shown as a failure.
    pub fn present(&mut self, outcome: CompileOutcome) -> bool {
        match outcome {
            CompileOutcome::Success(artifact) => match self.sink.create(&artifact) {
                Ok(handle) => {
                    self.install(handle);
                    true
                }
                Err(e) => {
                    warn!(error = %e, "failed to create preview from artifact");
                    self.show_failure(format!("Failed to prepare preview: {e}"));
                    false
                }
            },
            CompileOutcome::Failure(err) => {
                warn!(kind = err.kind(), "compile failed; keeping last good preview");
                self.show_failure(err.to_string());
                false
            }
        }
    }

    /// Swap in the new handle, publish it, then release the previous one.
    fn install(&mut self, handle: ArtifactHandle) {
        let view = ArtifactView::from(&handle);
        let previous = self.current.replace(handle);

        info!(id = view.id, location = %view.location, bytes = view.len, "preview updated");
        self.state_tx.send_modify(|state| {
            state.artifact = Some(view);
            state.diagnostic = None;
        });

        drop(previous);
    }

    fn show_failure(&mut self, text: String) {
        self.state_tx.send_modify(|state| {
            state.diagnostic = Some(text);
            state.console_open = true;
        });
    }

    pub fn set_compiling(&mut self, compiling: bool) {
        self.state_tx.send_if_modified(|state| {
            let changed = state.compiling != compiling;
            state.compiling = compiling;
            changed
        });
    }

    pub fn toggle_console(&mut self) {
        self.state_tx
            .send_modify(|state| state.console_open = !state.console_open);
    }

    pub fn current_handle(&self) -> Option<&ArtifactHandle> {
        self.current.as_ref()
    }

    pub fn diagnostic(&self) -> Option<String> {
        self.state_tx.borrow().diagnostic.clone()
    }

    pub fn state(&self) -> PreviewState {
        self.state_tx.borrow().clone()
    }

    /// Take the live handle out of the presenter (e.g. at shutdown, to keep
    /// the final preview). The published state is cleared accordingly.
    pub fn take_artifact(&mut self) -> Option<ArtifactHandle> {
        let handle = self.current.take();
        if handle.is_some() {
            self.state_tx.send_modify(|state| state.artifact = None);
        }
        handle
    }
}
