// src/engine/core.rs

//! Pure core orchestrator state machine.
//!
//! This module contains a synchronous, deterministic core that consumes
//! [`CoreEvent`]s and produces:
//! - an updated core state
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - running debounce timers
//! - sending requests to the compile backend
//! - driving the presenter
//!
//! The core is intended to be extensively tested without any Tokio,
//! channels, network or files.

use crate::engine::debounce::Debouncer;
use crate::engine::event_handlers::{
    handle_compile_finished, handle_debounce_elapsed, handle_document_changed,
    handle_preview_failed, CoreCommand, CoreStep,
};
use crate::engine::tracker::RequestTracker;
use crate::engine::{CoreEvent, OrchestratorOptions, OrchestratorState};
use crate::compile::CompileRequest;
use crate::store::Document;

/// Pure core orchestrator state.
///
/// This owns:
/// - the latest document seen
/// - the debouncer
/// - the request tracker (sequence numbers, last compiled snapshot)
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreOrchestrator {
    document: Document,
    debouncer: Debouncer,
    tracker: RequestTracker,
    options: OrchestratorOptions,
}

impl CoreOrchestrator {
    pub fn new(document: Document, options: OrchestratorOptions) -> Self {
        Self {
            document,
            debouncer: Debouncer::new(),
            tracker: RequestTracker::new(),
            options,
        }
    }

    /// Treat the initially loaded document as a mutation: start the first
    /// debounce cycle.
    pub fn start(&mut self) -> CoreStep {
        let document = self.document.clone();
        handle_document_changed(&mut self.document, &mut self.debouncer, &self.options, document)
    }

    pub fn state(&self) -> OrchestratorState {
        match (self.debouncer.is_armed(), self.tracker.is_in_flight()) {
            (false, false) => OrchestratorState::Idle,
            (true, false) => OrchestratorState::Pending,
            (false, true) => OrchestratorState::InFlight,
            (true, true) => OrchestratorState::InFlightPendingAgain,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Snapshot of the last successfully applied compile (for tests).
    pub fn last_compiled(&self) -> Option<&CompileRequest> {
        self.tracker.last_compiled()
    }

    /// Handle a single event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: CoreEvent) -> CoreStep {
        match event {
            CoreEvent::DocumentChanged(document) => handle_document_changed(
                &mut self.document,
                &mut self.debouncer,
                &self.options,
                document,
            ),
            CoreEvent::DebounceElapsed { generation } => handle_debounce_elapsed(
                &self.document,
                &mut self.debouncer,
                &mut self.tracker,
                &self.options,
                generation,
            ),
            CoreEvent::CompileFinished { seq, result } => handle_compile_finished(
                &self.debouncer,
                &mut self.tracker,
                &self.options,
                seq,
                result,
            ),
            CoreEvent::PreviewFailed => handle_preview_failed(&mut self.tracker),
            CoreEvent::ShutdownRequested => {
                self.debouncer.cancel();
                CoreStep {
                    commands: vec![CoreCommand::RequestExit],
                    keep_running: false,
                }
            }
        }
    }
}
