// src/engine/event_handlers.rs

//! Event handling logic for the core orchestrator.

use std::time::Duration;

use tracing::{debug, info};

use crate::compile::{classify, CompileOutcome, CompileRequest, CompileResult};
use crate::engine::debounce::Debouncer;
use crate::engine::tracker::{Redundancy, RequestTracker, Resolution};
use crate::engine::OrchestratorOptions;
use crate::store::Document;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Cancel any running debounce timer and start a new one.
    ScheduleDebounce { generation: u64, delay: Duration },
    /// Send this request to the compile backend, tagged with `seq`.
    SendCompile { seq: u64, request: CompileRequest },
    /// Hand the outcome to the presenter.
    Present(CompileOutcome),
    /// Update the presenter's `compiling` flag.
    SetCompiling(bool),
    /// Request that the process exits (used for `--once` when idle).
    RequestExit,
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Handle a document mutation: remember the new document and restart the
/// quiet period.
///
/// An in-flight request is left alone; its response is dropped later if
/// this edit leads to a newer request.
pub fn handle_document_changed(
    current: &mut Document,
    debouncer: &mut Debouncer,
    options: &OrchestratorOptions,
    document: Document,
) -> CoreStep {
    *current = document;
    let generation = debouncer.arm();

    debug!(generation, delay = ?options.debounce, "document changed; debounce restarted");

    CoreStep::running(vec![CoreCommand::ScheduleDebounce {
        generation,
        delay: options.debounce,
    }])
}

/// Handle an elapsed debounce timer.
///
/// - A timer from an older generation is ignored.
/// - A snapshot equal to the last compiled one (or to the request already
///   in flight) is not sent. Returning to the last compiled snapshot also
///   supersedes any request still in flight.
/// - Otherwise a new request is issued and becomes the authoritative one.
pub fn handle_debounce_elapsed(
    document: &Document,
    debouncer: &mut Debouncer,
    tracker: &mut RequestTracker,
    options: &OrchestratorOptions,
    generation: u64,
) -> CoreStep {
    if !debouncer.fire(generation) {
        debug!(generation, "ignoring superseded debounce timer");
        return CoreStep::running(Vec::new());
    }

    let candidate = CompileRequest::snapshot(document);

    if let Some(reason) = tracker.redundancy(&candidate) {
        debug!(?reason, "document unchanged since last compile; not sending");
        let mut commands = Vec::new();
        // Back at the applied snapshot: whatever is still in flight no
        // longer matches the document.
        if reason == Redundancy::LastCompiled {
            if let Some(seq) = tracker.supersede_in_flight() {
                debug!(seq, "in-flight request superseded by last compiled snapshot");
                commands.push(CoreCommand::SetCompiling(false));
            }
        }
        let keep_running = maybe_exit(debouncer, tracker, options, &mut commands);
        return CoreStep {
            commands,
            keep_running,
        };
    }

    let seq = tracker.issue(candidate.clone());
    info!(
        seq,
        bytes = candidate.text.len(),
        render_option = %candidate.render_option,
        outstanding = tracker.outstanding(),
        "sending compile request"
    );

    CoreStep::running(vec![
        CoreCommand::SetCompiling(true),
        CoreCommand::SendCompile {
            seq,
            request: candidate,
        },
    ])
}

/// Handle a finished compile call.
///
/// Only the response to the latest issued request is classified and
/// applied; anything else is dropped silently, success or failure alike.
pub fn handle_compile_finished(
    debouncer: &Debouncer,
    tracker: &mut RequestTracker,
    options: &OrchestratorOptions,
    seq: u64,
    result: CompileResult,
) -> CoreStep {
    let mut commands = Vec::new();

    match tracker.resolve(seq) {
        Resolution::Stale => {
            debug!(
                seq,
                latest = ?tracker.latest_seq(),
                "dropping stale compile response"
            );
        }
        Resolution::Current(request) => {
            let outcome = classify(result);
            match outcome {
                CompileOutcome::Success(ref artifact) => {
                    info!(seq, bytes = artifact.bytes.len(), "compile succeeded");
                    tracker.record_success(request);
                }
                CompileOutcome::Failure(ref err) => {
                    info!(seq, kind = err.kind(), "compile failed");
                }
            }
            commands.push(CoreCommand::Present(outcome));
            commands.push(CoreCommand::SetCompiling(false));
        }
    }

    let keep_running = maybe_exit(debouncer, tracker, options, &mut commands);
    CoreStep {
        commands,
        keep_running,
    }
}

/// Handle a success the presenter could not display: forget its snapshot so
/// the same document is compiled again on the next cycle.
pub fn handle_preview_failed(tracker: &mut RequestTracker) -> CoreStep {
    match tracker.revert_success() {
        Some(request) => info!(
            bytes = request.text.len(),
            render_option = %request.render_option,
            "preview not created; snapshot no longer counts as compiled"
        ),
        None => debug!("preview failure with no recorded success"),
    }
    CoreStep::running(Vec::new())
}

/// In `--once` mode, stop as soon as nothing is pending or in flight.
fn maybe_exit(
    debouncer: &Debouncer,
    tracker: &RequestTracker,
    options: &OrchestratorOptions,
    commands: &mut Vec<CoreCommand>,
) -> bool {
    if options.exit_when_idle && !debouncer.is_armed() && !tracker.is_in_flight() {
        commands.push(CoreCommand::RequestExit);
        return false;
    }
    true
}
