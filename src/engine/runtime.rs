// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::compile::{CompileRequest, CompilerBackend};
use crate::errors::Result;
use crate::present::Presenter;
use crate::store::{Document, SourceStore};

use super::core::CoreOrchestrator;
use super::{CoreCommand, CoreEvent, CoreStep, EditorInput, RuntimeEvent};

/// Drives the core orchestrator in response to `RuntimeEvent`s.
///
/// This is the IO shell around `CoreOrchestrator`, which contains all the
/// orchestration semantics. This struct owns the single execution context
/// in which the source store, the core and the presenter are mutated:
/// timers and compile calls run as separate tasks and only ever report back
/// through the event channel.
pub struct Runtime<C: CompilerBackend> {
    core: CoreOrchestrator,
    store: SourceStore,
    presenter: Presenter,
    compiler: C,
    event_tx: mpsc::Sender<RuntimeEvent>,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    debounce_timer: Option<JoinHandle<()>>,
}

impl<C: CompilerBackend> fmt::Debug for Runtime<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("store", &self.store)
            .field("presenter", &self.presenter)
            .finish_non_exhaustive()
    }
}

impl<C: CompilerBackend> Runtime<C> {
    /// `event_tx` must feed `event_rx`; the runtime hands clones of it to
    /// timer and compile tasks.
    pub fn new(
        core: CoreOrchestrator,
        store: SourceStore,
        presenter: Presenter,
        compiler: C,
        event_tx: mpsc::Sender<RuntimeEvent>,
        event_rx: mpsc::Receiver<RuntimeEvent>,
    ) -> Self {
        Self {
            core,
            store,
            presenter,
            compiler,
            event_tx,
            event_rx,
            debounce_timer: None,
        }
    }

    /// Main event loop.
    ///
    /// - Starts the first debounce cycle for the loaded document.
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core and executes the returned commands.
    ///
    /// Returns the presenter so the caller can decide what happens to the
    /// final preview.
    pub async fn run(mut self) -> Result<Presenter> {
        info!("livetex runtime started");

        let step = self.core.start();
        let mut keep_running = self.execute_step(step);

        while keep_running {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, state = ?self.core.state(), "runtime received event");

            let step = match event {
                RuntimeEvent::Input(input) => match self.apply_input(input) {
                    Some(document) => self.core.step(CoreEvent::DocumentChanged(document)),
                    None => continue,
                },
                RuntimeEvent::DebounceElapsed { generation } => {
                    self.core.step(CoreEvent::DebounceElapsed { generation })
                }
                RuntimeEvent::CompileFinished { seq, result } => {
                    self.core.step(CoreEvent::CompileFinished { seq, result })
                }
                RuntimeEvent::ShutdownRequested => self.core.step(CoreEvent::ShutdownRequested),
            };

            keep_running = self.execute_step(step);
            if !keep_running {
                info!("core requested exit; stopping runtime");
            }
        }

        if let Some(timer) = self.debounce_timer.take() {
            timer.abort();
        }

        info!("runtime exiting");
        Ok(self.presenter)
    }

    /// Apply editor input to the source store. Returns the new document when
    /// the input was a real mutation.
    fn apply_input(&mut self, input: EditorInput) -> Option<Document> {
        let changed = match input {
            EditorInput::SetText(text) => self.store.set_text(text),
            EditorInput::SetRenderOption(option) => {
                let changed = self.store.set_render_option(option);
                if changed {
                    info!(%option, "render option changed");
                }
                changed
            }
            EditorInput::ToggleConsole => {
                self.presenter.toggle_console();
                false
            }
        };

        changed.then(|| self.store.document().clone())
    }

    fn execute_step(&mut self, step: CoreStep) -> bool {
        for command in step.commands {
            self.execute_command(command);
        }
        step.keep_running
    }

    /// Execute a single command from the core.
    fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::ScheduleDebounce { generation, delay } => {
                self.schedule_debounce(generation, delay);
            }
            CoreCommand::SendCompile { seq, request } => {
                self.send_compile(seq, request);
            }
            CoreCommand::Present(outcome) => {
                let success = outcome.is_success();
                if !self.presenter.present(outcome) && success {
                    let step = self.core.step(CoreEvent::PreviewFailed);
                    self.execute_step(step);
                }
            }
            CoreCommand::SetCompiling(compiling) => {
                self.presenter.set_compiling(compiling);
            }
            CoreCommand::RequestExit => {
                info!("core issued RequestExit command");
            }
        }
    }

    /// Cancel the pending timer (if any) and start a new one.
    fn schedule_debounce(&mut self, generation: u64, delay: Duration) {
        if let Some(previous) = self.debounce_timer.take() {
            previous.abort();
        }

        let tx = self.event_tx.clone();
        self.debounce_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(RuntimeEvent::DebounceElapsed { generation }).await;
        }));
    }

    /// Spawn the compile call. It is never cancelled; the core drops its
    /// result if a newer request was issued in the meantime.
    fn send_compile(&mut self, seq: u64, request: CompileRequest) {
        let future = self.compiler.compile(request);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let result = future.await;
            debug!(seq, ok = result.is_ok(), "compile call resolved");
            if tx
                .send(RuntimeEvent::CompileFinished { seq, result })
                .await
                .is_err()
            {
                debug!(seq, "runtime gone before compile call resolved");
            }
        });
    }
}
