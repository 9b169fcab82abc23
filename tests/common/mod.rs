#![allow(dead_code)]

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use livetex::compile::CompilerBackend;
use livetex::engine::{CoreOrchestrator, OrchestratorOptions, Runtime, RuntimeEvent};
use livetex::errors::Result;
use livetex::present::{ArtifactSink, MemoryArtifactSink, Presenter, PreviewState};
use livetex::store::{MemoryKvStore, SourceStore, RENDER_OPTION_KEY, TEXT_KEY};
use livetex::types::RenderOption;

/// A runtime running in the background of a test.
pub struct Harness {
    pub tx: mpsc::Sender<RuntimeEvent>,
    pub preview: watch::Receiver<PreviewState>,
    pub sink: MemoryArtifactSink,
    pub kv: MemoryKvStore,
    pub join: JoinHandle<Result<Presenter>>,
}

/// Start a runtime whose saved document is `text` / `option`.
pub fn start_runtime<C>(
    text: &str,
    option: RenderOption,
    compiler: C,
    options: OrchestratorOptions,
) -> Harness
where
    C: CompilerBackend + 'static,
{
    let sink = MemoryArtifactSink::new();
    let (tx, preview, kv, join) =
        spawn_runtime(text, option, compiler, options, Box::new(sink.clone()));

    Harness {
        tx,
        preview,
        sink,
        kv,
        join,
    }
}

/// Like [`start_runtime`], presenting into the given sink.
pub fn spawn_runtime<C>(
    text: &str,
    option: RenderOption,
    compiler: C,
    options: OrchestratorOptions,
    sink: Box<dyn ArtifactSink>,
) -> (
    mpsc::Sender<RuntimeEvent>,
    watch::Receiver<PreviewState>,
    MemoryKvStore,
    JoinHandle<Result<Presenter>>,
)
where
    C: CompilerBackend + 'static,
{
    let kv = MemoryKvStore::new()
        .with(TEXT_KEY, text)
        .with(RENDER_OPTION_KEY, option.as_str());
    let store = SourceStore::load(Box::new(kv.clone()), RenderOption::default());

    let (presenter, preview) = Presenter::new(sink);

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);
    let core = CoreOrchestrator::new(store.document().clone(), options);
    let runtime = Runtime::new(core, store, presenter, compiler, tx.clone(), rx);

    (tx, preview, kv, tokio::spawn(runtime.run()))
}
