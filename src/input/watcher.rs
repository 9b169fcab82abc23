// src/input/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::{EditorInput, RuntimeEvent};
use crate::fs::FileSystem;

/// Handle for the source file watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `source` and send its new contents as `EditorInput::SetText`
/// whenever it changes.
///
/// The parent directory is watched (non-recursively) rather than the file
/// itself, because many editors save by writing a temporary file and
/// renaming it over the original. Unchanged contents are filtered later by
/// the source store.
pub fn spawn_source_watcher(
    source: impl Into<PathBuf>,
    fs: Arc<dyn FileSystem>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let source = source.into();
    let source = source.canonicalize().unwrap_or(source);
    let dir = match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("livetex: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("livetex: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching directory {:?}", dir))?;

    info!(path = ?source, "watching source file");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !is_content_event(&event.kind) || !touches(&event, &source) {
                continue;
            }
            debug!(kind = ?event.kind, "source file event");

            match fs.read_to_string(&source) {
                Ok(text) => {
                    let input = RuntimeEvent::Input(EditorInput::SetText(text));
                    if runtime_tx.send(input).await.is_err() {
                        break;
                    }
                }
                // Mid-save (file briefly missing); a later event carries the
                // final contents.
                Err(e) => debug!(error = %e, "source file not readable yet"),
            }
        }
        debug!("source watcher loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

fn is_content_event(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

fn touches(event: &Event, source: &Path) -> bool {
    event.paths.iter().any(|p| {
        p == source || (p.file_name().is_some() && p.file_name() == source.file_name())
    })
}
