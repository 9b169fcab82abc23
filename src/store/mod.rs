// src/store/mod.rs

//! Source store: the current document and the only mutation point for user
//! input.
//!
//! - [`kv`] provides the persistent key-value storage the document is loaded
//!   from at startup and written through to on every mutation.
//! - [`SourceStore`] owns the in-memory [`Document`].

pub mod kv;

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::types::RenderOption;

pub use kv::{FileKvStore, KeyValueStore, MemoryKvStore};

/// Persisted key holding the document text.
pub const TEXT_KEY: &str = "editor.text";
/// Persisted key holding the render option name.
pub const RENDER_OPTION_KEY: &str = "editor.render_option";

/// Document shown to a first-time user.
pub const DEFAULT_TEXT: &str = "% Welcome! Start your CV here...\n\\documentclass{article}\n\\begin{document}\nHello World\n\\end{document}";

/// The document being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub render_option: RenderOption,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            render_option: RenderOption::default(),
        }
    }
}

/// Holds the current [`Document`] and persists every mutation.
pub struct SourceStore {
    document: Document,
    kv: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for SourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceStore")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl SourceStore {
    /// Load the saved document, falling back to [`DEFAULT_TEXT`] and
    /// `default_option` for missing or unusable values.
    ///
    /// A saved render option outside the known set is ignored rather than
    /// trusted. Storage read errors are logged and treated as "nothing saved".
    pub fn load(kv: Box<dyn KeyValueStore>, default_option: RenderOption) -> Self {
        let text = match kv.get(TEXT_KEY) {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => DEFAULT_TEXT.to_string(),
            Err(e) => {
                warn!(error = %e, "failed to read saved document text; using default");
                DEFAULT_TEXT.to_string()
            }
        };

        let render_option = match kv.get(RENDER_OPTION_KEY) {
            Ok(Some(saved)) => saved.parse::<RenderOption>().unwrap_or_else(|err| {
                warn!(%err, "ignoring saved render option");
                default_option
            }),
            Ok(None) => default_option,
            Err(e) => {
                warn!(error = %e, "failed to read saved render option; using default");
                default_option
            }
        };

        info!(
            bytes = text.len(),
            %render_option,
            "loaded document"
        );

        Self {
            document: Document {
                text,
                render_option,
            },
            kv,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Replace the document text. Returns `false` when `text` equals the
    /// current text (not a mutation).
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.document.text {
            return false;
        }
        self.document.text = text;
        persist(self.kv.as_mut(), TEXT_KEY, &self.document.text);
        true
    }

    /// Replace the render option. Returns `false` when unchanged.
    pub fn set_render_option(&mut self, option: RenderOption) -> bool {
        if option == self.document.render_option {
            return false;
        }
        self.document.render_option = option;
        persist(self.kv.as_mut(), RENDER_OPTION_KEY, option.as_str());
        true
    }
}

fn persist(kv: &mut dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = kv.set(key, value) {
        warn!(key, error = %e, "failed to persist document change");
    }
}

/// Reconcile the store with a source file on disk.
///
/// - existing file: its contents become the document text;
/// - missing file: it is created from the current document text.
///
/// Returns whether the store's text changed.
pub fn seed_from_source_file(
    store: &mut SourceStore,
    fs: &dyn FileSystem,
    path: &Path,
) -> Result<bool> {
    if fs.exists(path) {
        let contents = fs.read_to_string(path)?;
        let changed = store.set_text(contents);
        debug!(?path, changed, "seeded document from source file");
        Ok(changed)
    } else {
        fs.write(path, store.document().text.as_bytes())?;
        info!(?path, "created source file from saved document");
        Ok(false)
    }
}
