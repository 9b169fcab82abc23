// src/present/mod.rs

//! Artifact presenter.
//!
//! - [`artifact`]: the revocable [`ArtifactHandle`] and the sinks creating
//!   handles (preview files, in-memory blobs).
//! - [`presenter`]: the [`Presenter`], sole owner of the live handle and of
//!   the diagnostic text, publishing [`PreviewState`].
//! - [`console`]: terminal rendering of the published state.

pub mod artifact;
pub mod console;
pub mod presenter;

pub use artifact::{ArtifactHandle, ArtifactSink, FileArtifactSink, MemoryArtifactSink};
pub use console::{console_text, spawn_console_reporter};
pub use presenter::{ArtifactView, Presenter, PreviewState};
