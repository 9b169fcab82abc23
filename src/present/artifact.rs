// src/present/artifact.rs

//! Artifact handles and the sinks that create them.
//!
//! An [`ArtifactHandle`] is an owned guard: the underlying resource (a
//! preview file, an in-memory blob) is released when the handle is dropped,
//! unless it was explicitly kept with [`ArtifactHandle::keep`].

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::{debug, warn};

use crate::compile::Artifact;
use crate::fs::FileSystem;

type ReleaseFn = Box<dyn FnOnce() + Send>;

/// Revocable reference to a displayable artifact.
pub struct ArtifactHandle {
    id: u64,
    location: String,
    len: usize,
    release: Option<ReleaseFn>,
}

impl ArtifactHandle {
    pub fn new(
        id: u64,
        location: impl Into<String>,
        len: usize,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            id,
            location: location.into(),
            len,
            release: Some(Box::new(release)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Where a viewer can find the artifact (file path or blob URL).
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Disarm the release and return the location; the resource outlives
    /// the handle.
    pub fn keep(mut self) -> String {
        self.release = None;
        std::mem::take(&mut self.location)
    }
}

impl Drop for ArtifactHandle {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            debug!(id = self.id, location = %self.location, "releasing artifact handle");
            release();
        }
    }
}

impl fmt::Debug for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactHandle")
            .field("id", &self.id)
            .field("location", &self.location)
            .field("len", &self.len)
            .field("armed", &self.release.is_some())
            .finish()
    }
}

/// Creates displayable handles from compiled artifacts.
pub trait ArtifactSink: Send {
    fn create(&mut self, artifact: &Artifact) -> Result<ArtifactHandle>;
}

/// Writes each artifact to `<dir>/<output_name>-<id>.pdf`; releasing the
/// handle removes the file.
#[derive(Debug)]
pub struct FileArtifactSink {
    dir: PathBuf,
    output_name: String,
    next_id: u64,
    fs: Arc<dyn FileSystem>,
}

impl FileArtifactSink {
    pub fn new(dir: impl Into<PathBuf>, output_name: impl Into<String>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            dir: dir.into(),
            output_name: output_name.into(),
            next_id: 1,
            fs,
        }
    }
}

impl ArtifactSink for FileArtifactSink {
    fn create(&mut self, artifact: &Artifact) -> Result<ArtifactHandle> {
        let id = self.next_id;
        self.next_id += 1;

        let path = self.dir.join(format!("{}-{id}.pdf", self.output_name));
        self.fs.write(&path, &artifact.bytes)?;
        debug!(id, ?path, bytes = artifact.bytes.len(), "wrote preview file");

        let fs = Arc::clone(&self.fs);
        let release_path = path.clone();
        Ok(ArtifactHandle::new(
            id,
            path.display().to_string(),
            artifact.bytes.len(),
            move || {
                if let Err(e) = fs.remove_file(&release_path) {
                    warn!(path = ?release_path, error = %e, "failed to remove released preview file");
                }
            },
        ))
    }
}

/// In-memory blob registry handing out `blob:livetex/<id>` locations.
///
/// Clones share the registry, so a test can keep one clone to look up blobs
/// and count live ones while the presenter owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactSink {
    blobs: Arc<Mutex<HashMap<u64, Arc<Vec<u8>>>>>,
    next_id: Arc<Mutex<u64>>,
}

impl MemoryArtifactSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs created and not yet released.
    pub fn live_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    /// Look up a live blob by the location of its handle.
    pub fn get(&self, location: &str) -> Option<Arc<Vec<u8>>> {
        let id: u64 = location.strip_prefix("blob:livetex/")?.parse().ok()?;
        self.blobs.lock().unwrap().get(&id).cloned()
    }
}

impl ArtifactSink for MemoryArtifactSink {
    fn create(&mut self, artifact: &Artifact) -> Result<ArtifactHandle> {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };

        self.blobs
            .lock()
            .unwrap()
            .insert(id, Arc::new(artifact.bytes.clone()));

        let blobs = Arc::clone(&self.blobs);
        Ok(ArtifactHandle::new(
            id,
            format!("blob:livetex/{id}"),
            artifact.bytes.len(),
            move || {
                blobs.lock().unwrap().remove(&id);
            },
        ))
    }
}
