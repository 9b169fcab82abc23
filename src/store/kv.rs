// src/store/kv.rs

//! Persistent key-value storage behind the source store.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::fs::FileSystem;

/// Abstract string key-value storage.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores all keys in one JSON object file (e.g. `.livetex/state.json`).
///
/// Every `set` is a read-modify-write of the whole file; the map is tiny
/// (two keys) so there is nothing to gain from caching it.
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl FileKvStore {
    pub fn new(path: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: path.into(),
            fs,
        }
    }

    fn read_contents(&self) -> Result<Option<String>> {
        if !self.fs.exists(&self.path) {
            return Ok(None);
        }
        let contents = self.fs.read_to_string(&self.path)?;
        Ok((!contents.trim().is_empty()).then_some(contents))
    }

    fn parse(&self, contents: &str) -> Result<BTreeMap<String, String>> {
        serde_json::from_str(contents)
            .with_context(|| format!("parsing key-value file {:?}", self.path))
    }

    fn load_all(&self) -> Result<BTreeMap<String, String>> {
        match self.read_contents()? {
            Some(contents) => self.parse(&contents),
            None => Ok(BTreeMap::new()),
        }
    }

    fn save_all(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(map)?;
        self.fs.write(&self.path, json.as_bytes())
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.load_all()?;
        Ok(map.get(key).cloned())
    }

    /// A file that no longer parses is replaced rather than blocking every
    /// later write.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = match self.read_contents()? {
            Some(contents) => self.parse(&contents).unwrap_or_else(|e| {
                warn!(error = %e, path = ?self.path, "overwriting unreadable key-value file");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        map.insert(key.to_string(), value.to_string());
        self.save_all(&map)?;
        debug!(key, bytes = value.len(), path = ?self.path, "stored value (file)");
        Ok(())
    }
}

/// Stores values in memory only. Clones share the same map, so tests can
/// keep a handle and inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    map: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key.
    pub fn with(self, key: &str, value: &str) -> Self {
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
