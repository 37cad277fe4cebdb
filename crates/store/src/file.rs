//! JSON-file-backed store.
//!
//! The whole store is one JSON object on disk, loaded into memory on open
//! and written back after every mutation. That makes reads free and keeps
//! the file human-inspectable, which is all a single-user app needs.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::kv::KvStore;

/// A [`KvStore`] persisted as a single pretty-printed JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open a store at `path`.
    ///
    /// A missing file starts an empty store. A file that exists but no
    /// longer parses is logged and also starts an empty store; it gets
    /// overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        debug!(path = %path.display(), keys = entries.len(), "opened store file");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Where this store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Encode {
            what: "store snapshot".to_string(),
            source,
        })?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KvStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }

    fn refresh(&self) {
        let fresh = load_entries(&self.path);
        *self.lock() = fresh;
    }
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => return HashMap::new(),
        Err(error) => {
            warn!(path = %path.display(), %error, "could not read store file, starting fresh");
            return HashMap::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(path = %path.display(), %error, "store file is malformed, starting fresh");
            HashMap::new()
        }
    }
}
