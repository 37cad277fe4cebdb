//! The key-value contract and typed access helpers.
//!
//! Reads are tolerant: a missing or malformed value falls back to the
//! type's default with a warning instead of failing the caller. App state
//! is convenience data, and a corrupt snapshot should cost a reset, not a
//! crash. Writes still surface errors so callers know persistence is
//! broken.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Result, StoreError};

/// A string-keyed store of JSON-encoded values.
///
/// Implementations use interior mutability so a shared reference (typically
/// behind an `Arc`) is enough to read and write.
pub trait KvStore: Send + Sync {
    /// Fetch the raw string stored under `key`
    fn get_raw(&self, key: &str) -> Option<String>;

    /// Store a raw string under `key`
    fn set_raw(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Re-read external state, if the backend has any. Used by watchers
    /// that poll for writes made by other processes.
    fn refresh(&self) {}
}

/// Read a typed value, falling back to its default when the key is absent
/// or the stored text no longer decodes
pub fn read_or_default<T>(store: &dyn KvStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    read(store, key).unwrap_or_default()
}

/// Read a typed value. Absent keys and malformed values both come back as
/// `None`; only the latter is logged.
pub fn read<T>(store: &dyn KvStore, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let raw = store.get_raw(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(key, %error, "stored value is malformed, treating as absent");
            None
        }
    }
}

/// Serialize and store a typed value
pub fn write<T>(store: &dyn KvStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        what: format!("value for key {key}"),
        source,
    })?;
    store.set_raw(key, &raw)
}
