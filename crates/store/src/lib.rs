//! Persistence for the swipe app.
//!
//! Everything the app remembers between runs goes through the [`KvStore`]
//! trait: exposure history, the shortlist, favorites, swipe stats, and
//! vote sessions. Values are JSON strings; the typed helpers in [`kv`]
//! handle encoding and tolerate corrupt data on the way back in.
//!
//! ## Main Components
//!
//! - [`KvStore`]: the storage contract
//! - [`JsonFileStore`]: single-file JSON backend used by the CLI
//! - [`MemoryStore`]: ephemeral backend for tests
//! - [`keys`]: the well-known key names
//!
//! ## Example Usage
//!
//! ```ignore
//! use store::{JsonFileStore, keys, read_or_default, write};
//!
//! let store = JsonFileStore::open("reel-swipe.json");
//! let mut seen: Vec<u32> = read_or_default(&store, keys::SEEN_MOVIES);
//! seen.push(42);
//! write(&store, keys::SEEN_MOVIES, &seen)?;
//! ```

pub mod error;
pub mod file;
pub mod keys;
pub mod kv;
pub mod memory;

pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use kv::{KvStore, read, read_or_default, write};
pub use memory::MemoryStore;
