//! # devbox-store
//!
//! Persistence for the devbox toolbox.
//!
//! - [`KeyValueStore`] is the storage seam: string keys mapped to JSON
//!   documents. [`MemoryStore`] keeps them in memory, [`FileStore`] in a
//!   single JSON file written atomically.
//! - [`History`] keeps the most recent inputs and outputs of each [`Tool`]
//!   on top of any store.
//!
//! History entries are identified by [`EntryId`], a prefixed ULID
//! (`hist_01HV4Z2WQXKJNM8GPQY6VBKC3D`) that sorts by creation time.

mod error;
mod file;
mod history;
mod id;
mod kv;

pub use error::{IdError, StoreError};
pub use file::{write_atomic, FileStore};
pub use history::{
    History, HistoryEntry, Tool, DEFAULT_HISTORY_LIMIT, MAX_FIELD_CHARS, MAX_HISTORY_LIMIT,
};
pub use id::EntryId;
pub use kv::{KeyValueStore, MemoryStore};
