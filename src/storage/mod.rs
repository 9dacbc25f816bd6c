//! Persistence for the registries.
//!
//! # Data Flow
//! ```text
//! registry (in-memory BTreeMap)
//!     → save_map: serde_json (pretty, 2-space indent) → Store::write
//!     → load_map: Store::read → serde_json → registry
//! ```
//!
//! # Design Decisions
//! - A missing backing file is an empty registry, not an error
//! - Files are rewritten wholesale on every save, never appended
//! - Backings are injected so registries can be tested without touching disk

pub mod file;
pub mod memory;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised while reading or writing a registry backing.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing exists but could not be read.
    #[error("failed to read {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing could not be written.
    #[error("failed to write {location}: {source}")]
    Write {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing was read but its contents are not a valid registry.
    #[error("corrupt data in {location}: {reason}")]
    Corrupt { location: String, reason: String },
}

/// A place a registry is loaded from and flushed to.
pub trait Store {
    /// Human-readable location used in errors and logs.
    fn location(&self) -> String;

    /// Read the full contents, or `None` if nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the full contents.
    fn write(&self, contents: &str) -> Result<(), StorageError>;
}

/// Load a JSON object from `store` into a map.
pub fn load_map<K, V>(store: &dyn Store) -> Result<BTreeMap<K, V>, StorageError>
where
    K: DeserializeOwned + Ord,
    V: DeserializeOwned,
{
    let Some(contents) = store.read()? else {
        tracing::debug!(location = %store.location(), "No stored data, starting empty");
        return Ok(BTreeMap::new());
    };

    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt {
        location: store.location(),
        reason: e.to_string(),
    })
}

/// Serialize `map` as an indented JSON object and write it to `store`.
pub fn save_map<K, V>(store: &dyn Store, map: &BTreeMap<K, V>) -> Result<(), StorageError>
where
    K: Serialize,
    V: Serialize,
{
    let contents = serde_json::to_string_pretty(map).map_err(|e| StorageError::Write {
        location: store.location(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    store.write(&contents)?;
    tracing::debug!(location = %store.location(), entries = map.len(), "Saved registry");
    Ok(())
}
