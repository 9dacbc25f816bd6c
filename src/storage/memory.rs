//! In-memory backing, shared between clones.

use std::sync::{Arc, Mutex};

use crate::storage::{StorageError, Store};

/// A [`Store`] that keeps its contents in memory.
///
/// Clones share the same contents, so one registry can save and a fresh one
/// can load as if the process had restarted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `contents`.
    pub fn with_contents(contents: &str) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(contents.to_string()))),
        }
    }

    /// Current contents, if anything has been written.
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Store for MemoryStore {
    fn location(&self) -> String {
        "<memory>".to_string()
    }

    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        *self
            .contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(contents.to_string());
        Ok(())
    }
}
