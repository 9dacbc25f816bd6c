//! Network registry: user-chosen names mapped to RPC endpoints.

use std::collections::BTreeMap;

use crate::storage::{load_map, save_map, StorageError, Store};

/// Network name → endpoint URL mapping, loaded from and flushed to a [`Store`].
///
/// Endpoints are not checked when registered; a bad URL surfaces on the
/// first connection attempt.
pub struct NetworkRegistry {
    store: Box<dyn Store>,
    networks: BTreeMap<String, String>,
}

impl NetworkRegistry {
    /// Create an empty registry backed by `store`.
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Box::new(store),
            networks: BTreeMap::new(),
        }
    }

    /// Create a registry over `store` and load whatever it holds.
    pub fn open(store: impl Store + 'static) -> Result<Self, StorageError> {
        let mut registry = Self::new(store);
        registry.load()?;
        Ok(registry)
    }

    /// Replace the in-memory contents with what the store holds.
    pub fn load(&mut self) -> Result<(), StorageError> {
        self.networks = load_map(self.store.as_ref())?;
        tracing::debug!(networks = self.networks.len(), "Network registry loaded");
        Ok(())
    }

    /// Rewrite the store with the current contents.
    pub fn save(&self) -> Result<(), StorageError> {
        save_map(self.store.as_ref(), &self.networks)?;
        tracing::info!(
            location = %self.store.location(),
            networks = self.networks.len(),
            "Network registry saved"
        );
        Ok(())
    }

    /// Insert or overwrite the endpoint for `name`, returning the old one.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        endpoint_url: impl Into<String>,
    ) -> Option<String> {
        self.networks.insert(name.into(), endpoint_url.into())
    }

    /// Endpoint registered for `name`.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.networks.get(name).map(String::as_str)
    }

    /// All `(name, endpoint)` pairs.
    pub fn list(&self) -> impl Iterator<Item = (&str, &str)> {
        self.networks.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl std::fmt::Debug for NetworkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkRegistry")
            .field("location", &self.store.location())
            .field("networks", &self.networks)
            .finish()
    }
}
