use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hashlink_core::error::{Result, StoreError};
use hashlink_core::{ShortCode, Store};
use tracing::trace;

/// In-memory implementation of the [`Store`] trait using DashMap.
///
/// Presence is decided by the key alone, so an empty URL is a valid stored
/// value. Check-and-insert and check-and-remove go through the entry API and
/// hold the shard lock for the whole operation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    items: DashMap<String, String>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Number of mappings currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn add(&self, code: &ShortCode, url: &str) -> Result<()> {
        match self.items.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(url.to_owned());
                trace!(code = %code, url, "stored mapping in memory");
                Ok(())
            }
        }
    }

    async fn remove(&self, code: &ShortCode) -> Result<()> {
        match self.items.remove(code.as_str()) {
            Some(_) => {
                trace!(code = %code, "removed mapping from memory");
                Ok(())
            }
            None => Err(StoreError::NotFound(code.to_string())),
        }
    }

    async fn get(&self, code: &ShortCode) -> Result<String> {
        self.items
            .get(code.as_str())
            .map(|url| url.value().clone())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }
}
