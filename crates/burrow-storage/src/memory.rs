use async_trait::async_trait;
use burrow_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use burrow_core::{ShortCode, StorageError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory implementation of the Repository trait using DashMap.
///
/// Inserts go through the entry API, so the check for an existing code and the
/// write happen under the same shard lock. A second map indexes codes by URL for
/// idempotent shortening; the first code bound to a URL stays there.
///
/// Nothing survives a restart. Use [`SqliteRepository`](crate::SqliteRepository)
/// for durable storage.
#[derive(Debug)]
pub struct InMemoryRepository {
    storage: DashMap<String, UrlRecord>,
    by_url: DashMap<String, ShortCode>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            by_url: DashMap::new(),
        }
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.contains_key(code.as_str()))
    }

    async fn find_code_by_url(&self, original_url: &str) -> Result<Option<ShortCode>> {
        Ok(self
            .by_url
            .get(original_url)
            .map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                let original_url = record.original_url.clone();
                slot.insert(record);
                self.by_url
                    .entry(original_url)
                    .or_insert_with(|| code.clone());
                Ok(())
            }
        }
    }
}
