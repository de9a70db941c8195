use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use std::sync::atomic::{AtomicI64, Ordering};
use tinylink_core::error::{Result, StorageError};
use tinylink_core::repository::{LinkRecord, NewLink, ReadRepository, Repository};
use tinylink_core::shortcode::ShortCode;

/// In-memory storage entry for a link.
#[derive(Debug, Clone)]
struct StoredLink {
    id: i64,
    target_url: String,
    total_clicks: u64,
    last_clicked: Option<Timestamp>,
    created_at: Timestamp,
}

impl StoredLink {
    fn to_record(&self, code: &ShortCode) -> LinkRecord {
        LinkRecord {
            id: self.id,
            code: code.clone(),
            target_url: self.target_url.clone(),
            total_clicks: self.total_clicks,
            last_clicked: self.last_clicked,
            created_at: self.created_at,
        }
    }
}

/// In-memory implementation of the repository traits using DashMap.
///
/// Inserts go through DashMap's entry API, so the vacancy check and the
/// write happen under the same shard lock and behave like a unique
/// constraint on `code`. Ids come from a counter starting at 1.
#[derive(Debug)]
pub struct InMemoryRepository {
    storage: DashMap<ShortCode, StoredLink>,
    next_id: AtomicI64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self.storage.get(code).map(|entry| entry.to_record(code)))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.contains_key(code))
    }

    async fn list(&self) -> Result<Vec<LinkRecord>> {
        let mut records: Vec<LinkRecord> = self
            .storage
            .iter()
            .map(|entry| entry.value().to_record(entry.key()))
            .collect();

        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(records)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, link: NewLink) -> Result<LinkRecord> {
        match self.storage.entry(link.code.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(link.code.to_string())),
            Entry::Vacant(vacant) => {
                let stored = StoredLink {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    target_url: link.target_url,
                    total_clicks: 0,
                    last_clicked: None,
                    created_at: link.created_at,
                };
                let record = stored.to_record(&link.code);
                vacant.insert(stored);
                Ok(record)
            }
        }
    }

    async fn delete(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self
            .storage
            .remove(code)
            .map(|(code, stored)| stored.to_record(&code)))
    }

    async fn record_click(&self, code: &ShortCode, at: Timestamp) -> Result<Option<String>> {
        let Some(mut entry) = self.storage.get_mut(code) else {
            return Ok(None);
        };

        entry.total_clicks += 1;
        entry.last_clicked = Some(at);
        Ok(Some(entry.target_url.clone()))
    }
}
