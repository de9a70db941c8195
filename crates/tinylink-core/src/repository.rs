use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A persisted link and its click statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Surrogate identifier, used only for display ordering.
    pub id: i64,
    pub code: ShortCode,
    pub target_url: String,
    pub total_clicks: u64,
    /// `None` until the first redirect.
    pub last_clicked: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// The fields supplied by the caller when inserting a link.
///
/// Storage assigns `id`; `total_clicks` starts at zero and `last_clicked`
/// starts empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub code: ShortCode,
    pub target_url: String,
    pub created_at: Timestamp,
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Checks whether a short code is already taken.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Returns every record, most recently created first.
    async fn list(&self) -> Result<Vec<LinkRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new record and returns it as persisted.
    ///
    /// Returns `Err(Conflict)` if the code already exists. Implementations
    /// must enforce this atomically with the write (a unique constraint),
    /// so it stays correct when two inserts race.
    async fn insert(&self, link: NewLink) -> Result<LinkRecord>;

    /// Removes the record for a given short code and returns its prior state.
    /// Returns `None` if no record matched.
    async fn delete(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Adds one click to the record and stamps `last_clicked` with `at`,
    /// returning the record's target URL.
    ///
    /// The increment is relative to the stored value, never read-modify-write,
    /// so concurrent calls for the same code are not lost.
    /// Returns `None` if no record matched.
    async fn record_click(&self, code: &ShortCode, at: Timestamp) -> Result<Option<String>>;
}
