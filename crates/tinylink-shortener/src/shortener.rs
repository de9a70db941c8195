use crate::error::Result;
use async_trait::async_trait;
use tinylink_core::LinkRecord;

/// Parameters for creating a link.
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    /// The URL the short code redirects to. Must be absolute `http`/`https`.
    pub target_url: String,
    /// Optional caller-chosen code. Empty strings are treated as absent.
    pub code: Option<String>,
}

/// The operations exposed to the HTTP surface.
///
/// Lookup methods take the raw path segment; anything that cannot be a
/// valid short code is reported as not found.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Validates the request, allocates a code and persists a new link.
    async fn create_link(&self, params: CreateLink) -> Result<LinkRecord>;

    /// Returns every link, most recently created first.
    async fn list_links(&self) -> Result<Vec<LinkRecord>>;

    /// Returns a link without counting it as a click.
    async fn get_link(&self, code: &str) -> Result<LinkRecord>;

    /// Removes a link and returns its state prior to deletion.
    async fn delete_link(&self, code: &str) -> Result<LinkRecord>;

    /// Resolves a code to its target URL, counting one click.
    async fn resolve_and_count(&self, code: &str) -> Result<String>;
}
