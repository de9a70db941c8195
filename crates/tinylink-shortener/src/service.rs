use crate::allocator::{is_reserved, CodeAllocator, MAX_ALLOCATION_ATTEMPTS};
use crate::error::{LinkError, Result};
use crate::shortener::{CreateLink, Shortener};
use async_trait::async_trait;
use jiff::Timestamp;
use std::sync::Arc;
use tinylink_core::{LinkRecord, NewLink, Repository, ShortCode};
use tinylink_generator::Generator;
use tracing::{debug, info, trace};
use url::Url;

/// A concrete implementation of the [`Shortener`] trait.
///
/// The service holds no state of its own beyond the injected repository and
/// generator; all coordination between concurrent requests is left to the
/// repository.
#[derive(Debug)]
pub struct LinkService<R, G> {
    repository: Arc<R>,
    allocator: CodeAllocator<R, G>,
}

impl<R: Repository, G: Generator> LinkService<R, G> {
    pub fn new(repository: R, generator: G) -> Self {
        let repository = Arc::new(repository);
        Self {
            allocator: CodeAllocator::new(Arc::clone(&repository), generator),
            repository,
        }
    }

    /// Accepts only absolute `http` and `https` URLs. The stored string is
    /// later sent verbatim as a `Location` header, so control characters the
    /// URL parser would silently strip are refused.
    fn validate_url(url: &str) -> Result<()> {
        if url.bytes().any(|b| b.is_ascii_control()) {
            return Err(LinkError::InvalidUrl(format!(
                "{url:?}: contains control characters"
            )));
        }

        let parsed = Url::parse(url).map_err(|e| LinkError::InvalidUrl(format!("{url}: {e}")))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LinkError::InvalidUrl(format!(
                "scheme must be http or https, got '{scheme}'"
            ))),
        }
    }

    /// Parses a code used as a lookup key. A string that could never have
    /// been stored is reported as not found without asking the repository.
    fn lookup_code(code: &str) -> Result<ShortCode> {
        ShortCode::new(code).map_err(|_| LinkError::NotFound(code.to_string()))
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for LinkService<R, G> {
    async fn create_link(&self, params: CreateLink) -> Result<LinkRecord> {
        Self::validate_url(&params.target_url)?;

        let code = match params.code.filter(|code| !code.is_empty()) {
            Some(candidate) => self.allocator.reserve_custom(&candidate).await?,
            None => {
                self.allocator
                    .generate_random(MAX_ALLOCATION_ATTEMPTS)
                    .await?
            }
        };

        // A concurrent insert of the same code can slip past the allocator's
        // check; the repository reports that as a conflict.
        let record = self
            .repository
            .insert(NewLink {
                code,
                target_url: params.target_url,
                created_at: Timestamp::now(),
            })
            .await?;

        info!(code = %record.code, id = record.id, "link created");
        Ok(record)
    }

    async fn list_links(&self) -> Result<Vec<LinkRecord>> {
        Ok(self.repository.list().await?)
    }

    async fn get_link(&self, code: &str) -> Result<LinkRecord> {
        let code = Self::lookup_code(code)?;

        self.repository
            .get(&code)
            .await?
            .ok_or_else(|| LinkError::NotFound(code.to_string()))
    }

    async fn delete_link(&self, code: &str) -> Result<LinkRecord> {
        let code = Self::lookup_code(code)?;

        let record = self
            .repository
            .delete(&code)
            .await?
            .ok_or_else(|| LinkError::NotFound(code.to_string()))?;

        info!(code = %code, "link deleted");
        Ok(record)
    }

    async fn resolve_and_count(&self, code: &str) -> Result<String> {
        if is_reserved(code) {
            trace!(code, "reserved path segment is never a link");
            return Err(LinkError::NotFound(code.to_string()));
        }

        let code = Self::lookup_code(code)?;

        match self.repository.record_click(&code, Timestamp::now()).await? {
            Some(target_url) => {
                debug!(code = %code, url = %target_url, "resolved short code");
                Ok(target_url)
            }
            None => {
                trace!(code = %code, "short code not found");
                Err(LinkError::NotFound(code.to_string()))
            }
        }
    }
}
