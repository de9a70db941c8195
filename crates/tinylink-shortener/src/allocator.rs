use crate::error::{LinkError, Result};
use std::sync::Arc;
use tinylink_core::{ReadRepository, ShortCode};
use tinylink_generator::Generator;
use tracing::{debug, warn};

/// Upper bound on random draws for a single link creation.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 10;

/// Path segments owned by the HTTP surface. These can never be link codes.
pub const RESERVED_CODES: [&str; 2] = ["api", "healthz"];

/// Returns `true` if `code` collides with a routing namespace.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Chooses the short code for a new link.
///
/// The existence checks here are a fast path that lets the common conflict
/// fail before an insert is attempted. They are not atomic with the insert;
/// the repository's unique constraint on `code` is what actually guarantees
/// uniqueness.
#[derive(Debug)]
pub struct CodeAllocator<R, G> {
    repository: Arc<R>,
    generator: G,
}

impl<R: ReadRepository, G: Generator> CodeAllocator<R, G> {
    pub fn new(repository: Arc<R>, generator: G) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// `true` iff `candidate` matches `^[A-Za-z0-9]{6,8}$`.
    pub fn validate_format(candidate: &str) -> bool {
        ShortCode::is_valid_format(candidate)
    }

    /// Accepts a caller-supplied code if it is well formed, not reserved and
    /// not already taken.
    pub async fn reserve_custom(&self, candidate: &str) -> Result<ShortCode> {
        let code = ShortCode::new(candidate)?;

        if is_reserved(candidate) {
            return Err(LinkError::InvalidFormat(format!(
                "'{candidate}' is reserved"
            )));
        }

        if self.repository.exists(&code).await? {
            debug!(code = %code, "custom code already taken");
            return Err(LinkError::Conflict(code.to_string()));
        }

        Ok(code)
    }

    /// Draws random codes until one is free, giving up after `max_attempts`.
    pub async fn generate_random(&self, max_attempts: u32) -> Result<ShortCode> {
        for attempt in 1..=max_attempts {
            let code: ShortCode = self.generator.generate().into();

            if !self.repository.exists(&code).await? {
                debug!(code = %code, attempt, "allocated random code");
                return Ok(code);
            }

            debug!(code = %code, attempt, "random code collided with an existing link");
        }

        warn!(attempts = max_attempts, "random code allocation exhausted");
        Err(LinkError::AllocationExhausted {
            attempts: max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tinylink_core::{NewLink, Repository};
    use tinylink_generator::{RandomGenerator, SeqGenerator};
    use tinylink_storage::InMemoryRepository;

    /// Always yields the same code and counts how often it was asked.
    struct RepeatGenerator {
        code: &'static str,
        calls: Arc<AtomicU32>,
    }

    impl Generator for RepeatGenerator {
        type Output = ShortCode;

        fn generate(&self) -> ShortCode {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ShortCode::new_unchecked(self.code)
        }
    }

    async fn repo_with(codes: &[&str]) -> Arc<InMemoryRepository> {
        let repo = InMemoryRepository::new();
        for c in codes {
            repo.insert(NewLink {
                code: ShortCode::new_unchecked(c),
                target_url: "https://example.com".to_string(),
                created_at: Timestamp::now(),
            })
            .await
            .unwrap();
        }
        Arc::new(repo)
    }

    #[test]
    fn validate_format_accepts_six_to_eight_alphanumerics() {
        type Allocator = CodeAllocator<InMemoryRepository, RandomGenerator>;

        assert!(Allocator::validate_format("abc123"));
        assert!(Allocator::validate_format("ABCdef1"));
        assert!(Allocator::validate_format("12345678"));

        assert!(!Allocator::validate_format("abc12"));
        assert!(!Allocator::validate_format("abcdefghi"));
        assert!(!Allocator::validate_format("abc_123"));
        assert!(!Allocator::validate_format(""));
    }

    #[tokio::test]
    async fn reserve_custom_returns_free_code() {
        let allocator = CodeAllocator::new(repo_with(&[]).await, RandomGenerator::new());

        let code = allocator.reserve_custom("abc123").await.unwrap();
        assert_eq!(code.as_str(), "abc123");
    }

    #[tokio::test]
    async fn reserve_custom_rejects_bad_format() {
        let allocator = CodeAllocator::new(repo_with(&[]).await, RandomGenerator::new());

        for candidate in ["abc", "abc-123", "toolongcode", "abc 12"] {
            let err = allocator.reserve_custom(candidate).await.unwrap_err();
            assert!(matches!(err, LinkError::InvalidFormat(_)), "{candidate}");
        }
    }

    #[tokio::test]
    async fn reserve_custom_rejects_reserved_namespace() {
        let allocator = CodeAllocator::new(repo_with(&[]).await, RandomGenerator::new());

        let err = allocator.reserve_custom("healthz").await.unwrap_err();
        assert!(matches!(err, LinkError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn reserve_custom_conflicts_with_existing_code() {
        let allocator = CodeAllocator::new(repo_with(&["abc123"]).await, RandomGenerator::new());

        let err = allocator.reserve_custom("abc123").await.unwrap_err();
        assert!(matches!(err, LinkError::Conflict(code) if code == "abc123"));
    }

    #[tokio::test]
    async fn generate_random_skips_taken_codes() {
        let repo = repo_with(&["tl0000", "tl0001"]).await;
        let allocator = CodeAllocator::new(repo, SeqGenerator::with_prefix("tl"));

        let code = allocator
            .generate_random(MAX_ALLOCATION_ATTEMPTS)
            .await
            .unwrap();
        assert_eq!(code.as_str(), "tl0002");
    }

    #[tokio::test]
    async fn generate_random_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let generator = RepeatGenerator {
            code: "taken0",
            calls: Arc::clone(&calls),
        };
        let allocator = CodeAllocator::new(repo_with(&["taken0"]).await, generator);

        let err = allocator
            .generate_random(MAX_ALLOCATION_ATTEMPTS)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LinkError::AllocationExhausted { attempts } if attempts == MAX_ALLOCATION_ATTEMPTS
        ));
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ALLOCATION_ATTEMPTS);
    }

    #[tokio::test]
    async fn generate_random_succeeds_on_last_attempt() {
        let taken: Vec<String> = (0..9).map(|i| format!("tl000{i}")).collect();
        let taken: Vec<&str> = taken.iter().map(String::as_str).collect();
        let allocator =
            CodeAllocator::new(repo_with(&taken).await, SeqGenerator::with_prefix("tl"));

        let code = allocator
            .generate_random(MAX_ALLOCATION_ATTEMPTS)
            .await
            .unwrap();
        assert_eq!(code.as_str(), "tl0009");
    }

    #[tokio::test]
    async fn generate_random_yields_six_alphanumerics() {
        let allocator = CodeAllocator::new(repo_with(&[]).await, RandomGenerator::new());

        let code = allocator
            .generate_random(MAX_ALLOCATION_ATTEMPTS)
            .await
            .unwrap();
        assert_eq!(code.as_str().len(), 6);
        assert!(code.as_str().bytes().all(|b| b.is_ascii_alphanumeric()));
    }
}
