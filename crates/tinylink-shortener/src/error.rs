use thiserror::Error;
use tinylink_core::{CoreError, StorageError};

pub type Result<T> = std::result::Result<T, LinkError>;

#[derive(Debug, Clone, Error)]
pub enum LinkError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidFormat(String),
    #[error("code already exists: {0}")]
    Conflict(String),
    #[error("link not found: {0}")]
    NotFound(String),
    #[error("no unique code found after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },
    #[error("internal error: {0}")]
    Internal(String),
}

impl LinkError {
    /// Whether the error was caused by the caller's input rather than by the
    /// service or its datastore.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl(_) | Self::InvalidFormat(_) | Self::Conflict(_) | Self::NotFound(_)
        )
    }
}

impl From<CoreError> for LinkError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidFormat(message),
        }
    }
}

impl From<StorageError> for LinkError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(code) => Self::Conflict(code),
            other => Self::Internal(other.to_string()),
        }
    }
}
