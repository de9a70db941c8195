//! Storage backends for tinylink link records.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;
pub use tinylink_core::error::Result;
pub use tinylink_core::{LinkRecord, NewLink, ReadRepository, Repository, StorageError};
