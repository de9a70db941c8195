//! Core types and traits for the tinylink URL shortener.
//!
//! This crate provides the link record, the validated short code and the
//! repository contract shared by the storage backends and the link service.

pub mod error;
pub mod repository;
pub mod shortcode;

pub use error::{CoreError, StorageError};
pub use repository::{LinkRecord, NewLink, ReadRepository, Repository};
pub use shortcode::ShortCode;
