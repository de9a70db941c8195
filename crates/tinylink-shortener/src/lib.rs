//! Link service for the tinylink URL shortener.
//!
//! [`CodeAllocator`] picks the short code for a new link, either honouring a
//! caller-supplied one or drawing random codes under a bounded retry policy.
//! [`LinkService`] composes it with a repository to create, list, inspect,
//! delete and resolve links.

pub mod allocator;
pub mod error;
pub mod service;
pub mod shortener;

pub use allocator::{CodeAllocator, MAX_ALLOCATION_ATTEMPTS, RESERVED_CODES};
pub use error::LinkError;
pub use service::LinkService;
pub use shortener::{CreateLink, Shortener};
