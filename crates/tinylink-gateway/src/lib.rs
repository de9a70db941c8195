//! HTTP surface of the tinylink URL shortener.
//!
//! Exposes the JSON API under `/api/links`, the `/healthz` probe and the
//! `/{code}` redirect on top of any [`Shortener`](tinylink_shortener::Shortener).

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
