use std::sync::Arc;
use std::time::{Duration, Instant};

use tinylink_shortener::Shortener;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    started_at: Instant,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>) -> Self {
        Self {
            shortener,
            started_at: Instant::now(),
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    /// Time since this state was created, i.e. since the server started.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
