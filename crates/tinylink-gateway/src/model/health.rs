use jiff::Timestamp;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: &'static str,
    /// Seconds since the server started.
    pub uptime: f64,
    pub timestamp: Timestamp,
}
