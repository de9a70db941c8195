use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tinylink_core::LinkRecord;
use tinylink_shortener::CreateLink;

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    /// Missing is treated like an empty, and therefore invalid, URL.
    #[serde(default)]
    pub target_url: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl From<CreateLinkRequest> for CreateLink {
    fn from(request: CreateLinkRequest) -> Self {
        CreateLink {
            target_url: request.target_url,
            code: request.code,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub total_clicks: u64,
    pub last_clicked: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<LinkRecord> for LinkResponse {
    fn from(record: LinkRecord) -> Self {
        LinkResponse {
            id: record.id,
            code: record.code.into(),
            target_url: record.target_url,
            total_clicks: record.total_clicks,
            last_clicked: record.last_clicked,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub message: &'static str,
    pub link: LinkResponse,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
