use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tinylink_shortener::LinkError;
use tracing::{debug, error};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error("malformed request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("invalid redirect target: {0}")]
    Redirect(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Link(err) => match err {
                LinkError::InvalidUrl(_) | LinkError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
                LinkError::Conflict(_) => StatusCode::CONFLICT,
                LinkError::NotFound(_) => StatusCode::NOT_FOUND,
                LinkError::AllocationExhausted { .. } | LinkError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Body(_) => StatusCode::BAD_REQUEST,
            AppError::Redirect(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to clients. Server-side causes are never included.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Link(err) => match err {
                LinkError::InvalidUrl(_) => "Invalid URL format".to_string(),
                LinkError::InvalidFormat(_) => {
                    "Code must be 6-8 characters (letters and numbers only)".to_string()
                }
                LinkError::Conflict(_) => "Code already exists".to_string(),
                LinkError::NotFound(_) => "Link not found".to_string(),
                LinkError::AllocationExhausted { .. } => {
                    "Could not generate unique code. Please try again.".to_string()
                }
                LinkError::Internal(_) => "Internal Server Error".to_string(),
            },
            AppError::Body(rejection) => rejection.body_text(),
            AppError::Redirect(_) => "Internal Server Error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
