use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::crawler::CrawlError;

/// API-boundary errors, mapped to HTTP status codes.
///
/// Only structurally invalid requests surface here; collaborator failures
/// degrade to empty or fallback results inside the handlers instead.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid required field (400)
    #[error("{0}")]
    InvalidInput(String),

    /// Unexpected server error (500)
    #[error("{0}")]
    Internal(String),
}

impl From<CrawlError> for ApiError {
    fn from(e: CrawlError) -> Self {
        match e {
            CrawlError::InvalidUrl(_) => ApiError::InvalidInput("Invalid URL".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}
