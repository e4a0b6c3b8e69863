//! Error types for the forecast service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Fetch Error Enum ==
/// Failure reaching or understanding the upstream forecast API.
///
/// These never leave the cache engine; they decide whether a stale entry
/// is served or nothing is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Network or IO failure, including timeouts
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Upstream answered 429
    #[error("Throttled by upstream")]
    Throttled,

    /// Body missing or without the required fields
    #[error("Invalid upstream payload: {0}")]
    PayloadInvalid(String),

    /// Any other non-success status
    #[error("Unexpected upstream status: {0}")]
    UnexpectedStatus(u16),
}

// == API Error Enum ==
/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No cached forecast and none could be fetched
    #[error("No forecast found for {0}")]
    NotFound(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
