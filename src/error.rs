//! Error types for the ratings service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Rating Error Enum ==
/// Unified error type for the ratings service.
///
/// A cache miss is not an error: `CacheStore::get_*` returns `Ok(None)` and
/// the controller falls back to the durable store. The `Cache` variant covers
/// cache transport faults, which never fail a call on their own.
#[derive(Error, Debug)]
pub enum RatingError {
    /// Required field missing or malformed; detected before any store I/O
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced rating record absent in the durable store
    #[error("rating {0} not found")]
    NotFound(u64),

    /// Cache-path fault; non-fatal for reads, surfaced as a warning for writes
    #[error("cache error: {0}")]
    Cache(String),

    /// Durable-store fault, opaque cause; fatal to the call
    #[error("store error: {0}")]
    Store(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for RatingError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = match &self {
            RatingError::Validation(_) => StatusCode::BAD_REQUEST,
            RatingError::NotFound(_) => StatusCode::NOT_FOUND,
            RatingError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RatingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the ratings service.
pub type Result<T> = std::result::Result<T, RatingError>;
