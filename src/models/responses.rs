//! Response DTOs for the ratings service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::controller::RatingOutcome;
use crate::models::rating::Rating;

/// Response body carrying a rating record (POST /reports, PUT /reports/:id)
///
/// `cache_warning` is present only when the durable write succeeded but the
/// cache write-through or invalidation failed; the record itself is durable.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    /// Store-assigned identifier
    pub id: u64,
    /// The rated subject
    pub user_id: Uuid,
    /// Score in the 1-5 range
    pub score: u8,
    /// Review text
    pub text: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last-modification timestamp
    pub updated_at: DateTime<Utc>,
    /// Non-fatal cache fault accompanying a successful write
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_warning: Option<String>,
}

impl ReportResponse {
    /// Creates a response from a controller write outcome.
    pub fn from_outcome(outcome: RatingOutcome) -> Self {
        let RatingOutcome {
            rating,
            cache_warning,
        } = outcome;
        Self::from_rating(rating, cache_warning)
    }

    fn from_rating(rating: Rating, cache_warning: Option<String>) -> Self {
        Self {
            id: rating.id,
            user_id: rating.user_id,
            score: rating.score,
            text: rating.text,
            created_at: rating.created_at,
            updated_at: rating.updated_at,
            cache_warning,
        }
    }
}

/// Response body for the aggregate lookup (GET /ratings/:user_id)
#[derive(Debug, Clone, Serialize)]
pub struct UserRatingResponse {
    /// The rated subject
    pub user_id: Uuid,
    /// Mean of all scores for the subject, 0 when no records exist
    pub rating: f64,
}

impl UserRatingResponse {
    /// Creates a new UserRatingResponse
    pub fn new(user_id: Uuid, rating: f64) -> Self {
        Self { user_id, rating }
    }
}

/// Response body for the delete acknowledgement (DELETE /reports/:id)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteReportResponse {
    /// Success message
    pub message: String,
    /// The deleted record's identifier
    pub id: u64,
    /// Non-fatal cache fault accompanying a successful delete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_warning: Option<String>,
}

impl DeleteReportResponse {
    /// Creates a new DeleteReportResponse
    pub fn new(id: u64, cache_warning: Option<String>) -> Self {
        Self {
            message: format!("report {} deleted successfully", id),
            id,
            cache_warning,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
