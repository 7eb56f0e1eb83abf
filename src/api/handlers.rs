//! API Handlers
//!
//! HTTP request handlers for each ratings service endpoint. Handlers guard
//! the wire-level argument shape (non-empty owner identifier, non-zero
//! record id) and delegate everything else to the controller.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::controller::RatingController;
use crate::error::{RatingError, Result};
use crate::models::{
    CreateReportRequest, DeleteReportResponse, HealthResponse, ReportResponse,
    UpdateReportRequest, UserRatingResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The cache-aside controller
    pub controller: Arc<RatingController>,
}

impl AppState {
    /// Creates a new AppState over the given controller.
    pub fn new(controller: RatingController) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}

/// Parses a path segment into a rated-subject identifier.
///
/// An empty or nil identifier is an invalid argument, caught before any
/// store access.
fn parse_user_id(raw: &str) -> Result<Uuid> {
    if raw.is_empty() {
        return Err(RatingError::Validation("user_id is required".to_string()));
    }
    let user_id = Uuid::parse_str(raw)
        .map_err(|_| RatingError::Validation("user_id must be a valid UUID".to_string()))?;
    if user_id.is_nil() {
        return Err(RatingError::Validation("user_id is required".to_string()));
    }
    Ok(user_id)
}

/// Guards against the wire format's zero-value record id.
fn require_id(id: u64) -> Result<u64> {
    if id == 0 {
        return Err(RatingError::Validation("id is required".to_string()));
    }
    Ok(id)
}

/// Handler for GET /ratings/:user_id
///
/// Returns the aggregate rating for one rated subject.
pub async fn get_user_rating_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserRatingResponse>> {
    let user_id = parse_user_id(&user_id)?;
    let rating = state.controller.get_user_rating(user_id).await?;

    Ok(Json(UserRatingResponse::new(user_id, rating)))
}

/// Handler for POST /reports
///
/// Creates a rating record and returns it with status 201.
pub async fn create_report_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>)> {
    let outcome = state.controller.create_report(req.into_new_rating()).await?;

    Ok((StatusCode::CREATED, Json(ReportResponse::from_outcome(outcome))))
}

/// Handler for PUT /reports/:id
///
/// Applies a partial update and returns the merged record.
pub async fn update_report_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateReportRequest>,
) -> Result<Json<ReportResponse>> {
    let id = require_id(id)?;
    let outcome = state.controller.update_report(id, req.into_patch()).await?;

    Ok(Json(ReportResponse::from_outcome(outcome)))
}

/// Handler for DELETE /reports/:id
///
/// Deletes a record and acknowledges the deletion.
pub async fn delete_report_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteReportResponse>> {
    let id = require_id(id)?;
    let cache_warning = state.controller.delete_report(id).await?;

    Ok(Json(DeleteReportResponse::new(id, cache_warning)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
