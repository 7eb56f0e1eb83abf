//! API Routes
//!
//! Configures the Axum router with all ratings service endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_report_handler, delete_report_handler, get_user_rating_handler, health_handler,
    update_report_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /ratings/:user_id` - Aggregate rating for a rated subject
/// - `POST /reports` - Create a rating record
/// - `PUT /reports/:id` - Update a rating record
/// - `DELETE /reports/:id` - Delete a rating record
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/ratings/:user_id", get(get_user_rating_handler))
        .route("/reports", post(create_report_handler))
        .route(
            "/reports/:id",
            put(update_report_handler).delete(delete_report_handler),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
