//! API Module
//!
//! HTTP handlers and routing for the ratings service. The facade translates
//! wire requests to controller calls and performs no caching or business
//! logic of its own.
//!
//! # Endpoints
//! - `GET /ratings/:user_id` - Aggregate rating for a rated subject
//! - `POST /reports` - Create a rating record
//! - `PUT /reports/:id` - Update a rating record
//! - `DELETE /reports/:id` - Delete a rating record
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
