//! Ratings Service - a rating/review record store with a cache-aside read layer
//!
//! Individual rating records live in a durable store; a key/value cache with
//! TTL absorbs read load and keeps per-user aggregate ratings fast to fetch.

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod notify;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use controller::RatingController;
pub use tasks::spawn_cleanup_task;
