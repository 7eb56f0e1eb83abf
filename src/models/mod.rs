//! Domain and transport models for the ratings service
//!
//! `rating` holds the domain record; `requests`/`responses` define the DTOs
//! (Data Transfer Objects) used for serializing HTTP request and response
//! bodies.

pub mod rating;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use rating::{NewRating, Rating, RatingPatch};
pub use requests::{CreateReportRequest, UpdateReportRequest};
pub use responses::{
    DeleteReportResponse, ErrorResponse, HealthResponse, ReportResponse, UserRatingResponse,
};
