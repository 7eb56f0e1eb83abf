//! Request DTOs for the ratings service API
//!
//! Defines the structure of incoming HTTP request bodies. Fields use serde
//! defaults so that an absent field behaves like the wire format's zero
//! value and is caught by validation rather than by deserialization.

use serde::Deserialize;
use uuid::Uuid;

use crate::models::rating::{NewRating, RatingPatch};

/// Request body for creating a report (POST /reports)
///
/// # Fields
/// - `user_id`: identifier of the rated subject
/// - `score`: score in the 1-5 range
/// - `text`: free-form review text
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReportRequest {
    /// The rated subject
    #[serde(default)]
    pub user_id: Uuid,
    /// Score in the 1-5 range
    #[serde(default)]
    pub score: u8,
    /// Review text
    #[serde(default)]
    pub text: String,
}

impl CreateReportRequest {
    /// Converts the request into the controller's input shape.
    pub fn into_new_rating(self) -> NewRating {
        NewRating {
            user_id: self.user_id,
            score: self.score,
            text: self.text,
        }
    }
}

/// Request body for updating a report (PUT /reports/:id)
///
/// A zero/absent `score` leaves the stored score unchanged; an empty/absent
/// `text` leaves the stored text unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReportRequest {
    /// Replacement score, 0 = keep existing
    #[serde(default)]
    pub score: u8,
    /// Replacement text, empty = keep existing
    #[serde(default)]
    pub text: String,
}

impl UpdateReportRequest {
    /// Converts the request into the controller's patch shape.
    pub fn into_patch(self) -> RatingPatch {
        RatingPatch {
            score: self.score,
            text: self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserialize() {
        let json = r#"{"user_id": "7f1ee593-7d11-4d1e-a399-045e9bbe7d5c", "score": 4, "text": "good"}"#;
        let req: CreateReportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.score, 4);
        assert_eq!(req.text, "good");
        assert!(!req.user_id.is_nil());
    }

    #[test]
    fn test_create_request_missing_fields_default() {
        let req: CreateReportRequest = serde_json::from_str("{}").unwrap();
        assert!(req.user_id.is_nil());
        assert_eq!(req.score, 0);
        assert!(req.text.is_empty());
    }

    #[test]
    fn test_update_request_partial() {
        let json = r#"{"text": "better"}"#;
        let req: UpdateReportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.score, 0);
        assert_eq!(req.text, "better");
    }
}
