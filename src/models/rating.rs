//! Rating Record Module
//!
//! Defines the rating record owned by the durable store, plus the input
//! shapes for creating and patching records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest score a report may carry.
pub const MIN_SCORE: u8 = 1;
/// Highest score a report may carry.
pub const MAX_SCORE: u8 = 5;

// == Rating ==
/// An individual review of a rated subject.
///
/// The durable store owns the authoritative record; copies held by the
/// controller or the cache are transient. `id` and `user_id` are immutable
/// once assigned; timestamps are store-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Store-assigned identifier, unique and immutable
    pub id: u64,
    /// Identifier of the rated subject, immutable
    pub user_id: Uuid,
    /// Score in the 1-5 range
    pub score: u8,
    /// Free-form review text
    pub text: String,
    /// Creation timestamp, store-assigned
    pub created_at: DateTime<Utc>,
    /// Last-modification timestamp, store-assigned
    pub updated_at: DateTime<Utc>,
}

// == New Rating ==
/// Input for creating a rating record. The store assigns `id` and timestamps.
#[derive(Debug, Clone)]
pub struct NewRating {
    /// Identifier of the rated subject
    pub user_id: Uuid,
    /// Score in the 1-5 range
    pub score: u8,
    /// Free-form review text
    pub text: String,
}

impl NewRating {
    /// Validates required fields before any store access.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.user_id.is_nil() {
            return Some("user_id is required".to_string());
        }
        if self.score == 0 {
            return Some("score is required".to_string());
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.score) {
            return Some(format!(
                "score must be between {} and {}",
                MIN_SCORE, MAX_SCORE
            ));
        }
        if self.text.is_empty() {
            return Some("text is required".to_string());
        }
        None
    }
}

// == Rating Patch ==
/// Partial update for an existing record.
///
/// A zero score leaves the stored score unchanged; an empty text leaves the
/// stored text unchanged. The owner is never taken from a patch.
#[derive(Debug, Clone, Default)]
pub struct RatingPatch {
    /// Replacement score, 0 = keep existing
    pub score: u8,
    /// Replacement text, empty = keep existing
    pub text: String,
}

impl RatingPatch {
    /// Validates the patch fields.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.score > MAX_SCORE {
            return Some(format!(
                "score must be between {} and {}",
                MIN_SCORE, MAX_SCORE
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_new_rating() -> NewRating {
        NewRating {
            user_id: Uuid::new_v4(),
            score: 4,
            text: "good".to_string(),
        }
    }

    #[test]
    fn test_validate_valid() {
        assert!(valid_new_rating().validate().is_none());
    }

    #[test]
    fn test_validate_nil_user() {
        let mut data = valid_new_rating();
        data.user_id = Uuid::nil();
        assert_eq!(data.validate(), Some("user_id is required".to_string()));
    }

    #[test]
    fn test_validate_zero_score() {
        let mut data = valid_new_rating();
        data.score = 0;
        assert_eq!(data.validate(), Some("score is required".to_string()));
    }

    #[test]
    fn test_validate_score_out_of_range() {
        let mut data = valid_new_rating();
        data.score = 6;
        assert!(data.validate().unwrap().contains("between"));
    }

    #[test]
    fn test_validate_empty_text() {
        let mut data = valid_new_rating();
        data.text = String::new();
        assert_eq!(data.validate(), Some("text is required".to_string()));
    }

    #[test]
    fn test_patch_zero_score_is_valid() {
        let patch = RatingPatch {
            score: 0,
            text: "better".to_string(),
        };
        assert!(patch.validate().is_none());
    }

    #[test]
    fn test_patch_score_out_of_range() {
        let patch = RatingPatch {
            score: 9,
            text: String::new(),
        };
        assert!(patch.validate().is_some());
    }

    #[test]
    fn test_rating_serde_roundtrip() {
        let rating = Rating {
            id: 1,
            user_id: Uuid::new_v4(),
            score: 5,
            text: "excellent".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&rating).unwrap();
        let back: Rating = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rating);
    }
}
