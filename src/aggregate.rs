//! Aggregation Policy Module
//!
//! Pure computation of a subject's aggregate rating from its set of
//! individual scores.

/// Computes the arithmetic mean of a score collection.
///
/// A subject with no ratings has aggregate 0; an empty collection is a
/// defined result, not an error. The sum is taken over integers, so the
/// result does not depend on the order of the collection.
pub fn mean(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }

    let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    sum as f64 / scores.len() as f64
}
