//! Store Contracts Module
//!
//! Capability interfaces consumed by the rating controller. Any concrete
//! backend (relational, document, in-memory) implements the same interface
//! and is selected at composition time; the controller holds the handles as
//! `Arc<dyn ...>` injected at construction.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::rating::{NewRating, Rating};

mod memory;

pub use memory::MemoryStore;

// == Durable Store ==
/// The durable store owns rating-record truth.
///
/// Errors from these operations are fatal to the issuing call; retry and
/// backoff, if any, belong to the backend adapter, not the controller.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Looks up a record by its identifier.
    async fn find_by_id(&self, id: u64) -> Result<Rating>;

    /// Returns all records for one rated subject, ordered by identifier.
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Vec<Rating>>;

    /// Inserts a new record, assigning its identifier and timestamps.
    async fn insert(&self, data: NewRating) -> Result<Rating>;

    /// Persists a modified record, refreshing its `updated_at`.
    async fn save(&self, rating: Rating) -> Result<Rating>;

    /// Removes a record by its identifier.
    async fn delete_by_id(&self, id: u64) -> Result<()>;
}

// == Cache Store ==
/// Key/value store with per-key TTL.
///
/// A miss is a distinguishable outcome (`Ok(None)`), not an error; `Err`
/// means the cache itself failed. Entry expiry is owned entirely by the
/// backend and invisible to callers. Record and aggregate values live under
/// disjoint key namespaces so a single instance never conflates them.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Retrieves a cached rating record.
    async fn get_record(&self, key: &str) -> Result<Option<Rating>>;

    /// Stores a rating record under `key` for at most `ttl`.
    async fn set_record(&self, key: &str, rating: &Rating, ttl: Duration) -> Result<()>;

    /// Retrieves a cached aggregate value.
    async fn get_aggregate(&self, key: &str) -> Result<Option<f64>>;

    /// Stores an aggregate value under `key` for at most `ttl`.
    async fn set_aggregate(&self, key: &str, value: f64, ttl: Duration) -> Result<()>;

    /// Removes an entry; removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}
