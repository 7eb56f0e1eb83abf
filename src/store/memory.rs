//! In-Memory Durable Store
//!
//! HashMap-backed implementation of the durable store contract, with a
//! monotonically increasing identifier counter. Suitable for tests and
//! single-process deployments; a relational backend implements the same
//! trait behind the composition root.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{RatingError, Result};
use crate::models::rating::{NewRating, Rating};
use crate::store::DurableStore;

// == Memory Store ==
/// In-memory table of rating records keyed by generated identifier.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<u64, Rating>,
    next_id: u64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn find_by_id(&self, id: u64) -> Result<Rating> {
        let inner = self.inner.read().await;
        inner
            .records
            .get(&id)
            .cloned()
            .ok_or(RatingError::NotFound(id))
    }

    async fn find_by_owner(&self, user_id: Uuid) -> Result<Vec<Rating>> {
        let inner = self.inner.read().await;
        let mut records: Vec<Rating> = inner
            .records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    async fn insert(&self, data: NewRating) -> Result<Rating> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let now = Utc::now();
        let rating = Rating {
            id: inner.next_id,
            user_id: data.user_id,
            score: data.score,
            text: data.text,
            created_at: now,
            updated_at: now,
        };

        inner.records.insert(rating.id, rating.clone());
        Ok(rating)
    }

    async fn save(&self, mut rating: Rating) -> Result<Rating> {
        let mut inner = self.inner.write().await;
        if !inner.records.contains_key(&rating.id) {
            return Err(RatingError::NotFound(rating.id));
        }

        rating.updated_at = Utc::now();
        inner.records.insert(rating.id, rating.clone());
        Ok(rating)
    }

    async fn delete_by_id(&self, id: u64) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.records.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RatingError::NotFound(id)),
        }
    }
}
