//! In-Memory Cache Backend
//!
//! Cache engine combining HashMap storage with LRU tracking and TTL
//! expiration, behind the `CacheStore` contract. Values are stored as JSON
//! payloads, so record and aggregate entries share one engine while their
//! keys live in disjoint namespaces.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, LruTracker};
use crate::error::{RatingError, Result};
use crate::models::rating::Rating;
use crate::store::CacheStore;

// == Memory Cache ==
/// In-memory cache store with LRU eviction and TTL support.
#[derive(Debug)]
pub struct MemoryCache {
    inner: RwLock<CacheInner>,
    /// Maximum number of entries allowed
    max_entries: usize,
}

#[derive(Debug, Default)]
struct CacheInner {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates a new MemoryCache with the specified capacity.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: RwLock::new(CacheInner::default()),
            max_entries,
        }
    }

    // == Raw Get ==
    /// Retrieves a payload by key.
    ///
    /// Expired entries are removed on access and reported as misses.
    async fn get_raw(&self, key: &str) -> Option<String> {
        let mut inner = self.inner.write().await;

        match inner.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                inner.entries.remove(key);
                inner.lru.remove(key);
                debug!(key, "cache entry expired on access");
                None
            }
            Some(entry) => {
                let payload = entry.payload.clone();
                inner.lru.touch(key);
                Some(payload)
            }
            None => None,
        }
    }

    // == Raw Set ==
    /// Stores a payload with a TTL.
    ///
    /// If the key already exists, the payload is overwritten and the TTL is
    /// reset. If the cache is at capacity, the least recently used entry is
    /// evicted first.
    async fn set_raw(&self, key: &str, payload: String, ttl: Duration) {
        let mut inner = self.inner.write().await;

        let is_overwrite = inner.entries.contains_key(key);
        if !is_overwrite && inner.entries.len() >= self.max_entries {
            if let Some(evicted) = inner.lru.evict_oldest() {
                inner.entries.remove(&evicted);
                debug!(key = %evicted, "evicted least recently used cache entry");
            }
        }

        inner
            .entries
            .insert(key.to_string(), CacheEntry::new(payload, ttl));
        inner.lru.touch(key);
    }

    fn get_typed<T: DeserializeOwned>(payload: &str) -> Result<T> {
        serde_json::from_str(payload).map_err(|e| RatingError::Cache(e.to_string()))
    }

    fn set_typed<T: Serialize>(value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| RatingError::Cache(e.to_string()))
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut inner = self.inner.write().await;

        let expired_keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            inner.entries.remove(key);
            inner.lru.remove(key);
        }

        expired_keys.len()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get_record(&self, key: &str) -> Result<Option<Rating>> {
        match self.get_raw(key).await {
            Some(payload) => Ok(Some(Self::get_typed(&payload)?)),
            None => Ok(None),
        }
    }

    async fn set_record(&self, key: &str, rating: &Rating, ttl: Duration) -> Result<()> {
        let payload = Self::set_typed(rating)?;
        self.set_raw(key, payload, ttl).await;
        Ok(())
    }

    async fn get_aggregate(&self, key: &str) -> Result<Option<f64>> {
        match self.get_raw(key).await {
            Some(payload) => Ok(Some(Self::get_typed(&payload)?)),
            None => Ok(None),
        }
    }

    async fn set_aggregate(&self, key: &str, value: f64, ttl: Duration) -> Result<()> {
        let payload = Self::set_typed(&value)?;
        self.set_raw(key, payload, ttl).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.entries.remove(key);
        inner.lru.remove(key);
        Ok(())
    }
}
