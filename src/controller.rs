//! Rating Controller Module
//!
//! The cache-aside consistency controller. For every read and write it
//! decides whether to consult the cache, how to populate it, and how to
//! invalidate it, so cached values never outlive a mutation to the same
//! record beyond the entry TTL.
//!
//! # Policy
//! - Aggregate reads are cache-aside: serve a hit directly, recompute from
//!   the durable store on a miss and populate the cache afterward.
//! - Record writes are write-through: the mutated record replaces the cached
//!   copy under its own key, and the owner's cached aggregate is dropped so
//!   the next read recomputes it.
//! - Durable-store errors are fatal to the call; cache errors never are. A
//!   cache fault during a read falls through to the store; during a write it
//!   is surfaced as a warning on an otherwise successful response.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use crate::aggregate;
use crate::error::{RatingError, Result};
use crate::models::rating::{NewRating, Rating, RatingPatch};
use crate::notify::{EventSink, RatingEvent};
use crate::store::{CacheStore, DurableStore};

/// TTL applied to every cache entry the controller writes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

// == Cache Keys ==
// Records and aggregates share one cache instance; the disjoint prefixes
// keep the two value kinds from ever conflating.

fn record_key(id: u64) -> String {
    format!("rating:{}", id)
}

fn aggregate_key(user_id: &Uuid) -> String {
    format!("rating:aggregate:{}", user_id)
}

// == Rating Outcome ==
/// Result of a successful mutation.
///
/// `cache_warning` reports a cache fault that accompanied an already-durable
/// write; callers must tolerate it on an otherwise successful call.
#[derive(Debug)]
pub struct RatingOutcome {
    /// The record as persisted by the durable store
    pub rating: Rating,
    /// Non-fatal cache fault, if the write-through or invalidation failed
    pub cache_warning: Option<String>,
}

// == Rating Controller ==
/// Orchestrates reads and writes across the durable store and the cache.
///
/// Holds no cross-call mutable state and takes no locks; correctness relies
/// on each store being individually safe for concurrent access. Every
/// operation runs on the caller's task, so dropping a request future
/// abandons in-flight store calls at the adapter boundary; a durable write
/// that completes anyway stays durable, there is no rollback.
pub struct RatingController {
    repo: Arc<dyn DurableStore>,
    cache: Arc<dyn CacheStore>,
    events: Arc<dyn EventSink>,
    cache_ttl: Duration,
}

impl RatingController {
    // == Constructor ==
    /// Creates a controller over the given store handles.
    pub fn new(
        repo: Arc<dyn DurableStore>,
        cache: Arc<dyn CacheStore>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            repo,
            cache,
            events,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Overrides the cache entry TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    // == Get User Rating ==
    /// Returns the aggregate rating for one rated subject.
    ///
    /// Serves a cached aggregate when present; otherwise recomputes the mean
    /// over all of the subject's records and caches the result. Only the
    /// recompute path can fail the call; cache faults fall through to the
    /// durable store and a failed cache write still returns the computed
    /// value.
    pub async fn get_user_rating(&self, user_id: Uuid) -> Result<f64> {
        let key = aggregate_key(&user_id);

        match self.cache.get_aggregate(&key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(err) => warn!(%user_id, %err, "cache read failed, falling back to store"),
        }

        let records = self.repo.find_by_owner(user_id).await?;
        let scores: Vec<u8> = records.iter().map(|r| r.score).collect();
        let value = aggregate::mean(&scores);

        if let Err(err) = self
            .cache
            .set_aggregate(&key, value, self.cache_ttl)
            .await
        {
            warn!(%user_id, %err, "failed to cache aggregate rating");
        }

        Ok(value)
    }

    // == Create Report ==
    /// Creates a rating record.
    ///
    /// Validation runs before any store I/O. The inserted record is
    /// written through to the cache and the owner's cached aggregate is
    /// invalidated.
    pub async fn create_report(&self, data: NewRating) -> Result<RatingOutcome> {
        if let Some(msg) = data.validate() {
            return Err(RatingError::Validation(msg));
        }

        let rating = self.repo.insert(data).await?;
        let cache_warning = self.write_through(&rating).await;

        self.notify(RatingEvent::Created {
            id: rating.id,
            user_id: rating.user_id,
        })
        .await;

        Ok(RatingOutcome {
            rating,
            cache_warning,
        })
    }

    // == Update Report ==
    /// Applies a partial update to an existing record.
    ///
    /// Merge policy: a zero score keeps the stored score, a non-empty text
    /// replaces the stored text, and the owner is never taken from the
    /// patch. The merged record is written through to the cache and the
    /// owner's cached aggregate is invalidated.
    pub async fn update_report(&self, id: u64, patch: RatingPatch) -> Result<RatingOutcome> {
        if let Some(msg) = patch.validate() {
            return Err(RatingError::Validation(msg));
        }

        let mut rating = self.repo.find_by_id(id).await?;
        if patch.score != 0 {
            rating.score = patch.score;
        }
        if !patch.text.is_empty() {
            rating.text = patch.text;
        }

        let rating = self.repo.save(rating).await?;
        let cache_warning = self.write_through(&rating).await;

        self.notify(RatingEvent::Updated {
            id: rating.id,
            user_id: rating.user_id,
        })
        .await;

        Ok(RatingOutcome {
            rating,
            cache_warning,
        })
    }

    // == Delete Report ==
    /// Deletes a record and invalidates both of its cache entries.
    ///
    /// The owner's cached aggregate is dropped at delete time, not left to
    /// TTL expiry. Returns a cache warning if invalidation failed after the
    /// durable delete succeeded.
    pub async fn delete_report(&self, id: u64) -> Result<Option<String>> {
        // The record is fetched first: the delete contract only carries the
        // id, and the owner's aggregate key needs the owner.
        let rating = self.repo.find_by_id(id).await?;
        self.repo.delete_by_id(id).await?;

        let mut cache_warning = None;
        for key in [record_key(id), aggregate_key(&rating.user_id)] {
            if let Err(err) = self.cache.delete(&key).await {
                warn!(id, %key, %err, "cache invalidation failed after delete");
                cache_warning.get_or_insert(err.to_string());
            }
        }

        self.notify(RatingEvent::Deleted {
            id,
            user_id: rating.user_id,
        })
        .await;

        Ok(cache_warning)
    }

    // == Write Through ==
    /// Replaces the cached record and drops the owner's cached aggregate.
    ///
    /// The aggregate lives under its own key, so superseding the record
    /// entry does not supersede a stale aggregate; it has to be deleted
    /// explicitly. Returns the first cache fault encountered, if any.
    async fn write_through(&self, rating: &Rating) -> Option<String> {
        let mut warning = None;

        if let Err(err) = self
            .cache
            .set_record(&record_key(rating.id), rating, self.cache_ttl)
            .await
        {
            warn!(id = rating.id, %err, "cache write-through failed");
            warning.get_or_insert(err.to_string());
        }

        if let Err(err) = self.cache.delete(&aggregate_key(&rating.user_id)).await {
            warn!(id = rating.id, %err, "aggregate invalidation failed");
            warning.get_or_insert(err.to_string());
        }

        warning
    }

    // == Notify ==
    /// Publishes a mutation event; failures are logged and swallowed.
    async fn notify(&self, event: RatingEvent) {
        if let Err(err) = self.events.publish(event).await {
            warn!(%err, "failed to publish rating event");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::cache::MemoryCache;
    use crate::store::MemoryStore;

    // == Counting Store ==
    // Wraps the in-memory store and counts calls, so tests can assert which
    // reads were served from cache.
    struct CountingStore {
        inner: MemoryStore,
        owner_lookups: AtomicUsize,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                owner_lookups: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }

        fn owner_lookups(&self) -> usize {
            self.owner_lookups.load(Ordering::SeqCst)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DurableStore for CountingStore {
        async fn find_by_id(&self, id: u64) -> Result<Rating> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(id).await
        }

        async fn find_by_owner(&self, user_id: Uuid) -> Result<Vec<Rating>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.owner_lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_owner(user_id).await
        }

        async fn insert(&self, data: NewRating) -> Result<Rating> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.insert(data).await
        }

        async fn save(&self, rating: Rating) -> Result<Rating> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.save(rating).await
        }

        async fn delete_by_id(&self, id: u64) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_by_id(id).await
        }
    }

    // == Failing Cache ==
    // Every operation fails, as if the cache backend were unreachable.
    struct FailingCache;

    #[async_trait]
    impl CacheStore for FailingCache {
        async fn get_record(&self, _key: &str) -> Result<Option<Rating>> {
            Err(RatingError::Cache("cache is down".to_string()))
        }

        async fn set_record(&self, _key: &str, _rating: &Rating, _ttl: Duration) -> Result<()> {
            Err(RatingError::Cache("cache is down".to_string()))
        }

        async fn get_aggregate(&self, _key: &str) -> Result<Option<f64>> {
            Err(RatingError::Cache("cache is down".to_string()))
        }

        async fn set_aggregate(&self, _key: &str, _value: f64, _ttl: Duration) -> Result<()> {
            Err(RatingError::Cache("cache is down".to_string()))
        }

        async fn delete(&self, _key: &str) -> Result<()> {
            Err(RatingError::Cache("cache is down".to_string()))
        }
    }

    // == Recording Sink ==
    struct RecordingSink {
        events: Mutex<Vec<RatingEvent>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }

        fn events(&self) -> Vec<RatingEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn publish(&self, event: RatingEvent) -> Result<()> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    struct TestBed {
        controller: RatingController,
        repo: Arc<CountingStore>,
        cache: Arc<MemoryCache>,
        events: Arc<RecordingSink>,
    }

    fn test_bed() -> TestBed {
        let repo = Arc::new(CountingStore::new());
        let cache = Arc::new(MemoryCache::new(100));
        let events = Arc::new(RecordingSink::new());
        let controller = RatingController::new(repo.clone(), cache.clone(), events.clone());
        TestBed {
            controller,
            repo,
            cache,
            events,
        }
    }

    fn new_rating(user_id: Uuid, score: u8, text: &str) -> NewRating {
        NewRating {
            user_id,
            score,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_aggregate_of_unknown_owner_is_zero() {
        let bed = test_bed();

        let value = bed.controller.get_user_rating(Uuid::new_v4()).await.unwrap();
        assert_eq!(value, 0.0);
    }

    #[tokio::test]
    async fn test_second_aggregate_read_is_served_from_cache() {
        let bed = test_bed();
        let user = Uuid::new_v4();

        bed.controller
            .create_report(new_rating(user, 4, "good"))
            .await
            .unwrap();
        bed.controller
            .create_report(new_rating(user, 2, "meh"))
            .await
            .unwrap();

        let first = bed.controller.get_user_rating(user).await.unwrap();
        assert_eq!(first, 3.0);
        assert_eq!(bed.repo.owner_lookups(), 1);

        // No intervening writes: the second read must not hit the store.
        let second = bed.controller.get_user_rating(user).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(bed.repo.owner_lookups(), 1);
    }

    #[tokio::test]
    async fn test_create_validation_performs_zero_store_calls() {
        let bed = test_bed();

        let cases = vec![
            new_rating(Uuid::nil(), 3, "ok"),
            new_rating(Uuid::new_v4(), 0, "ok"),
            new_rating(Uuid::new_v4(), 6, "ok"),
            new_rating(Uuid::new_v4(), 3, ""),
        ];

        for data in cases {
            let result = bed.controller.create_report(data).await;
            assert!(matches!(result, Err(RatingError::Validation(_))));
        }

        assert_eq!(bed.repo.calls(), 0);
        assert!(bed.events.events().is_empty());
    }

    #[tokio::test]
    async fn test_create_writes_through_and_publishes() {
        let bed = test_bed();
        let user = Uuid::new_v4();

        let outcome = bed
            .controller
            .create_report(new_rating(user, 4, "good"))
            .await
            .unwrap();

        assert_ne!(outcome.rating.id, 0);
        assert_eq!(outcome.rating.score, 4);
        assert!(outcome.cache_warning.is_none());

        let cached = bed
            .cache
            .get_record(&record_key(outcome.rating.id))
            .await
            .unwrap();
        assert_eq!(cached, Some(outcome.rating.clone()));

        assert_eq!(
            bed.events.events(),
            vec![RatingEvent::Created {
                id: outcome.rating.id,
                user_id: user,
            }]
        );
    }

    #[tokio::test]
    async fn test_update_merge_keeps_zero_score_and_replaces_text() {
        let bed = test_bed();
        let user = Uuid::new_v4();

        let created = bed
            .controller
            .create_report(new_rating(user, 4, "good"))
            .await
            .unwrap()
            .rating;

        let updated = bed
            .controller
            .update_report(
                created.id,
                RatingPatch {
                    score: 0,
                    text: "better".to_string(),
                },
            )
            .await
            .unwrap()
            .rating;

        assert_eq!(updated.score, 4, "zero score must leave the score as is");
        assert_eq!(updated.text, "better");
        assert_eq!(updated.user_id, user);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_replaces_score_and_keeps_empty_text() {
        let bed = test_bed();
        let user = Uuid::new_v4();

        let created = bed
            .controller
            .create_report(new_rating(user, 2, "fine"))
            .await
            .unwrap()
            .rating;

        let updated = bed
            .controller
            .update_report(
                created.id,
                RatingPatch {
                    score: 5,
                    text: String::new(),
                },
            )
            .await
            .unwrap()
            .rating;

        assert_eq!(updated.score, 5);
        assert_eq!(updated.text, "fine", "empty text must leave the text as is");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let bed = test_bed();

        let result = bed
            .controller
            .update_report(404, RatingPatch::default())
            .await;
        assert!(matches!(result, Err(RatingError::NotFound(404))));
    }

    #[tokio::test]
    async fn test_update_out_of_range_score_fails_validation() {
        let bed = test_bed();

        let result = bed
            .controller
            .update_report(
                1,
                RatingPatch {
                    score: 9,
                    text: String::new(),
                },
            )
            .await;
        assert!(matches!(result, Err(RatingError::Validation(_))));
        assert_eq!(bed.repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_invalidates_cached_aggregate() {
        let bed = test_bed();
        let user = Uuid::new_v4();

        let created = bed
            .controller
            .create_report(new_rating(user, 2, "fine"))
            .await
            .unwrap()
            .rating;

        // Prime the aggregate cache.
        assert_eq!(bed.controller.get_user_rating(user).await.unwrap(), 2.0);
        assert_eq!(bed.repo.owner_lookups(), 1);

        bed.controller
            .update_report(
                created.id,
                RatingPatch {
                    score: 5,
                    text: String::new(),
                },
            )
            .await
            .unwrap();

        // The pre-update aggregate must be gone.
        assert_eq!(
            bed.cache.get_aggregate(&aggregate_key(&user)).await.unwrap(),
            None
        );

        // The next read recomputes rather than serving the stale value.
        assert_eq!(bed.controller.get_user_rating(user).await.unwrap(), 5.0);
        assert_eq!(bed.repo.owner_lookups(), 2);

        // And the cached record reflects the merge.
        let cached = bed
            .cache
            .get_record(&record_key(created.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.score, 5);
    }

    #[tokio::test]
    async fn test_delete_invalidates_record_and_aggregate() {
        let bed = test_bed();
        let user = Uuid::new_v4();

        let created = bed
            .controller
            .create_report(new_rating(user, 4, "good"))
            .await
            .unwrap()
            .rating;

        // Prime the aggregate cache.
        assert_eq!(bed.controller.get_user_rating(user).await.unwrap(), 4.0);

        let warning = bed.controller.delete_report(created.id).await.unwrap();
        assert!(warning.is_none());

        assert!(matches!(
            bed.repo.find_by_id(created.id).await,
            Err(RatingError::NotFound(_))
        ));
        assert_eq!(
            bed.cache.get_record(&record_key(created.id)).await.unwrap(),
            None
        );
        assert_eq!(
            bed.cache.get_aggregate(&aggregate_key(&user)).await.unwrap(),
            None
        );

        // The remaining (now empty) set recomputes to zero.
        assert_eq!(bed.controller.get_user_rating(user).await.unwrap(), 0.0);

        let events = bed.events.events();
        assert_eq!(
            events.last(),
            Some(&RatingEvent::Deleted {
                id: created.id,
                user_id: user,
            })
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let bed = test_bed();

        let result = bed.controller.delete_report(404).await;
        assert!(matches!(result, Err(RatingError::NotFound(404))));
    }

    #[tokio::test]
    async fn test_cache_failure_is_non_fatal_for_reads() {
        let repo = Arc::new(CountingStore::new());
        let events = Arc::new(RecordingSink::new());
        let controller = RatingController::new(
            repo.clone(),
            Arc::new(FailingCache),
            events.clone(),
        );
        let user = Uuid::new_v4();

        let outcome = controller
            .create_report(new_rating(user, 3, "ok"))
            .await
            .unwrap();
        assert_eq!(outcome.rating.score, 3);
        assert!(outcome.cache_warning.is_some(), "create surfaces the fault");

        // Reads fall through to the durable store.
        let value = controller.get_user_rating(user).await.unwrap();
        assert_eq!(value, 3.0);

        // Every read recomputes while the cache is down.
        controller.get_user_rating(user).await.unwrap();
        assert_eq!(repo.owner_lookups(), 2);
    }

    #[tokio::test]
    async fn test_cache_failure_is_surfaced_but_non_blocking_on_delete() {
        let repo = Arc::new(CountingStore::new());
        let controller = RatingController::new(
            repo.clone(),
            Arc::new(FailingCache),
            Arc::new(RecordingSink::new()),
        );

        let created = controller
            .create_report(new_rating(Uuid::new_v4(), 3, "ok"))
            .await
            .unwrap()
            .rating;

        let warning = controller.delete_report(created.id).await.unwrap();
        assert!(warning.is_some());

        // The delete itself is durable.
        assert!(matches!(
            repo.find_by_id(created.id).await,
            Err(RatingError::NotFound(_))
        ));
    }

    #[test]
    fn test_cache_keys_are_namespaced() {
        let user = Uuid::nil();
        assert_eq!(record_key(7), "rating:7");
        assert_eq!(
            aggregate_key(&user),
            format!("rating:aggregate:{}", Uuid::nil())
        );
    }
}
