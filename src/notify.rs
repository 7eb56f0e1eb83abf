//! Notification Module
//!
//! Fire-and-forget event publication for rating mutations. Publication
//! failures are logged by the controller and never affect call outcomes, so
//! any sink backend (message broker, log, in-memory) is acceptable here.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;

// == Rating Event ==
/// Notification emitted after a successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RatingEvent {
    Created { id: u64, user_id: Uuid },
    Updated { id: u64, user_id: Uuid },
    Deleted { id: u64, user_id: Uuid },
}

// == Event Sink ==
/// Destination for mutation notifications.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publishes one event; delivery is best-effort.
    async fn publish(&self, event: RatingEvent) -> Result<()>;
}

// == Log Sink ==
/// Sink that emits events to the tracing pipeline.
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    /// Creates a new LogSink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventSink for LogSink {
    async fn publish(&self, event: RatingEvent) -> Result<()> {
        debug!(?event, "rating event published");
        Ok(())
    }
}
