//! # NekoStats Memory Adapter
//!
//! An in-memory event store for NekoStats. Suitable for testing,
//! development, and small single-process deployments. Data is lost when the
//! process exits.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nekostats_adapter_memory::MemoryEventStore;
//!
//! let store = MemoryEventStore::new();
//! store.append(&event).await?;
//! ```

use async_trait::async_trait;
use nekostats_core::error::{StatsError, StatsResult};
use nekostats_core::event::Event;
use nekostats_core::range::TimeRange;
use nekostats_core::store::EventStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory event store.
///
/// Appends serialize on the write lock; range reads take the read lock and
/// copy matching records, so every read observes a consistent snapshot as of
/// invocation and never a partially written record.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    events: Arc<RwLock<Vec<Event>>>,
}

impl MemoryEventStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all stored events.
    pub async fn clear(&self) {
        self.events.write().await.clear();
    }

    /// Returns the number of stored events.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Whether the store holds no events.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append(&self, event: &Event) -> StatsResult<Uuid> {
        if event.event_type.trim().is_empty() {
            return Err(StatsError::invalid("type", "must not be empty"));
        }

        let mut events = self.events.write().await;
        events.push(event.clone());
        Ok(event.id)
    }

    async fn query_range(&self, range: &TimeRange) -> StatsResult<Vec<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().filter(|e| range.matches(e)).cloned().collect())
    }

    async fn count(&self) -> StatsResult<usize> {
        Ok(self.events.read().await.len())
    }
}
