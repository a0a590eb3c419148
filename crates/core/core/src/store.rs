//! Trait for durable event storage.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StatsResult;
use crate::event::Event;
use crate::range::TimeRange;

/// Trait for append-only event persistence.
///
/// Implementations are the single shared mutable resource in the service:
/// they must serialize conflicting appends internally while letting range
/// reads proceed against a consistent snapshot as of invocation. Store
/// failures surface as `StatsError::Unavailable` and are safe to retry.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends an event to the store.
    ///
    /// Duplicate submissions create duplicate records: idempotency is not
    /// part of this contract. Returns the id of the stored event.
    async fn append(&self, event: &Event) -> StatsResult<Uuid>;

    /// Returns all events with a timestamp in `[range.start, range.end)`.
    ///
    /// Unbounded sides of the range match everything on that side. No
    /// ordering guarantee: aggregation must not assume store-level order.
    async fn query_range(&self, range: &TimeRange) -> StatsResult<Vec<Event>>;

    /// Returns the total number of stored events.
    async fn count(&self) -> StatsResult<usize>;
}
