//! # NekoStats Core
//!
//! This crate provides the foundational types for the NekoStats event
//! aggregation service: the `Event` record, error types, range selectors,
//! the aggregation engine, and the trait interfaces that storage adapters
//! and authorization providers implement.

pub mod aggregate;
pub mod auth;
pub mod error;
pub mod event;
pub mod range;
pub mod store;

// Re-export commonly used items at the crate root
pub use aggregate::{
    average_duration_per_day, duration_per_day, events_by_location, events_by_type,
    views_per_day, DashboardSummaries, Dataset, Summary, SummaryKind, PAGE_VIEW,
    UNKNOWN_LOCATION,
};
pub use auth::{AllowAll, Authorizer, Principal, SharedSecret};
pub use error::{StatsError, StatsResult};
pub use event::{Event, EventSubmission, RawTimestamp};
pub use range::{RangeSelector, TimeRange};
pub use store::EventStore;
