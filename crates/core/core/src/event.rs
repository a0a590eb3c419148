//! Core data types for NekoStats.
//!
//! This module defines the canonical `Event` record and the
//! `EventSubmission` payload accepted at the ingestion endpoint.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StatsError, StatsResult};

/// One recorded user action.
///
/// Events are immutable once stored: the store is append-only and no
/// operation exists to mutate a persisted record.
///
/// # Example
///
/// ```rust
/// use nekostats_core::Event;
/// use chrono::Utc;
///
/// let event = Event::new(Utc::now(), "page_view");
/// assert_eq!(event.event_type, "page_view");
/// assert_eq!(event.duration_seconds(), 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier, assigned at ingestion time.
    pub id: Uuid,

    /// Instant the event occurred.
    pub timestamp: DateTime<Utc>,

    /// Category string (e.g. "page_view"). Open-ended enumeration.
    #[serde(rename = "type")]
    pub event_type: String,

    /// Where the event originated. Absent/empty is grouped as "Unknown".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Duration in seconds. Absent counts as zero in summations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Event {
    /// Creates a new event with a fresh v4 UUID.
    pub fn new(timestamp: DateTime<Utc>, event_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            event_type: event_type.into(),
            location: None,
            duration: None,
        }
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the duration in seconds.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Returns the duration, treating absent as zero.
    pub fn duration_seconds(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    /// Returns the UTC calendar date of the timestamp as "YYYY-MM-DD".
    ///
    /// This is the grouping key for all per-day aggregations.
    pub fn day_key(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Timestamp as submitted by a producer.
///
/// Browser producers send `Date.now()` (Unix epoch milliseconds); other
/// clients send RFC 3339 text. Both are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Unix epoch milliseconds.
    Millis(i64),
    /// RFC 3339 date-time text.
    Text(String),
}

impl RawTimestamp {
    /// Parses into a UTC instant.
    pub fn parse(&self) -> StatsResult<DateTime<Utc>> {
        match self {
            Self::Millis(ms) => Utc
                .timestamp_millis_opt(*ms)
                .single()
                .ok_or_else(|| {
                    StatsError::invalid("timestamp", format!("out-of-range epoch millis: {ms}"))
                }),
            Self::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| StatsError::invalid("timestamp", e.to_string())),
        }
    }
}

/// Candidate event payload accepted by the ingestion endpoint.
///
/// Validation happens in [`EventSubmission::into_event`]; a rejected
/// submission never reaches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSubmission {
    /// Instant the event occurred. Required.
    pub timestamp: Option<RawTimestamp>,

    /// Category string. Required, non-empty.
    #[serde(rename = "type")]
    pub event_type: Option<String>,

    /// Optional origin of the event.
    pub location: Option<String>,

    /// Optional duration in seconds. Must be non-negative and finite.
    pub duration: Option<f64>,
}

impl EventSubmission {
    /// Validates the submission and converts it into a storable `Event`.
    ///
    /// Rejects with a validation error if the timestamp is missing or
    /// unparseable, the type is missing or empty, or the duration is
    /// negative or non-finite. Assigns a fresh id on success.
    pub fn into_event(self) -> StatsResult<Event> {
        let timestamp = self
            .timestamp
            .ok_or_else(|| StatsError::missing("timestamp"))?
            .parse()?;

        let event_type = match self.event_type {
            Some(t) if !t.trim().is_empty() => t,
            Some(_) => {
                return Err(StatsError::invalid("type", "must not be empty"));
            }
            None => return Err(StatsError::missing("type")),
        };

        if let Some(d) = self.duration {
            if !d.is_finite() {
                return Err(StatsError::invalid("duration", "must be finite"));
            }
            if d < 0.0 {
                return Err(StatsError::invalid("duration", "must be non-negative"));
            }
        }

        Ok(Event {
            id: Uuid::new_v4(),
            timestamp,
            event_type,
            location: self.location,
            duration: self.duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_from_rfc3339() {
        let submission: EventSubmission = serde_json::from_str(
            r#"{"timestamp": "2024-01-01T10:30:00Z", "type": "page_view", "duration": 42.5}"#,
        )
        .unwrap();

        let event = submission.into_event().unwrap();
        assert_eq!(event.event_type, "page_view");
        assert_eq!(event.day_key(), "2024-01-01");
        assert_eq!(event.duration_seconds(), 42.5);
    }

    #[test]
    fn test_submission_from_epoch_millis() {
        // 2024-01-02T00:00:00Z
        let submission: EventSubmission = serde_json::from_str(
            r#"{"timestamp": 1704153600000, "type": "click"}"#,
        )
        .unwrap();

        let event = submission.into_event().unwrap();
        assert_eq!(event.day_key(), "2024-01-02");
        assert_eq!(event.duration_seconds(), 0.0);
    }

    #[test]
    fn test_missing_timestamp_rejected() {
        let submission: EventSubmission =
            serde_json::from_str(r#"{"type": "page_view"}"#).unwrap();

        let err = submission.into_event().unwrap_err();
        assert!(matches!(err, StatsError::MissingField { ref field } if field == "timestamp"));
    }

    #[test]
    fn test_unparseable_timestamp_rejected() {
        let submission: EventSubmission =
            serde_json::from_str(r#"{"timestamp": "yesterday", "type": "page_view"}"#).unwrap();

        let err = submission.into_event().unwrap_err();
        assert!(err.is_user_error());
    }

    #[test]
    fn test_empty_type_rejected() {
        let submission: EventSubmission =
            serde_json::from_str(r#"{"timestamp": "2024-01-01T00:00:00Z", "type": "  "}"#)
                .unwrap();

        assert!(submission.into_event().is_err());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let submission: EventSubmission = serde_json::from_str(
            r#"{"timestamp": "2024-01-01T00:00:00Z", "type": "page_view", "duration": -1.0}"#,
        )
        .unwrap();

        assert!(submission.into_event().is_err());
    }

    #[test]
    fn test_event_serializes_with_type_key() {
        let event = Event::new(Utc::now(), "page_view").with_location("EU");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "page_view");
        assert_eq!(json["location"], "EU");
        assert!(json.get("duration").is_none());
    }

    #[test]
    fn test_distinct_ids() {
        let a = Event::new(Utc::now(), "page_view");
        let b = Event::new(Utc::now(), "page_view");
        assert_ne!(a.id, b.id);
    }
}
