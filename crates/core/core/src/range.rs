//! Range selectors for bounding aggregation queries.
//!
//! The dashboard sends a relative window token ("24h", "7d", or nothing for
//! all time). Tokens are resolved against "now" at request time into a
//! half-open `[start, end)` bound.

use chrono::{DateTime, Duration, Utc};

use crate::error::{StatsError, StatsResult};
use crate::event::Event;

/// A relative time window selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeSelector {
    /// The last 24 hours.
    Last24Hours,
    /// The last 7 days.
    Last7Days,
    /// No bound on either side.
    #[default]
    AllTime,
}

impl RangeSelector {
    /// Parses a range token. Absent or empty means all time.
    pub fn parse(token: Option<&str>) -> StatsResult<Self> {
        match token.map(str::trim) {
            None | Some("") => Ok(Self::AllTime),
            Some("24h") => Ok(Self::Last24Hours),
            Some("7d") => Ok(Self::Last7Days),
            Some(other) => Err(StatsError::InvalidRange {
                token: other.to_string(),
            }),
        }
    }

    /// Resolves the selector into concrete bounds relative to `now`.
    ///
    /// Relative windows bound only the start; the end stays open so events
    /// time-stamped slightly ahead of the server clock are not dropped.
    pub fn bounds(&self, now: DateTime<Utc>) -> TimeRange {
        match self {
            Self::Last24Hours => TimeRange::since(now - Duration::hours(24)),
            Self::Last7Days => TimeRange::since(now - Duration::days(7)),
            Self::AllTime => TimeRange::all(),
        }
    }

    /// Returns the wire token for this selector.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Last24Hours => "24h",
            Self::Last7Days => "7d",
            Self::AllTime => "",
        }
    }
}

/// A half-open time interval `[start, end)`.
///
/// A `None` bound means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRange {
    /// Inclusive lower bound.
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// The unbounded range ("All Time").
    pub fn all() -> Self {
        Self::default()
    }

    /// Range bounded below, open above.
    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Range with both bounds.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Whether `instant` falls inside `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if instant < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if instant >= end {
                return false;
            }
        }
        true
    }

    /// Whether an event's timestamp falls inside this range.
    pub fn matches(&self, event: &Event) -> bool {
        self.contains(event.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        assert_eq!(RangeSelector::parse(None).unwrap(), RangeSelector::AllTime);
        assert_eq!(
            RangeSelector::parse(Some("")).unwrap(),
            RangeSelector::AllTime
        );
        assert_eq!(
            RangeSelector::parse(Some("24h")).unwrap(),
            RangeSelector::Last24Hours
        );
        assert_eq!(
            RangeSelector::parse(Some("7d")).unwrap(),
            RangeSelector::Last7Days
        );
    }

    #[test]
    fn test_parse_unknown_token() {
        let err = RangeSelector::parse(Some("30d")).unwrap_err();
        assert!(matches!(err, StatsError::InvalidRange { ref token } if token == "30d"));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_bounds_are_relative_to_now() {
        let now = Utc::now();
        let range = RangeSelector::Last24Hours.bounds(now);

        assert_eq!(range.start, Some(now - Duration::hours(24)));
        assert_eq!(range.end, None);
        assert!(range.contains(now));
        assert!(!range.contains(now - Duration::hours(25)));
    }

    #[test]
    fn test_all_time_is_unbounded() {
        let range = RangeSelector::AllTime.bounds(Utc::now());
        assert!(range.contains(Utc::now() - Duration::days(10_000)));
        assert!(range.contains(Utc::now() + Duration::days(10_000)));
    }

    #[test]
    fn test_half_open_upper_bound() {
        let start = Utc::now();
        let end = start + Duration::hours(1);
        let range = TimeRange::between(start, end);

        assert!(range.contains(start));
        assert!(!range.contains(end));
    }
}
