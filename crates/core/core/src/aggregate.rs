//! The aggregation engine.
//!
//! Pure functions that fold a sequence of events into the `{labels,
//! datasets}` summaries the dashboard charts consume. Day-based series are
//! keyed by the UTC calendar date of the timestamp and stay sparse: dates
//! with no events are never backfilled with zeros.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{StatsError, StatsResult};
use crate::event::Event;

/// Event type counted by the views-per-day series.
pub const PAGE_VIEW: &str = "page_view";

/// Grouping label for events with no (or empty) location.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// One series of values aligned with a summary's labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Human-readable series name.
    pub label: String,
    /// One value per summary label, in label order.
    pub data: Vec<f64>,
}

/// A `{labels, datasets}` pair for one grouping dimension.
///
/// This is the contract the consuming dashboard renders directly; an empty
/// input sequence yields empty labels and an empty data vector, never an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl Summary {
    fn new(label: impl Into<String>, labels: Vec<String>, data: Vec<f64>) -> Self {
        Self {
            labels,
            datasets: vec![Dataset {
                label: label.into(),
                data,
            }],
        }
    }

    /// Total number of labelled groups.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the summary has no groups.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The single data series. Every engine output carries exactly one.
    pub fn data(&self) -> &[f64] {
        &self.datasets[0].data
    }
}

/// Counts `page_view` events per UTC day.
///
/// Labels are the ascending distinct dates that actually carry views.
pub fn views_per_day(events: &[Event]) -> Summary {
    let mut views: BTreeMap<String, u64> = BTreeMap::new();
    for event in events {
        if event.event_type == PAGE_VIEW {
            *views.entry(event.day_key()).or_insert(0) += 1;
        }
    }

    let (labels, data) = split_sorted(views, |count| count as f64);
    Summary::new("Number of Views", labels, data)
}

/// Sums duration per UTC day over all events, regardless of type.
pub fn duration_per_day(events: &[Event]) -> Summary {
    let mut durations: BTreeMap<String, f64> = BTreeMap::new();
    for event in events {
        *durations.entry(event.day_key()).or_insert(0.0) += event.duration_seconds();
    }

    let (labels, data) = split_sorted(durations, |sum| sum);
    Summary::new("Total Duration (seconds)", labels, data)
}

/// Counts events per location, absent/empty grouped as "Unknown".
///
/// Labels keep the first-seen order of distinct locations.
pub fn events_by_location(events: &[Event]) -> Summary {
    let keys = events.iter().map(|event| {
        match event.location.as_deref() {
            Some(loc) if !loc.is_empty() => loc.to_string(),
            _ => UNKNOWN_LOCATION.to_string(),
        }
    });

    let (labels, data) = count_first_seen(keys);
    Summary::new("Events by Location", labels, data)
}

/// Counts events per type, labels in first-seen order.
pub fn events_by_type(events: &[Event]) -> Summary {
    let keys = events.iter().map(|event| event.event_type.clone());

    let (labels, data) = count_first_seen(keys);
    Summary::new("Events by Type", labels, data)
}

/// Average duration per UTC day.
///
/// For each day: (sum of duration over ALL events on that day) divided by
/// (count of `page_view` events on that day). A zero denominator yields 0
/// for that day rather than propagating NaN or infinity into chart output.
pub fn average_duration_per_day(events: &[Event]) -> Summary {
    let mut per_day: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    for event in events {
        let entry = per_day.entry(event.day_key()).or_insert((0.0, 0));
        entry.0 += event.duration_seconds();
        if event.event_type == PAGE_VIEW {
            entry.1 += 1;
        }
    }

    let (labels, data) = split_sorted(per_day, |(sum, views)| {
        if views == 0 { 0.0 } else { sum / views as f64 }
    });
    Summary::new("Average Duration (seconds)", labels, data)
}

fn split_sorted<V>(groups: BTreeMap<String, V>, value: impl Fn(V) -> f64) -> (Vec<String>, Vec<f64>) {
    let mut labels = Vec::with_capacity(groups.len());
    let mut data = Vec::with_capacity(groups.len());
    for (label, v) in groups {
        labels.push(label);
        data.push(value(v));
    }
    (labels, data)
}

fn count_first_seen(keys: impl Iterator<Item = String>) -> (Vec<String>, Vec<f64>) {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for key in keys {
        if !counts.contains_key(&key) {
            order.push(key.clone());
        }
        *counts.entry(key).or_insert(0) += 1;
    }

    let data = order.iter().map(|label| counts[label] as f64).collect();
    (order, data)
}

/// Which summary a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Views,
    Duration,
    Locations,
    Types,
    AvgDuration,
}

impl SummaryKind {
    /// Parses a chart token from the query string.
    pub fn parse(token: &str) -> StatsResult<Self> {
        match token {
            "views" => Ok(Self::Views),
            "duration" => Ok(Self::Duration),
            "locations" => Ok(Self::Locations),
            "types" => Ok(Self::Types),
            "avg_duration" => Ok(Self::AvgDuration),
            other => Err(StatsError::invalid(
                "chart",
                format!("unknown chart '{other}'"),
            )),
        }
    }

    /// Runs the corresponding aggregation.
    pub fn compute(&self, events: &[Event]) -> Summary {
        match self {
            Self::Views => views_per_day(events),
            Self::Duration => duration_per_day(events),
            Self::Locations => events_by_location(events),
            Self::Types => events_by_type(events),
            Self::AvgDuration => average_duration_per_day(events),
        }
    }
}

/// All five summaries over one input sequence.
///
/// The dashboard fetches these in a single round trip instead of shipping
/// raw event volumes to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummaries {
    pub views: Summary,
    pub durations: Summary,
    pub locations: Summary,
    pub types: Summary,
    pub avg_durations: Summary,
}

impl DashboardSummaries {
    /// Computes every summary from the same unfiltered input.
    pub fn build(events: &[Event]) -> Self {
        Self {
            views: views_per_day(events),
            durations: duration_per_day(events),
            locations: events_by_location(events),
            types: events_by_type(events),
            avg_durations: average_duration_per_day(events),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn at(date: &str, event_type: &str) -> Event {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let ts = Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap());
        Event::new(ts, event_type)
    }

    #[test]
    fn test_views_per_day_filters_and_sorts() {
        let events = vec![
            at("2024-01-02", PAGE_VIEW),
            at("2024-01-01", PAGE_VIEW),
            at("2024-01-01", PAGE_VIEW),
            at("2024-01-01", "click"),
        ];

        let summary = views_per_day(&events);
        assert_eq!(summary.labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(summary.data(), &[2.0, 1.0]);
    }

    #[test]
    fn test_duration_per_day_counts_every_type() {
        let events = vec![
            at("2024-01-01", PAGE_VIEW).with_duration(100.0),
            at("2024-01-01", PAGE_VIEW).with_duration(50.0),
            at("2024-01-02", "click").with_duration(10.0),
        ];

        let summary = duration_per_day(&events);
        assert_eq!(summary.labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(summary.data(), &[150.0, 10.0]);
    }

    #[test]
    fn test_sparse_days_not_backfilled() {
        let events = vec![
            at("2024-01-01", PAGE_VIEW),
            at("2024-01-05", PAGE_VIEW),
        ];

        let summary = views_per_day(&events);
        assert_eq!(summary.labels, vec!["2024-01-01", "2024-01-05"]);
    }

    #[test]
    fn test_locations_first_seen_order_and_unknown() {
        let events = vec![
            at("2024-01-01", PAGE_VIEW).with_location("EU"),
            at("2024-01-01", PAGE_VIEW),
            at("2024-01-01", PAGE_VIEW).with_location("US"),
            at("2024-01-01", PAGE_VIEW).with_location("EU"),
            at("2024-01-01", PAGE_VIEW).with_location(""),
        ];

        let summary = events_by_location(&events);
        assert_eq!(summary.labels, vec!["EU", UNKNOWN_LOCATION, "US"]);
        assert_eq!(summary.data(), &[2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_types_first_seen_order() {
        let events = vec![
            at("2024-01-01", "click"),
            at("2024-01-01", PAGE_VIEW),
            at("2024-01-01", "click"),
        ];

        let summary = events_by_type(&events);
        assert_eq!(summary.labels, vec!["click", PAGE_VIEW]);
        assert_eq!(summary.data(), &[2.0, 1.0]);
    }

    #[test]
    fn test_avg_duration_zero_denominator() {
        // Duration on a day with no page views must not divide by zero.
        let events = vec![
            at("2024-01-01", "click").with_duration(30.0),
            at("2024-01-02", PAGE_VIEW).with_duration(10.0),
            at("2024-01-02", "click").with_duration(30.0),
        ];

        let summary = average_duration_per_day(&events);
        assert_eq!(summary.labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(summary.data(), &[0.0, 40.0]);
        assert!(summary.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_empty_input_yields_empty_summary() {
        let summary = views_per_day(&[]);
        assert!(summary.is_empty());
        assert!(summary.data().is_empty());
    }

    #[test]
    fn test_summary_kind_parse() {
        assert_eq!(SummaryKind::parse("views").unwrap(), SummaryKind::Views);
        assert_eq!(
            SummaryKind::parse("avg_duration").unwrap(),
            SummaryKind::AvgDuration
        );
        assert!(SummaryKind::parse("pie").is_err());
    }

    #[test]
    fn test_dashboard_build_matches_individual_calls() {
        let events = vec![
            at("2024-01-01", PAGE_VIEW).with_duration(5.0),
            at("2024-01-02", "click").with_location("EU"),
        ];

        let dashboard = DashboardSummaries::build(&events);
        assert_eq!(dashboard.views, views_per_day(&events));
        assert_eq!(dashboard.types, events_by_type(&events));
        assert_eq!(dashboard.avg_durations, average_duration_per_day(&events));
    }
}
