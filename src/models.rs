//! Core data model for SSH authentication log analytics
//! Record, filter criteria, and aggregate snapshot types shared across the pipeline

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One parsed authentication log line.
///
/// `timestamp` is naive on purpose: the source data carries no zone and no
/// conversion is ever performed. A value that failed best-effort parsing is
/// `None`; such rows stay in the set but are excluded from time-bucketed
/// aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub event_id: String,
    pub source_ip: Option<String>,
    pub user: Option<String>,
}

/// A validated, non-empty record set parsed from one source.
///
/// Shared read-only after load; the filter pipeline produces new views
/// rather than mutating it.
#[derive(Debug, Clone)]
pub struct RecordSet {
    label: String,
    records: Vec<EventRecord>,
}

impl RecordSet {
    pub(crate) fn new(label: String, records: Vec<EventRecord>) -> Self {
        Self { label, records }
    }

    /// Source identity this set was parsed from (path or buffer label).
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Inclusive calendar-day range, both endpoints required.
///
/// The widget layer sends either zero or two endpoints; zero maps to an
/// absent range on `FilterCriteria`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Whether `day` falls within the range, inclusive on both ends.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Event-type selector. `All` means no filtering, so an event type
/// literally named "all" stays unambiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSelector {
    #[default]
    All,
    Only(String),
}

/// Immutable snapshot of the active filter parameters.
///
/// The default value leaves every predicate inactive; applying it is the
/// identity transformation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub date_range: Option<DateRange>,
    pub event: EventSelector,
    /// Source-IP membership set; empty means no filter.
    pub source_ips: BTreeSet<String>,
}

/// One entry of a top-N frequency ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub value: String,
    pub count: usize,
}

/// One slice of the event-type distribution.
///
/// `labeled` is false when the share is at or below the label floor; the
/// slice still counts toward totals and appears in the legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub event_id: String,
    pub count: usize,
    pub share_pct: f64,
    pub labeled: bool,
}

/// One hourly bucket of the volume series. `hour` is the timestamp
/// truncated to the containing hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub hour: NaiveDateTime,
    pub count: usize,
}

/// Derived read-only metrics over one filtered view.
///
/// Created fresh per recompute, never mutated, discarded once the
/// presentation layer consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Row count of the filtered view.
    pub total: usize,
    /// Distinct non-null source IPs.
    pub distinct_source_ips: usize,
    /// Distinct non-null users.
    pub distinct_users: usize,
    /// Most frequent source IPs, at most N entries.
    pub top_source_ips: Vec<RankedEntry>,
    /// Most frequent targeted users, at most N entries; null users excluded.
    pub top_users: Vec<RankedEntry>,
    /// Per-event-type counts and shares of the view total.
    pub event_distribution: Vec<DistributionSlice>,
    /// Sparse hourly volume series, ascending by hour. `None` when no row
    /// in the view has a parseable timestamp.
    pub hourly_volume: Option<Vec<HourlyBucket>>,
}
