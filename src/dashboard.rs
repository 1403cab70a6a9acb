//! Dashboard session
//! Explicit recompute-on-change loop over a loaded record set; the host
//! drives it whenever the filter criteria change

use crate::aggregate::summarize;
use crate::config::AnalyticsConfig;
use crate::models::{AggregateResult, EventRecord, FilterCriteria, RecordSet};
use std::sync::Arc;
use tracing::debug;

/// Outcome of one recompute cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardUpdate {
    /// At least one record survived the filters.
    Ready {
        view: Vec<EventRecord>,
        summary: AggregateResult,
    },
    /// Zero matching rows. A valid terminal state the host renders
    /// explicitly, not an error; the session keeps accepting criteria.
    NoMatches,
}

/// One dashboard session over a loaded record set.
///
/// The set is shared read-only; the session holds no other cross-call
/// state, and every `recompute` is one full synchronous pass through the
/// filter pipeline and the aggregator.
pub struct DashboardSession {
    records: Arc<RecordSet>,
    config: AnalyticsConfig,
}

impl DashboardSession {
    pub fn new(records: Arc<RecordSet>, config: AnalyticsConfig) -> Self {
        Self { records, config }
    }

    /// The full record set the session was opened on.
    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    /// Run the filter pipeline and the aggregator once for `criteria`.
    pub fn recompute(&self, criteria: &FilterCriteria) -> DashboardUpdate {
        let view = criteria.apply(&self.records);
        if view.is_empty() {
            debug!("No records match the current criteria");
            return DashboardUpdate::NoMatches;
        }
        let summary = summarize(&view, &self.config);
        DashboardUpdate::Ready { view, summary }
    }
}
