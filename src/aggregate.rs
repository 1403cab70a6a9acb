//! Aggregator
//! Derives counts, rankings, the event-type distribution, and the hourly
//! volume series from one filtered view

use crate::config::AnalyticsConfig;
use crate::models::{AggregateResult, DistributionSlice, EventRecord, HourlyBucket, RankedEntry};
use chrono::{NaiveDateTime, Timelike};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

fn truncate_to_hour(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .date()
        .and_hms_opt(timestamp.hour(), 0, 0)
        .unwrap_or(timestamp)
}

/// Frequency-rank `values`, keeping the `top_n` most frequent. Ties break
/// lexicographically ascending on the value so the ranking is deterministic.
fn rank<'a>(values: impl Iterator<Item = &'a str>, top_n: usize) -> Vec<RankedEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(top_n);
    ranked
        .into_iter()
        .map(|(value, count)| RankedEntry {
            value: value.to_string(),
            count,
        })
        .collect()
}

/// Compute the aggregate snapshot for a non-empty filtered view.
///
/// Callers check for the empty view first; the dashboard session
/// short-circuits to its no-matches state before ever reaching here.
pub fn summarize(records: &[EventRecord], config: &AnalyticsConfig) -> AggregateResult {
    debug_assert!(!records.is_empty(), "summarize requires a non-empty view");
    let total = records.len();

    let distinct_source_ips = records
        .iter()
        .filter_map(|record| record.source_ip.as_deref())
        .collect::<HashSet<_>>()
        .len();
    let distinct_users = records
        .iter()
        .filter_map(|record| record.user.as_deref())
        .collect::<HashSet<_>>()
        .len();

    let top_source_ips = rank(
        records.iter().filter_map(|record| record.source_ip.as_deref()),
        config.top_n,
    );
    let top_users = rank(
        records.iter().filter_map(|record| record.user.as_deref()),
        config.top_n,
    );

    let mut event_counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *event_counts.entry(record.event_id.as_str()).or_insert(0) += 1;
    }
    let mut event_distribution: Vec<DistributionSlice> = event_counts
        .into_iter()
        .map(|(event_id, count)| {
            let share_pct = count as f64 * 100.0 / total as f64;
            DistributionSlice {
                event_id: event_id.to_string(),
                count,
                share_pct,
                labeled: share_pct > config.label_share_floor,
            }
        })
        .collect();
    event_distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.event_id.cmp(&b.event_id)));

    // Sparse series: only hours with at least one event appear, ascending.
    let mut buckets: BTreeMap<NaiveDateTime, usize> = BTreeMap::new();
    for timestamp in records.iter().filter_map(|record| record.timestamp) {
        *buckets.entry(truncate_to_hour(timestamp)).or_insert(0) += 1;
    }
    let hourly_volume = if buckets.is_empty() {
        None
    } else {
        Some(
            buckets
                .into_iter()
                .map(|(hour, count)| HourlyBucket { hour, count })
                .collect(),
        )
    };

    debug!(
        "Summarized {} records: {} distinct IPs, {} distinct users, {} event types",
        total,
        distinct_source_ips,
        distinct_users,
        event_distribution.len()
    );

    AggregateResult {
        total,
        distinct_source_ips,
        distinct_users,
        top_source_ips,
        top_users,
        event_distribution,
        hourly_volume,
    }
}
