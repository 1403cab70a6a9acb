//! End-to-end pipeline tests through the public API: load, filter,
//! aggregate, and the recoverable empty states.

use ssh_monitor_core::{
    AnalyticsConfig, DashboardSession, DashboardUpdate, DateRange, EventSelector, FilterCriteria,
    LoadError, RecordSet,
};
use std::sync::Arc;

const SAMPLE_LOG: &str = "\
Timestamp,EventId,SourceIP,User
2024-01-01 08:00:00,4625,1.2.3.4,root
2024-01-02 09:00:00,4624,5.6.7.8,admin
";

fn session_over(data: &str) -> DashboardSession {
    let records = RecordSet::from_reader(data.as_bytes(), "sample").unwrap();
    DashboardSession::new(Arc::new(records), AnalyticsConfig::default())
}

#[test]
fn failed_login_filter_end_to_end() {
    let session = session_over(SAMPLE_LOG);
    let criteria = FilterCriteria {
        event: EventSelector::Only("4625".to_string()),
        ..Default::default()
    };

    let DashboardUpdate::Ready { view, summary } = session.recompute(&criteria) else {
        panic!("expected a ready update");
    };

    assert_eq!(view.len(), 1);
    assert_eq!(view[0].source_ip.as_deref(), Some("1.2.3.4"));
    assert_eq!(view[0].user.as_deref(), Some("root"));

    assert_eq!(summary.total, 1);
    assert_eq!(summary.distinct_source_ips, 1);
    assert_eq!(summary.distinct_users, 1);
    assert_eq!(summary.event_distribution.len(), 1);
    assert_eq!(summary.event_distribution[0].event_id, "4625");
    assert_eq!(summary.event_distribution[0].share_pct, 100.0);
}

#[test]
fn criteria_changes_recompute_from_the_same_base_set() {
    let session = session_over(SAMPLE_LOG);

    let all = session.recompute(&FilterCriteria::default());
    let DashboardUpdate::Ready { summary, .. } = all else {
        panic!("expected a ready update");
    };
    assert_eq!(summary.total, 2);

    // Narrow, then widen again: the base set is untouched in between.
    let narrowed = session.recompute(&FilterCriteria {
        date_range: Some(DateRange {
            start: "2024-01-01".parse().unwrap(),
            end: "2024-01-01".parse().unwrap(),
        }),
        ..Default::default()
    });
    let DashboardUpdate::Ready { summary, .. } = narrowed else {
        panic!("expected a ready update");
    };
    assert_eq!(summary.total, 1);

    let widened = session.recompute(&FilterCriteria::default());
    let DashboardUpdate::Ready { summary, .. } = widened else {
        panic!("expected a ready update");
    };
    assert_eq!(summary.total, 2);
}

#[test]
fn empty_view_is_a_state_not_an_error() {
    let session = session_over(SAMPLE_LOG);
    let update = session.recompute(&FilterCriteria {
        source_ips: ["203.0.113.7".to_string()].into_iter().collect(),
        ..Default::default()
    });
    assert_eq!(update, DashboardUpdate::NoMatches);

    // The session keeps working after a no-matches cycle.
    let update = session.recompute(&FilterCriteria::default());
    assert!(matches!(update, DashboardUpdate::Ready { .. }));
}

#[test]
fn unparsable_timestamps_reach_the_insufficient_data_state() {
    let data = "\
Timestamp,EventId,SourceIP,User
garbage,4625,1.2.3.4,root
also-garbage,4625,1.2.3.4,root
";
    let session = session_over(data);
    let DashboardUpdate::Ready { summary, .. } = session.recompute(&FilterCriteria::default())
    else {
        panic!("expected a ready update");
    };
    assert_eq!(summary.total, 2);
    assert!(summary.hourly_volume.is_none());
}

#[test]
fn schema_failure_yields_no_partial_dataset() {
    let data = "Time,Event\n2024-01-01,4625\n";
    let err = RecordSet::from_reader(data.as_bytes(), "bad").unwrap_err();
    assert!(matches!(err, LoadError::SchemaInvalid { .. }));
}
