//! Filter pipeline
//! Applies the active predicates in a fixed order, producing a new view
//! over the shared record set

use crate::models::{EventRecord, EventSelector, FilterCriteria, RecordSet};
use tracing::debug;

impl FilterCriteria {
    /// Apply every active predicate to `records`, returning the surviving
    /// rows in their original order.
    ///
    /// Predicates run in a fixed order (date range, event type, source IP),
    /// each narrowing the working set. With no active predicate the output
    /// equals the input. The source set is never mutated; an empty output
    /// is a valid result, not an error.
    pub fn apply(&self, records: &RecordSet) -> Vec<EventRecord> {
        let view: Vec<EventRecord> = records
            .records()
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();
        debug!("Filter pass kept {} of {} records", view.len(), records.len());
        view
    }

    fn matches(&self, record: &EventRecord) -> bool {
        // 1. Date range, inclusive on both ends; active only with both
        //    endpoints present. Null timestamps cannot satisfy it.
        if let Some(range) = self.date_range {
            match record.timestamp {
                Some(timestamp) if range.contains(timestamp.date()) => {}
                _ => return false,
            }
        }
        // 2. Event type, case-sensitive exact match.
        if let EventSelector::Only(ref wanted) = self.event {
            if record.event_id != *wanted {
                return false;
            }
        }
        // 3. Source-IP membership; an absent IP is never a member.
        if !self.source_ips.is_empty() {
            match record.source_ip {
                Some(ref ip) if self.source_ips.contains(ip) => {}
                _ => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateRange;
    use chrono::NaiveDate;

    fn record(
        timestamp: Option<&str>,
        event_id: &str,
        source_ip: Option<&str>,
        user: Option<&str>,
    ) -> EventRecord {
        EventRecord {
            timestamp: timestamp.map(|raw| {
                raw.parse()
                    .unwrap_or_else(|_| panic!("bad test timestamp {raw}"))
            }),
            event_id: event_id.to_string(),
            source_ip: source_ip.map(ToString::to_string),
            user: user.map(ToString::to_string),
        }
    }

    fn sample_set() -> RecordSet {
        RecordSet::new(
            "test".to_string(),
            vec![
                record(Some("2024-01-01T08:00:00"), "4625", Some("1.2.3.4"), Some("root")),
                record(Some("2024-01-02T09:00:00"), "4624", Some("5.6.7.8"), Some("admin")),
                record(None, "4625", Some("9.9.9.9"), None),
            ],
        )
    }

    fn day(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    #[test]
    fn inactive_criteria_is_identity() {
        let records = sample_set();
        let view = FilterCriteria::default().apply(&records);
        assert_eq!(view, records.records());
    }

    #[test]
    fn inactive_predicates_never_change_the_output() {
        let records = sample_set();
        let explicit = FilterCriteria {
            date_range: None,
            event: EventSelector::All,
            source_ips: Default::default(),
        };
        assert_eq!(
            explicit.apply(&records),
            FilterCriteria::default().apply(&records)
        );
    }

    #[test]
    fn output_never_grows_and_rows_pass_through_unmodified() {
        let records = sample_set();
        let criteria = FilterCriteria {
            event: EventSelector::Only("4625".to_string()),
            ..Default::default()
        };
        let view = criteria.apply(&records);
        assert!(view.len() <= records.len());
        for row in &view {
            assert!(records.records().contains(row));
        }
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let records = RecordSet::new(
            "test".to_string(),
            vec![
                record(Some("2024-01-31T23:59:59"), "4625", Some("1.2.3.4"), None),
                record(Some("2024-02-01T00:00:01"), "4625", Some("1.2.3.4"), None),
            ],
        );
        let criteria = FilterCriteria {
            date_range: Some(DateRange {
                start: day("2024-01-01"),
                end: day("2024-01-31"),
            }),
            ..Default::default()
        };
        let view = criteria.apply(&records);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].timestamp, records.records()[0].timestamp);
    }

    #[test]
    fn active_date_range_drops_null_timestamps() {
        let records = sample_set();
        let criteria = FilterCriteria {
            date_range: Some(DateRange {
                start: day("2024-01-01"),
                end: day("2024-12-31"),
            }),
            ..Default::default()
        };
        let view = criteria.apply(&records);
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|row| row.timestamp.is_some()));
    }

    #[test]
    fn event_selector_matches_exactly_and_case_sensitively() {
        let records = RecordSet::new(
            "test".to_string(),
            vec![
                record(None, "sshd_fail", Some("1.2.3.4"), None),
                record(None, "SSHD_FAIL", Some("1.2.3.4"), None),
                record(None, "sshd_fail_2", Some("1.2.3.4"), None),
            ],
        );
        let criteria = FilterCriteria {
            event: EventSelector::Only("sshd_fail".to_string()),
            ..Default::default()
        };
        let view = criteria.apply(&records);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].event_id, "sshd_fail");
    }

    #[test]
    fn ip_membership_excludes_absent_source_ip() {
        let records = RecordSet::new(
            "test".to_string(),
            vec![
                record(None, "4625", Some("1.2.3.4"), None),
                record(None, "4625", None, None),
                record(None, "4625", Some("5.6.7.8"), None),
            ],
        );
        let criteria = FilterCriteria {
            source_ips: ["1.2.3.4".to_string(), "9.9.9.9".to_string()]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let view = criteria.apply(&records);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].source_ip.as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn combined_predicates_narrow_in_sequence() {
        let records = sample_set();
        let criteria = FilterCriteria {
            date_range: Some(DateRange {
                start: day("2024-01-01"),
                end: day("2024-01-02"),
            }),
            event: EventSelector::Only("4625".to_string()),
            source_ips: ["1.2.3.4".to_string()].into_iter().collect(),
        };
        let view = criteria.apply(&records);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].user.as_deref(), Some("root"));
    }

    #[test]
    fn no_matches_yields_an_empty_view() {
        let records = sample_set();
        let criteria = FilterCriteria {
            event: EventSelector::Only("9999".to_string()),
            ..Default::default()
        };
        assert!(criteria.apply(&records).is_empty());
    }
}
