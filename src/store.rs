//! Record store
//! Single-pass CSV parsing with an all-or-nothing schema gate and a
//! per-source memo cache

use crate::error::LoadError;
use crate::models::{EventRecord, RecordSet};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Timestamp layouts tried in order after RFC 3339.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Best-effort timestamp coercion. Unparsable values become `None`, they
/// never abort ingestion.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    // Bare dates land on midnight.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
}

fn non_empty(field: Option<&str>) -> Option<String> {
    field
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Resolve the required column positions, all-or-nothing.
fn required_columns(headers: &csv::StringRecord) -> Result<(usize, usize, usize), LoadError> {
    let find = |name: &str| headers.iter().position(|header| header == name);
    match (find("Timestamp"), find("EventId"), find("SourceIP")) {
        (Some(timestamp), Some(event), Some(ip)) => Ok((timestamp, event, ip)),
        (timestamp, event, ip) => {
            let mut missing = Vec::new();
            if timestamp.is_none() {
                missing.push("Timestamp".to_string());
            }
            if event.is_none() {
                missing.push("EventId".to_string());
            }
            if ip.is_none() {
                missing.push("SourceIP".to_string());
            }
            Err(LoadError::SchemaInvalid { missing })
        }
    }
}

impl RecordSet {
    /// Parse delimited tabular input into a validated record set.
    ///
    /// The header must carry `Timestamp`, `EventId`, and `SourceIP` by
    /// exact name; `User` is optional and extra columns are ignored. Rows
    /// whose timestamp fails best-effort parsing keep a null timestamp.
    pub fn from_reader<R: Read>(reader: R, label: &str) -> Result<Self, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let (timestamp_idx, event_idx, ip_idx) = required_columns(&headers)?;
        let user_idx = headers.iter().position(|header| header == "User");

        let mut records = Vec::new();
        let mut unparsed_timestamps = 0usize;
        for row in csv_reader.records() {
            let row = row?;
            let raw_timestamp = row.get(timestamp_idx).unwrap_or("");
            let timestamp = parse_timestamp(raw_timestamp);
            if timestamp.is_none() && !raw_timestamp.trim().is_empty() {
                unparsed_timestamps += 1;
            }
            records.push(EventRecord {
                timestamp,
                event_id: row.get(event_idx).unwrap_or("").to_string(),
                source_ip: non_empty(row.get(ip_idx)),
                user: user_idx.and_then(|idx| non_empty(row.get(idx))),
            });
        }

        if records.is_empty() {
            return Err(LoadError::EmptySource {
                label: label.to_string(),
            });
        }
        if unparsed_timestamps > 0 {
            warn!(
                "{} of {} timestamps in {} did not parse and were kept as null",
                unparsed_timestamps,
                records.len(),
                label
            );
        }
        info!("Loaded {} records from {}", records.len(), label);
        Ok(RecordSet::new(label.to_string(), records))
    }
}

/// Loads record sets and memoizes them per source path. The source does
/// not change within a session, so a repeated load returns the shared set
/// without re-reading the file.
#[derive(Default)]
pub struct RecordStore {
    cache: RwLock<HashMap<String, Arc<RecordSet>>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a record set from a CSV file, memoized by path.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Arc<RecordSet>, LoadError> {
        let path = path.as_ref();
        let key = path.to_string_lossy().into_owned();
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            debug!("Record set cache hit for {}", key);
            return Ok(Arc::clone(cached));
        }

        let set = Arc::new(Self::load_uncached(path)?);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&set));
        Ok(set)
    }

    /// Parse a CSV file without touching the cache (the host's upload path,
    /// where the buffer identity is not a stable key).
    pub fn load_uncached<P: AsRef<Path>>(path: P) -> Result<RecordSet, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::SourceUnavailable {
            path: path.display().to_string(),
            source,
        })?;
        RecordSet::from_reader(file, &path.to_string_lossy())
    }

    /// Drop every memoized set.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
