//! Load-time error taxonomy for the record store
//! Filter- and aggregation-time "empty" states are modeled as values, not errors

use thiserror::Error;

/// Terminal failures while loading a record set. No partial dataset is
/// surfaced downstream on any of these.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The named source cannot be opened or read.
    #[error("source unavailable: {path}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// One or more required columns are absent from the header row.
    #[error("schema invalid: missing required column(s) {missing:?}")]
    SchemaInvalid { missing: Vec<String> },

    /// The header was valid but the source carried no data rows; a valid
    /// record set is non-empty.
    #[error("no data rows in {label}")]
    EmptySource { label: String },

    /// Structural CSV failure (ragged row, bad quoting).
    #[error("malformed CSV input")]
    Malformed(#[from] csv::Error),
}
