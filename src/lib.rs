//! SSH Authentication Log Analytics Core
//!
//! Filter-and-aggregation pipeline behind an SSH monitoring dashboard:
//! validated CSV ingestion, composable filter predicates, and derived
//! metrics over the filtered view. The interactive widget layer and chart
//! rendering are external collaborators; they feed criteria in and consume
//! the aggregate snapshot out.
//!
//! # Modules
//!
//! - `store`: CSV parsing, schema validation, per-source memoization
//! - `filter`: the fixed-order predicate pipeline
//! - `aggregate`: counts, rankings, distribution, hourly volume
//! - `dashboard`: the recompute-on-change session driven by the host
//! - `config`: analytics tuning knobs
//! - `error`: load-time error taxonomy

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod models;
pub mod store;

// Re-export the main types for convenience
pub use aggregate::summarize;
pub use config::AnalyticsConfig;
pub use dashboard::{DashboardSession, DashboardUpdate};
pub use error::LoadError;
pub use models::{
    AggregateResult, DateRange, DistributionSlice, EventRecord, EventSelector, FilterCriteria,
    HourlyBucket, RankedEntry, RecordSet,
};
pub use store::RecordStore;
