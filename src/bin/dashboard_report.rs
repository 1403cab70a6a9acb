//! Dashboard report tool
//! Host collaborator that loads an SSH authentication log, drives one
//! recompute with criteria built from the command line, and prints the
//! KPIs and breakdowns the dashboard would render

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use ssh_monitor_core::{
    AggregateResult, AnalyticsConfig, DashboardSession, DashboardUpdate, DateRange, EventRecord,
    EventSelector, FilterCriteria, RecordStore,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "dashboard_report",
    about = "Summarize an SSH authentication log with optional filters",
    version
)]
struct Args {
    /// CSV log to analyze
    #[arg(long, default_value = "data/dataset_ssh.csv")]
    input: PathBuf,

    /// Start of the inclusive date filter; requires --end-date
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// End of the inclusive date filter; requires --start-date
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Keep only this event type (exact, case-sensitive match)
    #[arg(long)]
    event: Option<String>,

    /// Keep only these source IPs; repeatable
    #[arg(long = "ip")]
    ips: Vec<String>,

    /// Analytics configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Serialize)]
struct Report<'a> {
    source: &'a str,
    criteria: &'a FilterCriteria,
    summary: &'a AggregateResult,
}

fn criteria_from_args(args: &Args) -> Result<FilterCriteria> {
    let date_range = match (args.start_date, args.end_date) {
        (Some(start), Some(end)) => {
            if end < start {
                bail!("--end-date must not precede --start-date");
            }
            Some(DateRange { start, end })
        }
        (None, None) => None,
        _ => bail!("--start-date and --end-date must be given together"),
    };
    Ok(FilterCriteria {
        date_range,
        event: args
            .event
            .clone()
            .map(EventSelector::Only)
            .unwrap_or_default(),
        source_ips: args.ips.iter().cloned().collect(),
    })
}

fn print_text(source: &str, view: &[EventRecord], summary: &AggregateResult) {
    println!("\n=== SSH Monitoring Summary ({source}) ===\n");
    println!("Total events:   {}", summary.total);
    println!("Unique IPs:     {}", summary.distinct_source_ips);
    println!("Targeted users: {}", summary.distinct_users);

    println!("\nTop source IPs:");
    for (idx, entry) in summary.top_source_ips.iter().enumerate() {
        println!("  {}. {}: {}", idx + 1, entry.value, entry.count);
    }

    println!("\nTop targeted users:");
    if summary.top_users.is_empty() {
        println!("  (no user data)");
    }
    for (idx, entry) in summary.top_users.iter().enumerate() {
        println!("  {}. {}: {}", idx + 1, entry.value, entry.count);
    }

    println!("\nEvent type distribution:");
    for slice in &summary.event_distribution {
        if slice.labeled {
            println!("  {}: {} ({:.1}%)", slice.event_id, slice.count, slice.share_pct);
        } else {
            println!("  {}: {}", slice.event_id, slice.count);
        }
    }

    match &summary.hourly_volume {
        Some(series) => {
            println!("\nHourly volume:");
            for bucket in series {
                println!("  {}: {}", bucket.hour.format("%Y-%m-%d %H:00"), bucket.count);
            }
        }
        None => println!("\nInsufficient temporal data for the hourly volume chart."),
    }

    println!("\nFiltered view: {} row(s)", view.len());
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AnalyticsConfig::from_file(path)?,
        None => AnalyticsConfig::default(),
    };
    let criteria = criteria_from_args(&args)?;

    let store = RecordStore::new();
    let records = store
        .load(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let session = DashboardSession::new(records, config);

    match session.recompute(&criteria) {
        DashboardUpdate::NoMatches => println!("No records match the current filters."),
        DashboardUpdate::Ready { view, summary } => match args.format {
            OutputFormat::Json => {
                let report = Report {
                    source: session.records().label(),
                    criteria: &criteria,
                    summary: &summary,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => print_text(session.records().label(), &view, &summary),
        },
    }
    Ok(())
}
