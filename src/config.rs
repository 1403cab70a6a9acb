//! Analytics configuration
//! Tuning knobs for ranking and distribution labeling, loadable from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Aggregation tuning. Every field has a default so a partial (or absent)
/// config file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Number of entries kept in top-N rankings.
    pub top_n: usize,
    /// Distribution slices with a share at or below this percentage are
    /// not directly labeled (they stay in totals and the legend).
    pub label_share_floor: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            label_share_floor: 5.0,
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
