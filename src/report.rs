//! Statistics report and export functionality

use crate::stats::StatsSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Point-in-time statistics export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Statistics at generation time
    pub stats: StatsSnapshot,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// How long this process has been recording, in seconds
    pub uptime_secs: f64,
}

impl StatsReport {
    /// Create a report for `stats`
    pub fn new(stats: StatsSnapshot, uptime_secs: f64) -> Self {
        let now: DateTime<Utc> = Utc::now();
        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                uptime_secs,
            },
            stats,
        }
    }

    /// File name with a UTC timestamp, e.g. `keystroke_report_20240101_120000.json`
    pub fn default_filename() -> String {
        format!(
            "keystroke_report_{}.json",
            Utc::now().format("%Y%m%d_%H%M%S")
        )
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
