use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A report file discovered in the output directory. Ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReportFile {
    pub name: String,
    pub path: PathBuf,
}

/// One parsed snapshot written by the collector, kept exactly as written.
///
/// Only the top-level object shape is enforced. Sections are read through
/// accessors so serving a report never rewrites, drops or invents a key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    fields: Map<String, Value>,
}

impl Report {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Entries of the `alerts` array. A missing or non-array section has no alerts.
    pub fn alerts(&self) -> impl ExactSizeIterator<Item = Alert<'_>> {
        self.fields
            .get("alerts")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .map(Alert)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }
}

/// Read-only view of one `alerts` entry. Entries of any JSON type are tolerated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alert<'a>(&'a Value);

impl<'a> Alert<'a> {
    #[must_use]
    pub fn severity(self) -> Option<&'a str> {
        self.0.get("severity").and_then(Value::as_str)
    }

    #[must_use]
    pub fn kind(self) -> Option<&'a str> {
        self.0.get("type").and_then(Value::as_str)
    }

    #[must_use]
    pub fn message(self) -> Option<&'a str> {
        self.0.get("message").and_then(Value::as_str)
    }
}

/// A report as served over the API: the parsed body plus the file it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub filename: String,
    #[serde(flatten)]
    pub report: Report,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub reports: Vec<ReportEnvelope>,
    pub count: usize,
    pub total_available: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertCounts {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
}

impl AlertCounts {
    /// Every entry counts toward `total`; only exact `critical`/`warning` severities are bucketed.
    #[must_use]
    pub fn tally<'a>(alerts: impl IntoIterator<Item = Alert<'a>>) -> Self {
        alerts.into_iter().fold(Self::default(), |mut counts, alert| {
            counts.total += 1;
            match alert.severity() {
                Some("critical") => counts.critical += 1,
                Some("warning") => counts.warning += 1,
                _ => {}
            }
            counts
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestSummary {
    pub latest_timestamp: Value,
    pub hostname: Value,
    pub alert_counts: AlertCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_reports: usize,
    pub oldest_report: Option<String>,
    pub newest_report: Option<String>,
    #[serde(flatten)]
    pub latest: Option<LatestSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_error: Option<String>,
}

/// Outcome of one completed collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub success: bool,
    #[serde(rename = "returncode")]
    pub exit_code: i32,
    #[serde(rename = "stdout")]
    pub stdout_tail: String,
    #[serde(rename = "stderr")]
    pub stderr_tail: String,
    #[serde(rename = "latest_report")]
    pub newest_report_name: Option<String>,
    #[serde(rename = "timestamp")]
    pub completed_at: String,
}
