use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use globset::GlobMatcher;
use serde_json::Value;

use crate::config::{HistoryLimits, MonitorConfig};
use crate::error::{MonitorError, ParseFailure, Result};
use crate::models::{
    AlertCounts, HistoryPage, LatestSummary, Report, ReportEnvelope, ReportFile, Stats,
};

/// Discovers, orders and parses report files in one output directory.
///
/// Reads are lock-free: the collector writes each report completely before it
/// becomes visible, and nothing here mutates the directory.
#[derive(Debug, Clone)]
pub struct ReportCatalog {
    dir: PathBuf,
    matcher: GlobMatcher,
    history: HistoryLimits,
}

impl ReportCatalog {
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        Ok(Self {
            dir: config.output_dir.clone(),
            matcher: config.report_matcher()?,
            history: config.history,
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn history_limits(&self) -> HistoryLimits {
        self.history
    }

    /// Report files sorted newest first. A missing directory is an empty catalog.
    pub fn list_reports(&self) -> Result<Vec<ReportFile>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut reports = Vec::new();
        for entry in entries {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !self.matcher.is_match(&name) {
                continue;
            }
            if !entry.file_type()?.is_file() {
                continue;
            }
            reports.push(ReportFile {
                path: entry.path(),
                name,
            });
        }
        reports.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(reports)
    }

    /// Parse one report. Failures are logged and returned, never raised past the caller.
    pub fn read_report(&self, file: &ReportFile) -> std::result::Result<Report, ParseFailure> {
        let parsed = fs::read(&file.path)
            .map_err(|err| ParseFailure::new(&file.path, err))
            .and_then(|raw| {
                serde_json::from_slice::<Report>(&raw)
                    .map_err(|err| ParseFailure::new(&file.path, err))
            });
        if let Err(failure) = &parsed {
            tracing::warn!(
                report = %file.name,
                reason = %failure.reason,
                "skipping unreadable report"
            );
        }
        parsed
    }

    pub fn latest(&self) -> Result<ReportEnvelope> {
        let reports = self.list_reports()?;
        let Some(newest) = reports.first() else {
            return Err(MonitorError::NotFound("no reports found".to_string()));
        };
        self.read_report(newest)
            .map(|report| envelope(newest, report))
            .map_err(|failure| MonitorError::LatestUnreadable {
                filename: newest.name.clone(),
                reason: failure.reason,
            })
    }

    /// Up to `limit` newest readable reports; unreadable files are skipped.
    pub fn history(&self, limit: Option<i64>) -> Result<HistoryPage> {
        let limit = self.history.clamp(limit);
        let reports = self.list_reports()?;
        let total_available = reports.len();
        let page: Vec<ReportEnvelope> = reports
            .iter()
            .take(limit)
            .filter_map(|file| {
                self.read_report(file)
                    .ok()
                    .map(|report| envelope(file, report))
            })
            .collect();
        Ok(HistoryPage {
            count: page.len(),
            reports: page,
            total_available,
        })
    }

    pub fn stats(&self) -> Result<Stats> {
        let reports = self.list_reports()?;
        let mut stats = Stats {
            total_reports: reports.len(),
            oldest_report: reports.last().map(|file| file.name.clone()),
            newest_report: reports.first().map(|file| file.name.clone()),
            latest: None,
            latest_error: None,
        };
        if let Some(newest) = reports.first() {
            match self.read_report(newest) {
                Ok(report) => {
                    stats.latest = Some(LatestSummary {
                        alert_counts: AlertCounts::tally(report.alerts()),
                        latest_timestamp: field_or_null(&report, "timestamp"),
                        hostname: field_or_null(&report, "hostname"),
                    });
                }
                Err(failure) => stats.latest_error = Some(failure.to_string()),
            }
        }
        Ok(stats)
    }

    /// Name of the newest report, or `None` when nothing can be listed.
    #[must_use]
    pub fn newest_report_name(&self) -> Option<String> {
        match self.list_reports() {
            Ok(reports) => reports.into_iter().next().map(|file| file.name),
            Err(err) => {
                tracing::warn!(dir = %self.dir.display(), error = %err, "cannot list reports");
                None
            }
        }
    }
}

fn envelope(file: &ReportFile, mut report: Report) -> ReportEnvelope {
    report.remove("filename");
    ReportEnvelope {
        filename: file.name.clone(),
        report,
    }
}

fn field_or_null(report: &Report, key: &str) -> Value {
    report.get(key).cloned().unwrap_or(Value::Null)
}
