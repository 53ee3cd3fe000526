use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::catalog::ReportCatalog;
use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::models::RunResult;
use crate::process::{BoundedRunError, run_bounded};
use crate::text::decode_tail;

/// Launches the external collector on demand and reports what it produced.
#[derive(Debug, Clone)]
pub struct RunOrchestrator {
    collector: PathBuf,
    scripts_dir: PathBuf,
    budget: Duration,
    stdout_tail_chars: usize,
    stderr_tail_chars: usize,
    run_gate: Option<Arc<Mutex<()>>>,
    catalog: ReportCatalog,
}

impl RunOrchestrator {
    #[must_use]
    pub fn new(config: &MonitorConfig, catalog: ReportCatalog) -> Self {
        Self {
            collector: config.collector.clone(),
            scripts_dir: config.scripts_dir.clone(),
            budget: config.run_timeout,
            stdout_tail_chars: config.stdout_tail_chars,
            stderr_tail_chars: config.stderr_tail_chars,
            run_gate: config.exclusive_runs.then(|| Arc::new(Mutex::new(()))),
            catalog,
        }
    }

    #[must_use]
    pub fn collector(&self) -> &Path {
        &self.collector
    }

    /// Run the collector once. A timeout kills and reaps the process and yields no result.
    pub async fn trigger_run(&self) -> Result<RunResult> {
        let _guard = match &self.run_gate {
            Some(gate) => Some(gate.try_lock().map_err(|_| MonitorError::RunInFlight)?),
            None => None,
        };
        ensure_executable(&self.collector)?;

        let mut command = Command::new(&self.collector);
        command.current_dir(&self.scripts_dir);

        tracing::info!(
            collector = %self.collector.display(),
            budget_secs = self.budget.as_secs_f64(),
            "starting monitor run"
        );
        let output = match run_bounded(command, self.budget).await {
            Ok(output) => output,
            Err(BoundedRunError::TimedOut { pid, .. }) => {
                tracing::warn!(
                    ?pid,
                    budget_secs = self.budget.as_secs_f64(),
                    "monitor run timed out"
                );
                return Err(MonitorError::Timeout {
                    seconds: self.budget.as_secs_f64(),
                });
            }
            Err(BoundedRunError::Spawn(source) | BoundedRunError::Wait(source)) => {
                return Err(MonitorError::Spawn {
                    path: self.collector.clone(),
                    source,
                });
            }
        };

        let exit_code = output.exit_code();
        tracing::info!(
            exit_code,
            elapsed_ms = u64::try_from(output.elapsed.as_millis()).unwrap_or(u64::MAX),
            "monitor run finished"
        );

        Ok(RunResult {
            success: exit_code == 0,
            exit_code,
            stdout_tail: decode_tail(&output.stdout, self.stdout_tail_chars),
            stderr_tail: decode_tail(&output.stderr, self.stderr_tail_chars),
            newest_report_name: self.catalog.newest_report_name(),
            completed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        })
    }
}

fn ensure_executable(path: &Path) -> Result<()> {
    let launchable = fs::metadata(path).is_ok_and(|meta| meta.is_file() && has_exec_bit(&meta));
    if launchable {
        Ok(())
    } else {
        Err(MonitorError::LaunchFailure {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(unix)]
fn has_exec_bit(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;

    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_exec_bit(_meta: &fs::Metadata) -> bool {
    true
}
