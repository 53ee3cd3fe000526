use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MonitorError, Result};

/// On-disk configuration. Every key is optional; absent keys keep the layered default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) scripts_dir: Option<PathBuf>,
    pub(crate) collector: Option<PathBuf>,
    pub(crate) static_dir: Option<PathBuf>,
    pub(crate) report_pattern: Option<String>,
    pub(crate) run_timeout_secs: Option<f64>,
    pub(crate) stdout_tail_chars: Option<usize>,
    pub(crate) stderr_tail_chars: Option<usize>,
    pub(crate) exclusive_runs: Option<bool>,
    pub(crate) log_level: Option<String>,
    #[serde(default)]
    pub(crate) history: HistoryFileConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct HistoryFileConfig {
    pub(crate) default_limit: Option<usize>,
    pub(crate) min_limit: Option<usize>,
    pub(crate) max_limit: Option<usize>,
}

impl FileConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            MonitorError::Config(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::parse(&raw)
            .map_err(|err| MonitorError::Config(format!("{}: {err}", path.display())))
    }

    pub(crate) fn parse(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
