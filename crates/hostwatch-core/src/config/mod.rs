use std::path::{Path, PathBuf};
use std::time::Duration;

use globset::{Glob, GlobMatcher};
use serde::{Serialize, Serializer};

use crate::error::{MonitorError, Result};

mod env;
mod file;

pub use env::{
    ENV_COLLECTOR, ENV_EXCLUSIVE_RUNS, ENV_LOG, ENV_OUTPUT_DIR, ENV_RUN_TIMEOUT_SECS,
    ENV_SCRIPTS_DIR, ENV_STATIC_DIR,
};
pub(crate) use env::EnvOverrides;
pub(crate) use file::FileConfig;

pub const DEFAULT_REPORT_PATTERN: &str = "report_*.json";
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_RUN_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_STDOUT_TAIL_CHARS: usize = 2000;
pub const DEFAULT_STDERR_TAIL_CHARS: usize = 1000;
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MIN_HISTORY_LIMIT: usize = 1;
pub const MAX_HISTORY_LIMIT: usize = 100;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Inclusive bounds applied to `history(limit)` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryLimits {
    pub default_limit: usize,
    pub min_limit: usize,
    pub max_limit: usize,
}

impl HistoryLimits {
    /// Clamp a caller-supplied limit; `None` selects the default.
    #[must_use]
    pub fn clamp(self, requested: Option<i64>) -> usize {
        let Some(requested) = requested else {
            return self.default_limit;
        };
        let requested = usize::try_from(requested.max(0)).unwrap_or(usize::MAX);
        requested.clamp(self.min_limit, self.max_limit)
    }
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_HISTORY_LIMIT,
            min_limit: MIN_HISTORY_LIMIT,
            max_limit: MAX_HISTORY_LIMIT,
        }
    }
}

/// Everything the catalog and orchestrator need, resolved up front and passed by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorConfig {
    pub output_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub collector: PathBuf,
    pub static_dir: PathBuf,
    pub report_pattern: String,
    #[serde(rename = "run_timeout_secs", serialize_with = "serialize_secs")]
    pub run_timeout: Duration,
    pub stdout_tail_chars: usize,
    pub stderr_tail_chars: usize,
    pub history: HistoryLimits,
    pub exclusive_runs: bool,
    pub log_level: String,
}

impl MonitorConfig {
    /// Default layout for a project checkout: `output/`, `scripts/monitor.sh`, `dashboard/static/`.
    #[must_use]
    pub fn for_root(root: &Path) -> Self {
        let scripts_dir = root.join("scripts");
        Self {
            output_dir: root.join("output"),
            collector: scripts_dir.join("monitor.sh"),
            scripts_dir,
            static_dir: root.join("dashboard").join("static"),
            report_pattern: DEFAULT_REPORT_PATTERN.to_string(),
            run_timeout: DEFAULT_RUN_TIMEOUT,
            stdout_tail_chars: DEFAULT_STDOUT_TAIL_CHARS,
            stderr_tail_chars: DEFAULT_STDERR_TAIL_CHARS,
            history: HistoryLimits::default(),
            exclusive_runs: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Resolve defaults, then the optional TOML file, then `HOSTWATCH_*` environment overrides.
    pub fn load(root: &Path, config_file: Option<&Path>) -> Result<Self> {
        let mut config = Self::for_root(root);
        if let Some(path) = config_file {
            config.apply_file(root, FileConfig::load(path)?)?;
        }
        config.apply_env(root, &EnvOverrides::from_env())?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn apply_file(&mut self, root: &Path, file: FileConfig) -> Result<()> {
        let scripts_overridden = file.scripts_dir.is_some();
        if let Some(dir) = file.output_dir {
            self.output_dir = resolve_path(root, dir);
        }
        if let Some(dir) = file.scripts_dir {
            self.scripts_dir = resolve_path(root, dir);
        }
        match file.collector {
            Some(collector) => self.collector = resolve_path(root, collector),
            None if scripts_overridden => self.collector = self.scripts_dir.join("monitor.sh"),
            None => {}
        }
        if let Some(dir) = file.static_dir {
            self.static_dir = resolve_path(root, dir);
        }
        if let Some(pattern) = file.report_pattern {
            self.report_pattern = pattern;
        }
        if let Some(secs) = file.run_timeout_secs {
            self.run_timeout = timeout_from_secs("run_timeout_secs", secs)?;
        }
        if let Some(chars) = file.stdout_tail_chars {
            self.stdout_tail_chars = chars;
        }
        if let Some(chars) = file.stderr_tail_chars {
            self.stderr_tail_chars = chars;
        }
        if let Some(limit) = file.history.default_limit {
            self.history.default_limit = limit;
        }
        if let Some(limit) = file.history.min_limit {
            self.history.min_limit = limit;
        }
        if let Some(limit) = file.history.max_limit {
            self.history.max_limit = limit;
        }
        if let Some(exclusive) = file.exclusive_runs {
            self.exclusive_runs = exclusive;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
        Ok(())
    }

    pub(crate) fn apply_env(&mut self, root: &Path, env: &EnvOverrides) -> Result<()> {
        if let Some(dir) = &env.output_dir {
            self.output_dir = resolve_path(root, PathBuf::from(dir));
        }
        if let Some(dir) = &env.scripts_dir {
            self.scripts_dir = resolve_path(root, PathBuf::from(dir));
            if env.collector.is_none() {
                self.collector = self.scripts_dir.join("monitor.sh");
            }
        }
        if let Some(collector) = &env.collector {
            self.collector = resolve_path(root, PathBuf::from(collector));
        }
        if let Some(dir) = &env.static_dir {
            self.static_dir = resolve_path(root, PathBuf::from(dir));
        }
        if let Some(raw) = &env.run_timeout_secs {
            self.run_timeout = env::parse_timeout_secs(ENV_RUN_TIMEOUT_SECS, raw)?;
        }
        if let Some(raw) = &env.exclusive_runs {
            self.exclusive_runs = env::parse_flag(ENV_EXCLUSIVE_RUNS, raw)?;
        }
        if let Some(level) = &env.log_level {
            self.log_level.clone_from(level);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.run_timeout.is_zero() || self.run_timeout > MAX_RUN_TIMEOUT {
            return Err(MonitorError::Config(format!(
                "run timeout must be within (0, {}] seconds",
                MAX_RUN_TIMEOUT.as_secs()
            )));
        }
        if self.stdout_tail_chars == 0 || self.stderr_tail_chars == 0 {
            return Err(MonitorError::Config(
                "output tail bounds must be greater than zero".to_string(),
            ));
        }
        let history = self.history;
        if history.min_limit == 0
            || history.min_limit > history.max_limit
            || !(history.min_limit..=history.max_limit).contains(&history.default_limit)
        {
            return Err(MonitorError::Config(format!(
                "history limits must satisfy 1 <= min ({}) <= default ({}) <= max ({})",
                history.min_limit, history.default_limit, history.max_limit
            )));
        }
        self.report_matcher()?;
        Ok(())
    }

    pub fn report_matcher(&self) -> Result<GlobMatcher> {
        Glob::new(&self.report_pattern)
            .map(|glob| glob.compile_matcher())
            .map_err(|err| {
                MonitorError::Config(format!(
                    "invalid report pattern {}: {err}",
                    self.report_pattern
                ))
            })
    }
}

/// Convert a configured number of seconds into a run budget within `(0, MAX_RUN_TIMEOUT]`.
pub(crate) fn timeout_from_secs(source: &str, secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(MonitorError::Config(format!(
            "{source} must be greater than zero: {secs}"
        )));
    }
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|budget| *budget <= MAX_RUN_TIMEOUT)
        .ok_or_else(|| {
            MonitorError::Config(format!(
                "{source} must be at most {} seconds: {secs}",
                MAX_RUN_TIMEOUT.as_secs()
            ))
        })
}

fn resolve_path(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

fn serialize_secs<S: Serializer>(
    value: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}
