use std::time::Duration;

use crate::error::{MonitorError, Result};

pub const ENV_OUTPUT_DIR: &str = "HOSTWATCH_OUTPUT_DIR";
pub const ENV_SCRIPTS_DIR: &str = "HOSTWATCH_SCRIPTS_DIR";
pub const ENV_COLLECTOR: &str = "HOSTWATCH_COLLECTOR";
pub const ENV_STATIC_DIR: &str = "HOSTWATCH_STATIC_DIR";
pub const ENV_RUN_TIMEOUT_SECS: &str = "HOSTWATCH_RUN_TIMEOUT_SECS";
pub const ENV_EXCLUSIVE_RUNS: &str = "HOSTWATCH_EXCLUSIVE_RUNS";
pub const ENV_LOG: &str = "HOSTWATCH_LOG";

/// Raw environment values, captured once so the merge step stays pure.
#[derive(Debug, Clone, Default)]
pub(crate) struct EnvOverrides {
    pub(crate) output_dir: Option<String>,
    pub(crate) scripts_dir: Option<String>,
    pub(crate) collector: Option<String>,
    pub(crate) static_dir: Option<String>,
    pub(crate) run_timeout_secs: Option<String>,
    pub(crate) exclusive_runs: Option<String>,
    pub(crate) log_level: Option<String>,
}

impl EnvOverrides {
    #[must_use]
    pub(crate) fn from_env() -> Self {
        Self {
            output_dir: read_non_empty_env(ENV_OUTPUT_DIR),
            scripts_dir: read_non_empty_env(ENV_SCRIPTS_DIR),
            collector: read_non_empty_env(ENV_COLLECTOR),
            static_dir: read_non_empty_env(ENV_STATIC_DIR),
            run_timeout_secs: read_non_empty_env(ENV_RUN_TIMEOUT_SECS),
            exclusive_runs: read_non_empty_env(ENV_EXCLUSIVE_RUNS),
            log_level: read_non_empty_env(ENV_LOG),
        }
    }
}

#[must_use]
fn read_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn parse_timeout_secs(name: &str, raw: &str) -> Result<Duration> {
    let secs = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| MonitorError::Config(format!("{name} must be a number of seconds: {raw}")))?;
    super::timeout_from_secs(name, secs)
}

pub(crate) fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(MonitorError::Config(format!(
            "invalid {name}: {other} (expected on|off)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_accepts_common_tokens() {
        assert!(parse_flag(ENV_EXCLUSIVE_RUNS, "on").expect("on"));
        assert!(parse_flag(ENV_EXCLUSIVE_RUNS, " TRUE ").expect("true"));
        assert!(!parse_flag(ENV_EXCLUSIVE_RUNS, "0").expect("0"));
        assert!(parse_flag(ENV_EXCLUSIVE_RUNS, "maybe").is_err());
    }

    #[test]
    fn parse_timeout_secs_rejects_zero_and_garbage() {
        assert_eq!(
            parse_timeout_secs(ENV_RUN_TIMEOUT_SECS, "45").expect("45"),
            Duration::from_secs(45)
        );
        assert_eq!(
            parse_timeout_secs(ENV_RUN_TIMEOUT_SECS, "0.5").expect("0.5"),
            Duration::from_millis(500)
        );
        assert!(parse_timeout_secs(ENV_RUN_TIMEOUT_SECS, "0").is_err());
        assert!(parse_timeout_secs(ENV_RUN_TIMEOUT_SECS, "-3").is_err());
        assert!(parse_timeout_secs(ENV_RUN_TIMEOUT_SECS, "soon").is_err());
    }

    #[test]
    fn parse_timeout_secs_rejects_out_of_range_values() {
        for raw in ["1e30", "1e15", "inf", "NaN", "86401"] {
            let err = parse_timeout_secs(ENV_RUN_TIMEOUT_SECS, raw).expect_err(raw);
            assert_eq!(err.code(), "INVALID_CONFIG");
            assert!(err.to_string().contains(ENV_RUN_TIMEOUT_SECS), "{raw}: {err}");
        }
        assert_eq!(
            parse_timeout_secs(ENV_RUN_TIMEOUT_SECS, "86400").expect("one day"),
            Duration::from_secs(86_400)
        );
    }
}
