use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, MonitorError>;

/// A single report file that could not be read or decoded.
#[derive(Debug, Error)]
#[error("failed to read report {}: {reason}", path.display())]
pub struct ParseFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl ParseFailure {
    pub(crate) fn new(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("latest report {filename} is unreadable: {reason}")]
    LatestUnreadable { filename: String, reason: String },

    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error("monitor script not found at {}", path.display())]
    LaunchFailure { path: PathBuf },

    #[error("failed to start monitor script {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("monitor script timed out after {seconds} seconds")]
    Timeout { seconds: f64 },

    #[error("a monitor run is already in flight")]
    RunInFlight,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl MonitorError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::LatestUnreadable { .. } => "LATEST_UNREADABLE",
            Self::Parse(_) => "PARSE_FAILURE",
            Self::LaunchFailure { .. } => "LAUNCH_FAILURE",
            Self::Spawn { .. } => "SPAWN_FAILURE",
            Self::Timeout { .. } => "TIMEOUT",
            Self::RunInFlight => "RUN_IN_FLIGHT",
            Self::Config(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            details: None,
        }
    }
}
