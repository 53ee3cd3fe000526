use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use hostwatch_core::MonitorError;

#[expect(
    clippy::needless_pass_by_value,
    reason = "handlers naturally own error values from `Result` and pass them through"
)]
pub fn monitor_error_response(err: MonitorError, operation: &str) -> Response {
    let status = status_for_monitor_error(&err);
    let mut payload = err.to_payload(operation);
    payload.details = match &err {
        MonitorError::LatestUnreadable { filename, .. } => Some(json!({ "filename": filename })),
        MonitorError::LaunchFailure { path } | MonitorError::Spawn { path, .. } => {
            Some(json!({ "path": path.display().to_string() }))
        }
        MonitorError::Timeout { seconds } => Some(json!({ "timeout_secs": seconds })),
        _ => None,
    };
    if status.is_server_error() {
        tracing::error!(operation, code = err.code(), error = %err, "request failed");
    }
    (status, Json(payload)).into_response()
}

fn status_for_monitor_error(err: &MonitorError) -> StatusCode {
    match err {
        MonitorError::NotFound(_) => StatusCode::NOT_FOUND,
        MonitorError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
        MonitorError::RunInFlight => StatusCode::LOCKED,
        MonitorError::Config(_) => StatusCode::BAD_REQUEST,
        MonitorError::LatestUnreadable { .. }
        | MonitorError::Parse(_)
        | MonitorError::LaunchFailure { .. }
        | MonitorError::Spawn { .. }
        | MonitorError::Io(_)
        | MonitorError::Json(_)
        | MonitorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
