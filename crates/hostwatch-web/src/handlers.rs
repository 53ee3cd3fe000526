use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use hostwatch_core::{MonitorError, ReportCatalog};

use crate::WebState;
use crate::dto::{HistoryQuery, IndexMessage};
use crate::error::monitor_error_response;

const MISSING_FRONTEND_MESSAGE: &str =
    "Dashboard frontend not found. Please ensure static/index.html exists.";

pub async fn index(State(state): State<WebState>) -> Response {
    match tokio::fs::read_to_string(state.static_dir.join("index.html")).await {
        Ok(page) => Html(page).into_response(),
        Err(_) => (
            StatusCode::OK,
            Json(IndexMessage {
                message: MISSING_FRONTEND_MESSAGE.to_string(),
            }),
        )
            .into_response(),
    }
}

pub async fn latest_report(State(state): State<WebState>) -> Response {
    match on_catalog(&state.catalog, ReportCatalog::latest).await {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(err) => monitor_error_response(err, "report.latest"),
    }
}

pub async fn report_history(
    State(state): State<WebState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    match on_catalog(&state.catalog, move |catalog| catalog.history(query.limit)).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => monitor_error_response(err, "report.history"),
    }
}

pub async fn report_stats(State(state): State<WebState>) -> Response {
    match on_catalog(&state.catalog, ReportCatalog::stats).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => monitor_error_response(err, "report.stats"),
    }
}

pub async fn trigger_run(State(state): State<WebState>) -> Response {
    match state.orchestrator.trigger_run().await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => monitor_error_response(err, "run.trigger"),
    }
}

/// Directory scans and file parsing are blocking; keep them off the async workers.
async fn on_catalog<T, F>(catalog: &ReportCatalog, op: F) -> hostwatch_core::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&ReportCatalog) -> hostwatch_core::Result<T> + Send + 'static,
{
    let catalog = catalog.clone();
    tokio::task::spawn_blocking(move || op(&catalog))
        .await
        .map_err(|err| MonitorError::Internal(format!("catalog task failed: {err}")))?
}
