use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::{
    Router, middleware,
    routing::{get, post},
};

use hostwatch_core::{MonitorConfig, ReportCatalog, RunOrchestrator};

mod dto;
mod error;
mod handlers;
mod headers;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) catalog: ReportCatalog,
    pub(crate) orchestrator: RunOrchestrator,
    pub(crate) static_dir: PathBuf,
}

impl WebState {
    pub(crate) fn new(config: &MonitorConfig) -> Result<Self> {
        let catalog = ReportCatalog::new(config).context("invalid report catalog configuration")?;
        Ok(Self {
            orchestrator: RunOrchestrator::new(config, catalog.clone()),
            catalog,
            static_dir: config.static_dir.clone(),
        })
    }
}

/// Start the dashboard API server and block until shutdown.
///
/// # Errors
/// Returns an error when the configuration is rejected, the runtime cannot be created,
/// the socket cannot be bound, or the server exits with a runtime failure.
pub fn serve_web(config: &MonitorConfig, host: &str, port: u16) -> Result<()> {
    let state = WebState::new(config)?;
    log_startup_layout(config);
    let bind_addr = format!("{host}:{port}");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build web runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind web server at {bind_addr}"))?;
        tracing::info!(addr = %listener.local_addr()?, "dashboard api listening");

        axum::serve(listener, app_router(state))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .context("web server failed")
    })
}

fn log_startup_layout(config: &MonitorConfig) {
    tracing::info!(
        output_dir = %config.output_dir.display(),
        collector = %config.collector.display(),
        run_timeout_secs = config.run_timeout.as_secs_f64(),
        exclusive_runs = config.exclusive_runs,
        "serving reports"
    );
    if !config.output_dir.is_dir() {
        tracing::warn!(
            output_dir = %config.output_dir.display(),
            "output directory does not exist yet; catalog is empty"
        );
    }
    if !config.collector.is_file() {
        tracing::warn!(
            collector = %config.collector.display(),
            "monitor script not found; POST /api/run will fail"
        );
    }
}

pub(crate) fn app_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/latest", get(handlers::latest_report))
        .route("/api/history", get(handlers::report_history))
        .route("/api/run", post(handlers::trigger_run))
        .route("/api/stats", get(handlers::report_stats))
        .layer(middleware::from_fn(headers::response_headers_middleware))
        .with_state(state)
}
