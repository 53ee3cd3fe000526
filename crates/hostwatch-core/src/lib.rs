// Public fallible APIs in this crate share one concrete error contract (`MonitorError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod process;
pub mod text;

pub use catalog::ReportCatalog;
pub use config::MonitorConfig;
pub use error::{MonitorError, ParseFailure, Result};
pub use orchestrator::RunOrchestrator;
