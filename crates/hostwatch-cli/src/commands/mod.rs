use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use hostwatch_core::models::RunResult;
use hostwatch_core::{MonitorConfig, ReportCatalog, RunOrchestrator};

use crate::cli::Commands;
use crate::logging::init_logging;

mod support;
mod web;


use self::support::print_json;
use self::web::{WebServeOptions, serve};

pub(crate) fn run_from_root(
    root: &Path,
    config_file: Option<&Path>,
    command: Commands,
) -> Result<ExitCode> {
    let config = MonitorConfig::load(root, config_file).context("failed to load configuration")?;
    init_logging(&config.log_level);
    tracing::debug!(
        output_dir = %config.output_dir.display(),
        collector = %config.collector.display(),
        "configuration loaded"
    );
    run_with_config(&config, command)
}

fn run_with_config(config: &MonitorConfig, command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Serve(args) => {
            serve(
                config,
                WebServeOptions {
                    host: &args.host,
                    port: args.port,
                },
            )?;
        }
        Commands::Run => {
            let orchestrator = RunOrchestrator::new(config, ReportCatalog::new(config)?);
            let result = run_once(&orchestrator)?;
            print_json(&result)?;
            if !result.success {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Latest => print_json(&ReportCatalog::new(config)?.latest()?)?,
        Commands::History(args) => print_json(&ReportCatalog::new(config)?.history(args.limit)?)?,
        Commands::Stats => print_json(&ReportCatalog::new(config)?.stats()?)?,
        Commands::Config => print_json(config)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn run_once(orchestrator: &RunOrchestrator) -> Result<RunResult> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build run runtime")?;
    Ok(runtime.block_on(orchestrator.trigger_run())?)
}
