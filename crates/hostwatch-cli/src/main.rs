mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    commands::run_from_root(&cli.root, cli.config.as_deref(), cli.command)
}
