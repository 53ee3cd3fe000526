use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;

#[cfg(test)]
mod tests;

pub use args::{HistoryArgs, WebArgs};

#[derive(Debug, Parser)]
#[command(name = "hostwatch")]
#[command(about = "Serve and refresh host monitoring reports", version)]
pub struct Cli {
    /// Project root holding `output/`, `scripts/` and `dashboard/static/`.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Optional TOML file layered over the root defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the dashboard API.
    Serve(WebArgs),
    /// Run the monitor script once and print the run result.
    Run,
    /// Print the newest report.
    Latest,
    /// Print the newest reports, newest first.
    History(HistoryArgs),
    /// Print catalog statistics.
    Stats,
    /// Print the effective configuration.
    Config,
}
