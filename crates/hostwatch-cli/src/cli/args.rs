use clap::Args;

#[derive(Debug, Args)]
pub struct WebArgs {
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
    #[arg(long, default_value_t = 8000)]
    pub port: u16,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Number of reports to return; clamped to the configured range.
    #[arg(long, allow_hyphen_values = true)]
    pub limit: Option<i64>,
}
