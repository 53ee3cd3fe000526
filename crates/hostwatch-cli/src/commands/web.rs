use anyhow::Result;
use hostwatch_core::MonitorConfig;

#[derive(Debug, Clone, Copy)]
pub(super) struct WebServeOptions<'a> {
    pub(super) host: &'a str,
    pub(super) port: u16,
}

pub(super) fn serve(config: &MonitorConfig, options: WebServeOptions<'_>) -> Result<()> {
    hostwatch_web::serve_web(config, options.host, options.port)
}
