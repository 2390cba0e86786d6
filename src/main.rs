use clap::Parser;
use rsc_pages::cli::{run_cli, Cli};
use rsc_pages::otel::{init_logging, LogConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging(&LogConfig::from_env())?;
    run_cli(Cli::parse()).await
}
