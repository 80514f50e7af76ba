use anyhow::Result;
use clap::Parser;
use spendlog::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(cli.log_filter())?)
        .with_writer(std::io::stderr)
        .init();

    cli.run().await
}
