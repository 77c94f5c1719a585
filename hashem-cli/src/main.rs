use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hashem_cli::commands::Cli;

fn main() -> Result<()> {
    // Store activity is logged at info; keep the terminal quiet unless asked
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { cli.execute().await })
}
