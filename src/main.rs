//! smellgraph - detect code smells from metrics and cluster them

use anyhow::Result;
use clap::Parser;
use smellgraph::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let project = cli::load_config(&cli)?;
    let settings = cli::Settings::resolve(&cli, &project);

    // RUST_LOG wins over --log-level and config
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let started = chrono::Utc::now();
    tracing::debug!("Started at {}", started.to_rfc3339());
    cli::run(cli, project)?;
    tracing::debug!(
        "Done in {}ms",
        (chrono::Utc::now() - started).num_milliseconds()
    );
    Ok(())
}
