// Healthdesk - patient record question assistant
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use healthdesk::assistant::Orchestrator;
use healthdesk::cli::Repl;
use healthdesk::config::load_config;
use healthdesk::metrics::MetricsLogger;
use healthdesk::providers::create_provider;

#[derive(Parser, Debug)]
#[command(name = "healthdesk", version, about = "Ask questions about patient records")]
struct Args {
    /// Path to a config file (default: ~/.healthdesk/config.toml, then environment)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    tracing::info!("Initializing the assistant");

    let config = load_config(args.config.as_deref())?;

    let provider = create_provider(&config)?;

    for (category, path) in config.records.iter() {
        tracing::debug!("Record source {} -> {}", category, path.display());
    }

    let metrics_logger = match &config.metrics_dir {
        Some(dir) => Some(MetricsLogger::new(dir.clone())?),
        None => None,
    };

    let orchestrator = Orchestrator::with_shared_provider(provider, config.records.clone());

    let mut repl = Repl::new(orchestrator, metrics_logger);
    repl.run().await?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
