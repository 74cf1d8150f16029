//! subtrack - Track recurring subscriptions and total their spend

use clap::Parser;
use std::sync::Arc;
use subtrack::{
    cli::Cli, commands::CommandContext, config::Config, error::Result, store::JsonFileRepository,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first to check for quiet flag
    let cli = Cli::parse();

    // Initialize logging. The --quiet flag should override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("subtrack=info"))
    };

    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if !is_terminal::is_terminal(std::io::stdout()) {
        colored::control::set_override(false);
    }

    let config = Config::from_cli(cli.data_file.as_deref())?;
    info!("Using subscription store at {}", config.data_file.display());

    let repository = Arc::new(JsonFileRepository::new(config.data_file));
    let context = CommandContext::new(repository, cli.json);

    let output = context.execute(&cli.command).await?;
    println!("{}", output.trim_end());

    Ok(())
}
