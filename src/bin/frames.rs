//! Frame Engine CLI Binary

use clap::Parser;
use frame_engine::cli::{Cli, RunContext};
use frame_engine::config::ConfigLoader;
use frame_engine::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&cli).await {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let context = RunContext::new(cli.config.clone())?;
    info!("CLI context initialized");

    let output = context.execute(&cli.command).await?;
    println!("{}", output);
    Ok(())
}

/// Logging settings from the config file, overridden by CLI flags.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load().map(|c| c.logging).unwrap_or_default();

    if let Some(level) = &cli.log_level {
        config.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.format = format.clone();
    }
    config
}
