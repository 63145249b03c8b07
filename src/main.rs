//! Multi-strategy signal and backtest CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use stratlab_config::load_config;
use stratlab_monitor::{setup_logging, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Setup logging; command line flags win over the config file
    let log_level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let format = LogFormat::from_json_flag(cli.json_logs || config.logging.is_json());
    let _log_guard = setup_logging(&log_level, format, config.logging.file.as_deref().map(Path::new))
        .context("Failed to initialise logging")?;

    // Execute command
    match cli.command {
        Commands::Analyze(args) => cli::commands::analyze::run(args, &config).await,
        Commands::Backtest(args) => cli::commands::backtest::run(args, &config).await,
        Commands::Scan(args) => cli::commands::scan::run(args, &config).await,
        Commands::Strategies => cli::commands::strategies::run().await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, &config).await,
    }
}
