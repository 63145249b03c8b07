//! Scan command implementation.

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use stratlab_config::AppConfig;
use stratlab_consensus::{analyze, rank, scan::render_table, Analysis};
use stratlab_core::{error::KernelResult, traits::PriceSource};
use stratlab_strategies::StrategyRegistry;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::price_source;
use crate::cli::{OutputFormat, ScanArgs};

pub async fn run(args: ScanArgs, config: &AppConfig) -> Result<()> {
    let symbols = if args.symbols.is_empty() {
        config.app.watchlist.clone()
    } else {
        args.symbols.clone()
    };
    if symbols.is_empty() {
        bail!("No symbols to scan. Pass --symbols or set app.watchlist in the config file");
    }
    info!("Scanning {} symbols", symbols.len());

    let source = Arc::new(price_source(&args.data, config)?);
    let settings = Arc::new(config.strategies.clone());
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));

    // Each symbol runs on its own blocking worker
    let mut handles = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let permit = Arc::clone(&permits)
            .acquire_owned()
            .await
            .context("Scan worker pool closed")?;
        let source = Arc::clone(&source);
        let settings = Arc::clone(&settings);
        let task_symbol = symbol.clone();
        let handle = tokio::task::spawn_blocking(move || -> KernelResult<Analysis> {
            let _permit = permit;
            let series = source.load(&task_symbol)?;
            let lineup = StrategyRegistry::new().consensus_lineup(&settings);
            Ok(analyze(&series, &lineup))
        });
        handles.push((symbol, handle));
    }

    let mut analyses = Vec::with_capacity(handles.len());
    for (symbol, handle) in handles {
        match handle.await.context("Scan worker panicked")? {
            Ok(analysis) => analyses.push(analysis),
            Err(e) => warn!(symbol = %symbol, error = %e, "Skipping symbol"),
        }
    }
    if analyses.is_empty() {
        bail!("No symbol could be analysed");
    }

    let ranked = rank(&analyses);
    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
        OutputFormat::Text | OutputFormat::Markdown => print!("{}", render_table(&ranked)),
    }

    Ok(())
}
