//! Analyze command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use stratlab_config::AppConfig;
use stratlab_consensus::{analyze, report::render_markdown, Analysis};
use stratlab_core::traits::PriceSource;
use stratlab_strategies::StrategyRegistry;
use tracing::info;

use super::price_source;
use crate::cli::{AnalyzeArgs, OutputFormat};

pub async fn run(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    info!("Starting analysis for symbol: {}", args.symbol);

    let source = price_source(&args.data, config)?;
    let series = source
        .load(&args.symbol)
        .with_context(|| format!("Failed to load prices for {}", args.symbol))?;
    info!(bars = series.len(), "Loaded price history");

    let registry = StrategyRegistry::new();
    let lineup = registry.consensus_lineup(&config.strategies);
    let analysis = analyze(&series, &lineup);

    let rendered = render(&analysis, args.output)?;
    println!("{}", rendered);

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, &rendered)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Report saved to {:?}", save_path);
    }

    Ok(())
}

fn render(analysis: &Analysis, output: OutputFormat) -> Result<String> {
    Ok(match output {
        OutputFormat::Json => analysis.to_json()?,
        OutputFormat::Markdown | OutputFormat::Text => {
            render_markdown(analysis, Local::now().date_naive())
        }
    })
}
