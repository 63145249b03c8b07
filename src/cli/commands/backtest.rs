//! Backtest command implementation.

use anyhow::{Context, Result};
use stratlab_backtest::{backtest_symbol, report::render_performance, StrategyResult};
use stratlab_config::AppConfig;
use stratlab_core::traits::SignalGenerator;
use stratlab_strategies::StrategyRegistry;
use tracing::info;

use super::price_source;
use crate::cli::{BacktestArgs, OutputFormat};

pub async fn run(args: BacktestArgs, config: &AppConfig) -> Result<()> {
    info!("Starting backtest for strategy: {}", args.strategy);

    // Create strategy
    let registry = StrategyRegistry::new();
    let generator: Box<dyn SignalGenerator> = match &args.strategy_config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            registry.create(&args.strategy, value)
        }
        None => registry.from_settings(&args.strategy, &config.strategies),
    }
    .context("Failed to create strategy")?;

    // Load data and run backtest
    let source = price_source(&args.data, config)?;
    let result = backtest_symbol(generator.as_ref(), &source, &args.symbol)
        .with_context(|| format!("Backtest failed for {}", args.symbol))?;

    // Output results
    match args.output {
        OutputFormat::Json => println!("{}", result.to_json()?),
        OutputFormat::Text | OutputFormat::Markdown => println!("{}", summary(&result)),
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        std::fs::write(save_path, result.to_json()?)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}

fn summary(result: &StrategyResult) -> String {
    let mut s = format!(
        "{} on {}\nCurrent Signal: {}\nCurrent Score: {:.2}\n",
        result.strategy_name, result.symbol, result.current_signal, result.current_score
    );
    if !result.data_sufficient {
        s.push_str("Data: insufficient history for a current score\n");
    }
    for (name, value) in &result.indicators {
        s.push_str(&format!("{name}: {value:.4}\n"));
    }
    for note in &result.notes {
        s.push_str(note);
        s.push('\n');
    }
    s.push('\n');
    s.push_str(&render_performance(result));
    s
}
