//! CLI command implementations.

pub mod analyze;
pub mod backtest;
pub mod scan;
pub mod strategies;
pub mod validate;

use anyhow::{Context, Result};
use std::path::PathBuf;
use stratlab_config::AppConfig;
use stratlab_data::{CsvPriceSource, DateRange};

use crate::cli::DataArgs;

/// Build the CSV source from the command line, falling back to the config.
pub(crate) fn price_source(args: &DataArgs, config: &AppConfig) -> Result<CsvPriceSource> {
    let dir = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.app.data_dir));
    let source = CsvPriceSource::new(&dir).with_context(|| {
        format!(
            "Data directory '{}' not found. Pass --data or set app.data_dir",
            dir.display()
        )
    })?;
    Ok(source.with_range(DateRange {
        start: args.start,
        end: args.end,
    }))
}
