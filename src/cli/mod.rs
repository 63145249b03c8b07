//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stratlab")]
#[command(author, version, about = "Multi-strategy technical signal and backtest evaluation")]
pub struct Cli {
    /// Configuration file path (optional; defaults apply when absent)
    #[arg(short, long, default_value = "config/default.toml", env = "STRATLAB_CONFIG")]
    pub config: PathBuf,

    /// Log level (overrides the config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the four consensus strategies on one symbol and print the report
    Analyze(AnalyzeArgs),
    /// Backtest a single strategy on one symbol
    Backtest(BacktestArgs),
    /// Analyse several symbols concurrently and rank them
    Scan(ScanArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration and print the effective settings
    ValidateConfig,
}

/// Where prices come from and which window to keep.
#[derive(clap::Args, Clone)]
pub struct DataArgs {
    /// Directory of <SYMBOL>.csv files (defaults to app.data_dir)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// First date to keep (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last date to keep (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[derive(clap::Args)]
pub struct AnalyzeArgs {
    /// Symbol to analyse
    #[arg(short = 'S', long)]
    pub symbol: String,

    #[command(flatten)]
    pub data: DataArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "markdown")]
    pub output: OutputFormat,

    /// Save the rendered output to a file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Strategy to backtest
    #[arg(short, long)]
    pub strategy: String,

    /// Symbol to backtest
    #[arg(short = 'S', long)]
    pub symbol: String,

    #[command(flatten)]
    pub data: DataArgs,

    /// Strategy configuration file (JSON); overrides the config file section
    #[arg(long)]
    pub strategy_config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save results to file (JSON)
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Symbols to scan (comma-separated; defaults to app.watchlist)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    #[command(flatten)]
    pub data: DataArgs,

    /// Maximum symbols analysed at once
    #[arg(short, long, default_value = "4")]
    pub jobs: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}
