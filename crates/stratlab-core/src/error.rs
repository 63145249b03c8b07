//! Error types for the strategy evaluation kernel.

use thiserror::Error;

/// Top-level kernel error.
#[derive(Error, Debug)]
pub enum KernelError {
    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Strategy-specific errors.
///
/// Raised only for things a caller can fix (bad parameters, mismatched inputs).
/// Short series and degenerate arithmetic are never errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),

    #[error("Signal series has {signals} rows but price series has {prices}")]
    SignalLengthMismatch { prices: usize, signals: usize },
}

/// Price data errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Dates must be strictly ascending: {previous} is followed by {next}")]
    NonAscendingDates {
        previous: chrono::NaiveDate,
        next: chrono::NaiveDate,
    },

    #[error("Close must be positive and finite, got {close} on {date}")]
    NonPositiveClose { date: chrono::NaiveDate, close: f64 },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;
