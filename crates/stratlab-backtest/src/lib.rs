//! Backtest evaluation.
//!
//! Turns a price series plus a signal series into [`PerformanceMetrics`],
//! comparing the signal-driven position against buy-and-hold.

mod evaluator;
mod metrics;
pub mod report;
mod result;

pub use evaluator::{evaluate, trace, EvaluationTrace, TRADING_DAYS_PER_YEAR};
pub use metrics::{PerformanceMetrics, Verdict};
pub use result::{backtest_symbol, run_strategy, StrategyResult};
