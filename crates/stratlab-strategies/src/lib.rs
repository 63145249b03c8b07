//! Signal generator implementations.
//!
//! This crate provides the four scoring strategies that make up the
//! consensus lineup, plus one standalone variant:
//! - Bollinger-Fibonacci (band position score)
//! - MACD-Donchian (momentum and channel position blend)
//! - Connors RSI + Z-Score (short-term RSI and mean deviation blend)
//! - Dual Moving Average (edge-triggered golden/death crosses)
//! - Bollinger Z-Score (standalone only, never part of the consensus)

mod bollinger_fibonacci;
mod bollinger_zscore;
mod connors_zscore;
mod dual_ma;
mod macd_donchian;
mod registry;
mod validation;

pub use bollinger_fibonacci::{BollingerFibonacciConfig, BollingerFibonacciStrategy};
pub use bollinger_zscore::{BollingerZScoreConfig, BollingerZScoreStrategy};
pub use connors_zscore::{ConnorsZScoreConfig, ConnorsZScoreStrategy};
pub use dual_ma::{find_crossovers, CrossKind, Crossover, DualMaConfig, DualMaStrategy};
pub use macd_donchian::{MacdDonchianConfig, MacdDonchianStrategy};
pub use registry::{
    StrategyDescriptor, StrategyInfo, StrategyRegistry, StrategySettings, CONSENSUS_KEYS,
};

/// Default score above which a threshold strategy signals BUY.
pub const DEFAULT_BUY_THRESHOLD: f64 = 25.0;

/// Default score below which a threshold strategy signals SELL.
pub const DEFAULT_SELL_THRESHOLD: f64 = -25.0;
