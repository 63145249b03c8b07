//! Dual Moving Average Crossover Strategy.
//!
//! Emits a BUY on the bar where the short MA crosses above the long MA
//! (golden cross) and a SELL on the bar where it crosses below (death
//! cross). Every other bar is HOLD, so the backtest position stays in
//! place between crosses.

use crate::validation::require_min;
use serde::{Deserialize, Serialize};
use stratlab_core::{
    error::StrategyError,
    traits::{SignalFrame, SignalGenerator, StrategyConfig},
    types::{MaType, Position, PriceSeries, Signal, SignalSeries, VerdictRule},
};
use stratlab_indicators::moving_average;
use std::collections::BTreeMap;
use tracing::debug;

/// Trend strength (percent) above which the trend reads as strong.
const STRONG_TREND_PCT: f64 = 5.0;

/// How many recent crossovers to list in the notes.
const RECENT_CROSSOVERS: usize = 5;

/// Configuration for the Dual MA strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DualMaConfig {
    /// Short moving average period
    pub short_period: usize,
    /// Long moving average period
    pub long_period: usize,
    /// Moving average flavour
    pub ma_type: MaType,
}

impl Default for DualMaConfig {
    fn default() -> Self {
        Self {
            short_period: 50,
            long_period: 200,
            ma_type: MaType::Ema,
        }
    }
}

impl StrategyConfig for DualMaConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_min("short_period", self.short_period, 1)?;
        if self.short_period >= self.long_period {
            return Err(StrategyError::InvalidConfig(
                "Short period must be less than long period".into(),
            ));
        }
        Ok(())
    }
}

/// Direction of a moving average crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossKind {
    /// Short MA crossed above the long MA
    Golden,
    /// Short MA crossed below the long MA
    Death,
}

impl CrossKind {
    /// Signal emitted on the crossing bar.
    pub fn signal(&self) -> Signal {
        match self {
            CrossKind::Golden => Signal::Buy,
            CrossKind::Death => Signal::Sell,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrossKind::Golden => "Golden Cross",
            CrossKind::Death => "Death Cross",
        }
    }
}

/// A crossover event at bar `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crossover {
    pub index: usize,
    pub kind: CrossKind,
}

/// Find every bar where `short` crosses `long`.
///
/// A golden cross needs `short > long` now and `short <= long` on the
/// previous bar; a death cross is the mirror. Bars where either average is
/// NaN never cross.
pub fn find_crossovers(short: &[f64], long: &[f64]) -> Vec<Crossover> {
    let len = short.len().min(long.len());
    (1..len)
        .filter_map(|t| {
            let (s, l) = (short[t], long[t]);
            let (ps, pl) = (short[t - 1], long[t - 1]);
            let kind = if s > l && ps <= pl {
                CrossKind::Golden
            } else if s < l && ps >= pl {
                CrossKind::Death
            } else {
                return None;
            };
            Some(Crossover { index: t, kind })
        })
        .collect()
}

/// Dual Moving Average crossover strategy.
pub struct DualMaStrategy {
    config: DualMaConfig,
}

impl DualMaStrategy {
    /// Create a new Dual MA strategy.
    pub fn new(config: DualMaConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &DualMaConfig {
        &self.config
    }

    /// Display position: LONG while short > long, SHORT otherwise.
    fn current_position(short: f64, long: f64) -> Position {
        if short.is_nan() || long.is_nan() {
            Position::Flat
        } else if short > long {
            Position::Long
        } else {
            Position::Short
        }
    }

    fn market_condition(position: Position, trend_strength: f64) -> &'static str {
        let strong = trend_strength > STRONG_TREND_PCT;
        match (position, strong) {
            (Position::Long, true) => "Strong uptrend",
            (Position::Long, false) => "Moderate uptrend",
            (Position::Short, true) => "Strong downtrend",
            (Position::Short, false) => "Moderate downtrend",
            (Position::Flat, _) => "Insufficient data",
        }
    }
}

impl SignalGenerator for DualMaStrategy {
    fn key(&self) -> &str {
        "dual_ma"
    }

    fn name(&self) -> &str {
        "Dual Moving Average"
    }

    fn description(&self) -> &str {
        "Trades golden and death crosses of a short and long moving average"
    }

    fn generate(&self, series: &PriceSeries) -> Result<SignalFrame, StrategyError> {
        self.config.validate()?;

        let closes = series.closes();
        let short = moving_average(self.config.ma_type, self.config.short_period, &closes);
        let long = moving_average(self.config.ma_type, self.config.long_period, &closes);

        let crossovers = find_crossovers(&short, &long);
        let mut signals: SignalSeries = vec![Signal::Hold; closes.len()];
        for cross in &crossovers {
            signals[cross.index] = cross.kind.signal();
        }

        // Signed spread in percent of the long MA
        let scores: Vec<f64> = short
            .iter()
            .zip(&long)
            .map(|(s, l)| (s - l) / l * 100.0)
            .collect();

        let current_short = short.last().copied().unwrap_or(f64::NAN);
        let current_long = long.last().copied().unwrap_or(f64::NAN);
        let position = Self::current_position(current_short, current_long);
        let current_signal = match position {
            Position::Long => Signal::Buy,
            Position::Short => Signal::Sell,
            Position::Flat => Signal::Hold,
        };
        let current_score = scores.last().copied().unwrap_or(f64::NAN);
        let trend_strength = current_score.abs();

        let golden = crossovers
            .iter()
            .filter(|c| c.kind == CrossKind::Golden)
            .count();
        let death = crossovers.len() - golden;

        debug!(
            strategy = self.key(),
            symbol = series.symbol(),
            bars = series.len(),
            golden_crosses = golden,
            death_crosses = death,
            position = position.as_str(),
            "computed moving average crossovers"
        );

        let mut indicators = BTreeMap::new();
        indicators.insert("short_ma".to_string(), current_short);
        indicators.insert("long_ma".to_string(), current_long);
        indicators.insert("trend_strength".to_string(), trend_strength);
        indicators.insert("golden_crosses".to_string(), golden as f64);
        indicators.insert("death_crosses".to_string(), death as f64);

        let bars = series.bars();
        let mut notes = vec![
            format!("Current Position: {position}"),
            format!(
                "Market Condition: {}",
                Self::market_condition(position, trend_strength)
            ),
        ];
        let skip = crossovers.len().saturating_sub(RECENT_CROSSOVERS);
        notes.extend(crossovers[skip..].iter().map(|cross| {
            let bar = &bars[cross.index];
            format!(
                "{}: {} ({}) at {:.2}",
                bar.date,
                cross.kind.as_str(),
                cross.kind.signal(),
                bar.close
            )
        }));

        Ok(SignalFrame {
            scores,
            signals,
            current_score,
            current_signal,
            indicators,
            notes,
        })
    }

    fn warmup_period(&self) -> usize {
        match self.config.ma_type {
            MaType::Sma => self.config.long_period,
            MaType::Ema => 2,
        }
    }

    // Crossover timing is judged on return alone
    fn verdict_rule(&self) -> VerdictRule {
        VerdictRule::ReturnOnly
    }
}
