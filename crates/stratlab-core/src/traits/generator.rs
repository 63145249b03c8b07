//! Signal generator trait definitions.

use crate::error::StrategyError;
use crate::types::{PriceSeries, ScoreSeries, Signal, SignalSeries, VerdictRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Everything a generator derives from one price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalFrame {
    /// Score per bar, NaN during warm-up
    pub scores: ScoreSeries,
    /// Signal per bar, fed to the backtest evaluator
    pub signals: SignalSeries,
    /// Score of the last bar (NaN when still warming up)
    pub current_score: f64,
    /// Signal reported for the last bar
    pub current_signal: Signal,
    /// Named indicator snapshot at the last bar
    pub indicators: BTreeMap<String, f64>,
    /// Free-form status lines for presentation
    pub notes: Vec<String>,
}

impl SignalFrame {
    /// Build a threshold-classified frame from a score series.
    pub fn from_scores(scores: ScoreSeries, buy_threshold: f64, sell_threshold: f64) -> Self {
        let signals: SignalSeries = scores
            .iter()
            .map(|&s| Signal::from_score(s, buy_threshold, sell_threshold))
            .collect();
        let current_score = scores.last().copied().unwrap_or(f64::NAN);
        let current_signal = Signal::from_score(current_score, buy_threshold, sell_threshold);
        Self {
            scores,
            signals,
            current_score,
            current_signal,
            indicators: BTreeMap::new(),
            notes: Vec::new(),
        }
    }

    /// Record an indicator value for the last bar.
    pub fn with_indicator(mut self, name: &str, value: f64) -> Self {
        self.indicators.insert(name.to_string(), value);
        self
    }

    /// Append a status line.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Whether the last bar has a defined score.
    pub fn is_warmed_up(&self) -> bool {
        self.current_score.is_finite()
    }
}

/// Core signal generator trait.
///
/// A generator maps a price series plus its own configuration to a score
/// series and a discrete signal series. Generators are stateless between
/// calls, so one instance can serve any number of symbols concurrently.
pub trait SignalGenerator: Send + Sync {
    /// Stable machine key (e.g. `macd_donchian`).
    fn key(&self) -> &str;

    /// Display name of this strategy.
    fn name(&self) -> &str;

    /// Compute scores and signals for the whole series.
    fn generate(&self, series: &PriceSeries) -> Result<SignalFrame, StrategyError>;

    /// Bars needed before the first defined score.
    fn warmup_period(&self) -> usize;

    /// Check if the strategy is warmed up (has enough data).
    fn is_warmed_up(&self, bars_available: usize) -> bool {
        bars_available >= self.warmup_period()
    }

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }

    /// Rule used to judge this strategy's backtest against buy-and-hold.
    fn verdict_rule(&self) -> VerdictRule {
        VerdictRule::ReturnAndSharpe
    }
}
