//! Bollinger Z-Score Strategy.
//!
//! Standalone mean-reversion variant: the score is the raw rolling z-score
//! and the signal fires when it leaves the `±entry_z` corridor. It is
//! runnable on its own but is not part of the consensus lineup.

use crate::validation::{require_min, require_positive};
use serde::{Deserialize, Serialize};
use stratlab_core::{
    error::StrategyError,
    traits::{Indicator, SignalFrame, SignalGenerator, StrategyConfig},
    types::{PriceSeries, Signal, SignalSeries},
};
use stratlab_indicators::ZScore;
use std::collections::BTreeMap;
use tracing::debug;

/// Configuration for the Bollinger Z-Score strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerZScoreConfig {
    /// Rolling window for mean and standard deviation
    pub window: usize,
    /// Z-score magnitude that triggers a signal
    pub entry_z: f64,
}

impl Default for BollingerZScoreConfig {
    fn default() -> Self {
        Self {
            window: 20,
            entry_z: 2.0,
        }
    }
}

impl StrategyConfig for BollingerZScoreConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_min("window", self.window, 2)?;
        require_positive("entry_z", self.entry_z)
    }
}

/// Bollinger Z-Score mean-reversion strategy.
pub struct BollingerZScoreStrategy {
    config: BollingerZScoreConfig,
}

impl BollingerZScoreStrategy {
    /// Create a new Bollinger Z-Score strategy.
    pub fn new(config: BollingerZScoreConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &BollingerZScoreConfig {
        &self.config
    }

    fn classify(&self, z: f64) -> Signal {
        if z < -self.config.entry_z {
            Signal::Buy
        } else if z > self.config.entry_z {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

impl SignalGenerator for BollingerZScoreStrategy {
    fn key(&self) -> &str {
        "bollinger_zscore"
    }

    fn name(&self) -> &str {
        "Bollinger Z-Score"
    }

    fn description(&self) -> &str {
        "Fades closes that stray more than entry_z deviations from the rolling mean"
    }

    fn generate(&self, series: &PriceSeries) -> Result<SignalFrame, StrategyError> {
        self.config.validate()?;

        let scores = ZScore::new(self.config.window).calculate(&series.closes());
        let signals: SignalSeries = scores.iter().map(|&z| self.classify(z)).collect();
        let current_score = scores.last().copied().unwrap_or(f64::NAN);
        let current_signal = self.classify(current_score);

        debug!(
            strategy = self.key(),
            symbol = series.symbol(),
            bars = series.len(),
            zscore = current_score,
            "computed rolling z-score"
        );

        let mut indicators = BTreeMap::new();
        indicators.insert(
            "zscore".to_string(),
            if current_score.is_nan() { 0.0 } else { current_score },
        );

        Ok(SignalFrame {
            scores,
            signals,
            current_score,
            current_signal,
            indicators,
            notes: Vec::new(),
        })
    }

    fn warmup_period(&self) -> usize {
        self.config.window
    }
}
