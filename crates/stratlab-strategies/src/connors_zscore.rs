//! Connors RSI + Z-Score Strategy.
//!
//! Short-period RSI centred on zero, blended with a clipped rolling z-score
//! of the close. The RSI leg is plain RSI; the streak and percentile-rank
//! terms of the canonical Connors RSI are not included.

use crate::validation::{require_finite, require_min, require_thresholds};
use crate::{DEFAULT_BUY_THRESHOLD, DEFAULT_SELL_THRESHOLD};
use serde::{Deserialize, Serialize};
use stratlab_core::{
    error::StrategyError,
    traits::{Indicator, SignalFrame, SignalGenerator, StrategyConfig},
    types::PriceSeries,
};
use stratlab_indicators::{clip, Rsi, ZScore};
use tracing::debug;

/// Z-scores beyond this magnitude saturate the z-score leg.
const ZSCORE_CLIP: f64 = 3.0;

/// Configuration for the Connors RSI + Z-Score strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnorsZScoreConfig {
    /// RSI lookback
    pub rsi_period: usize,
    /// Rolling window for the z-score
    pub zscore_window: usize,
    /// Weight of the RSI leg (weights need not sum to 1)
    pub connors_weight: f64,
    /// Weight of the z-score leg
    pub zscore_weight: f64,
    /// Score above which the bar is a BUY
    pub buy_threshold: f64,
    /// Score below which the bar is a SELL
    pub sell_threshold: f64,
}

impl Default for ConnorsZScoreConfig {
    fn default() -> Self {
        Self {
            rsi_period: 3,
            zscore_window: 20,
            connors_weight: 0.7,
            zscore_weight: 0.3,
            buy_threshold: DEFAULT_BUY_THRESHOLD,
            sell_threshold: DEFAULT_SELL_THRESHOLD,
        }
    }
}

impl StrategyConfig for ConnorsZScoreConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_min("rsi_period", self.rsi_period, 1)?;
        require_min("zscore_window", self.zscore_window, 2)?;
        require_finite("connors_weight", self.connors_weight)?;
        require_finite("zscore_weight", self.zscore_weight)?;
        require_thresholds(self.buy_threshold, self.sell_threshold)
    }
}

/// Connors RSI + Z-Score combined strategy.
pub struct ConnorsZScoreStrategy {
    config: ConnorsZScoreConfig,
}

impl ConnorsZScoreStrategy {
    /// Create a new Connors RSI + Z-Score strategy.
    pub fn new(config: ConnorsZScoreConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ConnorsZScoreConfig {
        &self.config
    }
}

impl SignalGenerator for ConnorsZScoreStrategy {
    fn key(&self) -> &str {
        "connors_zscore"
    }

    fn name(&self) -> &str {
        "Connors RSI + Z-Score"
    }

    fn description(&self) -> &str {
        "Blends short-period RSI with a clipped rolling z-score of the close"
    }

    fn generate(&self, series: &PriceSeries) -> Result<SignalFrame, StrategyError> {
        self.config.validate()?;

        let closes = series.closes();
        let rsi = Rsi::new(self.config.rsi_period).calculate(&closes);
        let zscore = ZScore::new(self.config.zscore_window).calculate(&closes);

        let scores: Vec<f64> = rsi
            .iter()
            .zip(&zscore)
            .map(|(&r, &z)| {
                let connors_score = (r - 50.0) * 2.0;
                let zscore_score = clip(z, -ZSCORE_CLIP, ZSCORE_CLIP) * (100.0 / ZSCORE_CLIP);
                self.config.connors_weight * connors_score
                    + self.config.zscore_weight * zscore_score
            })
            .collect();

        let current_rsi = rsi.last().copied().filter(|v| !v.is_nan()).unwrap_or(50.0);
        let current_z = zscore.last().copied().filter(|v| !v.is_nan()).unwrap_or(0.0);

        let frame = SignalFrame::from_scores(
            scores,
            self.config.buy_threshold,
            self.config.sell_threshold,
        );
        debug!(
            strategy = self.key(),
            symbol = series.symbol(),
            bars = series.len(),
            rsi = current_rsi,
            zscore = current_z,
            score = frame.current_score,
            "computed rsi/zscore score"
        );

        Ok(frame
            .with_indicator("connors_rsi", current_rsi)
            .with_indicator("zscore", current_z))
    }

    fn warmup_period(&self) -> usize {
        (self.config.rsi_period + 1).max(self.config.zscore_window)
    }
}
