//! MACD-Donchian Strategy.
//!
//! Blends a normalised MACD momentum score with the close's position
//! inside a Donchian channel.

use crate::validation::{require_finite, require_min, require_thresholds};
use crate::{DEFAULT_BUY_THRESHOLD, DEFAULT_SELL_THRESHOLD};
use serde::{Deserialize, Serialize};
use stratlab_core::{
    error::StrategyError,
    traits::{MultiOutputIndicator, SignalFrame, SignalGenerator, StrategyConfig},
    types::PriceSeries,
};
use stratlab_indicators::{clip, simd::sample_std_simd, DonchianChannel, Macd};
use tracing::debug;

/// Fallback MACD range when the MACD line never moves.
const MACD_RANGE_EPSILON: f64 = 0.001;

/// Configuration for the MACD-Donchian strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdDonchianConfig {
    /// Fast EMA span
    pub fast_period: usize,
    /// Slow EMA span
    pub slow_period: usize,
    /// Signal line EMA span
    pub signal_period: usize,
    /// Donchian channel window
    pub window: usize,
    /// Weight of the MACD score in the blend
    pub macd_weight: f64,
    /// Weight of the Donchian score in the blend
    pub donchian_weight: f64,
    /// Score above which the bar is a BUY
    pub buy_threshold: f64,
    /// Score below which the bar is a SELL
    pub sell_threshold: f64,
}

impl Default for MacdDonchianConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            window: 20,
            macd_weight: 0.6,
            donchian_weight: 0.4,
            buy_threshold: DEFAULT_BUY_THRESHOLD,
            sell_threshold: DEFAULT_SELL_THRESHOLD,
        }
    }
}

impl StrategyConfig for MacdDonchianConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_min("fast_period", self.fast_period, 1)?;
        require_min("signal_period", self.signal_period, 1)?;
        require_min("window", self.window, 1)?;
        if self.fast_period >= self.slow_period {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be less than slow period".into(),
            ));
        }
        require_finite("macd_weight", self.macd_weight)?;
        require_finite("donchian_weight", self.donchian_weight)?;
        require_thresholds(self.buy_threshold, self.sell_threshold)
    }
}

/// MACD-Donchian combined strategy.
pub struct MacdDonchianStrategy {
    config: MacdDonchianConfig,
}

impl MacdDonchianStrategy {
    /// Create a new MACD-Donchian strategy.
    pub fn new(config: MacdDonchianConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &MacdDonchianConfig {
        &self.config
    }

    /// Three sample standard deviations of the whole MACD line.
    ///
    /// The range is taken over the full series, so the score at bar t is
    /// scaled by information from after t. Positions in the backtest are
    /// still lagged by one bar.
    fn typical_range(macd_line: &[f64]) -> f64 {
        let finite: Vec<f64> = macd_line.iter().copied().filter(|v| v.is_finite()).collect();
        let range = 3.0 * sample_std_simd(&finite);
        if range.is_finite() && range > 0.0 {
            range
        } else {
            MACD_RANGE_EPSILON
        }
    }
}

impl SignalGenerator for MacdDonchianStrategy {
    fn key(&self) -> &str {
        "macd_donchian"
    }

    fn name(&self) -> &str {
        "MACD-Donchian"
    }

    fn description(&self) -> &str {
        "Blends normalised MACD momentum with Donchian channel position"
    }

    fn generate(&self, series: &PriceSeries) -> Result<SignalFrame, StrategyError> {
        self.config.validate()?;

        let closes = series.closes();
        let macd = Macd::with_periods(
            self.config.fast_period,
            self.config.slow_period,
            self.config.signal_period,
        )
        .calculate(&closes);
        let channel = DonchianChannel::new(self.config.window).calculate_hlc(
            &series.highs(),
            &series.lows(),
            &closes,
        );

        let range = Self::typical_range(&macd.macd);
        let macd_scores: Vec<f64> = macd
            .macd
            .iter()
            .zip(&macd.signal)
            .map(|(m, s)| clip((m - s) / range, -1.0, 1.0) * 50.0)
            .collect();
        let donchian_scores: Vec<f64> = channel
            .position_pct
            .iter()
            .map(|&pos| (pos - 0.5) * 100.0)
            .collect();

        let scores: Vec<f64> = macd_scores
            .iter()
            .zip(&donchian_scores)
            .map(|(m, d)| self.config.macd_weight * m + self.config.donchian_weight * d)
            .collect();

        let last = |v: &[f64]| v.last().copied().unwrap_or(f64::NAN);
        let macd_line = last(&macd.macd);
        let signal_line = last(&macd.signal);

        let frame = SignalFrame::from_scores(
            scores,
            self.config.buy_threshold,
            self.config.sell_threshold,
        );
        debug!(
            strategy = self.key(),
            symbol = series.symbol(),
            bars = series.len(),
            macd_range = range,
            score = frame.current_score,
            "computed macd/donchian score"
        );

        let crossover = if macd_line > signal_line {
            "MACD Above Signal"
        } else {
            "MACD Below Signal"
        };

        Ok(frame
            .with_indicator("macd_score", last(&macd_scores))
            .with_indicator("donchian_score", last(&donchian_scores))
            .with_indicator("macd_line", macd_line)
            .with_indicator("signal_line", signal_line)
            .with_indicator("donchian_position", last(&channel.position_pct))
            .with_note(format!("MACD Status: {crossover}")))
    }

    fn warmup_period(&self) -> usize {
        self.config.window
    }
}
