//! Bollinger-Fibonacci Strategy.
//!
//! Scores each bar by where the close sits inside its Bollinger envelope.
//! Closes near the lower band score positive (oversold), closes near the
//! upper band score negative.

use crate::validation::{require_min, require_positive, require_thresholds};
use crate::{DEFAULT_BUY_THRESHOLD, DEFAULT_SELL_THRESHOLD};
use serde::{Deserialize, Serialize};
use stratlab_core::{
    error::StrategyError,
    traits::{MultiOutputIndicator, SignalFrame, SignalGenerator, StrategyConfig},
    types::PriceSeries,
};
use stratlab_indicators::BollingerBands;
use tracing::debug;

/// Configuration for the Bollinger-Fibonacci strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerFibonacciConfig {
    /// Rolling window for the middle band
    pub window: usize,
    /// Band width in standard deviations
    pub num_std: f64,
    /// Score above which the bar is a BUY
    pub buy_threshold: f64,
    /// Score below which the bar is a SELL
    pub sell_threshold: f64,
}

impl Default for BollingerFibonacciConfig {
    fn default() -> Self {
        Self {
            window: 20,
            num_std: 2.0,
            buy_threshold: DEFAULT_BUY_THRESHOLD,
            sell_threshold: DEFAULT_SELL_THRESHOLD,
        }
    }
}

impl StrategyConfig for BollingerFibonacciConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_min("window", self.window, 2)?;
        require_positive("num_std", self.num_std)?;
        require_thresholds(self.buy_threshold, self.sell_threshold)
    }
}

/// Bollinger-Fibonacci band position strategy.
pub struct BollingerFibonacciStrategy {
    config: BollingerFibonacciConfig,
}

impl BollingerFibonacciStrategy {
    /// Create a new Bollinger-Fibonacci strategy.
    pub fn new(config: BollingerFibonacciConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &BollingerFibonacciConfig {
        &self.config
    }

    fn band_label(percent_b: f64) -> &'static str {
        if percent_b < 0.0 {
            "Below Lower Band (Oversold)"
        } else if percent_b > 1.0 {
            "Above Upper Band (Overbought)"
        } else {
            "Within Bands"
        }
    }
}

impl SignalGenerator for BollingerFibonacciStrategy {
    fn key(&self) -> &str {
        "bollinger_fibonacci"
    }

    fn name(&self) -> &str {
        "Bollinger-Fibonacci"
    }

    fn description(&self) -> &str {
        "Scores the close by its position inside the Bollinger envelope"
    }

    fn generate(&self, series: &PriceSeries) -> Result<SignalFrame, StrategyError> {
        self.config.validate()?;

        let closes = series.closes();
        let bands = BollingerBands::with_params(self.config.window, self.config.num_std)
            .calculate(&closes);

        let scores: Vec<f64> = bands
            .percent_b
            .iter()
            .map(|&pb| (0.5 - pb) * 100.0)
            .collect();

        let last = |v: &[f64]| v.last().copied().unwrap_or(f64::NAN);
        let percent_b = last(&bands.percent_b);
        let percent_b = if percent_b.is_nan() { 0.5 } else { percent_b };

        let frame = SignalFrame::from_scores(
            scores,
            self.config.buy_threshold,
            self.config.sell_threshold,
        );
        debug!(
            strategy = self.key(),
            symbol = series.symbol(),
            bars = series.len(),
            score = frame.current_score,
            "computed band position score"
        );

        Ok(frame
            .with_indicator("percent_b", percent_b)
            .with_indicator("upper_band", last(&bands.upper))
            .with_indicator("middle_band", last(&bands.middle))
            .with_indicator("lower_band", last(&bands.lower))
            .with_note(format!("Band Position: {}", Self::band_label(percent_b))))
    }

    fn warmup_period(&self) -> usize {
        self.config.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use stratlab_core::types::Signal;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_closes("TEST", start, closes).unwrap()
    }

    #[test]
    fn test_config_validation() {
        let mut config = BollingerFibonacciConfig::default();
        assert!(config.validate().is_ok());

        config.window = 1;
        assert!(config.validate().is_err());

        config.window = 20;
        config.num_std = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_flat_series_is_neutral() {
        let strategy = BollingerFibonacciStrategy::new(BollingerFibonacciConfig {
            window: 5,
            ..Default::default()
        });
        let frame = strategy.generate(&series(&[50.0; 30])).unwrap();

        for &score in &frame.scores[4..] {
            assert_abs_diff_eq!(score, 0.0, epsilon = 1e-12);
        }
        assert!(frame.signals.iter().all(|&s| s == Signal::Hold));
        assert_abs_diff_eq!(frame.indicators["percent_b"], 0.5, epsilon = 1e-12);
        assert_eq!(frame.current_signal, Signal::Hold);
    }

    #[test]
    fn test_warmup_scores_are_nan() {
        let strategy = BollingerFibonacciStrategy::new(BollingerFibonacciConfig::default());
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let frame = strategy.generate(&series(&closes)).unwrap();

        assert!(frame.scores[..19].iter().all(|s| s.is_nan()));
        assert!(frame.scores[19].is_finite());
        assert!(frame.signals[..19].iter().all(|&s| s == Signal::Hold));
    }

    #[test]
    fn test_drop_below_band_is_buy() {
        let mut closes = vec![100.0, 101.0, 99.0, 100.0, 101.0, 99.0, 100.0, 101.0, 99.0];
        closes.push(80.0);
        let strategy = BollingerFibonacciStrategy::new(BollingerFibonacciConfig {
            window: 5,
            ..Default::default()
        });
        let frame = strategy.generate(&series(&closes)).unwrap();

        assert!(frame.current_score > 25.0);
        assert_eq!(frame.current_signal, Signal::Buy);
    }

    #[test]
    fn test_spike_above_band_is_sell() {
        let mut closes = vec![100.0, 101.0, 99.0, 100.0, 101.0, 99.0, 100.0, 101.0, 99.0];
        closes.push(120.0);
        let strategy = BollingerFibonacciStrategy::new(BollingerFibonacciConfig {
            window: 5,
            ..Default::default()
        });
        let frame = strategy.generate(&series(&closes)).unwrap();

        assert!(frame.current_score < -25.0);
        assert_eq!(frame.current_signal, Signal::Sell);
    }

    #[test]
    fn test_short_series_is_insufficient() {
        let strategy = BollingerFibonacciStrategy::new(BollingerFibonacciConfig::default());
        let frame = strategy.generate(&series(&[100.0, 101.0, 102.0])).unwrap();

        assert!(!frame.is_warmed_up());
        assert_eq!(frame.current_signal, Signal::Hold);
        assert_eq!(frame.scores.len(), 3);
    }

    #[test]
    fn test_invalid_config_fails_generation() {
        let strategy = BollingerFibonacciStrategy::new(BollingerFibonacciConfig {
            num_std: -1.0,
            ..Default::default()
        });
        let result = strategy.generate(&series(&[100.0; 30]));
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));
    }
}
