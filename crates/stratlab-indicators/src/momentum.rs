//! Momentum indicators.

use serde::{Deserialize, Serialize};
use stratlab_core::traits::{Indicator, MultiOutputIndicator};

use crate::moving_average::Ema;
use crate::simd::mean_simd;

/// Relative Strength Index (RSI).
///
/// Uses simple rolling means of the positive and negative price changes
/// (not Wilder smoothing). The first change is undefined, so the first
/// `period` outputs are NaN. A window without losses reads 100.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_gain.is_nan() || avg_loss.is_nan() {
            f64::NAN
        } else if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        }
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; data.len()];
        if data.len() <= self.period {
            return result;
        }

        // Calculate price changes; gains[i] belongs to bar i + 1
        let mut gains = Vec::with_capacity(data.len() - 1);
        let mut losses = Vec::with_capacity(data.len() - 1);

        for pair in data.windows(2) {
            let change = pair[1] - pair[0];
            if change.is_nan() {
                gains.push(f64::NAN);
                losses.push(f64::NAN);
            } else {
                gains.push(change.max(0.0));
                losses.push((-change).max(0.0));
            }
        }

        for (i, (gain_window, loss_window)) in gains
            .windows(self.period)
            .zip(losses.windows(self.period))
            .enumerate()
        {
            result[i + self.period] =
                Self::from_averages(mean_simd(gain_window), mean_simd(loss_window));
        }

        result
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: Vec<f64>,
    /// Signal line (EMA of MACD)
    pub signal: Vec<f64>,
    /// Histogram (MACD - Signal)
    pub histogram: Vec<f64>,
}

/// MACD indicator.
///
/// Uses two first-value-seeded EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> MacdOutput {
        let fast_ema = Ema::new(self.fast_period).calculate(data);
        let slow_ema = Ema::new(self.slow_period).calculate(data);

        let macd: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal = Ema::new(self.signal_period).calculate(&macd);

        let histogram = macd
            .iter()
            .zip(signal.iter())
            .map(|(m, s)| m - s)
            .collect();

        MacdOutput {
            macd,
            signal,
            histogram,
        }
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
