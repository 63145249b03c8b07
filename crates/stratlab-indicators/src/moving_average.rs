//! Moving average indicators.

use stratlab_core::traits::Indicator;
use stratlab_core::types::MaType;

use crate::simd::mean_simd;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values. The first
/// `period - 1` outputs are NaN.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; data.len()];
        if data.len() < self.period {
            return result;
        }

        // Each window is summed from scratch so a constant input yields the
        // constant exactly, with no running-sum drift.
        for (i, window) in data.windows(self.period).enumerate() {
            result[i + self.period - 1] = mean_simd(window);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Recursive smoothing with `alpha = 2 / (span + 1)`, seeded with the first
/// observation (`ema[0] = data[0]`), so there is no warm-up gap. NaN inputs
/// produce NaN outputs and leave the running average untouched.
#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    alpha: f64,
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        let alpha = 2.0 / (span as f64 + 1.0);
        Self { span, alpha }
    }

    /// Smoothing factor.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = Vec::with_capacity(data.len());
        let one_minus_alpha = 1.0 - self.alpha;
        let mut ema: Option<f64> = None;

        for &value in data {
            if value.is_nan() {
                result.push(f64::NAN);
                continue;
            }
            let next = match ema {
                Some(prev) => value * self.alpha + prev * one_minus_alpha,
                None => value,
            };
            ema = Some(next);
            result.push(next);
        }

        result
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Compute an SMA or EMA of `data` depending on `ma_type`.
pub fn moving_average(ma_type: MaType, period: usize, data: &[f64]) -> Vec<f64> {
    match ma_type {
        MaType::Sma => Sma::new(period).calculate(data),
        MaType::Ema => Ema::new(period).calculate(data),
    }
}
