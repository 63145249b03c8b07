//! Volatility indicators.

use serde::{Deserialize, Serialize};
use stratlab_core::traits::{Indicator, MultiOutputIndicator};

use crate::is_flat_width;
use crate::simd::{mean_simd, sample_std_simd};

/// Rolling sample standard deviation (ddof = 1).
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }
}

impl Indicator for StdDev {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; data.len()];
        if data.len() < self.period {
            return result;
        }

        for (i, window) in data.windows(self.period).enumerate() {
            result[i + self.period - 1] = sample_std_simd(window);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Bollinger Bands output, one entry per input bar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: Vec<f64>,
    /// Middle band (SMA)
    pub middle: Vec<f64>,
    /// Lower band
    pub lower: Vec<f64>,
    /// %B ((price - lower) / (upper - lower)); 0.5 when the bands collapse
    pub percent_b: Vec<f64>,
}

/// Bollinger Bands.
///
/// Consists of a middle band (SMA) with upper and lower bands
/// at a specified number of sample standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> BollingerOutput {
        let len = data.len();
        let mut out = BollingerOutput {
            upper: vec![f64::NAN; len],
            middle: vec![f64::NAN; len],
            lower: vec![f64::NAN; len],
            percent_b: vec![f64::NAN; len],
        };
        if len < self.period {
            return out;
        }

        for (i, window) in data.windows(self.period).enumerate() {
            let idx = i + self.period - 1;
            let mean = mean_simd(window);
            let std_dev = sample_std_simd(window);

            let upper = mean + self.std_dev_multiplier * std_dev;
            let lower = mean - self.std_dev_multiplier * std_dev;
            let width = upper - lower;

            let price = data[idx];
            let percent_b = if width.is_nan() {
                f64::NAN
            } else if is_flat_width(width, mean) {
                0.5
            } else {
                (price - lower) / width
            };

            out.upper[idx] = upper;
            out.middle[idx] = mean;
            out.lower[idx] = lower;
            out.percent_b[idx] = percent_b;
        }

        out
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

/// Rolling Z-Score: `(x - rolling_mean) / rolling_std`.
///
/// A zero standard deviation yields 0 (price sits on its mean).
#[derive(Debug, Clone)]
pub struct ZScore {
    period: usize,
}

impl ZScore {
    /// Create a new Z-Score indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }
}

impl Indicator for ZScore {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; data.len()];
        if data.len() < self.period {
            return result;
        }

        for (i, window) in data.windows(self.period).enumerate() {
            let idx = i + self.period - 1;
            let mean = mean_simd(window);
            let std_dev = sample_std_simd(window);

            result[idx] = if std_dev.is_nan() {
                f64::NAN
            } else if is_flat_width(std_dev, mean) {
                0.0
            } else {
                (data[idx] - mean) / std_dev
            };
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Z-Score"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_std_dev_is_sample_std() {
        let std_dev = StdDev::new(3);
        let data = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        let result = std_dev.calculate(&data);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_nan() && result[1].is_nan());
        // First window: [2, 4, 6], mean = 4, sample variance = (4+0+4)/2 = 4
        assert_relative_eq!(result[2], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_std_dev_window_longer_than_data() {
        let result = StdDev::new(10).calculate(&[1.0, 2.0, 3.0]);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_bollinger_bands() {
        let bb = BollingerBands::new();
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0)
            .collect();

        let result = bb.calculate(&data);
        assert_eq!(result.upper.len(), 30);
        assert!(result.middle[18].is_nan());

        for i in 19..30 {
            // Upper > Middle > Lower
            assert!(result.upper[i] > result.middle[i]);
            assert!(result.middle[i] > result.lower[i]);
        }
    }

    #[test]
    fn test_bollinger_percent_b_collapsed_bands() {
        let bb = BollingerBands::with_params(5, 2.0);
        let data = vec![100.0; 8]; // Constant price

        let result = bb.calculate(&data);

        // With constant price, bands collapse, percent_b = 0.5
        for i in 4..8 {
            assert_eq!(result.percent_b[i], 0.5);
            assert_eq!(result.upper[i], result.lower[i]);
        }
    }

    #[test]
    fn test_bollinger_percent_b_value() {
        let bb = BollingerBands::with_params(3, 1.0);
        let result = bb.calculate(&[1.0, 2.0, 3.0]);

        // mean 2, sample std 1 -> bands [1, 3], price 3 sits on the upper band
        assert_relative_eq!(result.percent_b[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zscore() {
        let z = ZScore::new(3);
        let result = z.calculate(&[1.0, 2.0, 3.0, 3.0, 3.0, 3.0]);

        // (3 - 2) / 1
        assert_relative_eq!(result[2], 1.0, epsilon = 1e-12);
        // flat window -> 0
        assert_eq!(result[5], 0.0);
    }
}
