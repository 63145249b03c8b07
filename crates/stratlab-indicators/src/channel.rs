//! Channel indicators (rolling extrema, Donchian).

use serde::{Deserialize, Serialize};
use stratlab_core::traits::Indicator;

use crate::is_flat_width;
use crate::simd::minmax_simd;

/// Rolling (min, max) of each full window; NaN if the window holds a NaN.
fn rolling_extrema(data: &[f64], period: usize) -> Vec<Option<(f64, f64)>> {
    let mut result = vec![None; data.len()];
    if data.len() < period {
        return result;
    }

    for (i, window) in data.windows(period).enumerate() {
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i + period - 1] = minmax_simd(window);
    }

    result
}

/// Rolling minimum over a fixed window.
#[derive(Debug, Clone)]
pub struct RollingMin {
    period: usize,
}

impl RollingMin {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for RollingMin {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        rolling_extrema(data, self.period)
            .into_iter()
            .map(|e| e.map_or(f64::NAN, |(min, _)| min))
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RollingMin"
    }
}

/// Rolling maximum over a fixed window.
#[derive(Debug, Clone)]
pub struct RollingMax {
    period: usize,
}

impl RollingMax {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for RollingMax {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        rolling_extrema(data, self.period)
            .into_iter()
            .map(|e| e.map_or(f64::NAN, |(_, max)| max))
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RollingMax"
    }
}

/// Donchian Channel output, one entry per input bar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DonchianOutput {
    /// Rolling max of highs
    pub upper: Vec<f64>,
    /// Rolling min of lows
    pub lower: Vec<f64>,
    /// Channel midpoint
    pub middle: Vec<f64>,
    /// Close position inside the channel, 0 at the low and 1 at the high;
    /// 0.5 when the channel has zero width
    pub position_pct: Vec<f64>,
}

/// Donchian Channel.
///
/// Envelope of the highest high and lowest low over a window.
#[derive(Debug, Clone)]
pub struct DonchianChannel {
    period: usize,
}

impl DonchianChannel {
    /// Create a Donchian Channel over `period` bars.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Calculate from high, low and close data.
    pub fn calculate_hlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> DonchianOutput {
        let len = high.len().min(low.len()).min(close.len());
        let upper = RollingMax::new(self.period).calculate(&high[..len]);
        let lower = RollingMin::new(self.period).calculate(&low[..len]);

        let mut middle = Vec::with_capacity(len);
        let mut position_pct = Vec::with_capacity(len);

        for i in 0..len {
            let width = upper[i] - lower[i];
            middle.push((upper[i] + lower[i]) / 2.0);
            position_pct.push(if width.is_nan() {
                f64::NAN
            } else if is_flat_width(width, upper[i]) {
                0.5
            } else {
                (close[i] - lower[i]) / width
            });
        }

        DonchianOutput {
            upper,
            lower,
            middle,
            position_pct,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_min_max() {
        let data = vec![3.0, 1.0, 4.0, 1.5, 5.0, 9.0];
        let min = RollingMin::new(3).calculate(&data);
        let max = RollingMax::new(3).calculate(&data);

        assert!(min[1].is_nan() && max[1].is_nan());
        assert_eq!(min[2], 1.0);
        assert_eq!(max[2], 4.0);
        assert_eq!(min[5], 1.5);
        assert_eq!(max[5], 9.0);
    }

    #[test]
    fn test_rolling_extrema_propagate_nan() {
        let data = vec![1.0, f64::NAN, 3.0, 4.0, 5.0];
        let max = RollingMax::new(2).calculate(&data);

        assert!(max[1].is_nan());
        assert!(max[2].is_nan());
        assert_eq!(max[3], 4.0);
    }

    #[test]
    fn test_donchian_position() {
        let high = vec![10.0, 11.0, 12.0, 13.0];
        let low = vec![8.0, 9.0, 10.0, 11.0];
        let close = vec![9.0, 10.0, 12.0, 11.0];

        let out = DonchianChannel::new(3).calculate_hlc(&high, &low, &close);

        assert!(out.position_pct[1].is_nan());
        // window [0..=2]: max high 12, min low 8, close 12 -> top
        assert!((out.position_pct[2] - 1.0).abs() < 1e-12);
        // window [1..=3]: max 13, min 9, close 11 -> middle
        assert!((out.position_pct[3] - 0.5).abs() < 1e-12);
        assert!((out.middle[3] - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_donchian_zero_width() {
        let flat = vec![50.0; 5];
        let out = DonchianChannel::new(3).calculate_hlc(&flat, &flat, &flat);

        for i in 2..5 {
            assert_eq!(out.position_pct[i], 0.5);
        }
    }
}
