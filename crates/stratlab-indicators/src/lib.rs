//! Technical indicators with SIMD helpers.
//!
//! This crate provides the indicator primitives the signal generators build on:
//! - Moving averages (SMA, EMA)
//! - Volatility (rolling sample standard deviation, Bollinger Bands, Z-Score)
//! - Channels (rolling min/max, Donchian)
//! - Momentum (simple-mean RSI, MACD)
//!
//! Every indicator returns a vector aligned with its input. Warm-up rows are
//! NaN, and a window longer than the input yields an all-NaN vector.

pub mod channel;
pub mod momentum;
pub mod moving_average;
pub mod simd;
pub mod volatility;

pub use channel::{DonchianChannel, DonchianOutput, RollingMax, RollingMin};
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{moving_average, Ema, Sma};
pub use volatility::{BollingerBands, BollingerOutput, StdDev, ZScore};

/// Relative tolerance under which a band or channel width counts as zero.
const FLAT_WIDTH_TOLERANCE: f64 = 1e-12;

/// Whether `width` is zero for all practical purposes relative to `reference`.
///
/// Rolling sums of a constant can differ from the constant in the last ulp,
/// so an exact `== 0.0` test would miss collapsed bands.
#[inline]
pub fn is_flat_width(width: f64, reference: f64) -> bool {
    width.abs() <= FLAT_WIDTH_TOLERANCE * reference.abs().max(1.0)
}

/// Clamp `value` into `[lo, hi]`, passing NaN through.
#[inline]
pub fn clip(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        value
    } else {
        value.max(lo).min(hi)
    }
}
