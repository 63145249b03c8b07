//! Signal, position and moving-average selector types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date-indexed score, NaN during warm-up.
pub type ScoreSeries = Vec<f64>;

/// Date-indexed discrete signals, aligned with the price series.
pub type SignalSeries = Vec<Signal>;

/// Discrete trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    /// No new signal on this bar.
    #[default]
    Hold,
}

impl Signal {
    /// Classify a score against a buy/sell threshold pair.
    ///
    /// Strictly greater than `buy` is BUY, strictly less than `sell` is SELL.
    /// NaN (warm-up) is HOLD.
    pub fn from_score(score: f64, buy: f64, sell: f64) -> Self {
        if score > buy {
            Signal::Buy
        } else if score < sell {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    /// True for BUY and SELL.
    #[inline]
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Hold)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sticky position state driven by signals.
///
/// Starts FLAT; BUY moves to LONG, SELL to SHORT, HOLD keeps the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    #[default]
    Flat,
    Long,
    Short,
}

impl Position {
    /// Apply one bar's signal.
    #[inline]
    pub fn apply(self, signal: Signal) -> Self {
        match signal {
            Signal::Buy => Position::Long,
            Signal::Sell => Position::Short,
            Signal::Hold => self,
        }
    }

    /// Market exposure: +1 long, -1 short, 0 flat.
    #[inline]
    pub fn exposure(&self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
            Position::Short => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Flat => "FLAT",
            Position::Long => "LONG",
            Position::Short => "SHORT",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moving average flavour for the dual-MA generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaType {
    #[serde(rename = "SMA", alias = "sma")]
    Sma,
    #[default]
    #[serde(rename = "EMA", alias = "ema")]
    Ema,
}

impl MaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaType::Sma => "SMA",
            MaType::Ema => "EMA",
        }
    }
}

impl fmt::Display for MaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SMA" => Ok(MaType::Sma),
            "EMA" => Ok(MaType::Ema),
            other => Err(format!("unknown moving average type: {other}")),
        }
    }
}

/// How a backtest is judged against buy-and-hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictRule {
    /// Higher total return and higher Sharpe ratio.
    #[default]
    ReturnAndSharpe,
    /// Higher total return only.
    ReturnOnly,
}
