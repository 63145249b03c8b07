//! Performance metrics.

use serde::{Deserialize, Serialize};
use std::fmt;
use stratlab_core::types::VerdictRule;

/// Standardised return/risk/trade statistics of one backtest.
///
/// Returns, volatilities and drawdowns are fractions (0.052 = 5.2%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Compounded strategy return over the series
    pub strategy_return: f64,
    /// Compounded buy-and-hold return over the series
    pub buyhold_return: f64,
    /// `strategy_return - buyhold_return`
    pub excess_return: f64,
    /// Annualised volatility of strategy returns
    pub strategy_vol: f64,
    /// Annualised volatility of daily returns
    pub buyhold_vol: f64,
    /// Annualised Sharpe ratio, 0 when volatility is 0
    pub strategy_sharpe: f64,
    pub buyhold_sharpe: f64,
    /// Deepest drawdown of the strategy equity curve (<= 0)
    pub strategy_max_dd: f64,
    pub buyhold_max_dd: f64,
    /// Fraction of trade-to-trade returns that were positive
    pub win_rate: f64,
    /// Trade rows minus one
    pub total_trades: usize,
    /// Mean close-to-close return between consecutive trade rows
    pub avg_trade_return: f64,
    /// Number of bars evaluated
    pub trading_days: usize,
}

impl PerformanceMetrics {
    /// Strategy beats buy-and-hold on both return and Sharpe.
    pub fn verdict(&self) -> Verdict {
        self.verdict_under(VerdictRule::ReturnAndSharpe)
    }

    /// Judge the backtest with an explicit rule.
    pub fn verdict_under(&self, rule: VerdictRule) -> Verdict {
        let beats = match rule {
            VerdictRule::ReturnAndSharpe => {
                self.excess_return > 0.0 && self.strategy_sharpe > self.buyhold_sharpe
            }
            VerdictRule::ReturnOnly => self.excess_return > 0.0,
        };
        if beats {
            Verdict::Outperforms
        } else {
            Verdict::Underperforms
        }
    }

    /// Total return per unit of annualised volatility.
    pub fn strategy_return_risk(&self) -> f64 {
        ratio(self.strategy_return, self.strategy_vol)
    }

    /// Buy-and-hold return per unit of annualised volatility.
    pub fn buyhold_return_risk(&self) -> f64 {
        ratio(self.buyhold_return, self.buyhold_vol)
    }
}

fn ratio(value: f64, vol: f64) -> f64 {
    if vol > VOL_FLOOR {
        value / vol
    } else {
        0.0
    }
}

/// Annualised volatility at or below this is zero.
pub(crate) const VOL_FLOOR: f64 = 1e-12;

/// Strategy vs buy-and-hold outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Outperforms,
    Underperforms,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Outperforms => "OUTPERFORMS",
            Verdict::Underperforms => "UNDERPERFORMS",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
