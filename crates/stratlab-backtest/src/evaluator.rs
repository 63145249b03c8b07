//! Signal-driven backtest against buy-and-hold.
//!
//! Positions are sticky: BUY goes long, SELL goes short, HOLD keeps
//! whatever was held, and the book starts flat. The return earned on bar t
//! uses the position held at the close of bar t-1, so a signal can never
//! earn the move of its own bar.

use crate::metrics::{PerformanceMetrics, VOL_FLOOR};
use serde::Serialize;
use statrs::statistics::Statistics;
use stratlab_core::{
    error::StrategyError,
    types::{Position, PriceSeries, Signal},
};
use tracing::debug;

/// Annualisation constant for daily bars.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Per-bar intermediate series of an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationTrace {
    /// `close[t] / close[t-1] - 1`; undefined on the first bar
    pub daily_returns: Vec<Option<f64>>,
    /// Position held at the close of each bar
    pub positions: Vec<Position>,
    /// `exposure(position[t-1]) * daily_return[t]`; undefined on the first bar
    pub strategy_returns: Vec<Option<f64>>,
    /// Running product of `1 + strategy_return`
    pub cumulative_strategy: Vec<f64>,
    /// Running product of `1 + daily_return`
    pub cumulative_buyhold: Vec<f64>,
    pub strategy_drawdown: Vec<f64>,
    pub buyhold_drawdown: Vec<f64>,
}

/// Build the per-bar trace for `signals` over `series`.
pub fn trace(series: &PriceSeries, signals: &[Signal]) -> Result<EvaluationTrace, StrategyError> {
    check_lengths(series, signals)?;
    Ok(build_trace(&series.closes(), signals))
}

/// Evaluate `signals` over `series`.
///
/// `signals` must have one entry per bar. An empty series yields zeroed
/// metrics with `trading_days = 0`.
pub fn evaluate(
    series: &PriceSeries,
    signals: &[Signal],
) -> Result<PerformanceMetrics, StrategyError> {
    check_lengths(series, signals)?;
    if series.is_empty() {
        return Ok(PerformanceMetrics::default());
    }

    let closes = series.closes();
    let trace = build_trace(&closes, signals);

    let daily: Vec<f64> = trace.daily_returns.iter().flatten().copied().collect();
    let strategy: Vec<f64> = trace.strategy_returns.iter().flatten().copied().collect();

    let strategy_return = last_or_one(&trace.cumulative_strategy) - 1.0;
    let buyhold_return = last_or_one(&trace.cumulative_buyhold) - 1.0;

    let strategy_vol = annualized_vol(&strategy);
    let buyhold_vol = annualized_vol(&daily);

    let (win_rate, total_trades, avg_trade_return) = trade_stats(&closes, signals);

    let metrics = PerformanceMetrics {
        strategy_return,
        buyhold_return,
        excess_return: strategy_return - buyhold_return,
        strategy_vol,
        buyhold_vol,
        strategy_sharpe: sharpe(&strategy, strategy_vol),
        buyhold_sharpe: sharpe(&daily, buyhold_vol),
        strategy_max_dd: min_or_zero(&trace.strategy_drawdown),
        buyhold_max_dd: min_or_zero(&trace.buyhold_drawdown),
        win_rate,
        total_trades,
        avg_trade_return,
        trading_days: closes.len(),
    };

    debug!(
        symbol = series.symbol(),
        trading_days = metrics.trading_days,
        strategy_return = metrics.strategy_return,
        total_trades = metrics.total_trades,
        "evaluated signal series"
    );

    Ok(metrics)
}

fn check_lengths(series: &PriceSeries, signals: &[Signal]) -> Result<(), StrategyError> {
    if series.len() != signals.len() {
        return Err(StrategyError::SignalLengthMismatch {
            prices: series.len(),
            signals: signals.len(),
        });
    }
    Ok(())
}

fn build_trace(closes: &[f64], signals: &[Signal]) -> EvaluationTrace {
    let daily_returns: Vec<Option<f64>> = std::iter::once(None)
        .chain(closes.windows(2).map(|w| Some(w[1] / w[0] - 1.0)))
        .take(closes.len())
        .collect();

    let positions: Vec<Position> = signals
        .iter()
        .scan(Position::Flat, |position, &signal| {
            *position = position.apply(signal);
            Some(*position)
        })
        .collect();

    // Lagged by one bar: today's return is earned by yesterday's position
    let strategy_returns: Vec<Option<f64>> = daily_returns
        .iter()
        .enumerate()
        .map(|(t, ret)| {
            let held = positions.get(t.checked_sub(1)?)?;
            ret.map(|r| held.exposure() * r)
        })
        .collect();

    let cumulative_strategy = compound(&strategy_returns);
    let cumulative_buyhold = compound(&daily_returns);
    let strategy_drawdown = drawdowns(&cumulative_strategy);
    let buyhold_drawdown = drawdowns(&cumulative_buyhold);

    EvaluationTrace {
        daily_returns,
        positions,
        strategy_returns,
        cumulative_strategy,
        cumulative_buyhold,
        strategy_drawdown,
        buyhold_drawdown,
    }
}

/// Running product of `1 + r`, with undefined returns counted as 0.
fn compound(returns: &[Option<f64>]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |acc, r| {
            *acc *= 1.0 + r.unwrap_or(0.0);
            Some(*acc)
        })
        .collect()
}

/// Fractional distance below the running peak (<= 0).
fn drawdowns(cumulative: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    cumulative
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            (value - peak) / peak
        })
        .collect()
}

/// Sample standard deviation scaled by sqrt(252); 0 with fewer than two returns.
///
/// A deviation that is rounding noise relative to the typical return size
/// (a constant daily return, for instance) counts as 0.
fn annualized_vol(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let std = returns.iter().std_dev();
    let scale = returns.iter().map(|r| r.abs()).mean().max(VOL_FLOOR);
    if !std.is_finite() || std <= VOL_FLOOR * scale {
        return 0.0;
    }
    std * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Annualised mean over annualised volatility, 0 when volatility is 0.
fn sharpe(returns: &[f64], vol: f64) -> f64 {
    if vol > VOL_FLOOR && !returns.is_empty() {
        returns.iter().mean() * TRADING_DAYS_PER_YEAR / vol
    } else {
        0.0
    }
}

/// Win rate, trade count and mean return over consecutive BUY/SELL rows.
///
/// Each trade return is the close-to-close change between one actionable
/// row and the next, regardless of direction.
fn trade_stats(closes: &[f64], signals: &[Signal]) -> (f64, usize, f64) {
    let trade_closes: Vec<f64> = closes
        .iter()
        .zip(signals)
        .filter(|(_, s)| s.is_actionable())
        .map(|(&c, _)| c)
        .collect();
    if trade_closes.len() < 2 {
        return (0.0, 0, 0.0);
    }

    let trade_returns: Vec<f64> = trade_closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    let total_trades = trade_returns.len();
    let winners = trade_returns.iter().filter(|&&r| r > 0.0).count();

    (
        winners as f64 / total_trades as f64,
        total_trades,
        trade_returns.iter().mean(),
    )
}

fn last_or_one(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(1.0)
}

fn min_or_zero(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_closes("TEST", start, closes).unwrap()
    }

    fn signals(codes: &str) -> Vec<Signal> {
        codes
            .chars()
            .map(|c| match c {
                'B' => Signal::Buy,
                'S' => Signal::Sell,
                _ => Signal::Hold,
            })
            .collect()
    }

    #[test]
    fn test_empty_series_is_zeroed() {
        let empty = PriceSeries::new("EMPTY", Vec::new()).unwrap();
        let metrics = evaluate(&empty, &[]).unwrap();
        assert_eq!(metrics, PerformanceMetrics::default());
        assert_eq!(metrics.trading_days, 0);
    }

    #[test]
    fn test_single_bar() {
        let metrics = evaluate(&series(&[100.0]), &[Signal::Buy]).unwrap();
        assert_eq!(metrics.trading_days, 1);
        assert_eq!(metrics.strategy_return, 0.0);
        assert_eq!(metrics.strategy_vol, 0.0);
        assert_eq!(metrics.strategy_sharpe, 0.0);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let result = evaluate(&series(&[100.0, 101.0]), &[Signal::Buy]);
        assert_eq!(
            result,
            Err(StrategyError::SignalLengthMismatch {
                prices: 2,
                signals: 1
            })
        );
    }

    #[test]
    fn test_positions_are_sticky() {
        let trace = trace(&series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), &signals("HBHHSH")).unwrap();
        assert_eq!(
            trace.positions,
            vec![
                Position::Flat,
                Position::Long,
                Position::Long,
                Position::Long,
                Position::Short,
                Position::Short,
            ]
        );
    }

    #[test]
    fn test_signal_earns_from_next_bar() {
        let closes = [100.0, 110.0, 121.0];
        let trace = trace(&series(&closes), &signals("BHH")).unwrap();

        assert_eq!(trace.strategy_returns[0], None);
        assert_abs_diff_eq!(trace.strategy_returns[1].unwrap(), 0.1, epsilon = 1e-12);

        // BUY on bar 1 does not earn bar 1's move
        let trace = super::trace(&series(&closes), &signals("HBH")).unwrap();
        assert_abs_diff_eq!(trace.strategy_returns[1].unwrap(), 0.0);
        assert_abs_diff_eq!(trace.strategy_returns[2].unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_short_position_profits_from_decline() {
        let metrics = evaluate(&series(&[100.0, 90.0, 81.0]), &signals("SHH")).unwrap();
        // (1 + 0.1) * (1 + 0.1) - 1
        assert_abs_diff_eq!(metrics.strategy_return, 0.21, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.buyhold_return, -0.19, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.excess_return, 0.40, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_price_has_zero_risk() {
        let closes = vec![50.0; 30];
        let mut sigs = vec![Signal::Hold; 30];
        sigs[3] = Signal::Buy;
        sigs[10] = Signal::Sell;
        let metrics = evaluate(&series(&closes), &sigs).unwrap();

        assert_eq!(metrics.strategy_vol, 0.0);
        assert_eq!(metrics.strategy_sharpe, 0.0);
        assert_eq!(metrics.buyhold_vol, 0.0);
        assert_eq!(metrics.buyhold_sharpe, 0.0);
        assert_eq!(metrics.strategy_max_dd, 0.0);
    }

    #[test]
    fn test_constant_growth_has_zero_risk() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let mut codes = vec![Signal::Hold; closes.len()];
        codes[0] = Signal::Buy;

        let metrics = evaluate(&series(&closes), &codes).unwrap();

        assert_eq!(metrics.strategy_vol, 0.0);
        assert_eq!(metrics.buyhold_vol, 0.0);
        assert_eq!(metrics.strategy_sharpe, 0.0);
        assert_eq!(metrics.buyhold_sharpe, 0.0);
        assert_eq!(metrics.strategy_return_risk(), 0.0);
        assert_abs_diff_eq!(metrics.strategy_return, 1.01f64.powi(99) - 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_no_trades() {
        let closes = [100.0, 102.0, 99.0, 105.0];
        let metrics = evaluate(&series(&closes), &signals("HHHH")).unwrap();

        assert_eq!(metrics.total_trades, 0);
        assert_eq!(metrics.win_rate, 0.0);
        assert_eq!(metrics.avg_trade_return, 0.0);
        assert_eq!(metrics.strategy_return, 0.0);

        let trace = trace(&series(&closes), &signals("HHHH")).unwrap();
        assert!(trace.positions.iter().all(|p| *p == Position::Flat));
    }

    #[test]
    fn test_single_trade_row_has_no_trades() {
        let metrics = evaluate(&series(&[100.0, 110.0, 120.0]), &signals("BHH")).unwrap();
        assert_eq!(metrics.total_trades, 0);
        assert_eq!(metrics.win_rate, 0.0);
    }

    #[test]
    fn test_trade_stats() {
        // Trade rows at 100 (B), 110 (S), 99 (B): +10%, -10%
        let closes = [100.0, 105.0, 110.0, 99.0, 120.0];
        let metrics = evaluate(&series(&closes), &signals("BHSBH")).unwrap();

        assert_eq!(metrics.total_trades, 2);
        assert_abs_diff_eq!(metrics.win_rate, 0.5);
        assert_abs_diff_eq!(metrics.avg_trade_return, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_max_drawdown() {
        let closes = [100.0, 120.0, 90.0, 130.0];
        let metrics = evaluate(&series(&closes), &signals("BHHH")).unwrap();

        assert_abs_diff_eq!(metrics.buyhold_max_dd, -0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.strategy_max_dd, -0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_sharpe_matches_manual() {
        let closes = [100.0, 101.0, 99.0, 102.0, 104.0];
        let metrics = evaluate(&series(&closes), &signals("BHHHH")).unwrap();

        let returns: Vec<f64> = closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
        let mean = returns.iter().sum::<f64>() / returns.len() as f64;
        let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
            / (returns.len() - 1) as f64;
        let vol = var.sqrt() * 252f64.sqrt();

        assert_abs_diff_eq!(metrics.buyhold_vol, vol, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.buyhold_sharpe, mean * 252.0 / vol, epsilon = 1e-9);
        assert_abs_diff_eq!(metrics.strategy_sharpe, metrics.buyhold_sharpe, epsilon = 1e-9);
    }
}
