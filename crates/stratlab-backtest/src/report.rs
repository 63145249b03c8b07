//! Text performance report.

use crate::result::StrategyResult;

const RULE: &str = "═══════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────";

/// Format a fraction as a percentage with two decimals.
pub fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Render the strategy vs buy-and-hold comparison for one result.
pub fn render_performance(result: &StrategyResult) -> String {
    let m = &result.metrics;
    let mut s = String::new();

    s.push_str(RULE);
    s.push('\n');
    s.push_str(&format!(
        "  PERFORMANCE COMPARISON: {}\n",
        result.strategy_name.to_uppercase()
    ));
    s.push_str(RULE);
    s.push('\n');

    let period = match (result.start_date, result.end_date) {
        (Some(start), Some(end)) => format!("{start} to {end}"),
        _ => "n/a".to_string(),
    };
    s.push_str(&format!(
        "  Symbol: {} | Period: {} | Trading Days: {}\n\n",
        result.symbol, period, m.trading_days
    ));

    s.push_str("RETURNS\n");
    s.push_str(THIN_RULE);
    s.push('\n');
    s.push_str(&format!("  Strategy Return:     {}\n", pct(m.strategy_return)));
    s.push_str(&format!("  Buy & Hold Return:   {}\n", pct(m.buyhold_return)));
    s.push_str(&format!("  Excess Return:       {}\n", pct(m.excess_return)));
    s.push_str(&format!(
        "  Outperformance:      {} by {}\n\n",
        if m.excess_return > 0.0 { "YES" } else { "NO" },
        pct(m.excess_return.abs())
    ));

    s.push_str("RISK\n");
    s.push_str(THIN_RULE);
    s.push('\n');
    s.push_str(&format!("  Strategy Volatility: {}\n", pct(m.strategy_vol)));
    s.push_str(&format!("  Buy & Hold Vol:      {}\n", pct(m.buyhold_vol)));
    s.push_str(&format!("  Strategy Sharpe:     {:.3}\n", m.strategy_sharpe));
    s.push_str(&format!("  Buy & Hold Sharpe:   {:.3}\n", m.buyhold_sharpe));
    s.push_str(&format!("  Strategy Max DD:     {}\n", pct(m.strategy_max_dd)));
    s.push_str(&format!("  Buy & Hold Max DD:   {}\n\n", pct(m.buyhold_max_dd)));

    s.push_str("TRADE STATISTICS\n");
    s.push_str(THIN_RULE);
    s.push('\n');
    s.push_str(&format!("  Total Trades:        {}\n", m.total_trades));
    s.push_str(&format!("  Win Rate:            {}\n", pct(m.win_rate)));
    s.push_str(&format!("  Avg Trade Return:    {}\n\n", pct(m.avg_trade_return)));

    s.push_str("RISK-ADJUSTED\n");
    s.push_str(THIN_RULE);
    s.push('\n');
    s.push_str(&format!(
        "  Return/Risk:         {:.3}\n",
        m.strategy_return_risk()
    ));
    s.push_str(&format!(
        "  Buy & Hold Ret/Risk: {:.3}\n\n",
        m.buyhold_return_risk()
    ));

    s.push_str(&format!("  VERDICT: {} Buy & Hold\n", result.verdict));
    s.push_str(RULE);
    s.push('\n');

    s
}
