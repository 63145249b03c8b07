//! Comprehensive markdown report.
//!
//! Pure rendering over an [`Analysis`]; nothing here feeds back into the
//! computation.

use crate::aggregator::StrategyOutcome;
use crate::analysis::Analysis;
use chrono::NaiveDate;
use stratlab_backtest::{report::render_performance, StrategyResult};

/// Render the full multi-strategy report for one symbol.
pub fn render_markdown(analysis: &Analysis, analysis_date: NaiveDate) -> String {
    let symbol = analysis.symbol.to_uppercase();
    let price = analysis
        .last_close
        .map(|c| format!("${c:.2}"))
        .unwrap_or_else(|| "N/A".to_string());
    let verdict = &analysis.verdict;

    let mut lines: Vec<String> = vec![
        format!("# {symbol} Comprehensive Technical Analysis with Performance Comparison"),
        format!("*Analysis Date: {}*  ", analysis_date.format("%B %d, %Y")),
        format!("*Current Price: {price}*"),
        String::new(),
        "---".into(),
        String::new(),
        "## Executive Summary".into(),
        format!(
            "This report analyzes {symbol} using {} technical analysis strategies:",
            analysis.outcomes.len()
        ),
    ];
    lines.extend(
        analysis
            .outcomes
            .iter()
            .enumerate()
            .map(|(i, o)| format!("{}. {}", i + 1, o.title())),
    );

    lines.push(String::new());
    lines.push("## Strategy Highlights".into());
    if analysis.outcomes.is_empty() {
        lines.push("- No strategy data available.".into());
    }
    lines.extend(analysis.outcomes.iter().map(highlight));

    lines.push(String::new());
    lines.push("## Individual Strategy Analysis".into());
    lines.push(String::new());
    for outcome in &analysis.outcomes {
        lines.push(format!("### {}", outcome.title()));
        lines.push(String::new());
        lines.push("```".into());
        match outcome {
            StrategyOutcome::Computed { result, .. } => {
                lines.push(status_block(result));
                lines.push(render_performance(result));
            }
            StrategyOutcome::Failed { error, .. } => {
                lines.push(format!("Computation failed: {error}"));
            }
        }
        lines.push("```".into());
        lines.push(String::new());
    }

    lines.push("## Consensus & Recommendation".into());
    lines.push(String::new());
    let mut tally = format!(
        "**Signal Summary:** {} BUY | {} SELL | {} HOLD",
        verdict.buy_count, verdict.sell_count, verdict.hold_count
    );
    if verdict.failed_count > 0 {
        tally.push_str(&format!(" | {} FAILED", verdict.failed_count));
    }
    lines.push(tally);
    lines.push(String::new());
    lines.push(format!("**Recommendation:** {}", verdict.summary()));
    if let (Some(best), Some(worst)) = (&verdict.best_strategy, &verdict.worst_strategy) {
        lines.push(String::new());
        lines.push(format!("**Best Performer:** {best}  "));
        lines.push(format!("**Worst Performer:** {worst}"));
    }

    lines.push(String::new());
    lines.push("---".into());
    lines.push("*Note: Bollinger Z-Score is not included in this comprehensive analysis.*".into());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn highlight(outcome: &StrategyOutcome) -> String {
    match outcome {
        StrategyOutcome::Computed { title, result, .. } => format!(
            "- **{title}**: {} ({})",
            result.current_signal,
            result.verdict
        ),
        StrategyOutcome::Failed { title, error, .. } => {
            format!("- **{title}**: FAILED ({error})")
        }
    }
}

/// Current signal, score and indicator snapshot.
fn status_block(result: &StrategyResult) -> String {
    let mut s = format!(
        "Current Signal: {}\nCurrent Score: {:.2}\n",
        result.current_signal, result.current_score
    );
    if !result.data_sufficient {
        s.push_str("Data: insufficient history for a current score\n");
    }
    for (name, value) in &result.indicators {
        s.push_str(&format!("{name}: {value:.4}\n"));
    }
    for note in &result.notes {
        s.push_str(note);
        s.push('\n');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use stratlab_core::types::PriceSeries;
    use stratlab_strategies::{StrategyRegistry, StrategySettings};

    fn analysis(settings: &StrategySettings) -> Analysis {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let closes: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.2).sin() * 8.0 + i as f64 * 0.1)
            .collect();
        let series = PriceSeries::from_closes("acme", start, &closes).unwrap();
        analyze(&series, &StrategyRegistry::new().consensus_lineup(settings))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn test_report_sections() {
        let report = render_markdown(&analysis(&StrategySettings::default()), date());

        assert!(report.starts_with("# ACME Comprehensive Technical Analysis"));
        assert!(report.contains("*Analysis Date: June 03, 2024*"));
        assert!(report.contains("## Strategy Highlights"));
        assert!(report.contains("### Dual Moving Average Crossover Strategy"));
        assert!(report.contains("**Signal Summary:**"));
        assert!(report.contains("**Recommendation:**"));
        assert!(report.contains("Bollinger Z-Score is not included"));
        assert_eq!(report.matches("PERFORMANCE COMPARISON").count(), 4);
    }

    #[test]
    fn test_tied_performers_are_omitted() {
        let empty = PriceSeries::new("NONE", Vec::new()).unwrap();
        let lineup = StrategyRegistry::new().consensus_lineup(&StrategySettings::default());
        let report = render_markdown(&analyze(&empty, &lineup), date());

        assert!(report.contains("**Recommendation:**"));
        assert!(!report.contains("Best Performer"));
        assert!(!report.contains("Worst Performer"));
    }

    #[test]
    fn test_failed_strategy_is_reported() {
        let mut settings = StrategySettings::default();
        settings.macd_donchian.fast_period = 40;
        let report = render_markdown(&analysis(&settings), date());

        assert!(report.contains("- **MACD-Donchian Combined Strategy**: FAILED (Invalid configuration"));
        assert!(report.contains("Computation failed:"));
        assert!(report.contains("| 1 FAILED"));
        assert_eq!(report.matches("PERFORMANCE COMPARISON").count(), 3);
    }
}
