//! Multi-symbol ranking.

use crate::aggregator::Recommendation;
use crate::analysis::Analysis;
use serde::Serialize;
use std::cmp::Ordering;

/// One row of a scan ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanEntry {
    pub symbol: String,
    pub recommendation: Recommendation,
    pub buy_count: usize,
    pub sell_count: usize,
    pub hold_count: usize,
    pub failed_count: usize,
    pub last_close: Option<f64>,
    /// Highest excess return among the symbol's strategies
    pub best_excess_return: Option<f64>,
}

impl ScanEntry {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let v = &analysis.verdict;
        Self {
            symbol: analysis.symbol.clone(),
            recommendation: v.recommendation,
            buy_count: v.buy_count,
            sell_count: v.sell_count,
            hold_count: v.hold_count,
            failed_count: v.failed_count,
            last_close: analysis.last_close,
            best_excess_return: analysis.best_excess_return(),
        }
    }

    /// BUY votes minus SELL votes.
    pub fn net_votes(&self) -> i64 {
        self.buy_count as i64 - self.sell_count as i64
    }

    fn cmp_rank(&self, other: &Self) -> Ordering {
        self.recommendation
            .rank()
            .cmp(&other.recommendation.rank())
            .then_with(|| other.net_votes().cmp(&self.net_votes()))
            .then_with(|| {
                // Missing excess return sorts last
                let key = |e: Option<f64>| e.unwrap_or(f64::NEG_INFINITY);
                key(other.best_excess_return).total_cmp(&key(self.best_excess_return))
            })
            .then_with(|| self.symbol.cmp(&other.symbol))
    }
}

/// Rank analyses: BUY before HOLD before SELL, then by net BUY-SELL votes,
/// then by best excess return, then by symbol.
pub fn rank(analyses: &[Analysis]) -> Vec<ScanEntry> {
    let mut entries: Vec<ScanEntry> = analyses.iter().map(ScanEntry::from_analysis).collect();
    entries.sort_by(ScanEntry::cmp_rank);
    entries
}

/// Plain-text ranking table.
pub fn render_table(entries: &[ScanEntry]) -> String {
    let mut s = format!(
        "{:<4} {:<10} {:<6} {:>4} {:>4} {:>4} {:>4} {:>12} {:>12}\n",
        "#", "SYMBOL", "REC", "BUY", "SELL", "HOLD", "FAIL", "LAST", "BEST EXCESS"
    );
    for (i, e) in entries.iter().enumerate() {
        let last = e
            .last_close
            .map(|c| format!("{c:.2}"))
            .unwrap_or_else(|| "-".into());
        let excess = e
            .best_excess_return
            .map(|x| format!("{:+.2}%", x * 100.0))
            .unwrap_or_else(|| "-".into());
        s.push_str(&format!(
            "{:<4} {:<10} {:<6} {:>4} {:>4} {:>4} {:>4} {:>12} {:>12}\n",
            i + 1,
            e.symbol,
            e.recommendation.as_str(),
            e.buy_count,
            e.sell_count,
            e.hold_count,
            e.failed_count,
            last,
            excess
        ));
    }
    s
}
