//! Signal tally and recommendation.

use serde::{Serialize, Serializer};
use std::fmt;
use stratlab_backtest::StrategyResult;
use stratlab_core::{error::StrategyError, types::Signal};

/// Votes one side needs before it can carry the recommendation.
pub const MIN_AGREEING_STRATEGIES: usize = 2;

/// Outcome of running one lineup entry.
///
/// Keeps "computed, no signal" (a HOLD result) apart from "could not be
/// computed".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StrategyOutcome {
    Computed {
        key: String,
        title: String,
        result: StrategyResult,
    },
    Failed {
        key: String,
        title: String,
        #[serde(serialize_with = "serialize_error")]
        error: StrategyError,
    },
}

fn serialize_error<S: Serializer>(error: &StrategyError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl StrategyOutcome {
    pub fn key(&self) -> &str {
        match self {
            StrategyOutcome::Computed { key, .. } | StrategyOutcome::Failed { key, .. } => key,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            StrategyOutcome::Computed { title, .. } | StrategyOutcome::Failed { title, .. } => {
                title
            }
        }
    }

    /// The computed result, if any.
    pub fn result(&self) -> Option<&StrategyResult> {
        match self {
            StrategyOutcome::Computed { result, .. } => Some(result),
            StrategyOutcome::Failed { .. } => None,
        }
    }

    /// Current signal, `None` when the strategy failed.
    pub fn signal(&self) -> Option<Signal> {
        self.result().map(|r| r.current_signal)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StrategyOutcome::Failed { .. })
    }
}

/// Consensus recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl Recommendation {
    /// BUY or SELL needs a strict majority over the other side and at
    /// least [`MIN_AGREEING_STRATEGIES`] votes; anything else is HOLD.
    pub fn from_counts(buy: usize, sell: usize) -> Self {
        if buy > sell && buy >= MIN_AGREEING_STRATEGIES {
            Recommendation::Buy
        } else if sell > buy && sell >= MIN_AGREEING_STRATEGIES {
            Recommendation::Sell
        } else {
            Recommendation::Hold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Buy => "BUY",
            Recommendation::Sell => "SELL",
            Recommendation::Hold => "HOLD",
        }
    }

    /// Sort rank for scans: BUY first, SELL last.
    pub fn rank(&self) -> u8 {
        match self {
            Recommendation::Buy => 0,
            Recommendation::Hold => 1,
            Recommendation::Sell => 2,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Folded view over a lineup's outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusVerdict {
    pub buy_count: usize,
    pub sell_count: usize,
    pub hold_count: usize,
    /// Strategies that could not be computed; they do not vote
    pub failed_count: usize,
    pub recommendation: Recommendation,
    /// Title of the strategy with the highest excess return; `None` when
    /// every computed excess return is equal
    pub best_strategy: Option<String>,
    /// Title of the strategy with the lowest excess return
    pub worst_strategy: Option<String>,
}

impl ConsensusVerdict {
    /// Number of lineup entries, failed ones included.
    pub fn total(&self) -> usize {
        self.buy_count + self.sell_count + self.hold_count + self.failed_count
    }

    /// One-sentence recommendation.
    pub fn summary(&self) -> String {
        match self.recommendation {
            Recommendation::Buy => format!(
                "BUY - {} out of {} strategies signal buying opportunity.",
                self.buy_count,
                self.total()
            ),
            Recommendation::Sell => format!(
                "SELL - {} out of {} strategies signal selling opportunity.",
                self.sell_count,
                self.total()
            ),
            Recommendation::Hold => format!(
                "HOLD - Mixed signals ({} BUY, {} SELL, {} HOLD). Wait for clearer consensus.",
                self.buy_count, self.sell_count, self.hold_count
            ),
        }
    }
}

/// Tally current signals and pick best/worst by excess return.
pub fn aggregate(outcomes: &[StrategyOutcome]) -> ConsensusVerdict {
    let count = |wanted: Signal| {
        outcomes
            .iter()
            .filter(|o| o.signal() == Some(wanted))
            .count()
    };
    let buy_count = count(Signal::Buy);
    let sell_count = count(Signal::Sell);
    let hold_count = count(Signal::Hold);
    let failed_count = outcomes.iter().filter(|o| o.is_failed()).count();

    let mut best: Option<(&str, f64)> = None;
    let mut worst: Option<(&str, f64)> = None;
    for outcome in outcomes {
        if let Some(result) = outcome.result() {
            let excess = result.metrics.excess_return;
            if best.map_or(true, |(_, b)| excess > b) {
                best = Some((outcome.title(), excess));
            }
            if worst.map_or(true, |(_, w)| excess < w) {
                worst = Some((outcome.title(), excess));
            }
        }
    }

    // A tie across every computed strategy has no best or worst
    if let (Some((_, high)), Some((_, low))) = (best, worst) {
        if high == low {
            best = None;
            worst = None;
        }
    }

    ConsensusVerdict {
        buy_count,
        sell_count,
        hold_count,
        failed_count,
        recommendation: Recommendation::from_counts(buy_count, sell_count),
        best_strategy: best.map(|(title, _)| title.to_string()),
        worst_strategy: worst.map(|(title, _)| title.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use stratlab_backtest::{PerformanceMetrics, Verdict};

    fn computed(title: &str, signal: Signal, excess: f64) -> StrategyOutcome {
        StrategyOutcome::Computed {
            key: title.to_lowercase(),
            title: title.to_string(),
            result: StrategyResult {
                strategy_key: title.to_lowercase(),
                strategy_name: title.to_string(),
                symbol: "TEST".into(),
                current_score: 0.0,
                current_signal: signal,
                metrics: PerformanceMetrics {
                    excess_return: excess,
                    ..Default::default()
                },
                verdict: Verdict::Underperforms,
                data_sufficient: true,
                indicators: BTreeMap::new(),
                notes: Vec::new(),
                start_date: None,
                end_date: None,
            },
        }
    }

    fn failed(title: &str) -> StrategyOutcome {
        StrategyOutcome::Failed {
            key: title.to_lowercase(),
            title: title.to_string(),
            error: StrategyError::InvalidConfig("window must be at least 2".into()),
        }
    }

    #[test]
    fn test_three_buys_one_sell_is_buy() {
        let outcomes = vec![
            computed("A", Signal::Buy, 0.1),
            computed("B", Signal::Buy, 0.2),
            computed("C", Signal::Buy, -0.1),
            computed("D", Signal::Sell, 0.0),
        ];
        let verdict = aggregate(&outcomes);

        assert_eq!(verdict.buy_count, 3);
        assert_eq!(verdict.sell_count, 1);
        assert_eq!(verdict.recommendation, Recommendation::Buy);
        assert_eq!(verdict.best_strategy.as_deref(), Some("B"));
        assert_eq!(verdict.worst_strategy.as_deref(), Some("C"));
        assert_eq!(
            verdict.summary(),
            "BUY - 3 out of 4 strategies signal buying opportunity."
        );
    }

    #[test]
    fn test_single_vote_is_not_enough() {
        assert_eq!(Recommendation::from_counts(1, 0), Recommendation::Hold);
        assert_eq!(Recommendation::from_counts(0, 1), Recommendation::Hold);
        assert_eq!(Recommendation::from_counts(2, 2), Recommendation::Hold);
        assert_eq!(Recommendation::from_counts(0, 2), Recommendation::Sell);
    }

    #[test]
    fn test_mixed_is_hold() {
        let outcomes = vec![
            computed("A", Signal::Buy, 0.0),
            computed("B", Signal::Sell, 0.0),
            computed("C", Signal::Hold, 0.0),
            computed("D", Signal::Hold, 0.0),
        ];
        let verdict = aggregate(&outcomes);

        assert_eq!(verdict.recommendation, Recommendation::Hold);
        assert_eq!(
            verdict.summary(),
            "HOLD - Mixed signals (1 BUY, 1 SELL, 2 HOLD). Wait for clearer consensus."
        );
    }

    #[test]
    fn test_failures_are_not_holds() {
        let outcomes = vec![
            computed("A", Signal::Sell, 0.0),
            computed("B", Signal::Sell, 0.0),
            failed("C"),
            computed("D", Signal::Hold, 0.0),
        ];
        let verdict = aggregate(&outcomes);

        assert_eq!(verdict.hold_count, 1);
        assert_eq!(verdict.failed_count, 1);
        assert_eq!(verdict.total(), 4);
        assert_eq!(verdict.recommendation, Recommendation::Sell);
        assert_eq!(outcomes[2].signal(), None);
    }

    #[test]
    fn test_tied_excess_has_no_best_or_worst() {
        let outcomes = vec![
            computed("A", Signal::Hold, 0.0),
            computed("B", Signal::Hold, 0.0),
            failed("C"),
            computed("D", Signal::Hold, 0.0),
        ];
        let verdict = aggregate(&outcomes);

        assert!(verdict.best_strategy.is_none());
        assert!(verdict.worst_strategy.is_none());
    }

    #[test]
    fn test_all_failed() {
        let verdict = aggregate(&[failed("A"), failed("B")]);
        assert_eq!(verdict.recommendation, Recommendation::Hold);
        assert!(verdict.best_strategy.is_none());
        assert!(verdict.worst_strategy.is_none());
    }

    #[test]
    fn test_failed_outcome_serializes_error_text() {
        let json = serde_json::to_value(failed("A")).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(
            json["error"],
            "Invalid configuration: window must be at least 2"
        );
    }
}
