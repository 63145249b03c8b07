//! Run a lineup over one price series.

use crate::aggregator::{aggregate, ConsensusVerdict, StrategyOutcome};
use chrono::NaiveDate;
use serde::Serialize;
use stratlab_backtest::run_strategy;
use stratlab_core::types::PriceSeries;
use stratlab_strategies::StrategyDescriptor;
use tracing::{info, warn};

/// Full multi-strategy analysis of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub symbol: String,
    pub last_close: Option<f64>,
    pub last_date: Option<NaiveDate>,
    /// One outcome per lineup entry, in lineup order
    pub outcomes: Vec<StrategyOutcome>,
    pub verdict: ConsensusVerdict,
}

impl Analysis {
    /// Highest excess return among computed strategies.
    pub fn best_excess_return(&self) -> Option<f64> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result())
            .map(|r| r.metrics.excess_return)
            .fold(None, |best, x| Some(best.map_or(x, |b: f64| b.max(x))))
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Run every lineup entry independently and fold the results.
///
/// A failing generator is recorded as [`StrategyOutcome::Failed`] and the
/// remaining entries still run.
pub fn analyze(series: &PriceSeries, lineup: &[StrategyDescriptor]) -> Analysis {
    let outcomes: Vec<StrategyOutcome> = lineup
        .iter()
        .map(|entry| {
            let key = entry.key.to_string();
            let title = entry.title.to_string();
            match run_strategy(entry.generator.as_ref(), series) {
                Ok(result) => StrategyOutcome::Computed { key, title, result },
                Err(error) => {
                    warn!(
                        strategy = entry.key,
                        symbol = series.symbol(),
                        error = %error,
                        "strategy failed"
                    );
                    StrategyOutcome::Failed { key, title, error }
                }
            }
        })
        .collect();

    let verdict = aggregate(&outcomes);
    info!(
        symbol = series.symbol(),
        buy = verdict.buy_count,
        sell = verdict.sell_count,
        hold = verdict.hold_count,
        failed = verdict.failed_count,
        recommendation = %verdict.recommendation,
        "consensus computed"
    );

    Analysis {
        symbol: series.symbol().to_string(),
        last_close: series.last().map(|b| b.close),
        last_date: series.last().map(|b| b.date),
        outcomes,
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Recommendation;
    use stratlab_core::types::{MaType, Signal};
    use stratlab_strategies::{DualMaConfig, StrategyRegistry, StrategySettings};

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        PriceSeries::from_closes("ACME", start, closes).unwrap()
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn test_default_lineup_runs_all_four() {
        let registry = StrategyRegistry::new();
        let lineup = registry.consensus_lineup(&StrategySettings::default());
        let analysis = analyze(&series(&rising(260)), &lineup);

        assert_eq!(analysis.outcomes.len(), 4);
        assert!(analysis.outcomes.iter().all(|o| !o.is_failed()));
        assert_eq!(analysis.verdict.total(), 4);
        assert_eq!(analysis.last_close, Some(100.0 + 259.0 * 0.5));
        assert!(analysis.best_excess_return().is_some());
    }

    #[test]
    fn test_failing_generator_is_isolated() {
        let registry = StrategyRegistry::new();
        let mut settings = StrategySettings::default();
        settings.dual_ma = DualMaConfig {
            short_period: 20,
            long_period: 10,
            ma_type: MaType::Sma,
        };
        let lineup = registry.consensus_lineup(&settings);
        let analysis = analyze(&series(&rising(60)), &lineup);

        assert_eq!(analysis.verdict.failed_count, 1);
        let failed: Vec<&str> = analysis
            .outcomes
            .iter()
            .filter(|o| o.is_failed())
            .map(|o| o.key())
            .collect();
        assert_eq!(failed, vec!["dual_ma"]);
        assert_eq!(
            analysis.outcomes.iter().filter(|o| o.result().is_some()).count(),
            3
        );
    }

    #[test]
    fn test_short_series_degrades_to_hold() {
        let registry = StrategyRegistry::new();
        let lineup = registry.consensus_lineup(&StrategySettings::default());
        let analysis = analyze(&series(&[100.0, 101.0, 102.0]), &lineup);

        assert_eq!(analysis.verdict.failed_count, 0);
        for outcome in &analysis.outcomes {
            let result = outcome.result().unwrap();
            assert!(!result.data_sufficient || outcome.key() == "dual_ma");
        }
        // Three generators warm up; only the EMA-based dual MA reports a side
        assert!(analysis.verdict.hold_count >= 3);
        assert_eq!(analysis.verdict.recommendation, Recommendation::Hold);
        assert!(analysis
            .outcomes
            .iter()
            .filter(|o| o.key() != "dual_ma")
            .all(|o| o.signal() == Some(Signal::Hold)));
    }
}
