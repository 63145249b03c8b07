//! Per-strategy analysis record.

use crate::evaluator::evaluate;
use crate::metrics::{PerformanceMetrics, Verdict};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stratlab_core::{
    error::{KernelResult, StrategyError},
    traits::{PriceSource, SignalGenerator},
    types::{PriceSeries, Signal},
};
use tracing::{debug, warn};

/// Everything one strategy reports about one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    /// Machine key of the generator
    pub strategy_key: String,
    /// Display name of the generator
    pub strategy_name: String,
    pub symbol: String,
    /// Score of the last bar, 0 when the series is too short
    pub current_score: f64,
    pub current_signal: Signal,
    pub metrics: PerformanceMetrics,
    /// Metrics judged under the generator's verdict rule
    pub verdict: Verdict,
    /// False when the last bar's score was still warming up
    pub data_sufficient: bool,
    /// Indicator snapshot at the last bar
    pub indicators: BTreeMap<String, f64>,
    pub notes: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl StrategyResult {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Generate signals with `generator` and backtest them over `series`.
pub fn run_strategy(
    generator: &dyn SignalGenerator,
    series: &PriceSeries,
) -> Result<StrategyResult, StrategyError> {
    let frame = generator.generate(series)?;
    let metrics = evaluate(series, &frame.signals)?;

    let data_sufficient = frame.is_warmed_up();
    if !data_sufficient {
        warn!(
            strategy = generator.key(),
            symbol = series.symbol(),
            bars = series.len(),
            warmup = generator.warmup_period(),
            "insufficient data for a current score"
        );
    }
    debug!(
        strategy = generator.key(),
        symbol = series.symbol(),
        signal = %frame.current_signal,
        strategy_return = metrics.strategy_return,
        "strategy run complete"
    );

    Ok(StrategyResult {
        strategy_key: generator.key().to_string(),
        strategy_name: generator.name().to_string(),
        symbol: series.symbol().to_string(),
        current_score: if data_sufficient {
            frame.current_score
        } else {
            0.0
        },
        current_signal: frame.current_signal,
        metrics,
        verdict: metrics.verdict_under(generator.verdict_rule()),
        data_sufficient,
        indicators: frame.indicators,
        notes: frame.notes,
        start_date: series.bars().first().map(|b| b.date),
        end_date: series.last().map(|b| b.date),
    })
}

/// Load `symbol` from `source` and run `generator` over it.
pub fn backtest_symbol(
    generator: &dyn SignalGenerator,
    source: &dyn PriceSource,
    symbol: &str,
) -> KernelResult<StrategyResult> {
    let series = source.load(symbol)?;
    debug!(source = source.name(), symbol, bars = series.len(), "loaded price history");
    Ok(run_strategy(generator, &series)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratlab_core::{
        error::{DataError, KernelError},
        traits::SignalFrame,
        types::VerdictRule,
    };

    /// Serves one fixed series under a single symbol.
    struct OneSymbol(PriceSeries);

    impl PriceSource for OneSymbol {
        fn load(&self, symbol: &str) -> Result<PriceSeries, DataError> {
            if symbol == self.0.symbol() {
                Ok(self.0.clone())
            } else {
                Err(DataError::SymbolNotFound(symbol.to_string()))
            }
        }

        fn name(&self) -> &str {
            "one-symbol"
        }
    }

    /// Buys on the first bar once the series is long enough.
    struct FirstBarBuyer {
        warmup: usize,
    }

    impl SignalGenerator for FirstBarBuyer {
        fn key(&self) -> &str {
            "first_bar"
        }

        fn name(&self) -> &str {
            "First Bar"
        }

        fn generate(&self, series: &PriceSeries) -> Result<SignalFrame, StrategyError> {
            let mut scores = vec![f64::NAN; series.len()];
            if series.len() >= self.warmup {
                scores = vec![50.0; series.len()];
            }
            Ok(SignalFrame::from_scores(scores, 25.0, -25.0))
        }

        fn warmup_period(&self) -> usize {
            self.warmup
        }
    }

    struct Broken;

    impl SignalGenerator for Broken {
        fn key(&self) -> &str {
            "broken"
        }

        fn name(&self) -> &str {
            "Broken"
        }

        fn generate(&self, _series: &PriceSeries) -> Result<SignalFrame, StrategyError> {
            Err(StrategyError::InvalidConfig("window must be at least 2".into()))
        }

        fn warmup_period(&self) -> usize {
            0
        }
    }

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        PriceSeries::from_closes("ACME", start, closes).unwrap()
    }

    #[test]
    fn test_run_strategy() {
        let result = run_strategy(&FirstBarBuyer { warmup: 1 }, &series(&[100.0, 110.0])).unwrap();

        assert_eq!(result.strategy_key, "first_bar");
        assert_eq!(result.symbol, "ACME");
        assert_eq!(result.current_signal, Signal::Buy);
        assert!(result.data_sufficient);
        assert!((result.metrics.strategy_return - 0.1).abs() < 1e-12);
        assert_eq!(result.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(result.end_date, NaiveDate::from_ymd_opt(2024, 3, 2));
    }

    /// Never trades; judged under `rule`.
    struct Idle {
        rule: VerdictRule,
    }

    impl SignalGenerator for Idle {
        fn key(&self) -> &str {
            "idle"
        }

        fn name(&self) -> &str {
            "Idle"
        }

        fn generate(&self, series: &PriceSeries) -> Result<SignalFrame, StrategyError> {
            Ok(SignalFrame::from_scores(vec![0.0; series.len()], 25.0, -25.0))
        }

        fn warmup_period(&self) -> usize {
            1
        }

        fn verdict_rule(&self) -> VerdictRule {
            self.rule
        }
    }

    #[test]
    fn test_verdict_follows_generator_rule() {
        // Buy-and-hold loses 10% with a positive mean daily return, so staying
        // flat wins on return but not on Sharpe
        let data = series(&[100.0, 150.0, 90.0]);

        let strict = run_strategy(&Idle { rule: VerdictRule::ReturnAndSharpe }, &data).unwrap();
        let lenient = run_strategy(&Idle { rule: VerdictRule::ReturnOnly }, &data).unwrap();

        assert_eq!(strict.metrics, lenient.metrics);
        assert!(strict.metrics.excess_return > 0.0);
        assert!(strict.metrics.buyhold_sharpe > 0.0);
        assert_eq!(strict.verdict, Verdict::Underperforms);
        assert_eq!(lenient.verdict, Verdict::Outperforms);
    }

    #[test]
    fn test_insufficient_data_is_neutral() {
        let result = run_strategy(&FirstBarBuyer { warmup: 10 }, &series(&[100.0, 110.0])).unwrap();

        assert!(!result.data_sufficient);
        assert_eq!(result.current_score, 0.0);
        assert_eq!(result.current_signal, Signal::Hold);
        assert_eq!(result.metrics.trading_days, 2);
    }

    #[test]
    fn test_backtest_symbol() {
        let source = OneSymbol(series(&[100.0, 110.0]));

        let result = backtest_symbol(&FirstBarBuyer { warmup: 1 }, &source, "ACME").unwrap();
        assert!((result.metrics.strategy_return - 0.1).abs() < 1e-12);

        let missing = backtest_symbol(&FirstBarBuyer { warmup: 1 }, &source, "NOPE");
        assert!(matches!(
            missing,
            Err(KernelError::Data(DataError::SymbolNotFound(_)))
        ));

        let broken = backtest_symbol(&Broken, &source, "ACME");
        assert!(matches!(
            broken,
            Err(KernelError::Strategy(StrategyError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_generator_error_propagates() {
        let result = run_strategy(&Broken, &series(&[100.0, 110.0]));
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));
    }

    #[test]
    fn test_to_json() {
        let result = run_strategy(&FirstBarBuyer { warmup: 1 }, &series(&[100.0, 110.0])).unwrap();
        let json = result.to_json().unwrap();
        assert!(json.contains("\"current_signal\": \"BUY\""));
    }
}
