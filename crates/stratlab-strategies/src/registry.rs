//! Strategy registry and the consensus lineup.
//!
//! The registry is an ordinary value: callers build one per request and
//! hand the resulting lineup to the consensus runner.

use crate::{
    BollingerFibonacciConfig, BollingerFibonacciStrategy, BollingerZScoreConfig,
    BollingerZScoreStrategy, ConnorsZScoreConfig, ConnorsZScoreStrategy, DualMaConfig,
    DualMaStrategy, MacdDonchianConfig, MacdDonchianStrategy,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use stratlab_core::{
    error::StrategyError,
    traits::{SignalGenerator, StrategyConfig},
};

/// Keys of the strategies that vote in the consensus, in report order.
///
/// `bollinger_zscore` is deliberately absent.
pub const CONSENSUS_KEYS: [&str; 4] = [
    "bollinger_fibonacci",
    "macd_donchian",
    "connors_zscore",
    "dual_ma",
];

/// Per-strategy parameters, one section per registered strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    pub bollinger_fibonacci: BollingerFibonacciConfig,
    pub macd_donchian: MacdDonchianConfig,
    pub connors_zscore: ConnorsZScoreConfig,
    pub dual_ma: DualMaConfig,
    pub bollinger_zscore: BollingerZScoreConfig,
}

impl StrategySettings {
    /// Validate every section, naming the first one that fails.
    pub fn validate(&self) -> Result<(), StrategyError> {
        let checks: [(&str, Result<(), StrategyError>); 5] = [
            ("bollinger_fibonacci", self.bollinger_fibonacci.validate()),
            ("macd_donchian", self.macd_donchian.validate()),
            ("connors_zscore", self.connors_zscore.validate()),
            ("dual_ma", self.dual_ma.validate()),
            ("bollinger_zscore", self.bollinger_zscore.validate()),
        ];
        for (key, check) in checks {
            match check {
                Err(StrategyError::InvalidConfig(msg)) => {
                    return Err(StrategyError::InvalidConfig(format!("{key}: {msg}")));
                }
                other => other?,
            }
        }
        Ok(())
    }
}

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Machine key
    pub key: String,
    /// Display name
    pub name: String,
    /// Report section title
    pub title: String,
    /// Strategy description
    pub description: String,
    /// Whether the strategy votes in the consensus
    pub in_consensus: bool,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// One entry of the consensus lineup.
pub struct StrategyDescriptor {
    /// Machine key
    pub key: &'static str,
    /// Report section title
    pub title: &'static str,
    /// Configured generator; configuration errors surface from `generate`
    pub generator: Box<dyn SignalGenerator>,
}

/// Registry of available strategies.
pub struct StrategyRegistry {
    strategies: Vec<StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a registry with all built-in strategies.
    pub fn new() -> Self {
        let defaults = StrategySettings::default();
        let strategies = vec![
            Self::info(
                "bollinger_fibonacci",
                "Bollinger-Fibonacci",
                "Bollinger Bands & Fibonacci Retracement Strategy",
                "Scores the close by its position inside the Bollinger envelope",
                &defaults.bollinger_fibonacci,
            ),
            Self::info(
                "macd_donchian",
                "MACD-Donchian",
                "MACD-Donchian Combined Strategy",
                "Blends normalised MACD momentum with Donchian channel position",
                &defaults.macd_donchian,
            ),
            Self::info(
                "connors_zscore",
                "Connors RSI + Z-Score",
                "Connors RSI & Z-Score Combined Analysis",
                "Blends short-period RSI with a clipped rolling z-score of the close",
                &defaults.connors_zscore,
            ),
            Self::info(
                "dual_ma",
                "Dual Moving Average",
                "Dual Moving Average Crossover Strategy",
                "Trades golden and death crosses of a short and long moving average",
                &defaults.dual_ma,
            ),
            Self::info(
                "bollinger_zscore",
                "Bollinger Z-Score",
                "Bollinger Z-Score Mean Reversion",
                "Fades closes that stray more than entry_z deviations from the rolling mean",
                &defaults.bollinger_zscore,
            ),
        ];
        Self { strategies }
    }

    fn info<C: Serialize>(
        key: &str,
        name: &str,
        title: &str,
        description: &str,
        config: &C,
    ) -> StrategyInfo {
        StrategyInfo {
            key: key.to_string(),
            name: name.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            in_consensus: CONSENSUS_KEYS.contains(&key),
            default_config: serde_json::to_value(config).unwrap_or_default(),
        }
    }

    /// List all available strategies in registration order.
    pub fn list(&self) -> &[StrategyInfo] {
        &self.strategies
    }

    /// Get strategy info by key.
    pub fn get(&self, key: &str) -> Option<&StrategyInfo> {
        self.strategies.iter().find(|info| info.key == key)
    }

    /// Check if a strategy exists.
    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Get all strategy keys.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|info| info.key.as_str()).collect()
    }

    /// Create a strategy instance from a JSON configuration.
    ///
    /// Missing fields fall back to their defaults.
    pub fn create(
        &self,
        key: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn SignalGenerator>, StrategyError> {
        match key {
            "bollinger_fibonacci" => Ok(Box::new(BollingerFibonacciStrategy::new(
                Self::parse::<BollingerFibonacciConfig>(config)?,
            ))),
            "macd_donchian" => Ok(Box::new(MacdDonchianStrategy::new(Self::parse::<
                MacdDonchianConfig,
            >(config)?))),
            "connors_zscore" => Ok(Box::new(ConnorsZScoreStrategy::new(Self::parse::<
                ConnorsZScoreConfig,
            >(config)?))),
            "dual_ma" => Ok(Box::new(DualMaStrategy::new(
                Self::parse::<DualMaConfig>(config)?,
            ))),
            "bollinger_zscore" => Ok(Box::new(BollingerZScoreStrategy::new(Self::parse::<
                BollingerZScoreConfig,
            >(config)?))),
            _ => Err(StrategyError::NotFound(key.to_string())),
        }
    }

    /// Create a strategy with default configuration.
    pub fn create_default(&self, key: &str) -> Result<Box<dyn SignalGenerator>, StrategyError> {
        let info = self
            .get(key)
            .ok_or_else(|| StrategyError::NotFound(key.to_string()))?;
        self.create(key, info.default_config.clone())
    }

    /// Create a strategy from its section of `settings`.
    pub fn from_settings(
        &self,
        key: &str,
        settings: &StrategySettings,
    ) -> Result<Box<dyn SignalGenerator>, StrategyError> {
        let generator = Self::build(key, settings)
            .ok_or_else(|| StrategyError::NotFound(key.to_string()))?;
        match key {
            "bollinger_fibonacci" => settings.bollinger_fibonacci.validate()?,
            "macd_donchian" => settings.macd_donchian.validate()?,
            "connors_zscore" => settings.connors_zscore.validate()?,
            "dual_ma" => settings.dual_ma.validate()?,
            _ => settings.bollinger_zscore.validate()?,
        }
        Ok(generator)
    }

    /// The four consensus strategies, configured from `settings`, in report order.
    ///
    /// Configurations are not validated here; an invalid section makes that
    /// generator fail on its own without affecting the others.
    pub fn consensus_lineup(&self, settings: &StrategySettings) -> Vec<StrategyDescriptor> {
        CONSENSUS_KEYS
            .iter()
            .filter_map(|&key| {
                let title = match key {
                    "bollinger_fibonacci" => "Bollinger Bands & Fibonacci Retracement Strategy",
                    "macd_donchian" => "MACD-Donchian Combined Strategy",
                    "connors_zscore" => "Connors RSI & Z-Score Combined Analysis",
                    _ => "Dual Moving Average Crossover Strategy",
                };
                Some(StrategyDescriptor {
                    key,
                    title,
                    generator: Self::build(key, settings)?,
                })
            })
            .collect()
    }

    fn build(key: &str, settings: &StrategySettings) -> Option<Box<dyn SignalGenerator>> {
        let generator: Box<dyn SignalGenerator> = match key {
            "bollinger_fibonacci" => Box::new(BollingerFibonacciStrategy::new(
                settings.bollinger_fibonacci.clone(),
            )),
            "macd_donchian" => Box::new(MacdDonchianStrategy::new(settings.macd_donchian.clone())),
            "connors_zscore" => {
                Box::new(ConnorsZScoreStrategy::new(settings.connors_zscore.clone()))
            }
            "dual_ma" => Box::new(DualMaStrategy::new(settings.dual_ma.clone())),
            "bollinger_zscore" => Box::new(BollingerZScoreStrategy::new(
                settings.bollinger_zscore.clone(),
            )),
            _ => return None,
        };
        Some(generator)
    }

    fn parse<C: StrategyConfig + DeserializeOwned>(
        config: serde_json::Value,
    ) -> Result<C, StrategyError> {
        let config: C = serde_json::from_value(config)
            .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
