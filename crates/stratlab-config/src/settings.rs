//! Configuration structures.

use crate::SettingsError;
use serde::{Deserialize, Serialize};
use stratlab_strategies::StrategySettings;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub strategies: StrategySettings,
}

impl AppConfig {
    /// Validate every strategy section.
    pub fn validate(&self) -> Result<(), SettingsError> {
        Ok(self.strategies.validate()?)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    /// Directory holding one `<SYMBOL>.csv` per symbol
    pub data_dir: String,
    /// Symbols scanned when none are given on the command line
    pub watchlist: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "stratlab".to_string(),
            data_dir: "data".to_string(),
            watchlist: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Optional log file, written in JSON alongside the console output
    pub file: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_toml_round_trips() {
        let config = AppConfig::default();
        let rendered = config.to_toml().unwrap();

        assert!(rendered.contains("[strategies.dual_ma]"));
        assert!(rendered.contains("ma_type = \"EMA\""));

        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.strategies, config.strategies);
    }

    #[test]
    fn test_validate_reports_bad_section() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.strategies.bollinger_fibonacci.num_std = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bollinger_fibonacci"));
    }

    #[test]
    fn test_logging_format() {
        let mut logging = LoggingConfig::default();
        assert!(!logging.is_json());
        logging.format = "JSON".into();
        assert!(logging.is_json());
    }
}
