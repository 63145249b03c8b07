//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, LoggingConfig};
pub use stratlab_strategies::StrategySettings;

use config::{Config, ConfigError, Environment, File, FileFormat};
use std::path::Path;
use stratlab_core::error::StrategyError;
use thiserror::Error;

/// Environment variable prefix, e.g. `STRATLAB__LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "STRATLAB";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid strategy settings: {0}")]
    Invalid(#[from] StrategyError),

    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Load configuration from an optional TOML file and the environment.
///
/// A missing file is not an error; every setting has a default.
pub fn load_config(path: &Path) -> Result<AppConfig, SettingsError> {
    let config = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use stratlab_core::types::MaType;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();

        let defaults = StrategySettings::default();
        assert_eq!(config.strategies.dual_ma, defaults.dual_ma);
        assert_eq!(config.strategies.macd_donchian, defaults.macd_donchian);
        assert_eq!(config.app.data_dir, "data");
    }

    #[test]
    fn test_partial_file_overrides_named_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stratlab.toml");
        fs::write(
            &path,
            r#"
[app]
data_dir = "prices"

[strategies.dual_ma]
short_period = 20
ma_type = "SMA"

[strategies.connors_zscore]
connors_weight = 0.5
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.app.data_dir, "prices");
        assert_eq!(config.app.name, "stratlab");
        assert_eq!(config.strategies.dual_ma.short_period, 20);
        assert_eq!(config.strategies.dual_ma.long_period, 200);
        assert_eq!(config.strategies.dual_ma.ma_type, MaType::Sma);
        assert_eq!(config.strategies.connors_zscore.connors_weight, 0.5);
        assert_eq!(config.strategies.connors_zscore.zscore_weight, 0.3);
        assert_eq!(config.strategies.macd_donchian.fast_period, 12);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stratlab.toml");
        fs::write(&path, "[strategies.bollinger_zscore]\nwindow = 30\n").unwrap();

        std::env::set_var("STRATLAB__STRATEGIES__BOLLINGER_ZSCORE__WINDOW", "15");
        let config = load_config(&path);
        std::env::remove_var("STRATLAB__STRATEGIES__BOLLINGER_ZSCORE__WINDOW");

        assert_eq!(config.unwrap().strategies.bollinger_zscore.window, 15);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[strategies.dual_ma]\nshort_period = \"fast\"\n").unwrap();

        assert!(matches!(load_config(&path), Err(SettingsError::Load(_))));
    }
}
