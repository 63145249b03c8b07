//! Shared configuration checks.

use stratlab_core::error::StrategyError;

pub(crate) fn require_min(name: &str, value: usize, min: usize) -> Result<(), StrategyError> {
    if value < min {
        return Err(StrategyError::InvalidConfig(format!(
            "{name} must be at least {min}, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn require_finite(name: &str, value: f64) -> Result<(), StrategyError> {
    if !value.is_finite() {
        return Err(StrategyError::InvalidConfig(format!(
            "{name} must be a finite number"
        )));
    }
    Ok(())
}

pub(crate) fn require_positive(name: &str, value: f64) -> Result<(), StrategyError> {
    require_finite(name, value)?;
    if value <= 0.0 {
        return Err(StrategyError::InvalidConfig(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn require_thresholds(buy: f64, sell: f64) -> Result<(), StrategyError> {
    require_finite("buy_threshold", buy)?;
    require_finite("sell_threshold", sell)?;
    if sell > buy {
        return Err(StrategyError::InvalidConfig(
            "sell_threshold must not exceed buy_threshold".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_min() {
        assert!(require_min("window", 2, 2).is_ok());
        assert!(require_min("window", 1, 2).is_err());
    }

    #[test]
    fn test_require_thresholds() {
        assert!(require_thresholds(25.0, -25.0).is_ok());
        assert!(require_thresholds(-25.0, 25.0).is_err());
        assert!(require_thresholds(f64::NAN, -25.0).is_err());
    }
}
