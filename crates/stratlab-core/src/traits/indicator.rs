//! Indicator trait definitions.

/// Trait for technical indicators.
///
/// Indicators process price data and produce derived values aligned
/// one-to-one with the input. Warm-up rows are NaN; an input shorter than
/// the warm-up period yields an all-NaN output rather than an error.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically prices)
    ///
    /// # Returns
    /// A vector of the same length as `data`
    fn calculate(&self, data: &[f64]) -> Vec<f64>;

    /// Get the minimum data points required for the first defined value.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Multi-output indicator (e.g., Bollinger Bands, MACD).
///
/// Some indicators produce several related series at once.
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple aligned series.
    type Outputs;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Self::Outputs;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
