//! Price source trait definitions.

use crate::error::DataError;
use crate::types::PriceSeries;

/// Boundary to whatever supplies raw daily OHLCV history.
///
/// Fetching is outside the kernel; implementations hand back a validated,
/// ascending [`PriceSeries`] and the kernel never calls out again.
pub trait PriceSource: Send + Sync {
    /// Load the full daily history for a symbol.
    fn load(&self, symbol: &str) -> Result<PriceSeries, DataError>;

    /// Human-readable name of the source.
    fn name(&self) -> &str;
}
