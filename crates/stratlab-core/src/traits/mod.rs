//! Core traits for the strategy evaluation kernel.

mod generator;
mod indicator;
mod price_source;

pub use generator::{SignalFrame, SignalGenerator, StrategyConfig};
pub use indicator::{Indicator, MultiOutputIndicator};
pub use price_source::PriceSource;
