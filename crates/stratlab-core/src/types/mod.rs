//! Core data types for the strategy evaluation kernel.

mod price;
mod signal;

pub use price::{Bar, PriceSeries};
pub use signal::{MaType, Position, ScoreSeries, Signal, SignalSeries, VerdictRule};
