//! Consensus over the strategy lineup.
//!
//! Runs every generator of a lineup independently, folds their current
//! signals into one recommendation and renders the combined report.

mod aggregator;
mod analysis;
pub mod report;
pub mod scan;

pub use aggregator::{
    aggregate, ConsensusVerdict, Recommendation, StrategyOutcome, MIN_AGREEING_STRATEGIES,
};
pub use analysis::{analyze, Analysis};
pub use scan::{rank, ScanEntry};
