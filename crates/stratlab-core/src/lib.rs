//! Core types and traits for the strategy evaluation kernel.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries)
//! - Discrete signals and the sticky position state they drive
//! - Core traits for indicators, signal generators and price sources

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DataError, KernelError, KernelResult, StrategyError};
pub use traits::*;
pub use types::*;
