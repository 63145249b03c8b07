//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Daily OHLCV bar.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume (carried, unused by the kernel)
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bar whose open, high, low and close are all `price`.
    pub fn flat(date: NaiveDate, price: f64) -> Self {
        Self::new(date, price, price, price, price, 0.0)
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Immutable, date-indexed price history for one symbol.
///
/// Invariants checked on construction: dates strictly ascending, every close
/// positive and finite. An empty series is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Validate and wrap a bar sequence.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, DataError> {
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(DataError::NonAscendingDates {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        if let Some(bad) = bars.iter().find(|b| !(b.close.is_finite() && b.close > 0.0)) {
            return Err(DataError::NonPositiveClose {
                date: bad.date,
                close: bad.close,
            });
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Build a series of flat bars from closes, one calendar day apart starting at `start`.
    ///
    /// Handy for tests and for callers that only have a close column.
    pub fn from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, DataError> {
        let bars = closes
            .iter()
            .zip(start.iter_days())
            .map(|(&close, date)| Bar::flat(date, close))
            .collect();
        Self::new(symbol, bars)
    }

    /// Symbol identifier.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Extract dates as a vector.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}
