//! CSV price source.
//!
//! Reads one `<SYMBOL>.csv` file per symbol from a data directory. Headers
//! may be lower-case or in the usual export spelling (`Date`, `Open`,
//! `High`, `Low`, `Close`, `Adj Close`, `Volume`); only the date and a close
//! column are required.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use stratlab_core::error::DataError;
use stratlab_core::traits::PriceSource;
use stratlab_core::types::{Bar, PriceSeries};
use tracing::{debug, warn};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp", alias = "Datetime")]
    date: String,
    #[serde(alias = "Open", default)]
    open: Option<f64>,
    #[serde(alias = "High", default)]
    high: Option<f64>,
    #[serde(alias = "Low", default)]
    low: Option<f64>,
    #[serde(alias = "Close", default)]
    close: Option<f64>,
    #[serde(rename = "Adj Close", alias = "adj_close", alias = "Adj_Close", default)]
    adj_close: Option<f64>,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
}

impl CsvRecord {
    /// Missing OHL values fall back to the close.
    fn into_bar(self, date: NaiveDate) -> Option<Bar> {
        let close = self.close.or(self.adj_close)?;
        Some(Bar::new(
            date,
            self.open.unwrap_or(close),
            self.high.unwrap_or(close),
            self.low.unwrap_or(close),
            close,
            self.volume.unwrap_or(0.0),
        ))
    }
}

/// Inclusive date window applied after loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Directory of per-symbol CSV files.
pub struct CsvPriceSource {
    data_dir: PathBuf,
    range: DateRange,
}

impl CsvPriceSource {
    /// Create a source over `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let data_dir = data_dir.into();
        if !data_dir.is_dir() {
            return Err(DataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("data directory not found: {}", data_dir.display()),
            )));
        }
        Ok(Self {
            data_dir,
            range: DateRange::default(),
        })
    }

    /// Restrict loaded series to `range`.
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Locate the file for `symbol`, trying the name as given, then
    /// upper-case, then lower-case.
    fn path_for(&self, symbol: &str) -> Option<PathBuf> {
        [
            symbol.to_string(),
            symbol.to_uppercase(),
            symbol.to_lowercase(),
        ]
        .iter()
        .map(|name| self.data_dir.join(format!("{name}.csv")))
        .find(|path| path.is_file())
    }
}

impl PriceSource for CsvPriceSource {
    fn load(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let path = self
            .path_for(symbol)
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;
        let bars = read_bars(&path)?;
        let total = bars.len();
        let bars: Vec<Bar> = bars
            .into_iter()
            .filter(|b| self.range.contains(b.date))
            .collect();
        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }
        debug!(symbol, path = %path.display(), total, kept = bars.len(), "loaded csv prices");
        PriceSeries::new(symbol.to_uppercase(), bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Load a single CSV file as the series for `symbol`.
pub fn load_csv(path: impl AsRef<Path>, symbol: &str) -> Result<PriceSeries, DataError> {
    let bars = read_bars(path.as_ref())?;
    if bars.is_empty() {
        return Err(DataError::NoDataAvailable);
    }
    PriceSeries::new(symbol, bars)
}

/// Read, parse and sort the bars of one file.
fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(e.to_string()))?;

    let mut bars = Vec::new();
    let mut skipped = 0usize;

    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        let date = parse_date(&record.date)?;
        match record.into_bar(date) {
            Some(bar) => bars.push(bar),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "rows without a close were skipped");
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

/// Parse various date formats.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.date_naive());
    }

    // Unix timestamp, milliseconds when more than 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        let secs = if ts > 10_000_000_000 { ts / 1000 } else { ts };
        if let Some(dt) = DateTime::from_timestamp(secs, 0) {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
