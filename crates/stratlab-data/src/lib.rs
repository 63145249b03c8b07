//! Price data sources.

mod csv_source;

pub use csv_source::{load_csv, CsvPriceSource, DateRange};
