//! CSV ingest: header-keyed daily bars into a validated `PriceSeries`.
//!
//! Accepts lowercase (`date,open,high,low,close,volume`) and Yahoo-style
//! capitalised headers (`Date,Open,High,Low,Close,Adj Close,Volume`). Extra
//! columns are ignored. A date may carry a time suffix; only the leading
//! `YYYY-MM-DD` is used.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{BarError, PriceBar, PriceSeries};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unparseable date '{value}'")]
    BadDate { row: usize, value: String },

    #[error("row {row}: volume {value} is not a non-negative number")]
    BadVolume { row: usize, value: f64 },

    #[error("{0}")]
    Series(#[from] BarError),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date", alias = "Datetime")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(default, alias = "Volume")]
    volume: f64,
}

fn parse_date(row: usize, raw: &str) -> Result<NaiveDate, DataError> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| DataError::BadDate {
        row,
        value: raw.to_string(),
    })
}

/// Parse bars from any CSV reader and validate them as one series.
pub fn read_bars<R: Read>(symbol: &str, reader: R) -> Result<PriceSeries, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (i, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = record?;
        let date = parse_date(i + 1, &row.date)?;
        if !row.volume.is_finite() || row.volume < 0.0 {
            return Err(DataError::BadVolume {
                row: i + 1,
                value: row.volume,
            });
        }
        bars.push(PriceBar {
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.round() as u64,
        });
    }

    debug!(symbol, rows = bars.len(), "CSV bars parsed");
    Ok(PriceSeries::new(symbol, bars)?)
}

/// Load a CSV file. The symbol defaults to the file stem.
pub fn load_bars_csv(path: &Path, symbol: Option<&str>) -> Result<PriceSeries, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    read_bars(symbol.unwrap_or(&stem), file)
}
