//! Bar producers: CSV ingest and deterministic synthetic data.
//!
//! Market-data download is outside this crate; callers hand the pipeline a
//! `PriceSeries` from either source.

pub mod ingest;
pub mod synthetic;

pub use ingest::{load_bars_csv, read_bars, DataError};
pub use synthetic::random_walk;
