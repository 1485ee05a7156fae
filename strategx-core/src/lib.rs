//! StrategX Core: technical indicator and trade-signal pipeline over daily bars.
//!
//! This crate contains:
//! - Domain types (PriceBar, validated PriceSeries, undefined-aware columns)
//! - Adaptive channel bands, EMA and EMA ribbon, nearest-neighbor estimate,
//!   true-range volatility
//! - Crossover signal generator with volatility-scaled stop/target brackets
//! - `compute_indicators`, which runs the stages in dependency order
//! - TOML configuration, CSV ingest, deterministic synthetic bars

pub mod components;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod pipeline;

pub use config::{ConfigError, IndicatorConfig};
pub use domain::{BarError, Column, FlagColumn, PriceBar, PriceSeries};
pub use error::PipelineError;
pub use pipeline::{compute_indicators, IndicatorSeries, MIN_BARS};
