//! PriceSeries: the validated, immutable bar sequence every calculator reads.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bar::{check_bar, BarError, PriceBar};

/// Ordered bars for one instrument.
///
/// Dates are strictly increasing and every bar passes `PriceBar::is_sane`.
/// The bar storage is shared, so cloning a series is cheap and the pipeline
/// output can carry its input without copying it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct PriceSeries {
    symbol: String,
    bars: Arc<[PriceBar]>,
}

/// Unchecked wire form; deserialized series pass through `PriceSeries::new`.
#[derive(Deserialize)]
struct RawSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl TryFrom<RawSeries> for PriceSeries {
    type Error = BarError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        PriceSeries::new(raw.symbol, raw.bars)
    }
}

impl PriceSeries {
    /// Validate `bars` and wrap them.
    ///
    /// An empty sequence is a valid series; the pipeline, not the store,
    /// decides how much history it needs.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, BarError> {
        for (i, bar) in bars.iter().enumerate() {
            check_bar(i, bar)?;
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(BarError::DateNotIncreasing {
                    index: i,
                    date: bar.date,
                    previous: bars[i - 1].date,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars: bars.into(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// First `len` bars as a new series. `len` past the end keeps everything.
    pub fn truncated(&self, len: usize) -> Self {
        let len = len.min(self.bars.len());
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars[..len].into(),
        }
    }

    /// Deterministic BLAKE3 hash over the symbol and every bar.
    pub fn dataset_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.symbol.as_bytes());
        for bar in self.bars.iter() {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}
