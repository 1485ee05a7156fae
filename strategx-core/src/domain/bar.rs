//! PriceBar: one daily trading session.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for a single session.
///
/// Immutable once recorded; a `PriceSeries` owns an ordered run of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Returns true if every OHLC field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }

    /// Finite OHLC with `high >= low`.
    ///
    /// Open and close are not required to lie inside the range; vendor data
    /// occasionally reports a close a tick outside it and the indicators do
    /// not depend on that relation.
    pub fn is_sane(&self) -> bool {
        self.is_finite() && self.high >= self.low
    }
}

/// Reasons a bar sequence cannot form a `PriceSeries`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {index} ({date}): {field} is not a finite number")]
    NonFinite {
        index: usize,
        date: NaiveDate,
        field: &'static str,
    },

    #[error("bar {index} ({date}): high {high} is below low {low}")]
    HighBelowLow {
        index: usize,
        date: NaiveDate,
        high: f64,
        low: f64,
    },

    #[error("bar {index}: date {date} does not follow previous date {previous}")]
    DateNotIncreasing {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },
}

/// Check a single bar in isolation. `index` is only used for the error report.
pub(crate) fn check_bar(index: usize, bar: &PriceBar) -> Result<(), BarError> {
    let fields = [
        ("open", bar.open),
        ("high", bar.high),
        ("low", bar.low),
        ("close", bar.close),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(BarError::NonFinite {
                index,
                date: bar.date,
                field,
            });
        }
    }
    if bar.high < bar.low {
        return Err(BarError::HighBelowLow {
            index,
            date: bar.date,
            high: bar.high,
            low: bar.low,
        });
    }
    Ok(())
}
