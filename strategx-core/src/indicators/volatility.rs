//! True range and its simple rolling mean (volatility).
//!
//! TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|) for t >= 1.
//! TR[0] is undefined: there is no previous close.
//! Volatility[t] = mean(TR[t-length+1..=t]), defined once `length` true ranges exist.
//! Lookback: length.
//!
//! The rolling mean re-sums each window rather than carrying a running sum:
//! O(n * length) work, no state shared between indices.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::indicator::Indicator;
use crate::domain::{Column, PriceBar};

/// Output of one volatility pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolatilityColumns {
    pub true_range: Column,
    pub volatility: Column,
}

/// True range series; index 0 is `None`.
pub fn true_range(bars: &[PriceBar]) -> Column {
    let mut tr = Vec::with_capacity(bars.len());
    if bars.is_empty() {
        return tr;
    }
    tr.push(None);
    for pair in bars.windows(2) {
        let (prev, bar) = (&pair[0], &pair[1]);
        let pc = prev.close;
        let value = (bar.high - bar.low)
            .max((bar.high - pc).abs())
            .max((bar.low - pc).abs());
        tr.push(Some(value));
    }
    tr
}

/// Trailing simple mean over `length` values, `None` while any value in the
/// window is undefined.
///
/// Each index sums its own window left to right, so the result does not
/// depend on how indices are scheduled across threads.
pub fn rolling_mean(values: &Column, length: usize) -> Column {
    let n = values.len();
    let mut result: Column = vec![None; n];
    if length == 0 || n < length {
        return result;
    }

    result[length - 1..]
        .par_iter_mut()
        .enumerate()
        .for_each(|(offset, slot)| {
            let end = length + offset;
            let window = &values[end - length..end];
            let mut sum = 0.0;
            for v in window {
                match v {
                    Some(x) => sum += x,
                    None => return,
                }
            }
            *slot = Some(sum / length as f64);
        });

    result
}

#[derive(Debug, Clone)]
pub struct Volatility {
    length: usize,
    name: String,
}

impl Volatility {
    /// # Panics
    /// If `length` is zero.
    pub fn new(length: usize) -> Self {
        assert!(length >= 1, "volatility length must be >= 1");
        Self {
            length,
            name: format!("volatility_{length}"),
        }
    }
}

impl Indicator for Volatility {
    type Output = VolatilityColumns;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.length
    }

    fn compute(&self, bars: &[PriceBar]) -> VolatilityColumns {
        let true_range = true_range(bars);
        let volatility = rolling_mean(&true_range, self.length);
        VolatilityColumns {
            true_range,
            volatility,
        }
    }
}
