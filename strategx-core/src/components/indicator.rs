//! Indicator trait.
//!
//! Indicators are pure functions: bar history in, derived column(s) out.
//! Each one is computed once over the whole series; nothing is recomputed
//! per bar and nothing is written back into the bars.

use crate::domain::{Column, PriceBar};

/// Trait for the bar-driven calculators (channel, EMA, neighbor, volatility).
///
/// Output columns are aligned one-to-one with `bars`. Indices before
/// `lookback()` hold `None` unless the calculator documents a seed value.
///
/// # Look-ahead contamination guard
/// No output value at bar t may depend on bars t+1 or later. Every indicator
/// must give the same prefix when computed on a truncated series.
pub trait Indicator: Send + Sync {
    /// Derived column(s) produced by one pass.
    type Output;

    /// Column name (e.g., "trend_ema", "volatility").
    fn name(&self) -> &str;

    /// First bar index at which the output is defined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[PriceBar]) -> Self::Output;
}

/// Number of defined values in a column.
pub fn defined_count(column: &Column) -> usize {
    column.iter().filter(|v| v.is_some()).count()
}
