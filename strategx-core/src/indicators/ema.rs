//! Exponential Moving Average (EMA) and the EMA ribbon.
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (span + 1)
//! Seed: EMA[0] = close[0], so the series is defined from the first bar.
//! Lookback: 0.

use std::collections::BTreeMap;

use crate::components::indicator::Indicator;
use crate::domain::{Column, PriceBar};

/// Smoothing factor for a span.
pub fn ema_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// One step of the EMA recurrence.
pub fn ema_step(prev: f64, value: f64, alpha: f64) -> f64 {
    alpha * value + (1.0 - alpha) * prev
}

/// EMA of an arbitrary series, seeded from its first value.
pub fn ema_of_series(values: &[f64], span: usize) -> Column {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };
    let alpha = ema_alpha(span);
    let mut result = Vec::with_capacity(values.len());
    let mut prev = first;
    result.push(Some(prev));
    for &v in rest {
        prev = ema_step(prev, v, alpha);
        result.push(Some(prev));
    }
    result
}

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    /// # Panics
    /// If `span` is zero.
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }

    pub fn span(&self) -> usize {
        self.span
    }
}

impl Indicator for Ema {
    type Output = Column;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Column {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.span)
    }
}

/// A fixed set of independent EMAs, one column per span.
#[derive(Debug, Clone)]
pub struct EmaRibbon {
    members: Vec<Ema>,
}

impl EmaRibbon {
    /// Spans used when no configuration overrides them.
    pub const DEFAULT_SPANS: [usize; 9] = [8, 14, 20, 26, 32, 38, 44, 50, 60];

    /// Duplicate spans collapse to one column.
    pub fn new(spans: impl IntoIterator<Item = usize>) -> Self {
        let mut members: Vec<Ema> = spans.into_iter().map(Ema::new).collect();
        members.sort_by_key(Ema::span);
        members.dedup_by_key(|e| e.span);
        Self { members }
    }

    pub fn spans(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().map(Ema::span)
    }
}

impl Default for EmaRibbon {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPANS)
    }
}

impl Indicator for EmaRibbon {
    type Output = BTreeMap<usize, Column>;

    fn name(&self) -> &str {
        "ribbon_ema"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> BTreeMap<usize, Column> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.members
            .iter()
            .map(|ema| (ema.span, ema_of_series(&closes, ema.span)))
            .collect()
    }
}
