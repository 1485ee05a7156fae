//! Nearest-neighbor price estimate.
//!
//! For each bar t >= N, the N prior closes `close[t-N..t]` are ranked by
//! `|close[j] - close[t]|`, ties broken by chronological order, and the
//! estimate is the mean of the first min(K, N) of them.
//!
//! The ranking uses the close being estimated, so this is a local
//! self-similarity smoother for overlays rather than a forecast. It still
//! reads nothing past bar t.
//!
//! Lookback: N. With fewer than N + 1 bars the column is entirely undefined.

use rayon::prelude::*;

use crate::components::indicator::Indicator;
use crate::domain::{Column, PriceBar};

#[derive(Debug, Clone)]
pub struct NeighborPredictor {
    window: usize,
    neighbors: usize,
    name: String,
}

impl NeighborPredictor {
    /// # Panics
    /// If `window` or `neighbors` is zero.
    pub fn new(window: usize, neighbors: usize) -> Self {
        assert!(window >= 1, "neighbor window must be >= 1");
        assert!(neighbors >= 1, "neighbor count must be >= 1");
        Self {
            window,
            neighbors,
            name: format!("neighbor_{window}_{neighbors}"),
        }
    }

    /// Neighbors actually averaged: never more than the window holds.
    pub fn effective_neighbors(&self) -> usize {
        self.neighbors.min(self.window)
    }
}

/// Mean of the `k` entries of `window` closest to `target`.
///
/// `window` is oldest-first; equal distances keep that order (stable sort).
pub fn nearest_mean(window: &[f64], target: f64, k: usize) -> f64 {
    let mut order: Vec<usize> = (0..window.len()).collect();
    order.sort_by(|&a, &b| {
        let da = (window[a] - target).abs();
        let db = (window[b] - target).abs();
        da.total_cmp(&db)
    });
    let k = k.min(window.len());
    let sum: f64 = order[..k].iter().map(|&j| window[j]).sum();
    sum / k as f64
}

impl Indicator for NeighborPredictor {
    type Output = Column;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, bars: &[PriceBar]) -> Column {
        let n = bars.len();
        let mut result: Column = vec![None; n];

        if n < self.window + 1 {
            return result;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let k = self.effective_neighbors();

        result[self.window..]
            .par_iter_mut()
            .enumerate()
            .for_each(|(offset, slot)| {
                let i = self.window + offset;
                *slot = Some(nearest_mean(&closes[i - self.window..i], closes[i], k));
            });

        result
    }
}
