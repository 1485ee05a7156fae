//! Adaptive channel bands (upper A, lower B).
//!
//! Mutually recursive, seeded at zero:
//!   A[0] = B[0] = 0
//!   A[t] = max(close[t], A[t-1]) - (A[t-1] - B[t-1]) / L
//!   B[t] = min(close[t], B[t-1]) + (A[t-1] - B[t-1]) / L
//!
//! The zero seed makes the bands start far below price and climb toward it
//! over a warm-up period. That transient is part of the indicator.
//! Lookback: 0 (the seed is a defined value).

use serde::{Deserialize, Serialize};

use crate::components::indicator::Indicator;
use crate::domain::{Column, PriceBar};

/// Band pair carried from one bar to the next.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelState {
    pub upper: f64,
    pub lower: f64,
}

impl ChannelState {
    /// Zero seed used at index 0.
    pub const SEED: ChannelState = ChannelState {
        upper: 0.0,
        lower: 0.0,
    };

    /// Advance the recurrence by one close.
    pub fn step(self, close: f64, length: usize) -> ChannelState {
        let spread = (self.upper - self.lower) / length as f64;
        ChannelState {
            upper: close.max(self.upper) - spread,
            lower: close.min(self.lower) + spread,
        }
    }
}

/// Output of one channel pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelBands {
    pub upper: Column,
    pub lower: Column,
}

#[derive(Debug, Clone)]
pub struct Channel {
    length: usize,
    name: String,
}

impl Channel {
    /// # Panics
    /// If `length` is zero (the recurrence divides by it).
    pub fn new(length: usize) -> Self {
        assert!(length >= 1, "channel length must be >= 1");
        Self {
            length,
            name: format!("channel_{length}"),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Indicator for Channel {
    type Output = ChannelBands;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> ChannelBands {
        let n = bars.len();
        let mut upper = Vec::with_capacity(n);
        let mut lower = Vec::with_capacity(n);

        if n == 0 {
            return ChannelBands { upper, lower };
        }

        let mut state = ChannelState::SEED;
        upper.push(Some(state.upper));
        lower.push(Some(state.lower));

        for bar in &bars[1..] {
            state = state.step(bar.close, self.length);
            upper.push(Some(state.upper));
            lower.push(Some(state.lower));
        }

        ChannelBands { upper, lower }
    }
}
