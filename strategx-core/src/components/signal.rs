//! Crossover signal generation: channel-band reversals filtered by the trend EMA.
//!
//! - crossup[t]: lower band was below close at t-1 and is above close at t.
//! - crossdn[t]: upper band was above close at t-1 and is below close at t.
//! - buy  = crossup while close < trend EMA (reversal against the trend).
//! - sell = crossdn while close > trend EMA.
//! - long_stop / long_target bracket the close by multiples of volatility.
//!
//! Any undefined input at t (or t-1 for the crossover legs) leaves the output
//! at t undefined. Index 0 has no previous bar, so its flags are undefined.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Column, FlagColumn};

/// Direction of an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Buy,
    Sell,
}

/// A buy or sell flag that fired, with its bracket levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub index: usize,
    pub date: NaiveDate,
    pub kind: SignalKind,
    pub close: f64,
    pub long_stop: Option<f64>,
    pub long_target: Option<f64>,
}

/// Columns the generator reads. All slices must share one length.
#[derive(Debug, Clone, Copy)]
pub struct SignalInputs<'a> {
    pub close: &'a [f64],
    pub channel_upper: &'a [Option<f64>],
    pub channel_lower: &'a [Option<f64>],
    pub trend_ema: &'a [Option<f64>],
    pub volatility: &'a [Option<f64>],
}

/// Output of one signal pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalColumns {
    pub buy: FlagColumn,
    pub sell: FlagColumn,
    pub long_stop: Column,
    pub long_target: Column,
}

impl SignalColumns {
    pub fn buy_count(&self) -> usize {
        self.buy.iter().filter(|f| **f == Some(true)).count()
    }

    pub fn sell_count(&self) -> usize {
        self.sell.iter().filter(|f| **f == Some(true)).count()
    }
}

/// Band moved from below price to above it between `prev` and `cur`.
///
/// Each argument is `(band, close)`.
pub fn crosses_above(prev: (Option<f64>, f64), cur: (Option<f64>, f64)) -> Option<bool> {
    let (prev_band, prev_close) = prev;
    let (cur_band, cur_close) = cur;
    let (prev_band, cur_band) = (prev_band?, cur_band?);
    Some(prev_band < prev_close && cur_band > cur_close)
}

/// Band moved from above price to below it between `prev` and `cur`.
pub fn crosses_below(prev: (Option<f64>, f64), cur: (Option<f64>, f64)) -> Option<bool> {
    let (prev_band, prev_close) = prev;
    let (cur_band, cur_close) = cur;
    let (prev_band, cur_band) = (prev_band?, cur_band?);
    Some(prev_band > prev_close && cur_band < cur_close)
}

#[derive(Debug, Clone)]
pub struct CrossoverSignals {
    stop_multiplier: f64,
    target_multiplier: f64,
}

impl CrossoverSignals {
    pub fn new(stop_multiplier: f64, target_multiplier: f64) -> Self {
        Self {
            stop_multiplier,
            target_multiplier,
        }
    }

    pub fn name(&self) -> &str {
        "crossover_signals"
    }

    /// # Panics
    /// If the input columns differ in length from `close`.
    pub fn evaluate(&self, inputs: &SignalInputs<'_>) -> SignalColumns {
        let n = inputs.close.len();
        assert!(
            inputs.channel_upper.len() == n
                && inputs.channel_lower.len() == n
                && inputs.trend_ema.len() == n
                && inputs.volatility.len() == n,
            "signal inputs must be aligned with the bars"
        );

        let mut out = SignalColumns {
            buy: Vec::with_capacity(n),
            sell: Vec::with_capacity(n),
            long_stop: Vec::with_capacity(n),
            long_target: Vec::with_capacity(n),
        };

        for i in 0..n {
            let close = inputs.close[i];
            let (buy, sell) = if i == 0 {
                (None, None)
            } else {
                self.flags_at(inputs, i)
            };
            out.buy.push(buy);
            out.sell.push(sell);
            out.long_stop
                .push(inputs.volatility[i].map(|v| close - self.stop_multiplier * v));
            out.long_target
                .push(inputs.volatility[i].map(|v| close + self.target_multiplier * v));
        }

        out
    }

    fn flags_at(&self, inputs: &SignalInputs<'_>, i: usize) -> (Option<bool>, Option<bool>) {
        let close = inputs.close[i];
        let prev_close = inputs.close[i - 1];

        let crossup = crosses_above(
            (inputs.channel_lower[i - 1], prev_close),
            (inputs.channel_lower[i], close),
        );
        let crossdn = crosses_below(
            (inputs.channel_upper[i - 1], prev_close),
            (inputs.channel_upper[i], close),
        );

        let buy = crossup.zip(inputs.trend_ema[i]).map(|(up, ema)| up && close < ema);
        let sell = crossdn.zip(inputs.trend_ema[i]).map(|(dn, ema)| dn && close > ema);
        (buy, sell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(
        close: &[f64],
        upper: &[Option<f64>],
        lower: &[Option<f64>],
        ema: &[Option<f64>],
        vol: &[Option<f64>],
    ) -> SignalColumns {
        CrossoverSignals::new(2.0, 4.0).evaluate(&SignalInputs {
            close,
            channel_upper: upper,
            channel_lower: lower,
            trend_ema: ema,
            volatility: vol,
        })
    }

    #[test]
    fn crossover_predicates() {
        assert_eq!(crosses_above((Some(9.0), 10.0), (Some(11.0), 10.5)), Some(true));
        assert_eq!(crosses_above((Some(10.0), 10.0), (Some(11.0), 10.5)), Some(false));
        assert_eq!(crosses_above((None, 10.0), (Some(11.0), 10.5)), None);
        assert_eq!(crosses_below((Some(11.0), 10.0), (Some(9.0), 10.5)), Some(true));
        assert_eq!(crosses_below((Some(11.0), 10.0), (Some(10.5), 10.5)), Some(false));
    }

    #[test]
    fn crossover_undefined_current_band_is_undefined() {
        // previous leg is false; the undefined current band still wins
        assert_eq!(crosses_above((Some(11.0), 10.0), (None, 10.5)), None);
        assert_eq!(crosses_below((Some(9.0), 10.0), (None, 10.5)), None);
    }

    #[test]
    fn buy_requires_close_below_trend() {
        let close = [10.0, 9.0];
        let upper = [Some(20.0), Some(20.0)];
        let lower = [Some(9.5), Some(9.5)]; // below close at 0, above close at 1
        let vol = [None, Some(1.0)];

        let below_trend = evaluate(&close, &upper, &lower, &[Some(50.0), Some(50.0)], &vol);
        assert_eq!(below_trend.buy, vec![None, Some(true)]);
        assert_eq!(below_trend.sell, vec![None, Some(false)]);

        let above_trend = evaluate(&close, &upper, &lower, &[Some(1.0), Some(1.0)], &vol);
        assert_eq!(above_trend.buy, vec![None, Some(false)]);
    }

    #[test]
    fn sell_requires_close_above_trend() {
        let close = [10.0, 12.0];
        let upper = [Some(11.0), Some(11.0)]; // above close at 0, below close at 1
        let lower = [Some(0.0), Some(0.0)];
        let vol = [None, None];

        let above_trend = evaluate(&close, &upper, &lower, &[Some(5.0), Some(5.0)], &vol);
        assert_eq!(above_trend.sell, vec![None, Some(true)]);
        assert_eq!(above_trend.sell_count(), 1);

        let below_trend = evaluate(&close, &upper, &lower, &[Some(50.0), Some(50.0)], &vol);
        assert_eq!(below_trend.sell, vec![None, Some(false)]);
        assert_eq!(below_trend.sell_count(), 0);
    }

    #[test]
    fn brackets_follow_volatility() {
        let close = [100.0, 101.0, 102.0];
        let band = [Some(0.0); 3];
        let ema = [Some(100.0); 3];
        let vol = [None, None, Some(1.5)];
        let out = evaluate(&close, &band, &band, &ema, &vol);

        assert_eq!(out.long_stop[..2], [None, None]);
        assert_eq!(out.long_target[..2], [None, None]);
        assert_eq!(out.long_stop[2], Some(102.0 - 2.0 * 1.5));
        assert_eq!(out.long_target[2], Some(102.0 + 4.0 * 1.5));
    }

    #[test]
    fn undefined_band_propagates() {
        let close = [10.0, 9.0, 8.0];
        let band = [Some(9.5), None, Some(9.5)];
        let ema = [Some(50.0); 3];
        let out = evaluate(&close, &band, &band, &ema, &[None; 3]);
        // index 1: current band undefined, index 2: previous band undefined
        assert_eq!(out.buy, vec![None, None, None]);
        assert_eq!(out.sell, vec![None, None, None]);
    }

    #[test]
    #[should_panic(expected = "signal inputs must be aligned with the bars")]
    fn misaligned_inputs_panic() {
        let close = [10.0, 9.0, 8.0];
        let band = [Some(9.5); 3];
        let short_ema = [Some(50.0); 2];
        evaluate(&close, &band, &band, &short_ema, &[None; 3]);
    }

    #[test]
    fn signal_event_serializes_kind_lowercase() {
        let event = SignalEvent {
            index: 3,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            kind: SignalKind::Buy,
            close: 10.0,
            long_stop: None,
            long_target: Some(14.0),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"buy\""));
        assert!(json.contains("\"long_stop\":null"));
    }
}
