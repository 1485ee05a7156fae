//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Determinism: repeated runs are bit-identical
//! 2. Causality: a truncated run reproduces the prefix of the full run
//! 3. Seeds: channel bands start at zero, every EMA starts at the first close
//! 4. Neighbor clamp: K > N averages exactly the whole window
//! 5. Volatility warm-up: undefined strictly before `atr_length`, defined from it

use chrono::NaiveDate;
use proptest::prelude::*;
use strategx_core::components::Indicator;
use strategx_core::indicators::NeighborPredictor;
use strategx_core::{compute_indicators, IndicatorConfig, PriceBar, PriceSeries};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..500.0_f64, min_len..max_len)
        .prop_map(|v| v.into_iter().map(|p| (p * 100.0).round() / 100.0).collect())
}

fn arb_config() -> impl Strategy<Value = IndicatorConfig> {
    (1usize..12, 1usize..60, 1usize..15, 1usize..30, 1usize..20).prop_map(
        |(channel_length, trend_ema_span, knn_window, knn_neighbors, atr_length)| {
            IndicatorConfig {
                channel_length,
                trend_ema_span,
                knn_window,
                knn_neighbors,
                atr_length,
                ..IndicatorConfig::default()
            }
        },
    )
}

fn to_series(closes: &[f64]) -> PriceSeries {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 0.25,
                low: open.min(close) - 0.25,
                close,
                volume: 100,
            }
        })
        .collect();
    PriceSeries::new("PROP", bars).unwrap()
}

fn bits(column: &[Option<f64>]) -> Vec<Option<u64>> {
    column.iter().map(|v| v.map(f64::to_bits)).collect()
}

// ── 1 & 2. Determinism and causality ─────────────────────────────────

proptest! {
    #[test]
    fn repeated_runs_are_identical(closes in arb_closes(2, 80), config in arb_config()) {
        let series = to_series(&closes);
        let a = compute_indicators(&series, &config).unwrap();
        let b = compute_indicators(&series, &config).unwrap();
        for name in a.column_names() {
            prop_assert_eq!(bits(a.column(&name).unwrap()), bits(b.column(&name).unwrap()));
        }
        prop_assert_eq!(&a.signals.buy, &b.signals.buy);
        prop_assert_eq!(&a.signals.sell, &b.signals.sell);
    }

    #[test]
    fn truncated_run_matches_prefix(
        closes in arb_closes(3, 80),
        config in arb_config(),
        cut in 0.0..1.0_f64,
    ) {
        let series = to_series(&closes);
        let len = 2 + ((closes.len() - 2) as f64 * cut) as usize;
        let full = compute_indicators(&series, &config).unwrap();
        let head = compute_indicators(&series.truncated(len), &config).unwrap();
        for name in full.column_names() {
            let f = bits(full.column(&name).unwrap());
            let t = bits(head.column(&name).unwrap());
            prop_assert_eq!(&f[..len], &t[..], "column {}", name);
        }
        prop_assert_eq!(&full.signals.buy[..len], &head.signals.buy[..]);
        prop_assert_eq!(&full.signals.sell[..len], &head.signals.sell[..]);
    }
}

// ── 3. Seeds ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn seeds_hold(closes in arb_closes(2, 40), config in arb_config()) {
        let out = compute_indicators(&to_series(&closes), &config).unwrap();
        prop_assert_eq!(out.channel.upper[0], Some(0.0));
        prop_assert_eq!(out.channel.lower[0], Some(0.0));
        prop_assert_eq!(out.trend_ema[0], Some(closes[0]));
        for column in out.ribbon.values() {
            prop_assert_eq!(column[0], Some(closes[0]));
        }
        prop_assert!(out.trend_ema.iter().all(Option::is_some));
    }

    /// A very slow EMA stays inside the range of closes seen so far.
    #[test]
    fn slow_ema_stays_within_history(closes in arb_closes(2, 60)) {
        let config = IndicatorConfig { trend_ema_span: 10_000, ..IndicatorConfig::default() };
        let out = compute_indicators(&to_series(&closes), &config).unwrap();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (i, &c) in closes.iter().enumerate() {
            lo = lo.min(c);
            hi = hi.max(c);
            let e = out.trend_ema[i].unwrap();
            prop_assert!(e >= lo - 1e-9 && e <= hi + 1e-9);
        }
    }
}

// ── 4. Neighbor clamp ────────────────────────────────────────────────

proptest! {
    #[test]
    fn neighbor_count_clamps_to_window(
        closes in arb_closes(2, 60),
        window in 1usize..10,
        extra in 0usize..50,
    ) {
        let bars = to_series(&closes);
        let clamped = NeighborPredictor::new(window, window + extra).compute(bars.bars());
        let exact = NeighborPredictor::new(window, window).compute(bars.bars());
        prop_assert_eq!(&clamped, &exact);
        for i in window..closes.len() {
            let mean = closes[i - window..i].iter().sum::<f64>() / window as f64;
            prop_assert!((clamped[i].unwrap() - mean).abs() < 1e-9);
        }
        if closes.len() <= window {
            prop_assert!(clamped.iter().all(Option::is_none));
        }
    }
}

// ── 5. Volatility warm-up ────────────────────────────────────────────

proptest! {
    #[test]
    fn volatility_defined_exactly_from_length(
        closes in arb_closes(2, 60),
        atr_length in 1usize..30,
    ) {
        let config = IndicatorConfig { atr_length, ..IndicatorConfig::default() };
        let out = compute_indicators(&to_series(&closes), &config).unwrap();
        for (i, v) in out.volatility.volatility.iter().enumerate() {
            prop_assert_eq!(v.is_some(), i >= atr_length, "index {}", i);
            prop_assert_eq!(out.signals.long_stop[i].is_some(), i >= atr_length);
            prop_assert_eq!(out.signals.long_target[i].is_some(), i >= atr_length);
        }
    }
}
