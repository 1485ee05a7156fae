//! Deterministic synthetic bars for demos, tests and benchmarks.
//!
//! A simple random walk from 100.0, one bar per weekday. The RNG is seeded
//! from BLAKE3(symbol, seed) so the same inputs always give the same series.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{BarError, PriceBar, PriceSeries};

/// Generate `n` weekday bars starting at (or after) `start`.
pub fn random_walk(
    symbol: &str,
    start: NaiveDate,
    n: usize,
    seed: u64,
) -> Result<PriceSeries, BarError> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    hasher.update(&seed.to_le_bytes());
    let mut rng = StdRng::from_seed(*hasher.finalize().as_bytes());

    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0_f64;
    let mut current = start;

    while bars.len() < n {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(PriceBar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    PriceSeries::new(symbol, bars)
}
