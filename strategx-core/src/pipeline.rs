//! Indicator pipeline orchestration.
//!
//! Stages run in dependency order over one immutable `PriceSeries`:
//! channel -> trend EMA -> ribbon -> neighbor -> volatility -> signals.
//! Each calculator returns its own columns; this module composes them into
//! an `IndicatorSeries`. Nothing is shared or mutated between calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::components::indicator::{defined_count, Indicator};
use crate::components::signal::{
    CrossoverSignals, SignalColumns, SignalEvent, SignalInputs, SignalKind,
};
use crate::config::IndicatorConfig;
use crate::domain::{Column, PriceSeries};
use crate::error::PipelineError;
use crate::indicators::{
    Channel, ChannelBands, Ema, EmaRibbon, NeighborPredictor, Volatility, VolatilityColumns,
};

/// Smallest series the pipeline accepts.
pub const MIN_BARS: usize = 2;

/// A price series together with every derived column.
///
/// Each column is aligned one-to-one with `series.bars()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub series: PriceSeries,
    pub channel: ChannelBands,
    pub trend_ema: Column,
    pub ribbon: BTreeMap<usize, Column>,
    pub neighbor_pred: Column,
    pub volatility: VolatilityColumns,
    pub signals: SignalColumns,
    /// Largest calculator lookback: bars before every column is defined.
    pub warmup_bars: usize,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Numeric column by name: `channel_upper`, `channel_lower`, `trend_ema`,
    /// `ribbon_ema_<span>`, `neighbor_pred`, `true_range`, `volatility`,
    /// `long_stop`, `long_target`.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        let column = match name {
            "channel_upper" => &self.channel.upper,
            "channel_lower" => &self.channel.lower,
            "trend_ema" => &self.trend_ema,
            "neighbor_pred" => &self.neighbor_pred,
            "true_range" => &self.volatility.true_range,
            "volatility" => &self.volatility.volatility,
            "long_stop" => &self.signals.long_stop,
            "long_target" => &self.signals.long_target,
            other => {
                let span: usize = other.strip_prefix("ribbon_ema_")?.parse().ok()?;
                self.ribbon.get(&span)?
            }
        };
        Some(column.as_slice())
    }

    /// Every numeric column name in output order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = ["channel_upper", "channel_lower", "trend_ema"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        names.extend(self.ribbon.keys().map(|span| format!("ribbon_ema_{span}")));
        names.extend(
            [
                "neighbor_pred",
                "true_range",
                "volatility",
                "long_stop",
                "long_target",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        names
    }

    /// Bars where a buy or sell flag fired, in date order.
    pub fn signal_events(&self) -> Vec<SignalEvent> {
        let mut events = Vec::new();
        for (i, bar) in self.series.bars().iter().enumerate() {
            let fired = [
                (SignalKind::Buy, self.signals.buy[i]),
                (SignalKind::Sell, self.signals.sell[i]),
            ];
            for (kind, flag) in fired {
                if flag == Some(true) {
                    events.push(SignalEvent {
                        index: i,
                        date: bar.date,
                        kind,
                        close: bar.close,
                        long_stop: self.signals.long_stop[i],
                        long_target: self.signals.long_target[i],
                    });
                }
            }
        }
        events
    }
}

/// Compute every derived column for `series`.
///
/// Fails before computing anything when the configuration is invalid or the
/// series has fewer than `MIN_BARS` bars. Windows longer than the series are
/// not errors: the affected columns stay undefined.
pub fn compute_indicators(
    series: &PriceSeries,
    config: &IndicatorConfig,
) -> Result<IndicatorSeries, PipelineError> {
    config.validate()?;
    if series.len() < MIN_BARS {
        return Err(PipelineError::InsufficientData {
            bars: series.len(),
            required: MIN_BARS,
        });
    }

    let bars = series.bars();
    let n = bars.len();

    let channel_ind = Channel::new(config.channel_length);
    let channel = channel_ind.compute(bars);
    debug!(stage = channel_ind.name(), bars = n, "channel bands computed");

    let trend_ind = Ema::new(config.trend_ema_span);
    let trend_ema = trend_ind.compute(bars);
    debug!(stage = trend_ind.name(), bars = n, "trend EMA computed");

    let ribbon_ind = EmaRibbon::new(config.ribbon_spans.iter().copied());
    let ribbon = ribbon_ind.compute(bars);
    debug!(
        stage = ribbon_ind.name(),
        members = ribbon.len(),
        "EMA ribbon computed"
    );

    let neighbor_ind = NeighborPredictor::new(config.knn_window, config.knn_neighbors);
    let neighbor_pred = neighbor_ind.compute(bars);
    report_coverage(neighbor_ind.name(), &neighbor_pred, neighbor_ind.lookback());

    let volatility_ind = Volatility::new(config.atr_length);
    let volatility = volatility_ind.compute(bars);
    report_coverage(
        volatility_ind.name(),
        &volatility.volatility,
        volatility_ind.lookback(),
    );

    let closes = series.closes();
    let signal_gen = CrossoverSignals::new(config.atr_multiplier_sl, config.atr_multiplier_tp);
    let signals = signal_gen.evaluate(&SignalInputs {
        close: &closes,
        channel_upper: &channel.upper,
        channel_lower: &channel.lower,
        trend_ema: &trend_ema,
        volatility: &volatility.volatility,
    });
    debug!(
        stage = signal_gen.name(),
        buys = signals.buy_count(),
        sells = signals.sell_count(),
        "signals computed"
    );

    let warmup_bars = [
        channel_ind.lookback(),
        trend_ind.lookback(),
        ribbon_ind.lookback(),
        neighbor_ind.lookback(),
        volatility_ind.lookback(),
    ]
    .into_iter()
    .max()
    .unwrap_or(0);

    info!(
        symbol = series.symbol(),
        bars = n,
        warmup_bars,
        buys = signals.buy_count(),
        sells = signals.sell_count(),
        config_hash = %config.full_hash(),
        "indicator pipeline complete"
    );

    Ok(IndicatorSeries {
        series: series.clone(),
        channel,
        trend_ema,
        ribbon,
        neighbor_pred,
        volatility,
        signals,
        warmup_bars,
    })
}

fn report_coverage(stage: &str, column: &Column, lookback: usize) {
    let defined = defined_count(column);
    if defined == 0 {
        warn!(
            stage,
            bars = column.len(),
            lookback,
            "series shorter than window, column left undefined"
        );
    } else {
        debug!(stage, bars = column.len(), defined, "column computed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::new("TEST", make_bars(closes)).unwrap()
    }

    #[test]
    fn all_columns_are_aligned() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let out = compute_indicators(&series(&closes), &IndicatorConfig::default()).unwrap();
        assert_eq!(out.len(), 40);
        for name in out.column_names() {
            assert_eq!(out.column(&name).unwrap().len(), 40, "column {name}");
        }
        assert_eq!(out.signals.buy.len(), 40);
        assert_eq!(out.signals.sell.len(), 40);
    }

    #[test]
    fn column_names_cover_ribbon() {
        let out = compute_indicators(&series(&[1.0, 2.0, 3.0]), &IndicatorConfig::default())
            .unwrap();
        let names = out.column_names();
        assert_eq!(names.len(), 3 + 9 + 5);
        assert_eq!(names[3], "ribbon_ema_8");
        assert_eq!(names[11], "ribbon_ema_60");
        assert!(out.column("ribbon_ema_20").is_some());
        assert!(out.column("ribbon_ema_21").is_none());
        assert!(out.column("ribbon_ema_x").is_none());
        assert!(out.column("nope").is_none());
    }

    #[test]
    fn warmup_is_largest_lookback() {
        let out = compute_indicators(&series(&[1.0, 2.0, 3.0]), &IndicatorConfig::default())
            .unwrap();
        assert_eq!(out.warmup_bars, 14);
    }

    #[test]
    fn single_bar_is_insufficient() {
        let err = compute_indicators(&series(&[1.0]), &IndicatorConfig::default()).unwrap_err();
        assert_eq!(err, PipelineError::InsufficientData { bars: 1, required: 2 });
    }

    #[test]
    fn empty_series_is_insufficient() {
        let err = compute_indicators(&series(&[]), &IndicatorConfig::default()).unwrap_err();
        assert_eq!(err, PipelineError::InsufficientData { bars: 0, required: 2 });
    }

    #[test]
    fn configuration_is_checked_before_data() {
        let config = IndicatorConfig {
            atr_length: 0,
            ..IndicatorConfig::default()
        };
        let err = compute_indicators(&series(&[]), &config).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidConfiguration {
                field: "atr_length",
                ..
            }
        ));
    }

    #[test]
    fn signal_events_carry_brackets() {
        // Synthetic columns: force one buy at index 2.
        let mut out = compute_indicators(&series(&[10.0, 11.0, 9.0]), &IndicatorConfig::default())
            .unwrap();
        out.signals.buy = vec![None, Some(false), Some(true)];
        out.signals.sell = vec![None, Some(false), Some(false)];
        out.signals.long_stop[2] = Some(7.0);
        let events = out.signal_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].index, 2);
        assert_eq!(events[0].kind, SignalKind::Buy);
        assert_eq!(events[0].close, 9.0);
        assert_eq!(events[0].long_stop, Some(7.0));
        assert_eq!(events[0].long_target, None);
    }
}
