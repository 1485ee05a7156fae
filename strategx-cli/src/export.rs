//! Output formats for the indicator table and signal events.
//!
//! - **CSV**: one row per bar, undefined cells left empty
//! - **JSON**: the full `IndicatorSeries`, undefined values as `null`

use anyhow::{Context, Result};
use strategx_core::components::SignalKind;
use strategx_core::IndicatorSeries;

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_default()
}

fn fmt_flag(v: Option<bool>) -> String {
    v.map(|b| b.to_string()).unwrap_or_default()
}

/// Indicator table as CSV.
///
/// Columns: date, open, high, low, close, volume, every numeric column in
/// `IndicatorSeries::column_names` order, buy_signal, sell_signal.
pub fn export_csv(out: &IndicatorSeries) -> Result<String> {
    let names = out.column_names();
    let columns: Vec<&[Option<f64>]> = names
        .iter()
        .map(|name| {
            out.column(name)
                .with_context(|| format!("missing column '{name}'"))
        })
        .collect::<Result<_>>()?;

    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<String> = ["date", "open", "high", "low", "close", "volume"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(names.iter().cloned());
    header.push("buy_signal".into());
    header.push("sell_signal".into());
    wtr.write_record(&header)?;

    for (i, bar) in out.series.bars().iter().enumerate() {
        let mut record = vec![
            bar.date.to_string(),
            format!("{:.6}", bar.open),
            format!("{:.6}", bar.high),
            format!("{:.6}", bar.low),
            format!("{:.6}", bar.close),
            bar.volume.to_string(),
        ];
        record.extend(columns.iter().map(|c| fmt_opt(c[i])));
        record.push(fmt_flag(out.signals.buy[i]));
        record.push(fmt_flag(out.signals.sell[i]));
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Full indicator series as pretty JSON.
pub fn export_json(out: &IndicatorSeries) -> Result<String> {
    serde_json::to_string_pretty(out).context("failed to serialize indicator series to JSON")
}

/// Signal events as CSV: date, kind, close, long_stop, long_target.
pub fn export_signals_csv(out: &IndicatorSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "kind", "close", "long_stop", "long_target"])?;
    for event in out.signal_events() {
        let kind = match event.kind {
            SignalKind::Buy => "buy",
            SignalKind::Sell => "sell",
        };
        wtr.write_record([
            event.date.to_string(),
            kind.to_string(),
            format!("{:.6}", event.close),
            fmt_opt(event.long_stop),
            fmt_opt(event.long_target),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
