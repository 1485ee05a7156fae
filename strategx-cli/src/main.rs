//! StrategX CLI: compute indicators and signals over daily bars.
//!
//! Commands:
//! - `compute`: print the full indicator table as CSV or JSON
//! - `signals`: print buy/sell events with their stop and target levels
//! - `config`: print the default configuration as TOML

mod export;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use strategx_core::data::{load_bars_csv, random_walk};
use strategx_core::{compute_indicators, IndicatorConfig, IndicatorSeries, PriceSeries};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::export::{export_csv, export_json, export_signals_csv};

#[derive(Parser)]
#[command(
    name = "strategx",
    about = "StrategX CLI: channel, EMA, neighbor and volatility indicators with crossover signals"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

/// Where the bars come from. Exactly one of `--input` / `--synthetic`.
#[derive(clap::Args)]
struct SourceArgs {
    /// CSV file with date,open,high,low,close[,volume] columns.
    #[arg(long, conflicts_with = "synthetic")]
    input: Option<PathBuf>,

    /// Generate this many synthetic random-walk bars instead of reading a file.
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for synthetic bars.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Symbol label. Defaults to the CSV file stem, or SYNTH for synthetic bars.
    #[arg(long)]
    symbol: Option<String>,

    /// Start date for synthetic bars (YYYY-MM-DD).
    #[arg(long, default_value = "2020-01-02")]
    start: String,

    /// Path to a TOML indicator config. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every derived column for each bar.
    Compute {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Print buy/sell events as CSV.
    Signals {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compute { source, format } => {
            let out = run_pipeline(&source)?;
            let text = match format {
                OutputFormat::Csv => export_csv(&out)?,
                OutputFormat::Json => export_json(&out)?,
            };
            print!("{text}");
            if matches!(format, OutputFormat::Json) {
                println!();
            }
            Ok(())
        }
        Commands::Signals { source } => {
            let out = run_pipeline(&source)?;
            print!("{}", export_signals_csv(&out)?);
            Ok(())
        }
        Commands::Config => {
            let text = IndicatorConfig::default()
                .to_toml_string()
                .context("failed to render default config")?;
            print!("{text}");
            Ok(())
        }
    }
}

fn run_pipeline(source: &SourceArgs) -> Result<IndicatorSeries> {
    let config = match &source.config {
        Some(path) => IndicatorConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => IndicatorConfig::default(),
    };

    let series = load_series(source)?;
    info!(
        symbol = series.symbol(),
        bars = series.len(),
        dataset_hash = %series.dataset_hash(),
        "series loaded"
    );

    compute_indicators(&series, &config)
        .with_context(|| format!("indicator pipeline failed for {}", series.symbol()))
}

fn load_series(source: &SourceArgs) -> Result<PriceSeries> {
    match (&source.input, source.synthetic) {
        (Some(path), None) => load_bars_csv(path, source.symbol.as_deref())
            .with_context(|| format!("failed to read bars from {}", path.display())),
        (None, Some(n)) => {
            let start = parse_date(&source.start)?;
            let symbol = source.symbol.as_deref().unwrap_or("SYNTH");
            random_walk(symbol, start, n, source.seed)
                .context("failed to generate synthetic bars")
        }
        (Some(_), Some(_)) => bail!("--input and --synthetic are mutually exclusive"),
        (None, None) => bail!("provide --input <csv> or --synthetic <n>"),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}
