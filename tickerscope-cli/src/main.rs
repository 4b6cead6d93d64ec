//! TickerScope CLI: analyze tickers and write their chart sets.
//!
//! Commands:
//! - `analyze` loads history, computes indicators and risk metrics, renders
//!   five PNG charts per ticker and prints a summary (or JSON)

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tickerscope_core::data::{CsvProvider, DataProvider, SyntheticProvider, YahooProvider};
use tickerscope_runner::{analyze_many, AnalysisConfig, AnalysisResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "tickerscope",
    about = "TickerScope: stock price indicators, risk metrics and charts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Source {
    /// Yahoo Finance chart API (network).
    Yahoo,
    /// `{csv-dir}/{TICKER}.csv` files.
    Csv,
    /// Seeded random walk, offline.
    Synthetic,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more tickers.
    Analyze {
        /// Ticker symbols (e.g., AAPL MSFT BRK.B).
        #[arg(required = true)]
        tickers: Vec<String>,

        /// TOML config file. Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for chart PNGs. Defaults to ./stock_charts.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Calendar days of history to request. Defaults to 1000.
        #[arg(long)]
        lookback_days: Option<u32>,

        /// Annual risk-free rate for Sharpe ratios. Defaults to 0.02.
        #[arg(long)]
        risk_free_rate: Option<f64>,

        /// Trading days per rolling Sharpe window. Defaults to 60.
        #[arg(long)]
        sharpe_window: Option<usize>,

        /// Analysis date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,

        /// Price data source.
        #[arg(long, value_enum, default_value_t = Source::Yahoo)]
        source: Source,

        /// Directory of CSV files (with --source csv).
        #[arg(long, default_value = "data")]
        csv_dir: PathBuf,

        /// Seed for --source synthetic.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Print results as JSON instead of a text summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            tickers,
            config,
            output_dir,
            lookback_days,
            risk_free_rate,
            sharpe_window,
            as_of,
            source,
            csv_dir,
            seed,
            json,
        } => {
            let overrides = Overrides {
                output_dir,
                lookback_days,
                risk_free_rate,
                sharpe_window,
                as_of,
            };
            let config = build_config(config, overrides)?;
            let provider = build_provider(source, csv_dir, seed)?;
            run_analyze(&tickers, provider.as_ref(), &config, json)
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

struct Overrides {
    output_dir: Option<PathBuf>,
    lookback_days: Option<u32>,
    risk_free_rate: Option<f64>,
    sharpe_window: Option<usize>,
    as_of: Option<String>,
}

fn build_config(path: Option<PathBuf>, overrides: Overrides) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(dir) = overrides.output_dir {
        config.output_dir = dir;
    }
    if let Some(days) = overrides.lookback_days {
        config.lookback_days = days;
    }
    if let Some(rate) = overrides.risk_free_rate {
        config.risk_free_rate_annual = rate;
    }
    if let Some(window) = overrides.sharpe_window {
        config.sharpe_window = window;
    }
    if let Some(date) = overrides.as_of {
        let parsed = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("--as-of {date:?} is not YYYY-MM-DD"))?;
        config.as_of = Some(parsed);
    }

    config.validate()?;
    Ok(config)
}

fn build_provider(source: Source, csv_dir: PathBuf, seed: u64) -> Result<Box<dyn DataProvider>> {
    Ok(match source {
        Source::Yahoo => Box::new(YahooProvider::new()?),
        Source::Csv => {
            if !csv_dir.is_dir() {
                bail!("CSV directory {} does not exist", csv_dir.display());
            }
            Box::new(CsvProvider::new(csv_dir))
        }
        Source::Synthetic => Box::new(SyntheticProvider::new(seed)),
    })
}

fn run_analyze(
    tickers: &[String],
    provider: &dyn DataProvider,
    config: &AnalysisConfig,
    json: bool,
) -> Result<()> {
    tracing::info!(
        provider = provider.name(),
        tickers = tickers.len(),
        output_dir = %config.output_dir.display(),
        "starting analysis"
    );
    let results = analyze_many(tickers, provider, config);

    let mut succeeded: Vec<&AnalysisResult> = Vec::new();
    let mut failures = 0usize;
    for (ticker, outcome) in &results {
        match outcome {
            Ok(result) => succeeded.push(result),
            Err(e) => {
                failures += 1;
                let hint = if e.is_retryable() { " (retryable)" } else { "" };
                eprintln!("Error for {ticker}: {e}{hint}");
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&succeeded)?);
    } else {
        for result in &succeeded {
            println!();
            println!("{}", result.summary());
        }
    }

    if failures > 0 {
        bail!("{failures} of {} tickers failed", tickers.len());
    }
    Ok(())
}
