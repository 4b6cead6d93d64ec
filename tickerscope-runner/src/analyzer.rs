//! `analyze` entry point: one ticker in, one `AnalysisResult` out.
//!
//! Stages:
//! 1. Validate config and ticker
//! 2. Load the price series
//! 3. Indicators and risk metrics, concurrently (`rayon::join`)
//! 4. Prepare the output directory (fatal if unusable)
//! 5. Render charts (per-chart failures are recorded, not fatal)
//! 6. Assemble the result

use crate::charts::{prepare_output_dir, ChartRenderer};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::loader::{validate_ticker, PriceSeriesLoader};
use crate::metrics::RiskMetrics;
use crate::result::AnalysisResult;
use chrono::Utc;
use rayon::prelude::*;
use tickerscope_core::data::DataProvider;
use tickerscope_core::indicators::IndicatorSet;
use tracing::{info, warn};

/// Analyze one ticker with the default chart renderer.
pub fn analyze(
    ticker: &str,
    provider: &dyn DataProvider,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    analyze_with(ticker, provider, config, &ChartRenderer::default())
}

pub fn analyze_with(
    ticker: &str,
    provider: &dyn DataProvider,
    config: &AnalysisConfig,
    renderer: &ChartRenderer,
) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;
    let ticker = validate_ticker(ticker)?;
    let as_of = config.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let series = PriceSeriesLoader::new(provider, config.lookback_days).load_until(&ticker, as_of)?;

    let risk_config = config.risk();
    let (indicators, risk) = rayon::join(
        || IndicatorSet::compute_as_of(&series, as_of),
        || RiskMetrics::compute(&series, &risk_config),
    );

    let mut insufficient = indicators.insufficient_history(series.len());
    insufficient.extend(risk.insufficient_history(series.len()));
    for note in &insufficient {
        warn!(
            ticker = %ticker,
            metric = %note.metric,
            required = note.required,
            available = note.available,
            "insufficient history"
        );
    }

    prepare_output_dir(&config.output_dir)?;
    let outcome = renderer.render(&series, &indicators, &risk, &config.output_dir);

    let result = AnalysisResult::assemble(&series, as_of, indicators, risk, outcome, insufficient)?;
    info!(
        ticker = %result.ticker,
        trend = %result.indicators.trend,
        charts = result.artifacts.len(),
        "analysis complete"
    );
    Ok(result)
}

/// Analyze several tickers in parallel.
///
/// Results come back in input order, paired with the ticker as given.
pub fn analyze_many(
    tickers: &[String],
    provider: &dyn DataProvider,
    config: &AnalysisConfig,
) -> Vec<(String, Result<AnalysisResult, AnalysisError>)> {
    tickers
        .par_iter()
        .map(|t| (t.clone(), analyze(t, provider, config)))
        .collect()
}
