//! End-to-end `analyze` scenarios against in-memory and synthetic providers.

use chrono::{Duration, NaiveDate};
use std::path::Path;
use tickerscope_core::data::{RawBar, StaticProvider, SyntheticProvider};
use tickerscope_core::indicators::Trend;
use tickerscope_runner::{
    analyze, analyze_many, analyze_with, AnalysisConfig, AnalysisError, ChartKind, ChartRenderer,
    ConfigError,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

fn rows(closes: &[f64]) -> Vec<RawBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| RawBar {
            date: start() + Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 1_000,
        })
        .collect()
}

fn config_for(dir: &Path, closes: &[f64]) -> AnalysisConfig {
    let last = start() + Duration::days(closes.len() as i64 - 1);
    AnalysisConfig::default()
        .with_output_dir(dir)
        .with_as_of(last)
}

fn small() -> ChartRenderer {
    ChartRenderer {
        panel_size: (300, 150),
        dashboard_size: (400, 250),
    }
}

fn pngs(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".png"))
        .collect();
    names.sort();
    names
}

fn ascending(n: usize, from: f64, to: f64) -> Vec<f64> {
    (0..n)
        .map(|i| from + (to - from) * i as f64 / (n - 1) as f64)
        .collect()
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn ascending_series_is_upward_with_no_drawdown() {
    let closes = ascending(300, 100.0, 130.0);
    let provider = StaticProvider::new(rows(&closes));
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &closes);

    let result = analyze("aapl", &provider, &config).unwrap();

    assert_eq!(result.ticker, "AAPL");
    assert_eq!(result.observations, 300);
    assert_eq!(result.indicators.trend, Trend::Upward);
    assert!(result.indicators.volatility.unwrap() > 0.0);
    assert_eq!(result.risk.max_drawdown, 0.0);
    assert_eq!(result.indicators.ma200.len(), 101);
    assert!(result.chart_failures.is_empty(), "{:?}", result.chart_failures);
    assert_eq!(
        pngs(dir.path()),
        vec![
            "AAPL_dashboard.png",
            "AAPL_drawdown.png",
            "AAPL_sharpe_ratio.png",
            "AAPL_stockprice.png",
            "AAPL_volatility.png",
        ]
    );
}

#[test]
fn empty_provider_response_is_data_unavailable_and_writes_nothing() {
    let provider = StaticProvider::empty();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("charts");
    let config = AnalysisConfig::default().with_output_dir(&out);

    let err = analyze("ZZZZ", &provider, &config).unwrap_err();
    assert!(matches!(err, AnalysisError::DataUnavailable { .. }));
    assert!(err.is_retryable());
    assert!(!out.exists());
}

#[test]
fn ten_observations_degrade_gracefully() {
    let closes = [10.0, 10.5, 10.2, 10.8, 11.0, 10.9, 11.3, 11.1, 11.6, 11.4];
    let provider = StaticProvider::new(rows(&closes));
    let dir = tempfile::tempdir().unwrap();

    let result = analyze_with("SHORT", &provider, &config_for(dir.path(), &closes), &small()).unwrap();

    assert!(result.indicators.ma50.is_empty());
    assert!(result.indicators.ma200.is_empty());
    assert_eq!(result.indicators.trend, Trend::Sideways);
    assert!(result.risk.rolling_sharpe.is_empty());
    let metrics: Vec<&str> = result
        .insufficient_history
        .iter()
        .map(|n| n.metric.as_str())
        .collect();
    assert!(metrics.contains(&"ma50"));
    assert!(metrics.contains(&"ma200"));
    assert!(metrics.contains(&"rolling_sharpe"));
    assert_eq!(result.artifacts.len(), 5);
}

#[test]
fn unusable_output_dir_is_filesystem_error() {
    let closes = ascending(60, 20.0, 25.0);
    let provider = StaticProvider::new(rows(&closes));
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let config = config_for(&blocker.join("charts"), &closes);

    let err = analyze_with("FS", &provider, &config, &small()).unwrap_err();
    assert!(matches!(err, AnalysisError::Filesystem { .. }));
    assert!(!err.is_retryable());
    assert!(pngs(dir.path()).is_empty());
}

#[test]
fn one_blocked_chart_leaves_the_other_four() {
    let closes = ascending(90, 30.0, 36.0);
    let provider = StaticProvider::new(rows(&closes));
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("ISO_drawdown.png")).unwrap();

    let result = analyze_with("ISO", &provider, &config_for(dir.path(), &closes), &small()).unwrap();

    let written: Vec<ChartKind> = result.artifacts.iter().map(|a| a.kind).collect();
    assert_eq!(
        written,
        vec![ChartKind::Price, ChartKind::Volatility, ChartKind::Sharpe, ChartKind::Dashboard]
    );
    assert_eq!(result.chart_failures.len(), 1);
    assert_eq!(result.chart_failures[0].kind, ChartKind::Drawdown);
    for artifact in &result.artifacts {
        assert!(artifact.file_path.is_file());
    }
    let leftovers: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with('.'))
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}

#[test]
fn repeated_runs_reuse_artifact_paths() {
    let closes = ascending(80, 50.0, 45.0);
    let provider = StaticProvider::new(rows(&closes));
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &closes);

    let first = analyze_with("IDEM", &provider, &config, &small()).unwrap();
    let second = analyze_with("IDEM", &provider, &config, &small()).unwrap();

    assert_eq!(first.artifacts, second.artifacts);
    assert_eq!(first.series_hash, second.series_hash);
    assert_eq!(pngs(dir.path()).len(), 5);
    assert_eq!(
        first.artifact(ChartKind::Drawdown).unwrap().file_path,
        dir.path().join("IDEM_drawdown.png")
    );
}

#[test]
fn zero_variance_series_has_no_sharpe_and_serializes() {
    let closes = vec![100.0; 120];
    let provider = StaticProvider::new(rows(&closes));
    let dir = tempfile::tempdir().unwrap();

    let result = analyze_with("FLAT", &provider, &config_for(dir.path(), &closes), &small()).unwrap();

    assert!(result.risk.rolling_sharpe.is_empty());
    assert_eq!(result.risk.sharpe_ratio, None);
    assert_eq!(result.indicators.volatility, Some(0.0));
    assert_eq!(result.risk.max_drawdown, 0.0);
    let json = result.to_json_pretty().unwrap();
    assert!(!json.contains("NaN"));
}

#[test]
fn invalid_ticker_fails_before_any_io() {
    let provider = StaticProvider::new(rows(&[1.0, 2.0]));
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("charts");
    let config = AnalysisConfig::default().with_output_dir(&out);

    let err = analyze("$$$", &provider, &config).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidTicker { .. }));
    assert!(!out.exists());
}

#[test]
fn invalid_config_is_rejected() {
    let provider = StaticProvider::new(rows(&[1.0, 2.0]));
    let config = AnalysisConfig {
        lookback_days: 0,
        ..AnalysisConfig::default()
    };
    let err = analyze("AAPL", &provider, &config).unwrap_err();
    assert!(matches!(err, AnalysisError::Config(_)));
}

#[test]
fn oversized_lookback_is_config_error_not_panic() {
    let provider = StaticProvider::new(rows(&[1.0, 2.0]));
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig {
        lookback_days: u32::MAX,
        ..AnalysisConfig::default()
    }
    .with_output_dir(dir.path());

    let err = analyze_with("BIG", &provider, &config, &small()).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Config(ConfigError::LookbackTooLarge(u32::MAX))
    ));
}

#[test]
fn many_tickers_are_independent() {
    let provider = SyntheticProvider::new(11);
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig {
        lookback_days: 400,
        ..AnalysisConfig::default()
    }
    .with_output_dir(dir.path())
    .with_as_of(NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());

    let tickers = vec!["AAA".to_string(), "not valid".to_string(), "bbb".to_string()];
    let results = analyze_many(&tickers, &provider, &config);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].0, "AAA");
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(AnalysisError::InvalidTicker { .. })));
    let bbb = results[2].1.as_ref().unwrap();
    assert_eq!(bbb.ticker, "BBB");
    assert_ne!(results[0].1.as_ref().unwrap().series_hash, bbb.series_hash);
    assert_eq!(pngs(dir.path()).len(), 10);
}
