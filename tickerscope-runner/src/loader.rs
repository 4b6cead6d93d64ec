//! Price series loading for the analyzer.
//!
//! Turns a ticker into a validated [`PriceSeries`]:
//! 1. Validate the ticker locally (no provider call for a malformed symbol)
//! 2. Fetch `[end - lookback_days, end]` from the provider, single attempt
//! 3. Canonicalize: drop unusable closes, sort, dedupe last-write-wins
//! 4. Build the series
//!
//! An empty response, or one where every close is missing, is
//! `DataUnavailable`.

use crate::config::ConfigError;
use crate::error::AnalysisError;
use chrono::{Days, NaiveDate, Utc};
use tickerscope_core::data::{Canonicalizer, DataProvider};
use tickerscope_core::domain::{PriceBar, PriceSeries};
use tracing::{debug, info, warn};

/// Normalize and validate a ticker symbol.
///
/// Trims whitespace and upper-cases. Allowed characters are ASCII
/// alphanumerics, `.` and `-` (e.g. `BRK.B`, `BF-B`), with at least one
/// alphanumeric.
pub fn validate_ticker(raw: &str) -> Result<String, AnalysisError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| AnalysisError::InvalidTicker {
        ticker: raw.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("ticker is empty"));
    }
    if let Some(c) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '-'))
    {
        return Err(invalid(&format!("unexpected character {c:?}")));
    }
    if !trimmed.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("ticker has no letters or digits"));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Loads one ticker's history from a provider.
pub struct PriceSeriesLoader<'a> {
    provider: &'a dyn DataProvider,
    lookback_days: u32,
}

impl<'a> PriceSeriesLoader<'a> {
    pub fn new(provider: &'a dyn DataProvider, lookback_days: u32) -> Self {
        Self {
            provider,
            lookback_days,
        }
    }

    /// Load history ending today (UTC).
    pub fn load(&self, ticker: &str) -> Result<PriceSeries, AnalysisError> {
        self.load_until(ticker, Utc::now().date_naive())
    }

    /// Load history for the `lookback_days` calendar days ending at `end`.
    pub fn load_until(&self, ticker: &str, end: NaiveDate) -> Result<PriceSeries, AnalysisError> {
        let ticker = validate_ticker(ticker)?;
        let start = end
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .ok_or(AnalysisError::Config(ConfigError::LookbackTooLarge(self.lookback_days)))?;
        let unavailable = |reason: String| AnalysisError::DataUnavailable {
            ticker: ticker.clone(),
            reason,
        };

        debug!(
            ticker = %ticker,
            provider = self.provider.name(),
            %start,
            %end,
            "requesting price history"
        );

        let fetched = self
            .provider
            .fetch(&ticker, start, end)
            .map_err(|e| unavailable(format!("{} provider: {e}", self.provider.name())))?;

        if fetched.bars.is_empty() {
            return Err(unavailable("provider returned no rows".to_string()));
        }

        let canonical = Canonicalizer::canonicalize(&fetched.bars)
            .map_err(|e| unavailable(e.to_string()))?;

        if canonical.bars.is_empty() {
            return Err(unavailable(format!(
                "all {} rows lack a usable close",
                fetched.bars.len()
            )));
        }
        if canonical.dropped > 0 || canonical.duplicates > 0 {
            warn!(
                ticker = %ticker,
                dropped = canonical.dropped,
                duplicates = canonical.duplicates,
                "discarded rows during canonicalization"
            );
        }

        let bars: Vec<PriceBar> = canonical
            .bars
            .into_iter()
            .map(|b| b.into_price_bar())
            .collect();
        let odd_ranges = bars.iter().filter(|b| !b.has_consistent_range()).count();
        if odd_ranges > 0 {
            debug!(ticker = %ticker, bars = odd_ranges, "high/low range does not bracket close");
        }
        let series = PriceSeries::new(ticker.clone(), bars).map_err(|e| unavailable(e.to_string()))?;

        info!(
            ticker = %ticker,
            bars = series.len(),
            first = %series.first().date,
            last = %series.last().date,
            "loaded price series"
        );
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tickerscope_core::data::{
        DataError, DataSource, FetchResult, RawBar, StaticProvider,
    };

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn raw(date: NaiveDate, close: f64) -> RawBar {
        RawBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        }
    }

    /// Counts calls and fails every fetch.
    struct FailingProvider {
        calls: AtomicUsize,
    }

    impl DataProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn fetch(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Result<FetchResult, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DataError::NetworkUnreachable("connection refused".into()))
        }
    }

    /// Records the requested window.
    struct WindowProvider {
        seen: std::sync::Mutex<Option<(String, NaiveDate, NaiveDate)>>,
    }

    impl DataProvider for WindowProvider {
        fn name(&self) -> &str {
            "window"
        }

        fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
            *self.seen.lock().unwrap() = Some((symbol.to_string(), start, end));
            Ok(FetchResult {
                symbol: symbol.to_string(),
                bars: vec![raw(end, 10.0)],
                source: DataSource::InMemory,
            })
        }
    }

    #[test]
    fn ticker_is_trimmed_and_uppercased() {
        assert_eq!(validate_ticker("  aapl ").unwrap(), "AAPL");
        assert_eq!(validate_ticker("brk.b").unwrap(), "BRK.B");
        assert_eq!(validate_ticker("BF-B").unwrap(), "BF-B");
    }

    #[test]
    fn malformed_tickers_are_rejected() {
        for bad in ["", "   ", "AA PL", "AAPL$", "../etc", "...", "-"] {
            let err = validate_ticker(bad).unwrap_err();
            assert!(
                matches!(err, AnalysisError::InvalidTicker { .. }),
                "{bad:?} should be invalid"
            );
        }
    }

    #[test]
    fn window_before_calendar_start_is_config_error() {
        let provider = FailingProvider {
            calls: AtomicUsize::new(0),
        };
        let err = PriceSeriesLoader::new(&provider, u32::MAX)
            .load_until("AAPL", d(2024, 6, 28))
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Config(ConfigError::LookbackTooLarge(u32::MAX))
        ));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn invalid_ticker_never_reaches_provider() {
        let provider = FailingProvider {
            calls: AtomicUsize::new(0),
        };
        let loader = PriceSeriesLoader::new(&provider, 1000);
        let err = loader.load_until("BAD TICKER", d(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidTicker { .. }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn provider_failure_is_data_unavailable_without_retry() {
        let provider = FailingProvider {
            calls: AtomicUsize::new(0),
        };
        let err = PriceSeriesLoader::new(&provider, 1000)
            .load_until("AAPL", d(2024, 1, 1))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::DataUnavailable { .. }));
        assert!(err.is_retryable());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn requests_lookback_window() {
        let provider = WindowProvider {
            seen: std::sync::Mutex::new(None),
        };
        PriceSeriesLoader::new(&provider, 10)
            .load_until("msft", d(2024, 3, 11))
            .unwrap();
        let (symbol, start, end) = provider.seen.lock().unwrap().clone().unwrap();
        assert_eq!(symbol, "MSFT");
        assert_eq!(start, d(2024, 3, 1));
        assert_eq!(end, d(2024, 3, 11));
    }

    #[test]
    fn empty_response_is_data_unavailable() {
        let provider = StaticProvider::empty();
        let err = PriceSeriesLoader::new(&provider, 1000)
            .load_until("ZZZZ", d(2024, 1, 1))
            .unwrap_err();
        match err {
            AnalysisError::DataUnavailable { ticker, .. } => assert_eq!(ticker, "ZZZZ"),
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn all_null_closes_are_data_unavailable() {
        let provider = StaticProvider::new(vec![
            raw(d(2024, 1, 2), f64::NAN),
            raw(d(2024, 1, 3), f64::NAN),
        ]);
        let err = PriceSeriesLoader::new(&provider, 1000)
            .load_until("AAPL", d(2024, 1, 5))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::DataUnavailable { .. }));
    }

    #[test]
    fn unsorted_duplicates_are_canonicalized() {
        let provider = StaticProvider::new(vec![
            raw(d(2024, 1, 4), 12.0),
            raw(d(2024, 1, 2), 10.0),
            raw(d(2024, 1, 3), f64::NAN),
            raw(d(2024, 1, 2), 10.5),
        ]);
        let series = PriceSeriesLoader::new(&provider, 1000)
            .load_until("aapl", d(2024, 1, 5))
            .unwrap();
        assert_eq!(series.ticker(), "AAPL");
        assert_eq!(series.closes(), vec![10.5, 12.0]);
    }
}
