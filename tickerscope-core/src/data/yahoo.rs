//! Yahoo Finance v8 chart API provider.
//!
//! One HTTP request per fetch. Rate limits and network failures surface as
//! `DataError` for the caller to act on; there is no retry loop here.
//! The endpoint is unofficial and its format can change without notice, so
//! `CsvProvider` is the fallback when it breaks.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CHART_ENDPOINT: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct Envelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<SymbolHistory>>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct SymbolHistory {
    timestamp: Option<Vec<i64>>,
    indicators: QuoteBlock,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    quote: Vec<Quote>,
}

/// Column-oriented daily values; any cell may be null.
#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

impl Quote {
    /// Row `i` as a bar, or `None` when every cell is null (holiday, halt).
    fn row(&self, i: usize, date: NaiveDate) -> Option<RawBar> {
        let prices = [
            cell(&self.open, i),
            cell(&self.high, i),
            cell(&self.low, i),
            cell(&self.close, i),
        ];
        let volume = cell(&self.volume, i);
        if prices.iter().all(Option::is_none) && volume.is_none() {
            return None;
        }
        let [open, high, low, close] = prices.map(|p| p.unwrap_or(f64::NAN));
        Some(RawBar {
            date,
            open,
            high,
            low,
            close,
            volume: volume.unwrap_or_default(),
        })
    }
}

fn cell<T: Copy>(column: &[Option<T>], i: usize) -> Option<T> {
    column.get(i).copied().flatten()
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) tickerscope")
            .build()
            .map(|client| Self { client })
            .map_err(|e| DataError::Other(format!("cannot build HTTP client: {e}")))
    }

    /// Daily-interval chart URL covering `[start 00:00, end 23:59:59]` UTC.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let period1 = start.and_hms_opt(0, 0, 0).map_or(0, |dt| dt.and_utc().timestamp());
        let period2 = end
            .and_hms_opt(23, 59, 59)
            .map_or(period1, |dt| dt.and_utc().timestamp());
        format!("{CHART_ENDPOINT}/{symbol}?period1={period1}&period2={period2}&interval=1d")
    }

    /// Convert a decoded response into rows.
    ///
    /// A symbol with no trading days in range yields an empty list, not an error.
    fn rows_from(symbol: &str, envelope: Envelope) -> Result<Vec<RawBar>, DataError> {
        let ChartBody { result, error } = envelope.chart;
        let Some(history) = result.and_then(|r| r.into_iter().next()) else {
            return match error {
                Some(e) if e.code == "Not Found" => Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }),
                Some(e) => Err(DataError::ResponseFormatChanged(format!(
                    "{}: {}",
                    e.code, e.description
                ))),
                None => Ok(Vec::new()),
            };
        };

        // The timestamp array is omitted entirely when there are no trading days.
        let Some(timestamps) = history.timestamp else {
            return Ok(Vec::new());
        };
        let quote = history
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("response has no quote block".into()))?;

        timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| match DateTime::from_timestamp(ts, 0) {
                Some(dt) => quote.row(i, dt.date_naive()).map(Ok),
                None => Some(Err(DataError::ResponseFormatChanged(format!(
                    "timestamp out of range: {ts}"
                )))),
            })
            .collect()
    }

    fn fetch_once(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError> {
        let url = Self::chart_url(symbol, start, end);
        debug!(%symbol, %url, "requesting yahoo chart history");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok()?.parse().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited { retry_after_secs });
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }

        let envelope: Envelope = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("undecodable response for {symbol}: {e}"))
        })?;
        Self::rows_from(symbol, envelope)
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars = self.fetch_once(symbol, start, end)?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::YahooFinance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<RawBar>, DataError> {
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        YahooProvider::rows_from("AAPL", envelope)
    }

    #[test]
    fn parses_rows_and_skips_all_null_days() {
        let json = r#"{"chart":{"result":[{"timestamp":[1704205800,1704292200,1704378600],
            "indicators":{"quote":[{"open":[185.0,null,182.1],"high":[186.0,null,183.0],
            "low":[183.0,null,180.9],"close":[185.6,null,181.9],"volume":[82488700,null,71983600]}]}}],
            "error":null}}"#;
        let bars = parse(json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, 185.6);
        assert_eq!(bars[1].volume, 71_983_600);
    }

    #[test]
    fn missing_close_becomes_nan() {
        let json = r#"{"chart":{"result":[{"timestamp":[1704205800],
            "indicators":{"quote":[{"open":[185.0],"high":[186.0],"low":[183.0],
            "close":[null],"volume":[100]}]}}],"error":null}}"#;
        let bars = parse(json).unwrap();
        assert!(bars[0].close.is_nan());
    }

    #[test]
    fn no_timestamps_is_empty_history() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found",
            "description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(parse(json), Err(DataError::SymbolNotFound { .. })));
    }

    #[test]
    fn chart_url_contains_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let url = YahooProvider::chart_url("MSFT", start, end);
        assert!(url.contains("/chart/MSFT?"));
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    #[ignore] // Requires network access
    fn fetch_live_history() {
        let provider = YahooProvider::new().unwrap();
        let end = chrono::Utc::now().date_naive();
        let start = end - chrono::Duration::days(30);
        let result = provider.fetch("AAPL", start, end).unwrap();
        assert!(!result.bars.is_empty());
    }
}
