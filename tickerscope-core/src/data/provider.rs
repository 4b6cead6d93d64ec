//! Where price history comes from.
//!
//! [`DataProvider`] is implemented by the Yahoo chart client, the CSV reader,
//! the synthetic walk and [`StaticProvider`] (canned rows for tests).

use crate::domain::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily row exactly as a provider returned it.
///
/// Missing prices are carried as NaN; rows are not guaranteed to be sorted or
/// unique by date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl RawBar {
    pub fn has_usable_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }

    pub fn into_price_bar(self) -> PriceBar {
        PriceBar {
            date: self.date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}

/// Why a provider could not produce rows.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not reach provider: {0}")]
    NetworkUnreachable(String),

    #[error("provider is throttling requests; retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected response shape: {0}")]
    ResponseFormatChanged(String),

    #[error("unknown symbol {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("csv: {0}")]
    CsvImport(String),

    #[error("canonicalize: {0}")]
    Canonicalize(String),

    #[error("{0}")]
    Other(String),
}

/// Rows returned for one symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Origin of a [`FetchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
    InMemory,
}

/// Trait for price-history providers.
///
/// A provider may return an empty bar list; deciding what that means is the
/// loader's job. Providers do not retry.
pub trait DataProvider: Send + Sync {
    /// Short label used in logs and error messages.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a symbol over an inclusive date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;
}

/// Provider backed by a fixed list of rows, returned verbatim for any symbol.
///
/// Used for tests and for feeding history that was obtained elsewhere.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    bars: Vec<RawBar>,
}

impl StaticProvider {
    pub fn new(bars: Vec<RawBar>) -> Self {
        Self { bars }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl DataProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(
        &self,
        symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: self.bars.clone(),
            source: DataSource::InMemory,
        })
    }
}
