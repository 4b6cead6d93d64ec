//! PriceSeries: the validated, immutable input to every engine.

use super::bar::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A value attached to the trading day it describes.
///
/// Derived series (moving averages, drawdowns, rolling ratios) are sequences of
/// `DatedValue` so positions without a defined value can simply be left out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: f64,
}

impl DatedValue {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Reasons a set of bars cannot form a `PriceSeries`.
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("price series is empty")]
    Empty,

    #[error("dates not strictly increasing at index {index} ({date})")]
    NotIncreasing { index: usize, date: NaiveDate },

    #[error("unusable close price on {date}")]
    InvalidClose { date: NaiveDate },
}

/// Ordered daily price history for one ticker.
///
/// Invariants, checked once in [`PriceSeries::new`]:
/// - at least one bar
/// - dates strictly increasing (no duplicates)
/// - every close finite and positive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        for (i, bar) in bars.iter().enumerate() {
            if !bar.has_usable_close() {
                return Err(SeriesError::InvalidClose { date: bar.date });
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(SeriesError::NotIncreasing {
                    index: i,
                    date: bar.date,
                });
            }
        }
        Ok(Self {
            ticker: ticker.into(),
            bars,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    /// Position of the bar dated `date`, if any.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&date, |b| b.date).ok()
    }
}
