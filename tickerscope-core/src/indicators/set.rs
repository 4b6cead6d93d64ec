//! IndicatorSet: every price indicator for one series, computed in one pass.

use super::performance::{week52_range, ytd_change, YtdChange};
use super::sma::Sma;
use super::trend::{classify_trend, Trend};
use super::volatility::{annualized_volatility, RollingVolatility};
use super::{to_dated, Indicator};
use crate::domain::{DatedValue, PriceSeries};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const SHORT_MA_PERIOD: usize = 50;
pub const LONG_MA_PERIOD: usize = 200;
/// Returns per window for the rolling volatility series.
pub const ROLLING_VOLATILITY_WINDOW: usize = 30;

/// A metric left absent because the series was too short for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficientHistory {
    pub metric: String,
    pub required: usize,
    pub available: usize,
}

impl InsufficientHistory {
    pub fn new(metric: impl Into<String>, required: usize, available: usize) -> Self {
        Self {
            metric: metric.into(),
            required,
            available,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub ma50: Vec<DatedValue>,
    pub ma200: Vec<DatedValue>,
    pub trend: Trend,
    pub volatility: Option<f64>,
    pub rolling_volatility: Vec<DatedValue>,
    pub ytd: Option<YtdChange>,
    pub current_price: f64,
    pub week52_high: f64,
    pub week52_low: f64,
}

impl IndicatorSet {
    /// Compute with YTD measured against the current UTC calendar year.
    pub fn compute(series: &PriceSeries) -> Self {
        Self::compute_as_of(series, Utc::now().date_naive())
    }

    pub fn compute_as_of(series: &PriceSeries, as_of: NaiveDate) -> Self {
        let bars = series.bars();
        let closes = series.closes();

        let ma50 = to_dated(bars, &Sma::new(SHORT_MA_PERIOD).compute(bars));
        let ma200 = to_dated(bars, &Sma::new(LONG_MA_PERIOD).compute(bars));
        let rolling_volatility = to_dated(
            bars,
            &RollingVolatility::new(ROLLING_VOLATILITY_WINDOW).compute(bars),
        );

        let current_price = series.last().close;
        let trend = classify_trend(
            current_price,
            ma50.last().map(|v| v.value),
            ma200.last().map(|v| v.value),
        );
        let range = week52_range(series);

        tracing::debug!(
            ticker = series.ticker(),
            bars = bars.len(),
            %trend,
            "indicators computed"
        );

        Self {
            ma50,
            ma200,
            trend,
            volatility: annualized_volatility(&closes),
            rolling_volatility,
            ytd: ytd_change(series, as_of),
            current_price,
            week52_high: range.high,
            week52_low: range.low,
        }
    }

    /// Metrics this set leaves absent, given `available` bars of history.
    pub fn insufficient_history(&self, available: usize) -> Vec<InsufficientHistory> {
        let mut notes = Vec::new();
        if self.ma50.is_empty() {
            notes.push(InsufficientHistory::new("ma50", SHORT_MA_PERIOD, available));
        }
        if self.ma200.is_empty() {
            notes.push(InsufficientHistory::new("ma200", LONG_MA_PERIOD, available));
        }
        if self.volatility.is_none() {
            notes.push(InsufficientHistory::new("volatility", 2, available));
        }
        if self.rolling_volatility.is_empty() {
            notes.push(InsufficientHistory::new(
                "rolling_volatility",
                ROLLING_VOLATILITY_WINDOW + 1,
                available,
            ));
        }
        if self.ytd.is_none() {
            // Counted in bars of the as-of year up to as-of, of which there
            // are none whenever YTD is absent.
            notes.push(InsufficientHistory::new("ytd", 1, 0));
        }
        notes
    }
}
