//! PriceBar: one validated trading day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV record for a single ticker.
///
/// Only `close` is guaranteed finite and positive; the other prices are carried
/// through from the provider as-is (NaN when the provider left them blank).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// True when the close can be used for computation.
    pub fn has_usable_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }

    /// False when the provider reported a high below the low, or a close
    /// outside `[low, high]`. Missing (NaN) extremes are not inconsistent.
    pub fn has_consistent_range(&self) -> bool {
        let (lo, hi) = (self.low, self.high);
        if lo.is_nan() || hi.is_nan() {
            return true;
        }
        lo <= hi && (lo..=hi).contains(&self.close)
    }
}
