//! Indicator primitives and the per-series `IndicatorSet`.
//!
//! Rolling indicators implement [`Indicator`]: full bar history in, one value
//! per bar out, `NaN` during warm-up. [`to_dated`] turns such an output into a
//! dated series with the warm-up positions left out.

pub mod performance;
pub mod returns;
pub mod set;
pub mod sma;
pub mod trend;
pub mod volatility;

pub use performance::{week52_range, ytd_change, Week52Range, YtdChange, WEEK52_BARS};
pub use returns::{log_returns, mean_f64, simple_returns, std_dev, TRADING_DAYS_PER_YEAR};
pub use set::{IndicatorSet, InsufficientHistory, ROLLING_VOLATILITY_WINDOW};
pub use sma::Sma;
pub use trend::{classify_trend, Trend};
pub use volatility::{annualized_volatility, RollingVolatility};

use crate::domain::{DatedValue, PriceBar};

/// Trait for rolling indicators.
///
/// The output has the same length as `bars`; the first `lookback()` values
/// are `f64::NAN`. No value at bar t may depend on bars after t.
pub trait Indicator: Send + Sync {
    /// Name used in logs and insufficient-history notes (e.g. "ma50").
    fn name(&self) -> &str;

    /// Leading bars that stay `NaN`.
    fn lookback(&self) -> usize;

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Pair indicator output with bar dates, dropping non-finite positions.
pub fn to_dated(bars: &[PriceBar], values: &[f64]) -> Vec<DatedValue> {
    bars.iter()
        .zip(values)
        .filter(|(_, v)| v.is_finite())
        .map(|(b, &v)| DatedValue::new(b.date, v))
        .collect()
}

/// Daily test bars from closes, starting 2024-01-02. Each bar opens at the
/// previous close and has a one-point wick on both sides.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let first_day = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let opens = std::iter::once(closes.first().copied().unwrap_or_default()).chain(closes.iter().copied());
    first_day
        .iter_days()
        .zip(opens.zip(closes))
        .map(|(date, (open, &close))| PriceBar {
            date,
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::domain::PriceSeries {
    crate::domain::PriceSeries::new("TEST", make_bars(closes)).unwrap()
}

/// Series from explicit (date, close) pairs.
#[cfg(test)]
pub fn make_series_from(points: &[(chrono::NaiveDate, f64)]) -> crate::domain::PriceSeries {
    let bars = points
        .iter()
        .map(|&(date, close)| PriceBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        })
        .collect();
    crate::domain::PriceSeries::new("TEST", bars).unwrap()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    let gap = (actual - expected).abs();
    assert!(gap < epsilon, "{actual} is {gap} away from {expected} (tolerance {epsilon})");
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
