//! Price-level summaries: year-to-date change and the 52-week range.

use crate::domain::PriceSeries;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Trailing bars treated as one trading year for the 52-week range.
pub const WEEK52_BARS: usize = 252;

/// Year-to-date change measured from the first trading day of the year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YtdChange {
    pub baseline_date: NaiveDate,
    pub baseline_close: f64,
    /// Last bar on or before the as-of date; the change is measured to it.
    pub latest_date: NaiveDate,
    pub change_abs: f64,
    pub change_pct: f64,
}

/// YTD change for the calendar year of `as_of`.
///
/// Only bars dated in that year and no later than `as_of` count. The baseline
/// is the first of them and the change runs to the last, so bars after a
/// pinned `as_of` never leak in. `None` when no bar qualifies.
pub fn ytd_change(series: &PriceSeries, as_of: NaiveDate) -> Option<YtdChange> {
    let year = as_of.year();
    let mut in_year = series
        .bars()
        .iter()
        .skip_while(|b| b.date.year() < year)
        .take_while(|b| b.date <= as_of);

    let baseline = in_year.next()?;
    let latest = in_year.last().unwrap_or(baseline);

    let change_abs = latest.close - baseline.close;
    Some(YtdChange {
        baseline_date: baseline.date,
        baseline_close: baseline.close,
        latest_date: latest.date,
        change_abs,
        change_pct: change_abs / baseline.close * 100.0,
    })
}

/// Highest and lowest close over the trailing trading year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Week52Range {
    pub high: f64,
    pub low: f64,
}

/// Max/min close over the last [`WEEK52_BARS`] bars (whole series if shorter).
pub fn week52_range(series: &PriceSeries) -> Week52Range {
    let bars = series.bars();
    let start = bars.len().saturating_sub(WEEK52_BARS);
    let window = &bars[start..];

    let high = window.iter().map(|b| b.close).fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().map(|b| b.close).fold(f64::INFINITY, f64::min);
    Week52Range { high, low }
}
