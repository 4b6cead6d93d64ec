//! Risk metrics: drawdown and Sharpe ratio over a price series.
//!
//! The free functions are pure: closes or returns in, numbers out. No
//! function here emits NaN or infinity; undefined values are left out.

use crate::config::RiskConfig;
use serde::{Deserialize, Serialize};
use tickerscope_core::domain::{DatedValue, PriceSeries};
use tickerscope_core::indicators::{
    mean_f64, simple_returns, std_dev, InsufficientHistory, TRADING_DAYS_PER_YEAR,
};

/// Standard deviations below this are treated as zero variance.
const ZERO_VARIANCE: f64 = 1e-15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// `(close - running_max) / running_max`, one entry per bar, always ≤ 0.
    pub drawdown_series: Vec<DatedValue>,
    pub max_drawdown: f64,
    pub current_drawdown: f64,
    /// Annualized Sharpe per full window, dated at the window's last bar.
    pub rolling_sharpe: Vec<DatedValue>,
    /// Sharpe over every daily return in the series.
    pub sharpe_ratio: Option<f64>,
    pub risk_free_rate_annual: f64,
    pub sharpe_window: usize,
}

impl RiskMetrics {
    pub fn compute(series: &PriceSeries, config: &RiskConfig) -> Self {
        let bars = series.bars();
        let closes = series.closes();

        let drawdown_series: Vec<DatedValue> = bars
            .iter()
            .zip(drawdown_series(&closes))
            .map(|(b, dd)| DatedValue::new(b.date, dd))
            .collect();
        let max_drawdown = drawdown_series
            .iter()
            .map(|d| d.value)
            .fold(0.0_f64, f64::min);
        let current_drawdown = drawdown_series.last().map_or(0.0, |d| d.value);

        let returns = simple_returns(&closes);
        // Window k covers returns[k..k + w], which end at bar k + w.
        let rolling_sharpe = rolling_sharpe(&returns, config.sharpe_window, config.risk_free_rate_annual)
            .into_iter()
            .enumerate()
            .filter_map(|(k, s)| s.map(|v| DatedValue::new(bars[k + config.sharpe_window].date, v)))
            .collect();

        let metrics = Self {
            drawdown_series,
            max_drawdown,
            current_drawdown,
            rolling_sharpe,
            sharpe_ratio: sharpe_ratio(&returns, config.risk_free_rate_annual),
            risk_free_rate_annual: config.risk_free_rate_annual,
            sharpe_window: config.sharpe_window,
        };
        tracing::debug!(
            ticker = series.ticker(),
            max_drawdown = metrics.max_drawdown,
            sharpe_points = metrics.rolling_sharpe.len(),
            "risk metrics computed"
        );
        metrics
    }

    /// Metrics left absent because `available` bars are too few.
    ///
    /// A zero-variance series also leaves the Sharpe values absent, but that is
    /// not a history shortfall and is not reported here.
    pub fn insufficient_history(&self, available: usize) -> Vec<InsufficientHistory> {
        let mut notes = Vec::new();
        let rolling_required = self.sharpe_window + 1;
        if available < rolling_required {
            notes.push(InsufficientHistory::new(
                "rolling_sharpe",
                rolling_required,
                available,
            ));
        }
        if available < 3 {
            notes.push(InsufficientHistory::new("sharpe_ratio", 3, available));
        }
        notes
    }
}

/// Per-bar drawdown from the running maximum close.
pub fn drawdown_series(closes: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    closes
        .iter()
        .map(|&c| {
            if c >= peak {
                peak = c;
                0.0
            } else {
                (c - peak) / peak
            }
        })
        .collect()
}

/// Maximum drawdown as a non-positive fraction (e.g., -0.15 = 15% drawdown).
pub fn max_drawdown(closes: &[f64]) -> f64 {
    drawdown_series(closes).into_iter().fold(0.0, f64::min)
}

/// Annualized Sharpe ratio of a return series.
///
/// Sharpe = (mean(r) - rf/252) / std(r) * sqrt(252), sample std.
/// `None` with fewer than 2 returns or zero variance.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate_annual: f64) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }
    let std = std_dev(returns);
    if std < ZERO_VARIANCE {
        return None;
    }
    let daily_rf = risk_free_rate_annual / TRADING_DAYS_PER_YEAR;
    let sharpe = (mean_f64(returns) - daily_rf) / std * TRADING_DAYS_PER_YEAR.sqrt();
    sharpe.is_finite().then_some(sharpe)
}

/// Sharpe ratio of every full `window` of returns; `None` where undefined.
///
/// Entry k covers `returns[k..k + window]`.
pub fn rolling_sharpe(returns: &[f64], window: usize, risk_free_rate_annual: f64) -> Vec<Option<f64>> {
    if window < 2 || returns.len() < window {
        return Vec::new();
    }
    returns
        .windows(window)
        .map(|w| sharpe_ratio(w, risk_free_rate_annual))
        .collect()
}
