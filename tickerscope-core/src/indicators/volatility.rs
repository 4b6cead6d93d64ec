//! Annualized volatility of daily log returns.

use super::returns::{log_returns, std_dev, TRADING_DAYS_PER_YEAR};
use super::Indicator;
use crate::domain::PriceBar;

/// Whole-series annualized volatility: std(log returns) * sqrt(252).
///
/// `None` with fewer than 2 closes. With exactly 2 there is a single return and
/// the result is 0.0.
pub fn annualized_volatility(closes: &[f64]) -> Option<f64> {
    if closes.len() < 2 {
        return None;
    }
    let returns = log_returns(closes);
    Some(std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Rolling annualized volatility over the trailing `window` log returns.
///
/// The value at bar t uses returns ending at t, so the first valid bar is
/// index `window` (it needs `window + 1` closes).
#[derive(Debug, Clone)]
pub struct RollingVolatility {
    window: usize,
    name: String,
}

impl RollingVolatility {
    pub fn new(window: usize) -> Self {
        assert!(window >= 2, "volatility window must be >= 2");
        Self {
            window,
            name: format!("volatility_{window}d"),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for RollingVolatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n <= self.window {
            return result;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let returns = log_returns(&closes);
        let scale = TRADING_DAYS_PER_YEAR.sqrt();

        // returns[j] ends at bar j + 1
        for (j, window) in returns.windows(self.window).enumerate() {
            result[j + self.window] = std_dev(window) * scale;
        }
        result
    }
}
