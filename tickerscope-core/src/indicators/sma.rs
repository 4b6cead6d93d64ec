//! Trailing simple moving average of closes.

use super::Indicator;
use crate::domain::PriceBar;

/// Mean of the last `period` closes, defined from bar `period - 1` onward.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "moving average period must be positive");
        Self {
            name: format!("ma{period}"),
            period,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let mut out = vec![f64::NAN; bars.len()];
        let Some(first) = bars.get(..self.period) else {
            return out;
        };

        let width = self.period as f64;
        let mut window_sum: f64 = first.iter().map(|b| b.close).sum();
        out[self.period - 1] = window_sum / width;

        // Slide: add the entering close, drop the leaving one.
        for (t, (entering, leaving)) in bars[self.period..].iter().zip(bars).enumerate() {
            window_sum += entering.close - leaving.close;
            out[t + self.period] = window_sum / width;
        }
        out
    }
}
