//! Synthetic price history for offline runs.
//!
//! Generates a deterministic random walk over business days. The seed is mixed
//! with the symbol so different tickers get different paths from one provider.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded random-walk provider.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    start_price: f64,
    max_daily_move: f64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start_price: 100.0,
            max_daily_move: 0.03,
        }
    }

    pub fn with_start_price(mut self, price: f64) -> Self {
        self.start_price = price;
        self
    }

    pub fn with_max_daily_move(mut self, fraction: f64) -> Self {
        self.max_daily_move = fraction.abs();
        self
    }

    fn rng_for(&self, symbol: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    /// Generate bars for every weekday in `[start, end]`.
    pub fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
        let mut rng = self.rng_for(symbol);
        let mut last_close = self.start_price;

        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
            .map(|date| {
                let step = if self.max_daily_move > 0.0 {
                    rng.gen_range(-self.max_daily_move..self.max_daily_move)
                } else {
                    0.0
                };
                let open = last_close;
                last_close = open * (1.0 + step);
                let wick_up = 1.0 + rng.gen_range(0.0..0.008);
                let wick_down = 1.0 - rng.gen_range(0.0..0.008);

                RawBar {
                    date,
                    open,
                    high: open.max(last_close) * wick_up,
                    low: open.min(last_close) * wick_down,
                    close: last_close,
                    volume: rng.gen_range(200_000..3_000_000u64),
                }
            })
            .collect()
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: self.generate(symbol, start, end),
            source: DataSource::Synthetic,
        })
    }
}
