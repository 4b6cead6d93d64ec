//! Series fingerprinting: deterministic identity of a validated price series.

use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};
use std::fmt;

/// BLAKE3 digest (hex) over the ticker and every bar.
///
/// Two analyses fed identical bars carry the same hash, so their results can
/// be recognised as computed from the same input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesHash(String);

impl SeriesHash {
    pub fn of(series: &PriceSeries) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(series.ticker().as_bytes());
        for bar in series.bars() {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceSeries;
    use crate::indicators::make_bars;

    #[test]
    fn identical_series_hash_equal() {
        let a = PriceSeries::new("SPY", make_bars(&[1.0, 2.0, 3.0])).unwrap();
        let b = PriceSeries::new("SPY", make_bars(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(SeriesHash::of(&a), SeriesHash::of(&b));
        assert_eq!(SeriesHash::of(&a).as_str().len(), 64);
    }

    #[test]
    fn hash_changes_with_close_or_ticker() {
        let a = PriceSeries::new("SPY", make_bars(&[1.0, 2.0, 3.0])).unwrap();
        let b = PriceSeries::new("SPY", make_bars(&[1.0, 2.0, 3.5])).unwrap();
        let c = PriceSeries::new("QQQ", make_bars(&[1.0, 2.0, 3.0])).unwrap();
        assert_ne!(SeriesHash::of(&a), SeriesHash::of(&b));
        assert_ne!(SeriesHash::of(&a), SeriesHash::of(&c));
    }
}
