//! Coarse trend classification from price vs. moving averages.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Upward,
    Downward,
    Sideways,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Upward => "Upward",
            Trend::Downward => "Downward",
            Trend::Sideways => "Sideways",
        };
        f.write_str(s)
    }
}

/// Classify the trend from the latest close and the latest moving averages.
///
/// - both averages: Upward if close > ma50 > ma200, Downward if close < ma50 < ma200
/// - only ma50: compare the close against ma50 alone
/// - no ma50: Sideways
pub fn classify_trend(close: f64, ma50: Option<f64>, ma200: Option<f64>) -> Trend {
    match (ma50, ma200) {
        (Some(short), Some(long)) => {
            if close > short && short > long {
                Trend::Upward
            } else if close < short && short < long {
                Trend::Downward
            } else {
                Trend::Sideways
            }
        }
        (Some(short), None) => {
            if close > short {
                Trend::Upward
            } else if close < short {
                Trend::Downward
            } else {
                Trend::Sideways
            }
        }
        (None, _) => Trend::Sideways,
    }
}
