//! Serializable analysis configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! output_dir = "charts"
//! risk_free_rate_annual = 0.04
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_OUTPUT_DIR: &str = "stock_charts";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 1000;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;
pub const DEFAULT_SHARPE_WINDOW: usize = 60;
/// Upper bound on `lookback_days` (about a century).
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lookback_days must be at least 1")]
    ZeroLookback,

    #[error("lookback_days must be at most {MAX_LOOKBACK_DAYS}, got {0}")]
    LookbackTooLarge(u32),

    #[error("sharpe_window must be at least 2, got {0}")]
    SharpeWindowTooSmall(usize),

    #[error("risk_free_rate_annual must be finite, got {0}")]
    InvalidRiskFreeRate(f64),

    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parameters of the risk engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub risk_free_rate_annual: f64,
    /// Daily returns per rolling Sharpe window.
    pub sharpe_window: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_free_rate_annual: DEFAULT_RISK_FREE_RATE,
            sharpe_window: DEFAULT_SHARPE_WINDOW,
        }
    }
}

/// Configuration for one `analyze` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory the chart PNGs are written to.
    pub output_dir: PathBuf,

    /// Calendar days of history requested from the provider.
    pub lookback_days: u32,

    pub risk_free_rate_annual: f64,

    pub sharpe_window: usize,

    /// Analysis date. Fixes the end of the requested window and the YTD year.
    /// `None` means today (UTC).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            risk_free_rate_annual: DEFAULT_RISK_FREE_RATE,
            sharpe_window: DEFAULT_SHARPE_WINDOW,
            as_of: None,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days == 0 {
            return Err(ConfigError::ZeroLookback);
        }
        if self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ConfigError::LookbackTooLarge(self.lookback_days));
        }
        if self.sharpe_window < 2 {
            return Err(ConfigError::SharpeWindowTooSmall(self.sharpe_window));
        }
        if !self.risk_free_rate_annual.is_finite() {
            return Err(ConfigError::InvalidRiskFreeRate(self.risk_free_rate_annual));
        }
        Ok(())
    }

    pub fn risk(&self) -> RiskConfig {
        RiskConfig {
            risk_free_rate_annual: self.risk_free_rate_annual,
            sharpe_window: self.sharpe_window,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }
}
