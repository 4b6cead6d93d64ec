//! Fatal analysis errors.
//!
//! Anything that stops an analysis from producing a result lands here.
//! Non-fatal findings (short history, a failed chart) are recorded on the
//! result instead.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid ticker '{ticker}': {reason}")]
    InvalidTicker { ticker: String, reason: String },

    #[error("no usable price data for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("output directory {} is not writable: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("result assembly failed: {0}")]
    Assembly(String),
}

impl AnalysisError {
    /// Whether retrying later might succeed. Only provider-side failures
    /// (outages, rate limits, empty responses) qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AnalysisError::DataUnavailable { .. })
    }
}
