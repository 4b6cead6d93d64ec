//! TickerScope Runner: analysis orchestration.
//!
//! This crate builds on `tickerscope-core` to provide:
//! - Analysis configuration (TOML, validated)
//! - Price series loading with ticker validation
//! - Risk metrics (drawdown, rolling and whole-series Sharpe)
//! - PNG chart rendering with atomic persistence
//! - Result assembly and the `analyze` / `analyze_many` entry points

pub mod analyzer;
pub mod charts;
pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod result;

pub use analyzer::{analyze, analyze_many, analyze_with};
pub use charts::{
    prepare_output_dir, ChartArtifact, ChartError, ChartFailure, ChartKind, ChartRenderer,
    RenderOutcome,
};
pub use config::{AnalysisConfig, ConfigError, RiskConfig};
pub use error::AnalysisError;
pub use loader::{validate_ticker, PriceSeriesLoader};
pub use metrics::RiskMetrics;
pub use result::AnalysisResult;
