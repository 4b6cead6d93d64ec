//! Chart rendering: five PNG artifacts per analysis.
//!
//! Files land at `{output_dir}/{TICKER}_{suffix}.png` and are overwritten on
//! re-run. Each chart gets its own bitmap; one failing chart is recorded as a
//! [`ChartFailure`] and the rest still render.

mod panels;
mod persist;

use crate::error::AnalysisError;
use crate::metrics::RiskMetrics;
use panels::ChartData;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tickerscope_core::domain::PriceSeries;
use tickerscope_core::indicators::IndicatorSet;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("cannot create temporary chart file: {source}")]
    TempFile {
        #[source]
        source: std::io::Error,
    },

    #[error("cannot move chart into {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Price,
    Volatility,
    Drawdown,
    Sharpe,
    Dashboard,
}

impl ChartKind {
    /// Render order.
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Price,
        ChartKind::Volatility,
        ChartKind::Drawdown,
        ChartKind::Sharpe,
        ChartKind::Dashboard,
    ];

    pub fn file_suffix(self) -> &'static str {
        match self {
            ChartKind::Price => "stockprice",
            ChartKind::Volatility => "volatility",
            ChartKind::Drawdown => "drawdown",
            ChartKind::Sharpe => "sharpe_ratio",
            ChartKind::Dashboard => "dashboard",
        }
    }

    pub fn file_name(self, ticker: &str) -> String {
        format!("{ticker}_{}.png", self.file_suffix())
    }

    pub fn path_in(self, output_dir: &Path, ticker: &str) -> PathBuf {
        output_dir.join(self.file_name(ticker))
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// A chart written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartArtifact {
    pub kind: ChartKind,
    pub file_path: PathBuf,
}

/// A chart that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartFailure {
    pub kind: ChartKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutcome {
    pub artifacts: Vec<ChartArtifact>,
    pub failures: Vec<ChartFailure>,
}

/// Create `dir` if missing and check that files can be created in it.
///
/// The probe file is removed again; nothing else in the directory is touched.
pub fn prepare_output_dir(dir: &Path) -> Result<(), AnalysisError> {
    let fs_err = |source| AnalysisError::Filesystem {
        path: dir.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(fs_err)?;
    tempfile::Builder::new()
        .prefix(".tickerscope-probe")
        .tempfile_in(dir)
        .map_err(fs_err)?;
    Ok(())
}

/// Renders the chart set for one analysis.
#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    pub panel_size: (u32, u32),
    pub dashboard_size: (u32, u32),
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self {
            panel_size: (1200, 600),
            dashboard_size: (1600, 1000),
        }
    }
}

impl ChartRenderer {
    pub fn render(
        &self,
        series: &PriceSeries,
        indicators: &IndicatorSet,
        risk: &RiskMetrics,
        output_dir: &Path,
    ) -> RenderOutcome {
        let ticker = series.ticker();
        let data = ChartData::new(series, indicators, risk);
        let mut outcome = RenderOutcome::default();

        for kind in ChartKind::ALL {
            let path = kind.path_in(output_dir, ticker);
            match self.render_one(kind, &path, &data) {
                Ok(()) => {
                    debug!(ticker, chart = %kind, path = %path.display(), "chart written");
                    outcome.artifacts.push(ChartArtifact {
                        kind,
                        file_path: path,
                    });
                }
                Err(e) => {
                    warn!(ticker, chart = %kind, error = %e, "chart failed");
                    outcome.failures.push(ChartFailure {
                        kind,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            ticker,
            written = outcome.artifacts.len(),
            failed = outcome.failures.len(),
            "charts rendered"
        );
        outcome
    }

    fn render_one(&self, kind: ChartKind, path: &Path, data: &ChartData) -> Result<(), ChartError> {
        match kind {
            ChartKind::Price => {
                persist::render_to_file(path, self.panel_size, |area| panels::draw_price(area, data))
            }
            ChartKind::Volatility => persist::render_to_file(path, self.panel_size, |area| {
                panels::draw_volatility(area, data)
            }),
            ChartKind::Drawdown => persist::render_to_file(path, self.panel_size, |area| {
                panels::draw_drawdown(area, data)
            }),
            ChartKind::Sharpe => {
                persist::render_to_file(path, self.panel_size, |area| panels::draw_sharpe(area, data))
            }
            ChartKind::Dashboard => persist::render_to_file(path, self.dashboard_size, |area| {
                panels::draw_dashboard(area, data)
            }),
        }
    }
}
