//! The immutable, serializable outcome of one analysis.

use crate::charts::{ChartArtifact, ChartFailure, ChartKind, RenderOutcome};
use crate::error::AnalysisError;
use crate::metrics::RiskMetrics;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tickerscope_core::domain::PriceSeries;
use tickerscope_core::fingerprint::SeriesHash;
use tickerscope_core::indicators::{IndicatorSet, InsufficientHistory};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ticker: String,
    pub as_of: NaiveDate,
    pub observations: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub series_hash: SeriesHash,
    pub indicators: IndicatorSet,
    pub risk: RiskMetrics,
    pub artifacts: Vec<ChartArtifact>,
    pub chart_failures: Vec<ChartFailure>,
    pub insufficient_history: Vec<InsufficientHistory>,
}

impl AnalysisResult {
    /// Compose engine outputs into a result.
    ///
    /// Checks that no chart kind appears twice and that the per-bar drawdown
    /// series covers the price series.
    pub fn assemble(
        series: &PriceSeries,
        as_of: NaiveDate,
        indicators: IndicatorSet,
        risk: RiskMetrics,
        outcome: RenderOutcome,
        insufficient_history: Vec<InsufficientHistory>,
    ) -> Result<Self, AnalysisError> {
        let mut seen = BTreeSet::new();
        let kinds = outcome
            .artifacts
            .iter()
            .map(|a| a.kind)
            .chain(outcome.failures.iter().map(|f| f.kind));
        for kind in kinds {
            if !seen.insert(kind) {
                return Err(AnalysisError::Assembly(format!(
                    "chart {kind} reported more than once"
                )));
            }
        }
        if risk.drawdown_series.len() != series.len() {
            return Err(AnalysisError::Assembly(format!(
                "drawdown series has {} points for {} bars",
                risk.drawdown_series.len(),
                series.len()
            )));
        }

        Ok(Self {
            ticker: series.ticker().to_string(),
            as_of,
            observations: series.len(),
            first_date: series.first().date,
            last_date: series.last().date,
            series_hash: SeriesHash::of(series),
            indicators,
            risk,
            artifacts: outcome.artifacts,
            chart_failures: outcome.failures,
            insufficient_history,
        })
    }

    pub fn artifact(&self, kind: ChartKind) -> Option<&ChartArtifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Multi-line plain-text summary for terminal output.
    pub fn summary(&self) -> String {
        let ind = &self.indicators;
        let mut lines = vec![
            format!(
                "{}  {} bars  {} .. {}",
                self.ticker, self.observations, self.first_date, self.last_date
            ),
            format!("  current price   {:.2}", ind.current_price),
            format!("  trend           {}", ind.trend),
            format!(
                "  52w range       {:.2} .. {:.2}",
                ind.week52_low, ind.week52_high
            ),
        ];
        match ind.volatility {
            Some(v) => lines.push(format!("  volatility      {:.2}%", v * 100.0)),
            None => lines.push("  volatility      n/a".to_string()),
        }
        match &ind.ytd {
            Some(ytd) => lines.push(format!(
                "  YTD             {:+.2} ({:+.2}%) since {}",
                ytd.change_abs, ytd.change_pct, ytd.baseline_date
            )),
            None => lines.push("  YTD             n/a".to_string()),
        }
        lines.push(format!(
            "  max drawdown    {:.2}%",
            self.risk.max_drawdown * 100.0
        ));
        match self.risk.sharpe_ratio {
            Some(s) => lines.push(format!("  sharpe ratio    {s:.2}")),
            None => lines.push("  sharpe ratio    n/a".to_string()),
        }
        for artifact in &self.artifacts {
            lines.push(format!("  chart           {}", artifact.file_path.display()));
        }
        for failure in &self.chart_failures {
            lines.push(format!("  chart FAILED    {}: {}", failure.kind, failure.message));
        }
        for note in &self.insufficient_history {
            lines.push(format!(
                "  skipped         {} (needs {} bars, have {})",
                note.metric, note.required, note.available
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiskConfig;
    use std::path::PathBuf;
    use tickerscope_core::domain::PriceBar;

    fn series(n: usize) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = (0..n)
            .map(|i| {
                let close = 50.0 + i as f64;
                PriceBar {
                    date: base + chrono::Duration::days(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 0,
                }
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    fn artifact(kind: ChartKind) -> ChartArtifact {
        ChartArtifact {
            kind,
            file_path: PathBuf::from(kind.file_name("TEST")),
        }
    }

    fn parts(s: &PriceSeries) -> (NaiveDate, IndicatorSet, RiskMetrics) {
        let as_of = s.last().date;
        (
            as_of,
            IndicatorSet::compute_as_of(s, as_of),
            RiskMetrics::compute(s, &RiskConfig::default()),
        )
    }

    #[test]
    fn assembles_metadata() {
        let s = series(30);
        let (as_of, ind, risk) = parts(&s);
        let outcome = RenderOutcome {
            artifacts: vec![artifact(ChartKind::Price)],
            failures: vec![ChartFailure {
                kind: ChartKind::Dashboard,
                message: "boom".into(),
            }],
        };
        let result = AnalysisResult::assemble(&s, as_of, ind, risk, outcome, vec![]).unwrap();
        assert_eq!(result.ticker, "TEST");
        assert_eq!(result.observations, 30);
        assert_eq!(result.first_date, s.first().date);
        assert_eq!(result.last_date, s.last().date);
        assert_eq!(result.series_hash, SeriesHash::of(&s));
        assert!(result.artifact(ChartKind::Price).is_some());
        assert!(result.artifact(ChartKind::Sharpe).is_none());
        assert_eq!(result.chart_failures.len(), 1);
    }

    #[test]
    fn duplicate_kind_is_assembly_error() {
        let s = series(5);
        let (as_of, ind, risk) = parts(&s);
        let outcome = RenderOutcome {
            artifacts: vec![artifact(ChartKind::Price), artifact(ChartKind::Price)],
            failures: vec![],
        };
        let err = AnalysisResult::assemble(&s, as_of, ind, risk, outcome, vec![]).unwrap_err();
        assert!(matches!(err, AnalysisError::Assembly(_)));
    }

    #[test]
    fn mismatched_drawdown_is_assembly_error() {
        let s = series(5);
        let (as_of, ind, mut risk) = parts(&s);
        risk.drawdown_series.pop();
        let err = AnalysisResult::assemble(&s, as_of, ind, risk, RenderOutcome::default(), vec![])
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Assembly(_)));
    }

    #[test]
    fn json_roundtrip_and_summary() {
        let s = series(10);
        let (as_of, ind, risk) = parts(&s);
        let notes = ind.insufficient_history(10);
        let result =
            AnalysisResult::assemble(&s, as_of, ind, risk, RenderOutcome::default(), notes).unwrap();

        let json = result.to_json_pretty().unwrap();
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ticker, result.ticker);
        assert_eq!(back.series_hash, result.series_hash);
        assert_eq!(back.insufficient_history, result.insufficient_history);

        let text = result.summary();
        assert!(text.starts_with("TEST  10 bars"));
        assert!(text.contains("skipped         ma50"));
    }
}
