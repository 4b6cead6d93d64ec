//! CSV import provider.
//!
//! Reads `{dir}/{SYMBOL}.csv` with a `date,open,high,low,close,volume` header.
//! Blank cells are allowed; a blank close becomes NaN and is dropped later by
//! the canonicalizer.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<u64>,
}

/// Provider reading one CSV file per symbol from a directory.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let path = self.file_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| DataError::CsvImport(format!("{}: {e}", path.display())))?;

        let mut bars = Vec::new();
        for (line, record) in reader.deserialize::<CsvRow>().enumerate() {
            let row = record.map_err(|e| {
                DataError::CsvImport(format!("{} row {}: {e}", path.display(), line + 1))
            })?;
            if row.date < start || row.date > end {
                continue;
            }
            bars.push(RawBar {
                date: row.date,
                open: row.open.unwrap_or(f64::NAN),
                high: row.high.unwrap_or(f64::NAN),
                low: row.low.unwrap_or(f64::NAN),
                close: row.close.unwrap_or(f64::NAN),
                volume: row.volume.unwrap_or(0),
            });
        }

        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}
