use super::provider::{DataError, RawBar};
use chrono::NaiveDate;
use polars::prelude::*;

/// Output of canonicalization, with counts of what was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalBars {
    /// Bars sorted ascending by date, one per date.
    pub bars: Vec<RawBar>,
    /// Rows dropped for a missing or non-positive close.
    pub dropped: usize,
    /// Rows superseded by a later row with the same date.
    pub duplicates: usize,
}

/// Canonicalizer for raw provider rows
pub struct Canonicalizer;

impl Canonicalizer {
    /// Canonicalize rows: drop unusable closes, sort by date, dedupe.
    ///
    /// Duplicate dates are resolved last-write-wins: the row that appears latest
    /// in the provider's output survives.
    pub fn canonicalize(raw: &[RawBar]) -> Result<CanonicalBars, DataError> {
        let usable: Vec<&RawBar> = raw.iter().filter(|b| b.has_usable_close()).collect();
        let dropped = raw.len() - usable.len();

        if usable.is_empty() {
            return Ok(CanonicalBars {
                bars: Vec::new(),
                dropped,
                duplicates: 0,
            });
        }

        let frame = date_index_frame(&usable)?;
        let survivors = frame
            .lazy()
            .unique_stable(Some(vec!["date".into()]), UniqueKeepStrategy::Last)
            .sort(["date"], SortMultipleOptions::default().with_maintain_order(true))
            .collect()
            .map_err(|e| DataError::Canonicalize(format!("dedupe: {e}")))?;

        let bars = survivors_in_order(&survivors, &usable)?;
        let duplicates = usable.len() - bars.len();

        Ok(CanonicalBars {
            bars,
            dropped,
            duplicates,
        })
    }
}

/// Two-column frame: day number (since 1970-01-01) and the row's position in `rows`.
fn date_index_frame(rows: &[&RawBar]) -> Result<DataFrame, DataError> {
    let epoch = NaiveDate::default();
    let (days, positions): (Vec<i32>, Vec<u32>) = rows
        .iter()
        .enumerate()
        .map(|(pos, r)| ((r.date - epoch).num_days() as i32, pos as u32))
        .unzip();

    DataFrame::new(vec![
        Column::new("date".into(), days),
        Column::new("row".into(), positions),
    ])
    .map_err(|e| DataError::Canonicalize(format!("frame: {e}")))
}

/// Pick the surviving rows back out of `rows`, in the frame's order.
fn survivors_in_order(frame: &DataFrame, rows: &[&RawBar]) -> Result<Vec<RawBar>, DataError> {
    let positions = frame
        .column("row")
        .and_then(|c| c.u32())
        .map_err(|e| DataError::Canonicalize(format!("row column: {e}")))?;

    positions
        .into_iter()
        .map(|pos| {
            pos.and_then(|p| rows.get(p as usize))
                .map(|r| **r)
                .ok_or_else(|| DataError::Canonicalize("dangling row index".to_string()))
        })
        .collect()
}
