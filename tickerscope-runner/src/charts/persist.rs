//! Atomic PNG persistence.
//!
//! Each chart is drawn onto a bitmap backed by a named temporary file inside
//! the output directory, presented, then renamed onto its final path. If
//! drawing fails the temporary file is removed when it drops, so a failed
//! chart never leaves a partial PNG behind.

use super::ChartError;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

pub(crate) type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub(crate) fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// Draw a `size` bitmap with `draw` and persist it at `final_path`.
pub(crate) fn render_to_file<F>(final_path: &Path, size: (u32, u32), draw: F) -> Result<(), ChartError>
where
    F: FnOnce(&Canvas<'_>) -> Result<(), ChartError>,
{
    let dir = final_path.parent().unwrap_or_else(|| Path::new("."));
    let stem = final_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("chart");

    let tmp = tempfile::Builder::new()
        .prefix(&format!(".{stem}."))
        .suffix(".png")
        .tempfile_in(dir)
        .map_err(|source| ChartError::TempFile { source })?;

    {
        let root = BitMapBackend::new(tmp.path(), size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        draw(&root)?;
        root.present().map_err(draw_err)?;
    }

    tmp.persist(final_path).map_err(|e| ChartError::Persist {
        path: final_path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
