//! CSV export of display series for external plotting.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use wear_core::DisplaySeries;

/// Write `<name>.csv` (x, y, class) and `<name>_markers.csv` (kind, x, y)
/// into `dir`, creating it if needed. Returns the series file path.
pub fn write_series_csv(dir: &Path, name: &str, series: &DisplaySeries) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating series directory: {}", dir.display()))?;

    let series_path = dir.join(format!("{name}.csv"));
    let mut writer = csv::Writer::from_path(&series_path)
        .with_context(|| format!("creating {}", series_path.display()))?;
    for row in series.rows() {
        writer
            .serialize(row)
            .with_context(|| format!("writing {}", series_path.display()))?;
    }
    writer.flush().context("flushing series CSV")?;

    let markers_path = dir.join(format!("{name}_markers.csv"));
    let mut writer = csv::Writer::from_path(&markers_path)
        .with_context(|| format!("creating {}", markers_path.display()))?;
    for marker in &series.markers {
        writer
            .serialize(marker)
            .with_context(|| format!("writing {}", markers_path.display()))?;
    }
    writer.flush().context("flushing markers CSV")?;

    tracing::debug!(path = %series_path.display(), points = series.len(), "series written");
    Ok(series_path)
}
