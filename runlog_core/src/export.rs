//! CSV export of derived series.
//!
//! Any row type that serializes to flat fields can be written. Files are
//! flushed and synced before returning.

use crate::{AdvancedMetrics, ByPerson, Result, Trend};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One runner's metrics as a flat CSV row
#[derive(Debug, Serialize)]
pub struct RunnerRow {
    pub person: String,
    pub count: usize,
    pub total: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub pace: f64,
    pub consistency: u32,
    pub trend: Trend,
    pub weekly_average: f64,
    pub best_week: f64,
    pub worst_week: f64,
}

impl RunnerRow {
    fn new(person: &str, metrics: &AdvancedMetrics) -> Self {
        RunnerRow {
            person: person.to_string(),
            count: metrics.basic.count,
            total: metrics.basic.total,
            average: metrics.basic.average,
            min: metrics.basic.min,
            max: metrics.basic.max,
            pace: metrics.pace,
            consistency: metrics.consistency,
            trend: metrics.trend,
            weekly_average: metrics.weekly_average,
            best_week: metrics.best_week,
            worst_week: metrics.worst_week,
        }
    }
}

/// Flatten per-runner metrics into rows, keeping the mapping's order
pub fn runner_rows(runners: &ByPerson<AdvancedMetrics>) -> Vec<RunnerRow> {
    runners
        .iter()
        .map(|(person, metrics)| RunnerRow::new(person, metrics))
        .collect()
}

/// Write `rows` with a header line, returning the number of rows written
pub fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(rows.len())
}

/// Write `rows` to a new file at `path`, creating parent directories
pub fn export_to_path<T: Serialize>(path: &Path, rows: &[T]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} rows to {:?}", rows.len(), path);
    Ok(rows.len())
}
