//! CSV export of contraction history.

use crate::timer::ContractionTimer;
use crate::Result;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    start_time: String,
    end_time: Option<String>,
    duration_seconds: Option<u64>,
    interval_seconds: Option<i64>,
}

/// Write the completed contractions to `path` as CSV, newest first
///
/// `interval_seconds` is the gap to the next-older contraction and is
/// empty for the oldest one. Overwrites any existing file. Returns the
/// number of rows written.
pub fn export_history(timer: &ContractionTimer, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Header row comes from the first serialized record; write it explicitly
    // so an empty history still produces a valid file.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record([
        "id",
        "start_time",
        "end_time",
        "duration_seconds",
        "interval_seconds",
    ])?;

    let mut count = 0;
    for (contraction, interval) in timer.intervals() {
        writer.serialize(CsvRow {
            id: contraction.id.to_string(),
            start_time: contraction.start_time.to_rfc3339(),
            end_time: contraction.end_time.map(|t| t.to_rfc3339()),
            duration_seconds: contraction.duration_seconds,
            interval_seconds: interval,
        })?;
        count += 1;
    }

    writer.flush()?;
    tracing::info!("Exported {} contractions to {:?}", count, path);
    Ok(count)
}
