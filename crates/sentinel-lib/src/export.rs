//! Historical metric export
//!
//! One-shot utility sharing the metric-source interface with the
//! detection path: pulls a time range of samples and dumps them to a
//! delimited text file, one row per point. No detection logic here.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::DateTime;
use tracing::info;

use crate::source::MetricSource;

/// Column header of the export artifact
const HEADER: &str = "timestamp,cpu_usage";

/// Fetch `[start, end]` at `step` resolution and overwrite `path` with
/// the result. Returns the number of data rows written.
pub async fn export_range(
    source: &dyn MetricSource,
    start: i64,
    end: i64,
    step: Duration,
    path: &Path,
) -> Result<usize> {
    let samples = source
        .fetch_range(start, end, step)
        .await
        .context("range query failed")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create export file at {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{HEADER}")?;
    for sample in &samples {
        let rendered = DateTime::from_timestamp(sample.timestamp, 0)
            .with_context(|| format!("sample timestamp {} out of range", sample.timestamp))?
            .to_rfc3339();

        // `{}` on f64 prints the shortest representation that parses
        // back to the same value, so the export round-trips exactly.
        writeln!(writer, "{},{}", rendered, sample.value)?;
    }
    writer.flush()?;

    info!(
        rows = samples.len(),
        path = %path.display(),
        "export complete"
    );
    Ok(samples.len())
}
