//! Writing reports to disk.
//!
//! The full report is written as pretty-printed JSON, which any YAML reader also accepts.
//! A flat TSV view with one row per scalar value can be written alongside it for quick
//! inspection and for loading into a data frame.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use serde::{Deserialize, Serialize};

use super::{METADATA_KEY, Report, ReportValue};

/// One row of the flat metrics view of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetric {
    /// Stage name, or the program name for metadata rows
    pub stage: String,
    /// Processor type, empty for metadata rows
    pub processor: String,
    /// `parameter`, `output` or `metadata`
    pub section: String,
    /// Name of the value; histogram bins are written as `key.bin`
    pub key: String,
    /// The rendered value
    pub value: String,
}

/// Writes the report as pretty-printed JSON.
///
/// # Errors
/// Returns an error if the file cannot be created or written to.
pub fn write_report_json<P: AsRef<Path>>(path: P, report: &Report) -> Result<()> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref)
        .with_context(|| format!("Failed to create report: {}", path_ref.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("Failed to write report: {}", path_ref.display()))?;
    writeln!(writer)?;
    writer.flush().with_context(|| format!("Failed to write report: {}", path_ref.display()))?;
    Ok(())
}

/// Flattens a report into one row per scalar value and histogram bin.
///
/// Per-position tables are omitted; they only appear in the JSON report.
#[must_use]
pub fn report_metrics(report: &Report) -> Vec<ReportMetric> {
    let mut rows = Vec::new();
    for (key, value) in report.metadata.iter() {
        push_rows(&mut rows, METADATA_KEY, "", "metadata", key, value);
    }
    for stage in &report.stages {
        for (key, value) in stage.parameters.iter() {
            push_rows(&mut rows, &stage.name, stage.processor, "parameter", key, value);
        }
        for (key, value) in stage.output.iter() {
            push_rows(&mut rows, &stage.name, stage.processor, "output", key, value);
        }
    }
    rows
}

fn push_rows(
    rows: &mut Vec<ReportMetric>,
    stage: &str,
    processor: &str,
    section: &str,
    key: &str,
    value: &ReportValue,
) {
    let row = |key: String, value: String| ReportMetric {
        stage: stage.to_string(),
        processor: processor.to_string(),
        section: section.to_string(),
        key,
        value,
    };

    if let Some(scalar) = value.as_scalar_string() {
        rows.push(row(key.to_string(), scalar));
    } else if let ReportValue::Histogram(hist) = value {
        rows.extend(hist.iter().map(|(bin, count)| row(format!("{key}.{bin}"), count.to_string())));
    }
}

/// Writes the flat metrics view of a report to a TSV file.
///
/// # Errors
/// Returns an error if the file cannot be created or written to.
pub fn write_report_metrics<P: AsRef<Path>>(path: P, report: &Report) -> Result<()> {
    let path_ref = path.as_ref();
    DelimFile::default()
        .write_tsv(&path_ref, report_metrics(report))
        .with_context(|| format!("Failed to write report metrics: {}", path_ref.display()))
}
