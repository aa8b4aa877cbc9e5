//! Output formatting and persistence for analysis reports.
//!
//! Supports pretty-printing, JSON serialization, and CSV append of rankings.

use tracing::{debug, info};

use crate::analyzers::types::{AnalysisReport, RouteSummary, RouteSummaryRow};
use crate::error::SampleResult;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &AnalysisReport) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &AnalysisReport) -> SampleResult<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes a report as pretty-printed JSON to `path`, replacing any existing file.
pub fn write_json(path: &str, report: &AnalysisReport) -> SampleResult<()> {
    let body = serde_json::to_vec_pretty(report)?;
    std::fs::write(path, body)?;
    info!(path, "Report written");
    Ok(())
}

/// Appends ranking rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_rankings(path: &str, rankings: &[RouteSummary]) -> SampleResult<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = rankings.len(), "Appending ranking rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // only the first write carries headers
        .from_writer(file);

    for summary in rankings {
        writer.serialize(RouteSummaryRow::from(summary))?;
    }
    writer.flush()?;

    Ok(())
}
