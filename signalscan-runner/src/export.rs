//! Result export: CSV, JSON and a plain text table.
//!
//! The CSV form carries only the occurrence rows, with the header
//! `instrument_id,signal_name,occurrence_date` and ISO dates. The JSON form
//! is the whole [`ScanReport`], warnings and config hash included.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

use signalscan_core::Occurrence;

use crate::batch::ScanReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported output extension for {0} (use .csv or .json)")]
    UnsupportedFormat(PathBuf),
}

// ─── CSV export ─────────────────────────────────────────────────────

pub fn export_csv(events: &[Occurrence]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["instrument_id", "signal_name", "occurrence_date"])?;
    for event in events {
        let date = event.occurrence_date.format("%Y-%m-%d").to_string();
        wtr.write_record([
            event.instrument_id.as_str(),
            event.signal_name.as_str(),
            date.as_str(),
        ])?;
    }
    let data = wtr.into_inner().map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(data)?)
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(report: &ScanReport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn import_json(json: &str) -> Result<ScanReport, ExportError> {
    Ok(serde_json::from_str(json)?)
}

// ─── Files ──────────────────────────────────────────────────────────

/// Write `report` to `path`, as CSV for `.csv` and JSON for `.json`.
pub fn write_report(report: &ScanReport, path: &Path) -> Result<(), ExportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let content = match ext.as_deref() {
        Some("csv") => export_csv(&report.events)?,
        Some("json") => export_json(report)?,
        _ => return Err(ExportError::UnsupportedFormat(path.to_path_buf())),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ─── Text table ─────────────────────────────────────────────────────

/// Render the events as an aligned three-column table, newest first.
pub fn render_table(events: &[Occurrence]) -> String {
    const HEADERS: [&str; 3] = ["Date", "Instrument", "Signal"];

    let inst_w = events
        .iter()
        .map(|e| e.instrument_id.as_str().len())
        .max()
        .unwrap_or(0)
        .max(HEADERS[1].len());
    let sig_w = events
        .iter()
        .map(|e| e.signal_name.len())
        .max()
        .unwrap_or(0)
        .max(HEADERS[2].len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {:<inst_w$}  {:<sig_w$}",
        HEADERS[0], HEADERS[1], HEADERS[2]
    );
    let _ = writeln!(out, "{}  {}  {}", "-".repeat(10), "-".repeat(inst_w), "-".repeat(sig_w));
    for e in events {
        let _ = writeln!(
            out,
            "{:<10}  {:<inst_w$}  {:<sig_w$}",
            e.occurrence_date.format("%Y-%m-%d"),
            e.instrument_id.as_str(),
            e.signal_name
        );
    }
    out
}
