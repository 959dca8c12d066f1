//! signalscan runner: batch scans across instruments.
//!
//! This crate builds on `signalscan-core` to provide:
//! - TOML scan configuration with a reproducible config hash
//! - Per-instrument loading with a warm-up history buffer
//! - The parallel batch scan with per-instrument failure isolation
//! - Export of results as CSV, JSON or a text table

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod export;

pub use batch::{run_scan, InstrumentWarning, ScanProgress, ScanReport, ScanRequest, StderrProgress};
pub use config::{ConfigError, ScanConfig, SourceConfig, SourceKind};
pub use data_loader::{load_series, LoadError, LoadWindow};
pub use export::{export_csv, export_json, import_json, render_table, write_report, ExportError};
