//! CSV directory provider.
//!
//! Reads `<dir>/<SYMBOL>.csv` files with a `date,open,high,low,close,volume`
//! header (ISO dates). Offline fallback for when Yahoo is unavailable, and
//! the fixture format for tests.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{Bar, BarSeries};

use super::ingest::ingest;
use super::provider::{DataError, DataProvider, DataSource};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<CsvRow> for Bar {
    fn from(row: CsvRow) -> Self {
        Bar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            // Some exports write volume as a float
            volume: row.volume.max(0.0).round() as u64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvDirProvider {
    dir: PathBuf,
}

impl CsvDirProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    /// Read every row of a symbol's file, in file order.
    pub fn read_all(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let csv_error = |e: csv::Error| DataError::Csv {
            symbol: symbol.to_string(),
            reason: format!("{}: {e}", path.display()),
        };

        let mut reader = csv::Reader::from_path(&path).map_err(csv_error)?;
        reader
            .deserialize::<CsvRow>()
            .map(|row| row.map(Bar::from).map_err(csv_error))
            .collect()
    }
}

impl DataProvider for CsvDirProvider {
    fn name(&self) -> &str {
        "csv_dir"
    }

    fn source(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, DataError> {
        let bars = self
            .read_all(symbol)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();
        ingest(symbol, bars)
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }
}
