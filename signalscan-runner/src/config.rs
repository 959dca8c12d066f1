//! Serializable scan configuration.
//!
//! A scan is described by a TOML file:
//!
//! ```toml
//! instruments = ["RELIANCE.NS", "TCS.NS"]
//! universe_file = "Nifty500.txt"
//! start_date = "2024-01-01"
//! end_date = "2024-12-31"
//! history_buffer_days = 365
//! signals = []            # empty = whole catalog
//! parallel = true
//!
//! [source]
//! kind = "csv"
//! csv_dir = "data/csv"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use signalscan_core::data::{
    CircuitBreaker, CsvDirProvider, DataProvider, SyntheticProvider, Universe, UniverseError,
    YahooProvider,
};
use signalscan_core::{CatalogError, InstrumentId, SignalCatalog};

/// Days of history fetched before the start date so long windows are warm
/// when the requested range begins.
pub const DEFAULT_HISTORY_BUFFER_DAYS: u32 = 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("start date {start} must be before end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("no instruments to scan (give tickers or a universe file)")]
    NoInstruments,

    #[error("universe file: {0}")]
    Universe(#[from] UniverseError),

    #[error("source kind 'csv' requires csv_dir")]
    MissingCsvDir,

    #[error("threads must be at least 1")]
    InvalidThreads,

    #[error("data provider setup failed: {0}")]
    Provider(String),
}

/// Which data provider feeds the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_dir: Option<PathBuf>,
}

impl SourceConfig {
    /// Construct the configured provider. Yahoo gets a fresh shared circuit
    /// breaker for the whole scan.
    pub fn build_provider(&self) -> Result<Box<dyn DataProvider>, ConfigError> {
        match self.kind {
            SourceKind::Yahoo => {
                let breaker = Arc::new(CircuitBreaker::default_provider());
                let provider = YahooProvider::new(breaker)
                    .map_err(|e| ConfigError::Provider(e.to_string()))?;
                Ok(Box::new(provider))
            }
            SourceKind::Csv => {
                let dir = self.csv_dir.as_ref().ok_or(ConfigError::MissingCsvDir)?;
                Ok(Box::new(CsvDirProvider::new(dir)))
            }
            SourceKind::Synthetic => Ok(Box::new(SyntheticProvider::new())),
        }
    }
}

/// Everything needed to reproduce a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub instruments: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub universe_file: Option<PathBuf>,

    /// First date (inclusive) on which occurrences are reported.
    pub start_date: NaiveDate,

    /// Last date (inclusive) on which occurrences are reported.
    pub end_date: NaiveDate,

    #[serde(default = "default_history_buffer_days")]
    pub history_buffer_days: u32,

    /// Catalog subset by signal name. Empty means every signal.
    #[serde(default)]
    pub signals: Vec<String>,

    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Size of a private worker pool. `None` uses the global rayon pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,

    #[serde(default)]
    pub source: SourceConfig,
}

fn default_history_buffer_days() -> u32 {
    DEFAULT_HISTORY_BUFFER_DAYS
}

fn default_parallel() -> bool {
    true
}

impl ScanConfig {
    /// A config over `[start_date, end_date]` with every other field at its default.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            instruments: Vec::new(),
            universe_file: None,
            start_date,
            end_date,
            history_buffer_days: DEFAULT_HISTORY_BUFFER_DAYS,
            signals: Vec::new(),
            parallel: true,
            threads: None,
            source: SourceConfig::default(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check the settings that can be checked without touching the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_date >= self.end_date {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidThreads);
        }
        if self.source.kind == SourceKind::Csv && self.source.csv_dir.is_none() {
            return Err(ConfigError::MissingCsvDir);
        }
        self.resolve_instruments().map(|_| ())
    }

    /// Explicit instruments followed by the universe file's, trimmed and
    /// deduplicated in first-seen order.
    pub fn resolve_instruments(&self) -> Result<Vec<InstrumentId>, ConfigError> {
        let mut symbols: Vec<String> = self
            .instruments
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if let Some(path) = &self.universe_file {
            let universe = Universe::from_file(path)?;
            symbols.extend(universe.all_tickers().into_iter().map(String::from));
        }

        let mut seen = std::collections::HashSet::new();
        let resolved: Vec<InstrumentId> = symbols
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .map(InstrumentId::from)
            .collect();

        if resolved.is_empty() {
            return Err(ConfigError::NoInstruments);
        }
        Ok(resolved)
    }

    /// The standard catalog, narrowed to `signals` when any are named.
    pub fn catalog(&self) -> Result<SignalCatalog, CatalogError> {
        let catalog = SignalCatalog::standard();
        if self.signals.is_empty() {
            Ok(catalog)
        } else {
            catalog.select(&self.signals)
        }
    }

    /// BLAKE3 over the canonical JSON form. Identical configs hash identically,
    /// so reports from the same scan can be correlated.
    pub fn config_hash(&self) -> String {
        // Plain data fields only; serialization cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&json).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_minimal_toml_with_defaults() {
        let cfg = ScanConfig::from_toml(
            r#"
            instruments = ["AAPL", "MSFT"]
            start_date = "2024-01-01"
            end_date = "2024-06-30"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.history_buffer_days, 365);
        assert!(cfg.parallel);
        assert_eq!(cfg.source.kind, SourceKind::Yahoo);
        assert!(cfg.signals.is_empty());
        cfg.validate().unwrap();
    }

    #[test]
    fn parses_source_table() {
        let cfg = ScanConfig::from_toml(
            r#"
            instruments = ["X"]
            start_date = "2024-01-01"
            end_date = "2024-02-01"
            parallel = false
            threads = 2

            [source]
            kind = "csv"
            csv_dir = "fixtures"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.source.kind, SourceKind::Csv);
        assert_eq!(cfg.source.csv_dir.as_deref(), Some(Path::new("fixtures")));
        assert_eq!(cfg.threads, Some(2));
        assert!(!cfg.parallel);
    }

    #[test]
    fn start_must_precede_end() {
        let mut cfg = ScanConfig::new(date(2024, 5, 1), date(2024, 5, 1));
        cfg.instruments = vec!["X".into()];
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn empty_instruments_rejected() {
        let mut cfg = ScanConfig::new(date(2024, 1, 1), date(2024, 2, 1));
        cfg.instruments = vec!["  ".into()];
        assert!(matches!(cfg.validate(), Err(ConfigError::NoInstruments)));
    }

    #[test]
    fn csv_source_needs_dir() {
        let mut cfg = ScanConfig::new(date(2024, 1, 1), date(2024, 2, 1));
        cfg.instruments = vec!["X".into()];
        cfg.source.kind = SourceKind::Csv;
        assert!(matches!(cfg.validate(), Err(ConfigError::MissingCsvDir)));
    }

    #[test]
    fn instruments_deduplicated_in_order() {
        let mut cfg = ScanConfig::new(date(2024, 1, 1), date(2024, 2, 1));
        cfg.instruments = vec!["B".into(), "A".into(), "B".into()];
        let ids: Vec<String> = cfg
            .resolve_instruments()
            .unwrap()
            .into_iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn config_hash_tracks_content() {
        let a = ScanConfig::new(date(2024, 1, 1), date(2024, 2, 1));
        let mut b = a.clone();
        assert_eq!(a.config_hash(), b.config_hash());
        b.history_buffer_days = 30;
        assert_ne!(a.config_hash(), b.config_hash());
        assert_eq!(a.config_hash().len(), 64);
    }

    #[test]
    fn catalog_subset_and_unknown_signal() {
        let mut cfg = ScanConfig::new(date(2024, 1, 1), date(2024, 2, 1));
        assert_eq!(cfg.catalog().unwrap().len(), 18);
        cfg.signals = vec!["SMA: Golden Cross (50 > 200)".into()];
        assert_eq!(cfg.catalog().unwrap().len(), 1);
        cfg.signals = vec!["Not a signal".into()];
        assert!(matches!(cfg.catalog(), Err(CatalogError::UnknownSignal(_))));
    }

    #[test]
    fn toml_round_trip() {
        let mut cfg = ScanConfig::new(date(2024, 1, 1), date(2024, 2, 1));
        cfg.instruments = vec!["X".into()];
        cfg.source.kind = SourceKind::Synthetic;
        let text = toml::to_string(&cfg).unwrap();
        assert_eq!(ScanConfig::from_toml(&text).unwrap(), cfg);
    }
}
