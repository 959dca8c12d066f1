//! Universe files: the instrument lists a scan runs over.
//!
//! Two formats:
//! - TOML with sector tables: `[sectors]` mapping a sector name to tickers
//! - plain text with comma- and/or newline-separated tickers
//!
//! The format is chosen by file extension (`.toml` or anything else).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to read universe file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse universe TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("universe contains no instruments")]
    Empty,
}

/// Instruments grouped by sector. A plain ticker list becomes a single
/// sector named `all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Universe {
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Universe {
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path).map_err(|source| UniverseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_list(&content)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, UniverseError> {
        let mut universe: Universe = toml::from_str(content)?;
        for tickers in universe.sectors.values_mut() {
            tickers.retain(|t| !t.trim().is_empty());
            for t in tickers.iter_mut() {
                *t = t.trim().to_string();
            }
        }
        universe.non_empty()
    }

    /// Parse a comma- and/or newline-separated ticker list.
    pub fn from_list(content: &str) -> Result<Self, UniverseError> {
        let tickers: Vec<String> = content
            .split([',', '\n', '\r'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        let mut sectors = BTreeMap::new();
        sectors.insert("all".to_string(), tickers);
        Self { sectors }.non_empty()
    }

    fn non_empty(self) -> Result<Self, UniverseError> {
        if self.ticker_count() == 0 {
            Err(UniverseError::Empty)
        } else {
            Ok(self)
        }
    }

    /// All tickers across sectors, deduplicated, in first-seen order.
    pub fn all_tickers(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.sectors
            .values()
            .flat_map(|tickers| tickers.iter().map(|t| t.as_str()))
            .filter(|t| seen.insert(*t))
            .collect()
    }

    pub fn sector_tickers(&self, sector: &str) -> Option<&[String]> {
        self.sectors.get(sector).map(|v| v.as_slice())
    }

    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.keys().map(|s| s.as_str()).collect()
    }

    pub fn ticker_count(&self) -> usize {
        self.sectors.values().map(|v| v.len()).sum()
    }
}
