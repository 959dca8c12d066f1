//! Per-instrument bar loading for the batch scan.
//!
//! Fetches each instrument from the configured provider with a history
//! buffer in front of the requested range, so that long-window indicators
//! are already warm on the first reported date. Not-available outcomes are
//! separated from other provider failures so the batch can report them
//! plainly.

use chrono::{Duration, NaiveDate};
use thiserror::Error;
use tracing::debug;

use signalscan_core::data::{DataError, DataProvider};
use signalscan_core::{BarSeries, InstrumentId};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data available for '{symbol}'")]
    NotAvailable { symbol: String },

    #[error("provider '{provider}' is unavailable (rate limited or circuit open)")]
    ProviderUnavailable { provider: String },

    #[error("failed to load '{symbol}': {source}")]
    Data {
        symbol: String,
        #[source]
        source: DataError,
    },
}

/// Date window requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadWindow {
    /// First date fetched, `start - history_buffer_days`.
    pub fetch_start: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl LoadWindow {
    pub fn new(start: NaiveDate, end: NaiveDate, history_buffer_days: u32) -> Self {
        let fetch_start = start
            .checked_sub_signed(Duration::days(i64::from(history_buffer_days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            fetch_start,
            start,
            end,
        }
    }

    /// Whether `date` falls inside the reported range `[start, end]`.
    pub fn reports(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Load one instrument's buffered series.
pub fn load_series(
    provider: &dyn DataProvider,
    instrument: &InstrumentId,
    window: &LoadWindow,
) -> Result<BarSeries, LoadError> {
    let symbol = instrument.as_str();
    if !provider.is_available() {
        return Err(LoadError::ProviderUnavailable {
            provider: provider.name().to_string(),
        });
    }

    let series = provider
        .fetch(symbol, window.fetch_start, window.end)
        .map_err(|source| {
            if source.is_not_available() {
                LoadError::NotAvailable {
                    symbol: symbol.to_string(),
                }
            } else {
                LoadError::Data {
                    symbol: symbol.to_string(),
                    source,
                }
            }
        })?;

    if series.is_empty() {
        return Err(LoadError::NotAvailable {
            symbol: symbol.to_string(),
        });
    }

    debug!(
        symbol,
        provider = provider.name(),
        bars = series.len(),
        from = %window.fetch_start,
        to = %window.end,
        "loaded series"
    );
    Ok(series)
}
