//! Ingestion: turn provider rows into a validated `BarSeries`.

use tracing::warn;

use crate::domain::{Bar, BarSeries};

use super::provider::DataError;

/// Validate raw bars for one symbol.
///
/// Void or insane bars (NaN fields, non-positive prices, broken OHLC
/// ordering) are dropped with a warning. The survivors are sorted by date
/// and later rows sharing a date are dropped. Nothing left means the symbol
/// is not available.
pub fn ingest(symbol: &str, bars: Vec<Bar>) -> Result<BarSeries, DataError> {
    let total = bars.len();
    let mut kept: Vec<Bar> = bars
        .into_iter()
        .filter(|bar| {
            let sane = bar.is_sane();
            if !sane {
                warn!(symbol, date = %bar.date, "dropping malformed bar");
            }
            sane
        })
        .collect();

    if kept.len() < total {
        warn!(symbol, dropped = total - kept.len(), total, "malformed bars dropped");
    }

    canonicalize(symbol, &mut kept);

    if kept.is_empty() {
        return Err(DataError::NotAvailable {
            symbol: symbol.to_string(),
        });
    }

    BarSeries::new(symbol, kept).map_err(|source| DataError::InvalidSeries {
        symbol: symbol.to_string(),
        source,
    })
}

/// Sort by date and keep the first row seen for each date.
fn canonicalize(symbol: &str, bars: &mut Vec<Bar>) {
    if bars.windows(2).all(|w| w[0].date < w[1].date) {
        return;
    }
    // Stable, so "first" means first in provider order
    bars.sort_by_key(|bar| bar.date);
    let before = bars.len();
    bars.dedup_by_key(|bar| bar.date);
    if bars.len() < before {
        warn!(symbol, dropped = before - bars.len(), "duplicate-dated bars dropped");
    } else {
        warn!(symbol, "bars arrived out of date order, sorted");
    }
}
