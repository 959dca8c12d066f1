//! Occurrence scanner.
//!
//! One linear pass per signal per instrument. Index 0 never fires; each
//! signal starts at its own eligibility boundary, so a long-window indicator
//! used by one signal does not hide early occurrences of another.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::registry::{CatalogError, IndicatorRegistry};
use crate::domain::{BarSeries, InstrumentId};
use crate::signals::SignalCatalog;

use super::augment::{augment, AugmentedSeries};

/// One fired signal: the three exported fields, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurrence {
    pub instrument_id: InstrumentId,
    pub signal_name: String,
    pub occurrence_date: NaiveDate,
}

/// Evaluate every catalog signal over an augmented series, in catalog order.
///
/// The catalog is expected to have been validated against `registry`; a
/// signal whose indicators are missing simply never fires.
pub fn scan(
    data: &AugmentedSeries,
    catalog: &SignalCatalog,
    registry: &IndicatorRegistry,
) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();

    for def in catalog.iter() {
        let start = SignalCatalog::first_eligible_index(def, registry).unwrap_or(1);
        let before = occurrences.len();

        for (i, bar) in data.bars().iter().enumerate().skip(start) {
            if def.condition().evaluate(data, i) {
                occurrences.push(Occurrence {
                    instrument_id: data.instrument().clone(),
                    signal_name: def.name().to_string(),
                    occurrence_date: bar.date,
                });
            }
        }

        debug!(
            instrument = %data.instrument(),
            signal = def.name(),
            start,
            fired = occurrences.len() - before,
            "scanned signal"
        );
    }

    occurrences
}

/// Augment one series with exactly the indicators `catalog` needs, then scan it.
pub fn scan_instrument(
    series: BarSeries,
    catalog: &SignalCatalog,
    registry: &IndicatorRegistry,
) -> Result<Vec<Occurrence>, CatalogError> {
    let data = augment(series, registry, &catalog.required_indicators())?;
    Ok(scan(&data, catalog, registry))
}
