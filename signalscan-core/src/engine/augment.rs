//! Indicator augmentation.
//!
//! All indicators a scan needs are computed before any signal is evaluated.
//! The result is read-only for the rest of the scan.

use chrono::NaiveDate;
use tracing::debug;

use crate::components::indicator::{IndicatorInput, IndicatorValues};
use crate::components::registry::{CatalogError, IndicatorRegistry};
use crate::domain::{Bar, BarSeries, InstrumentId};

/// A bar series together with its derived indicator series, aligned by index.
#[derive(Debug, Clone)]
pub struct AugmentedSeries {
    series: BarSeries,
    indicators: IndicatorValues,
}

impl AugmentedSeries {
    pub fn new(series: BarSeries, indicators: IndicatorValues) -> Self {
        Self { series, indicators }
    }

    pub fn instrument(&self) -> &InstrumentId {
        self.series.instrument()
    }

    pub fn series(&self) -> &BarSeries {
        &self.series
    }

    pub fn bars(&self) -> &[Bar] {
        self.series.bars()
    }

    pub fn indicators(&self) -> &IndicatorValues {
        &self.indicators
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        self.series.get(index).map(|b| b.date)
    }
}

/// Compute `required` indicators (and everything they are layered on) for
/// one series.
///
/// Each indicator is computed exactly once, after its inputs. Short series
/// are not an error; their indicators are simply undefined.
pub fn augment<S: AsRef<str>>(
    series: BarSeries,
    registry: &IndicatorRegistry,
    required: &[S],
) -> Result<AugmentedSeries, CatalogError> {
    let order = registry.resolve(required)?;
    let mut values = IndicatorValues::new();

    for indicator in order {
        let computed = indicator.compute(&IndicatorInput::new(series.bars(), &values));
        debug_assert_eq!(
            computed.len(),
            series.len(),
            "indicator '{}' produced {} values for {} bars (instrument={})",
            indicator.name(),
            computed.len(),
            series.len(),
            series.instrument()
        );
        values.insert(indicator.name(), computed);
    }

    debug!(
        instrument = %series.instrument(),
        bars = series.len(),
        indicators = values.len(),
        "augmented series"
    );

    Ok(AugmentedSeries::new(series, values))
}
