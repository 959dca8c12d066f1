//! Indicator trait, indicator series, and the per-instrument values container.
//!
//! Indicators are pure functions: bar history (and, for layered indicators,
//! previously computed series) in, one aligned series out. A position with no
//! value is `None`, never a sentinel number, so warm-up rows cannot leak into
//! signal comparisons.

use crate::domain::Bar;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One indicator's values, aligned 1:1 with the bar positions of a series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series(Vec<Option<f64>>);

impl Series {
    /// An all-undefined series of length `len`.
    pub fn undefined(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `index`; `None` when undefined or out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.0
    }

    /// Index of the first defined value.
    pub fn first_defined(&self) -> Option<usize> {
        self.0.iter().position(|v| v.is_some())
    }

    pub fn defined_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }
}

impl From<Vec<Option<f64>>> for Series {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }
}

impl FromIterator<Option<f64>> for Series {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Indicator families. Momentum oscillators are bounded to 0..=100; the
/// others are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorFamily {
    Momentum,
    Trend,
    Band,
    TrendStrength,
    Volume,
}

impl IndicatorFamily {
    /// Known value range, if the family is bounded.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            IndicatorFamily::Momentum => Some((0.0, 100.0)),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IndicatorFamily::Momentum => "momentum",
            IndicatorFamily::Trend => "trend",
            IndicatorFamily::Band => "band",
            IndicatorFamily::TrendStrength => "trend-strength",
            IndicatorFamily::Volume => "volume",
        };
        f.write_str(label)
    }
}

/// What an indicator sees when it is computed: the raw bars plus every series
/// already derived earlier in the dependency order.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorInput<'a> {
    bars: &'a [Bar],
    values: &'a IndicatorValues,
}

impl<'a> IndicatorInput<'a> {
    pub fn new(bars: &'a [Bar], values: &'a IndicatorValues) -> Self {
        Self { bars, values }
    }

    pub fn bars(&self) -> &'a [Bar] {
        self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// A previously computed input series.
    pub fn source(&self, name: &str) -> Option<&'a Series> {
        self.values.series(name)
    }
}

/// Trait for indicators.
///
/// `compute` returns a series of the same length as the bars. The first
/// `lookback()` positions past the warm-up of the inputs are `None`; for raw
/// indicators (no inputs) that is simply the first `lookback()` positions.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on price data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Stable key (e.g., "sma_200", "macd_signal_12_26_9").
    fn name(&self) -> &str;

    fn family(&self) -> IndicatorFamily;

    /// Names of the indicator series this one is layered on. Empty for
    /// indicators computed from raw bars.
    fn inputs(&self) -> &[String] {
        &[]
    }

    /// Leading undefined positions this indicator adds on top of its inputs.
    fn lookback(&self) -> usize;

    fn compute(&self, input: &IndicatorInput<'_>) -> Series;
}

/// Container for the indicator series of one instrument.
///
/// Built once per scan, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: HashMap<String, Series>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Series) {
        self.series.insert(name.into(), values);
    }

    /// The defined value of `name` at `bar_index`. `None` if the indicator is
    /// missing, the index is out of range, or the position is in warm-up.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series.get(name).and_then(|s| s.get(bar_index))
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// Number of indicator series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }
}
