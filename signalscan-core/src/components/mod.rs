//! Component traits: indicators and the registry that resolves them.

pub mod indicator;
pub mod registry;

pub use indicator::{Indicator, IndicatorFamily, IndicatorInput, IndicatorValues, Series};
pub use registry::{CatalogError, IndicatorRegistry};
