//! SignalScan Core: indicator computation and signal detection.
//!
//! This crate contains the screening engine:
//! - Domain types (bars, bar series, instrument ids)
//! - The indicator library and its dependency-resolving registry
//! - Declarative signal conditions and the standard signal catalog
//! - Augmentation, the occurrence scanner, and result aggregation
//! - The data boundary: providers, ingestion, universe files

pub mod components;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod signals;

pub use components::{CatalogError, IndicatorRegistry};
pub use domain::{Bar, BarSeries, InstrumentId};
pub use engine::{aggregate, augment, scan, scan_instrument, AugmentedSeries, Occurrence};
pub use signals::{SignalCatalog, SignalDefinition};
