//! Domain types for signalscan

pub mod bar;
pub mod ids;

pub use bar::{Bar, BarSeries, SeriesError};
pub use ids::InstrumentId;
