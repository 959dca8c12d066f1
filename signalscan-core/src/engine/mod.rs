//! Scan engine: augmentation, occurrence scanning, and aggregation.
//!
//! Per instrument: the required indicators are derived once in dependency
//! order (`augment`), then every signal makes one linear pass from its own
//! eligibility boundary (`scan`). Results from all instruments are merged
//! and put in the external sort order by `aggregate`.

pub mod aggregate;
pub mod augment;
pub mod scanner;

pub use aggregate::aggregate;
pub use augment::{augment, AugmentedSeries};
pub use scanner::{scan, scan_instrument, Occurrence};
