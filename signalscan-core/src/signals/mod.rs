//! Signal definitions: crossing primitives, declarative conditions, and the
//! standard catalog.
//!
//! Signals only read an augmented series at bars `i` and `i-1`; they hold no
//! state between bars or between runs.

pub mod catalog;
pub mod condition;
pub mod primitives;

pub use catalog::{names, SignalCatalog, SignalDefinition};
pub use condition::{Condition, Operand, Relation};
pub use primitives::{crossed, crossed_threshold, Direction, Tie};
