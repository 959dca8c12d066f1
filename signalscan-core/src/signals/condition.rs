//! Declarative signal conditions.
//!
//! A condition is data, not code: the scanner evaluates it at a bar index
//! against an augmented series, and the catalog inspects it to find which
//! indicators must be computed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::engine::AugmentedSeries;

use super::primitives::{crossed, Direction, Tie};

/// A value read at one bar: a price field, an indicator, or a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Open,
    High,
    Low,
    Close,
    Volume,
    Indicator(String),
    Const(f64),
}

impl Operand {
    pub fn indicator(key: impl Into<String>) -> Self {
        Operand::Indicator(key.into())
    }

    /// Value at bar `i`; `None` when out of range or undefined.
    pub fn value(&self, data: &AugmentedSeries, i: usize) -> Option<f64> {
        if let Operand::Const(c) = self {
            return Some(*c);
        }
        let bar = data.bars().get(i)?;
        match self {
            Operand::Open => Some(bar.open),
            Operand::High => Some(bar.high),
            Operand::Low => Some(bar.low),
            Operand::Close => Some(bar.close),
            Operand::Volume => Some(bar.volume as f64),
            Operand::Indicator(key) => data.indicators().get(key, i),
            Operand::Const(c) => Some(*c),
        }
    }

    fn indicator_key(&self) -> Option<&str> {
        match self {
            Operand::Indicator(key) => Some(key),
            _ => None,
        }
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Const(value)
    }
}

/// Strict level relation of `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    Above,
    Below,
}

impl Relation {
    fn holds(self, a: f64, b: f64) -> bool {
        match self {
            Relation::Above => a > b,
            Relation::Below => a < b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// `a` crosses `b` between bars `i-1` and `i`.
    Cross {
        a: Operand,
        b: Operand,
        direction: Direction,
        tie: Tie,
    },
    /// `a` strictly above or below `b` at bar `i`.
    Compare {
        a: Operand,
        b: Operand,
        relation: Relation,
    },
    /// Every sub-condition holds at the same bar. An empty conjunction never fires.
    All(Vec<Condition>),
}

impl Condition {
    pub fn crosses_above(a: Operand, b: impl Into<Operand>) -> Self {
        Condition::Cross {
            a,
            b: b.into(),
            direction: Direction::Up,
            tie: Tie::Before,
        }
    }

    pub fn crosses_below(a: Operand, b: impl Into<Operand>) -> Self {
        Condition::Cross {
            a,
            b: b.into(),
            direction: Direction::Down,
            tie: Tie::Before,
        }
    }

    /// Exit-style crossing: `a` was strictly on the other side and now
    /// reaches or passes `b`.
    pub fn reaches(a: Operand, b: impl Into<Operand>, direction: Direction) -> Self {
        Condition::Cross {
            a,
            b: b.into(),
            direction,
            tie: Tie::After,
        }
    }

    pub fn above(a: Operand, b: impl Into<Operand>) -> Self {
        Condition::Compare {
            a,
            b: b.into(),
            relation: Relation::Above,
        }
    }

    pub fn below(a: Operand, b: impl Into<Operand>) -> Self {
        Condition::Compare {
            a,
            b: b.into(),
            relation: Relation::Below,
        }
    }

    pub fn all(conditions: Vec<Condition>) -> Self {
        Condition::All(conditions)
    }

    /// Whether the condition holds at bar `i`. Any undefined operand makes it false.
    pub fn evaluate(&self, data: &AugmentedSeries, i: usize) -> bool {
        match self {
            Condition::Cross {
                a,
                b,
                direction,
                tie,
            } => {
                let Some(prev) = i.checked_sub(1) else {
                    return false;
                };
                match (
                    a.value(data, prev),
                    b.value(data, prev),
                    a.value(data, i),
                    b.value(data, i),
                ) {
                    (Some(pa), Some(pb), Some(ca), Some(cb)) => {
                        crossed(pa, pb, ca, cb, *direction, *tie)
                    }
                    _ => false,
                }
            }
            Condition::Compare { a, b, relation } => match (a.value(data, i), b.value(data, i)) {
                (Some(a), Some(b)) => relation.holds(a, b),
                _ => false,
            },
            Condition::All(conditions) => {
                !conditions.is_empty() && conditions.iter().all(|c| c.evaluate(data, i))
            }
        }
    }

    /// Indicator keys this condition reads, sorted and deduplicated.
    pub fn dependencies(&self) -> BTreeSet<String> {
        let mut deps = BTreeSet::new();
        self.collect_dependencies(&mut deps);
        deps
    }

    fn collect_dependencies(&self, deps: &mut BTreeSet<String>) {
        match self {
            Condition::Cross { a, b, .. } | Condition::Compare { a, b, .. } => {
                deps.extend(
                    [a, b]
                        .into_iter()
                        .filter_map(|o| o.indicator_key())
                        .map(str::to_string),
                );
            }
            Condition::All(conditions) => {
                for c in conditions {
                    c.collect_dependencies(deps);
                }
            }
        }
    }

    /// Whether evaluation reads bar `i-1`.
    pub fn uses_previous_bar(&self) -> bool {
        match self {
            Condition::Cross { .. } => true,
            Condition::Compare { .. } => false,
            Condition::All(conditions) => conditions.iter().any(Condition::uses_previous_bar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::{IndicatorValues, Series};
    use crate::domain::{BarSeries, InstrumentId};
    use crate::indicators::make_bars;

    fn augmented(closes: &[f64], line: Vec<Option<f64>>) -> AugmentedSeries {
        let series = BarSeries::new(InstrumentId::from("TEST"), make_bars(closes)).unwrap();
        let mut values = IndicatorValues::new();
        values.insert("line", Series::from(line));
        AugmentedSeries::new(series, values)
    }

    #[test]
    fn close_crosses_indicator() {
        let data = augmented(
            &[9.0, 10.0, 11.0, 12.0],
            vec![None, Some(10.5), Some(10.5), Some(10.5)],
        );
        let cond = Condition::crosses_above(Operand::Close, Operand::indicator("line"));
        // bar 1 prev is undefined; bar 2 crosses; bar 3 stays above
        let fired: Vec<usize> = (0..4).filter(|&i| cond.evaluate(&data, i)).collect();
        assert_eq!(fired, vec![2]);
    }

    #[test]
    fn undefined_operand_is_false() {
        let data = augmented(&[9.0, 12.0], vec![None, None]);
        let cond = Condition::crosses_above(Operand::Close, Operand::indicator("line"));
        assert!(!cond.evaluate(&data, 1));
        let missing = Condition::above(Operand::Close, Operand::indicator("absent"));
        assert!(!missing.evaluate(&data, 1));
    }

    #[test]
    fn index_zero_never_crosses() {
        let data = augmented(&[9.0, 12.0], vec![Some(1.0), Some(1.0)]);
        let cond = Condition::crosses_above(Operand::Close, Operand::indicator("line"));
        assert!(!cond.evaluate(&data, 0));
    }

    #[test]
    fn conjunction_needs_every_part_at_the_same_bar() {
        let data = augmented(&[10.0, 20.0, 30.0], vec![Some(15.0), Some(15.0), Some(15.0)]);
        let cross = Condition::crosses_above(Operand::Close, Operand::indicator("line"));
        let gate_pass = Condition::above(Operand::Close, 18.0);
        let gate_fail = Condition::above(Operand::Close, 25.0);

        assert!(Condition::all(vec![cross.clone(), gate_pass]).evaluate(&data, 1));
        assert!(!Condition::all(vec![cross, gate_fail]).evaluate(&data, 1));
        assert!(!Condition::all(vec![]).evaluate(&data, 1));
    }

    #[test]
    fn dependencies_and_previous_bar() {
        let cond = Condition::all(vec![
            Condition::crosses_above(Operand::indicator("macd"), Operand::indicator("signal")),
            Condition::above(Operand::indicator("adx"), 25.0),
            Condition::above(Operand::Close, Operand::indicator("macd")),
        ]);
        let deps: Vec<String> = cond.dependencies().into_iter().collect();
        assert_eq!(deps, vec!["adx", "macd", "signal"]);
        assert!(cond.uses_previous_bar());
        assert!(!Condition::below(Operand::Close, 1.0).uses_previous_bar());
    }
}
