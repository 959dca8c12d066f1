//! Layered indicators: series derived from other named series.
//!
//! Each combinator lists its inputs by key, so the registry can order the
//! computation and accumulate warm-up. Own lookback counts only the positions
//! this layer adds; the registry adds the inputs' warm-up on top.
//!
//! A position is undefined whenever any input it reads is undefined.

use crate::components::indicator::{Indicator, IndicatorFamily, IndicatorInput, Series};

use super::ema::ema_of;
use super::sma::sma_of;

/// Smoothing method applied by [`Smoothed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Smoothing {
    Sma,
    Ema,
}

/// Moving average of another series (MACD signal, slow stochastics, OBV average).
#[derive(Debug, Clone)]
pub struct Smoothed {
    name: String,
    family: IndicatorFamily,
    inputs: Vec<String>,
    method: Smoothing,
    period: usize,
}

impl Smoothed {
    pub fn new(
        name: impl Into<String>,
        family: IndicatorFamily,
        source: impl Into<String>,
        method: Smoothing,
        period: usize,
    ) -> Self {
        assert!(period >= 1, "smoothing period must be >= 1");
        Self {
            name: name.into(),
            family,
            inputs: vec![source.into()],
            method,
            period,
        }
    }
}

impl Indicator for Smoothed {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        self.family
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        let Some(source) = input.source(&self.inputs[0]) else {
            return Series::undefined(input.len());
        };
        match self.method {
            Smoothing::Sma => sma_of(source.values(), self.period),
            Smoothing::Ema => ema_of(source.values(), self.period),
        }
    }
}

/// Applies `f` position-wise to two input series.
fn combine(input: &IndicatorInput<'_>, a: &str, b: &str, f: impl Fn(f64, f64) -> f64) -> Series {
    match (input.source(a), input.source(b)) {
        (Some(a), Some(b)) => a
            .values()
            .iter()
            .zip(b.values())
            .map(|(x, y)| Some(f((*x)?, (*y)?)))
            .collect(),
        _ => Series::undefined(input.len()),
    }
}

/// Difference of two series: `a - b` (MACD line, MACD histogram).
#[derive(Debug, Clone)]
pub struct Spread {
    name: String,
    family: IndicatorFamily,
    inputs: Vec<String>,
}

impl Spread {
    pub fn new(
        name: impl Into<String>,
        family: IndicatorFamily,
        a: impl Into<String>,
        b: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            inputs: vec![a.into(), b.into()],
        }
    }
}

impl Indicator for Spread {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        self.family
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        combine(input, &self.inputs[0], &self.inputs[1], |a, b| a - b)
    }
}

/// Mean of two series: `(a + b) / 2`.
#[derive(Debug, Clone)]
pub struct Midpoint {
    name: String,
    family: IndicatorFamily,
    inputs: Vec<String>,
}

impl Midpoint {
    pub fn new(
        name: impl Into<String>,
        family: IndicatorFamily,
        a: impl Into<String>,
        b: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            inputs: vec![a.into(), b.into()],
        }
    }
}

impl Indicator for Midpoint {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        self.family
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        combine(input, &self.inputs[0], &self.inputs[1], |a, b| (a + b) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremeKind {
    Max,
    Min,
}

/// Position-wise max or min of two series (cloud top and bottom).
#[derive(Debug, Clone)]
pub struct Extreme {
    name: String,
    family: IndicatorFamily,
    inputs: Vec<String>,
    kind: ExtremeKind,
}

impl Extreme {
    pub fn new(
        name: impl Into<String>,
        family: IndicatorFamily,
        kind: ExtremeKind,
        a: impl Into<String>,
        b: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            inputs: vec![a.into(), b.into()],
            kind,
        }
    }
}

impl Indicator for Extreme {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        self.family
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        match self.kind {
            ExtremeKind::Max => combine(input, &self.inputs[0], &self.inputs[1], f64::max),
            ExtremeKind::Min => combine(input, &self.inputs[0], &self.inputs[1], f64::min),
        }
    }
}

/// A series displaced forward in time: `value[t] = source[t - bars]`.
///
/// Only past values are carried forward, so the result at bar t never reads
/// beyond bar t.
#[derive(Debug, Clone)]
pub struct Shifted {
    name: String,
    family: IndicatorFamily,
    inputs: Vec<String>,
    bars: usize,
}

impl Shifted {
    pub fn new(
        name: impl Into<String>,
        family: IndicatorFamily,
        source: impl Into<String>,
        bars: usize,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            inputs: vec![source.into()],
            bars,
        }
    }
}

impl Indicator for Shifted {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        self.family
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn lookback(&self) -> usize {
        self.bars
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        let n = input.len();
        let Some(source) = input.source(&self.inputs[0]) else {
            return Series::undefined(n);
        };
        (0..n)
            .map(|i| i.checked_sub(self.bars).and_then(|j| source.get(j)))
            .collect()
    }
}
