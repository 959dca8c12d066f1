//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR uses Wilder smoothing (EMA with alpha = 1/period).
//! Lookback: period (TR starts at bar 1, then a `period` seed window).

use crate::components::indicator::{Indicator, IndicatorFamily, IndicatorInput, Series};
use crate::domain::Bar;

use super::ema::seeded_recursion;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// True Range series. TR[0] is undefined (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut tr = vec![None; bars.len()];
    for i in 1..bars.len() {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr[i] = Some((h - l).max((h - pc).abs()).max((l - pc).abs()));
    }
    tr
}

/// Wilder smoothing (alpha = 1/period), seeded with the mean of the first
/// fully defined window.
pub fn wilder_of(values: &[Option<f64>], period: usize) -> Series {
    if period == 0 {
        return Series::undefined(values.len());
    }
    seeded_recursion(values, period, 1.0 / period as f64)
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::TrendStrength
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        wilder_of(&true_range(input.bars()), self.period)
    }
}
