//! ADX: Average Directional Index (Wilder) and its directional lines.
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = Wilder-smoothed DX
//!
//! Lookback: period for the DI lines, 2 * period - 1 for ADX.

use crate::components::indicator::{Indicator, IndicatorFamily, IndicatorInput, Series};
use crate::domain::Bar;

use super::atr::{true_range, wilder_of};

/// Which line of the directional movement system to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdxLine {
    Adx,
    PlusDi,
    MinusDi,
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    line: AdxLine,
    name: String,
}

impl Adx {
    pub fn adx(period: usize) -> Self {
        Self::with_line(period, AdxLine::Adx, format!("adx_{period}"))
    }

    pub fn plus_di(period: usize) -> Self {
        Self::with_line(period, AdxLine::PlusDi, format!("plus_di_{period}"))
    }

    pub fn minus_di(period: usize) -> Self {
        Self::with_line(period, AdxLine::MinusDi, format!("minus_di_{period}"))
    }

    fn with_line(period: usize, line: AdxLine, name: String) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self { period, line, name }
    }
}

/// +DI and -DI series.
fn directional_indices(bars: &[Bar], period: usize) -> (Series, Series) {
    let n = bars.len();
    let mut plus_dm = vec![None; n];
    let mut minus_dm = vec![None; n];

    for i in 1..n {
        let up_move = bars[i].high - bars[i - 1].high;
        let down_move = bars[i - 1].low - bars[i].low;

        plus_dm[i] = Some(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm[i] = Some(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    let smooth_tr = wilder_of(&true_range(bars), period);
    let smooth_plus = wilder_of(&plus_dm, period);
    let smooth_minus = wilder_of(&minus_dm, period);

    let di = |smoothed: &Series| -> Series {
        (0..n)
            .map(|i| match (smoothed.get(i), smooth_tr.get(i)) {
                (Some(_), Some(tr)) if tr == 0.0 => Some(0.0),
                (Some(dm), Some(tr)) => Some(100.0 * dm / tr),
                _ => None,
            })
            .collect()
    };

    (di(&smooth_plus), di(&smooth_minus))
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::TrendStrength
    }

    fn lookback(&self) -> usize {
        match self.line {
            AdxLine::Adx => 2 * self.period - 1,
            AdxLine::PlusDi | AdxLine::MinusDi => self.period,
        }
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        let (plus_di, minus_di) = directional_indices(input.bars(), self.period);

        match self.line {
            AdxLine::PlusDi => plus_di,
            AdxLine::MinusDi => minus_di,
            AdxLine::Adx => {
                let dx: Vec<Option<f64>> = plus_di
                    .values()
                    .iter()
                    .zip(minus_di.values())
                    .map(|(p, m)| match (p, m) {
                        (Some(p), Some(m)) if p + m == 0.0 => Some(0.0),
                        (Some(p), Some(m)) => Some(100.0 * (p - m).abs() / (p + m)),
                        _ => None,
                    })
                    .collect();
                wilder_of(&dx, self.period)
            }
        }
    }
}
