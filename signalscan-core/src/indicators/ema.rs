//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[period-1] = SMA of first `period` close values.
//! Lookback: period - 1.

use crate::components::indicator::{Indicator, IndicatorFamily, IndicatorInput, Series};

use super::{close_values, first_full_window};

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Trend
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        ema_of(&close_values(input.bars()), self.period)
    }
}

/// EMA over an arbitrary series. Used by layered indicators (MACD signal line).
pub fn ema_of(values: &[Option<f64>], period: usize) -> Series {
    seeded_recursion(values, period, 2.0 / (period as f64 + 1.0))
}

/// Seeded exponential recursion shared by EMA and Wilder smoothing.
///
/// Seed: mean of the first fully defined window of `period` values.
/// Once a gap appears after the seed, the rest of the series is undefined.
pub(crate) fn seeded_recursion(values: &[Option<f64>], period: usize, alpha: f64) -> Series {
    let n = values.len();
    let mut result = vec![None; n];

    let Some(seed_start) = first_full_window(values, period) else {
        return result.into();
    };
    let seed_end = seed_start + period;

    let seed = values[seed_start..seed_end].iter().flatten().sum::<f64>() / period as f64;
    result[seed_end - 1] = Some(seed);

    let mut prev = seed;
    for i in seed_end..n {
        let Some(v) = values[i] else {
            break;
        };
        let next = alpha * v + (1.0 - alpha) * prev;
        result[i] = Some(next);
        prev = next;
    }

    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, compute_raw, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = compute_raw(&Ema::new(1), &bars);
        assert_approx(result.get(0).unwrap(), 100.0, DEFAULT_EPSILON);
        assert_approx(result.get(1).unwrap(), 200.0, DEFAULT_EPSILON);
        assert_approx(result.get(2).unwrap(), 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // Closes: 10, 11, 12, 13, 14
        // alpha = 2/(3+1) = 0.5
        // Seed at index 2: SMA(10,11,12) = 11.0
        // EMA[3] = 0.5*13 + 0.5*11.0 = 12.0
        // EMA[4] = 0.5*14 + 0.5*12.0 = 13.0
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = compute_raw(&Ema::new(3), &bars);

        assert_eq!(result.get(0), None);
        assert_eq!(result.get(1), None);
        assert_approx(result.get(2).unwrap(), 11.0, DEFAULT_EPSILON);
        assert_approx(result.get(3).unwrap(), 12.0, DEFAULT_EPSILON);
        assert_approx(result.get(4).unwrap(), 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_of_seeds_after_leading_gap() {
        let values = [None, None, Some(10.0), Some(11.0), Some(12.0), Some(13.0)];
        let result = ema_of(&values, 3);
        assert_eq!(result.first_defined(), Some(4));
        assert_approx(result.get(4).unwrap(), 11.0, DEFAULT_EPSILON);
        assert_approx(result.get(5).unwrap(), 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_of_gap_after_seed_ends_series() {
        let values = [Some(10.0), Some(11.0), Some(12.0), None, Some(14.0)];
        let result = ema_of(&values, 3);
        assert_approx(result.get(2).unwrap(), 11.0, DEFAULT_EPSILON);
        assert_eq!(result.get(3), None);
        assert_eq!(result.get(4), None);
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(20).lookback(), 19);
        assert_eq!(Ema::new(1).lookback(), 0);
    }

    #[test]
    fn ema_too_few_bars() {
        let bars = make_bars(&[10.0, 11.0]);
        assert_eq!(compute_raw(&Ema::new(3), &bars).defined_count(), 0);
    }
}
