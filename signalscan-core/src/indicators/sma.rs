//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

use crate::components::indicator::{Indicator, IndicatorFamily, IndicatorInput, Series};

use super::close_values;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
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
        sma_of(&close_values(input.bars()), self.period)
    }
}

/// Rolling mean over an arbitrary series. Any window containing an undefined
/// position is undefined.
pub fn sma_of(values: &[Option<f64>], period: usize) -> Series {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 || n < period {
        return result.into();
    }

    let mut sum = 0.0;
    let mut missing = 0usize;
    for i in 0..n {
        match values[i] {
            Some(v) => sum += v,
            None => missing += 1,
        }
        if i >= period {
            match values[i - period] {
                Some(v) => sum -= v,
                None => missing -= 1,
            }
        }
        if i + 1 >= period && missing == 0 {
            result[i] = Some(sum / period as f64);
        }
    }

    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, compute_raw, make_bars, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = compute_raw(&Sma::new(5), &bars);

        assert_eq!(result.len(), 7);
        for i in 0..4 {
            assert_eq!(result.get(i), None, "expected undefined at index {i}");
        }
        // SMA[4] = mean(10,11,12,13,14) = 12.0
        assert_approx(result.get(4).unwrap(), 12.0, DEFAULT_EPSILON);
        // SMA[5] = mean(11,12,13,14,15) = 13.0
        assert_approx(result.get(5).unwrap(), 13.0, DEFAULT_EPSILON);
        // SMA[6] = mean(12,13,14,15,16) = 14.0
        assert_approx(result.get(6).unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = compute_raw(&Sma::new(1), &bars);
        assert_eq!(result.values(), &[Some(100.0), Some(200.0), Some(300.0)]);
    }

    #[test]
    fn sma_of_gap_in_window() {
        let values = [Some(10.0), Some(11.0), None, Some(13.0), Some(14.0), Some(15.0)];
        let result = sma_of(&values, 3);
        // Windows touching index 2 are undefined
        assert_eq!(result.get(2), None);
        assert_eq!(result.get(3), None);
        assert_eq!(result.get(4), None);
        assert_approx(result.get(5).unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_of_layered_input_warms_up_additively() {
        // Input itself undefined for the first 4 positions
        let values: Vec<Option<f64>> = (0..10)
            .map(|i| if i < 4 { None } else { Some(i as f64) })
            .collect();
        let result = sma_of(&values, 3);
        assert_eq!(result.first_defined(), Some(6));
        assert_approx(result.get(6).unwrap(), 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_lookback() {
        assert_eq!(Sma::new(20).lookback(), 19);
        assert_eq!(Sma::new(1).lookback(), 0);
    }

    #[test]
    fn sma_too_few_bars() {
        let bars = make_bars(&[10.0, 11.0]);
        let result = compute_raw(&Sma::new(5), &bars);
        assert_eq!(result.len(), 2);
        assert_eq!(result.defined_count(), 0);
    }
}
