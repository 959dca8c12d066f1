//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period.
//! Edge cases: avg_loss == 0 → RSI = 100; avg_gain == 0 → RSI = 0; both → 50.

use crate::components::indicator::{Indicator, IndicatorFamily, IndicatorInput, Series};

use super::atr::wilder_of;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Momentum
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        let bars = input.bars();
        let n = bars.len();

        // Change series starts at bar 1, so the seed covers changes[1..=period]
        let mut gains = vec![None; n];
        let mut losses = vec![None; n];
        for i in 1..n {
            let change = bars[i].close - bars[i - 1].close;
            gains[i] = Some(change.max(0.0));
            losses[i] = Some((-change).max(0.0));
        }

        let avg_gain = wilder_of(&gains, self.period);
        let avg_loss = wilder_of(&losses, self.period);

        (0..n)
            .map(|i| match (avg_gain.get(i), avg_loss.get(i)) {
                (Some(g), Some(l)) => Some(compute_rsi(g, l)),
                _ => None,
            })
            .collect()
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, compute_raw, make_bars};

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = compute_raw(&Rsi::new(3), &bars);
        assert_approx(result.get(3).unwrap(), 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = compute_raw(&Rsi::new(3), &bars);
        assert_approx(result.get(3).unwrap(), 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_is_neutral() {
        let bars = make_bars(&[100.0; 6]);
        let result = compute_raw(&Rsi::new(3), &bars);
        assert_approx(result.get(5).unwrap(), 50.0, 1e-9);
    }

    #[test]
    fn rsi_mixed_known_value() {
        // Changes: +0.34, -0.25, -0.48, +0.72
        // period=3, seed from changes[1..=3]: gains=0.34, losses=0.73
        // RSI[3] = 100 - 100/(1 + 0.34/0.73)
        let bars = make_bars(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = compute_raw(&Rsi::new(3), &bars);

        assert_eq!(result.first_defined(), Some(3));
        let expected = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_approx(result.get(3).unwrap(), expected, 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = compute_raw(&Rsi::new(3), &bars);
        for (i, v) in result.values().iter().enumerate() {
            if let Some(v) = v {
                assert!((0.0..=100.0).contains(v), "RSI out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_insufficient_history_is_all_undefined() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let result = compute_raw(&Rsi::new(14), &bars);
        assert_eq!(result.len(), 5);
        assert_eq!(result.defined_count(), 0);
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 14);
    }
}
