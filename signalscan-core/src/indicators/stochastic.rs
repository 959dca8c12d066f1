//! Fast stochastic %K.
//!
//! %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over the
//! trailing window. A zero-width range yields 0. Slow %K and %D are layered
//! SMAs of this series.
//! Lookback: period - 1.

use crate::components::indicator::{Indicator, IndicatorFamily, IndicatorInput, Series};

use super::donchian::{rolling_high, rolling_low};

#[derive(Debug, Clone)]
pub struct StochasticFastK {
    period: usize,
    name: String,
}

impl StochasticFastK {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "stochastic period must be >= 1");
        Self {
            period,
            name: format!("stoch_fastk_{period}"),
        }
    }
}

impl Indicator for StochasticFastK {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Momentum
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        let bars = input.bars();
        let highs = rolling_high(bars, self.period);
        let lows = rolling_low(bars, self.period);

        bars.iter()
            .zip(highs.into_iter().zip(lows))
            .map(|(bar, (hh, ll))| {
                let (hh, ll) = (hh?, ll?);
                let range = hh - ll;
                if range > 0.0 {
                    Some(100.0 * (bar.close - ll) / range)
                } else {
                    Some(0.0)
                }
            })
            .collect()
    }
}
