//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use crate::components::indicator::{Indicator, IndicatorFamily, IndicatorInput, Series};

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::band(
            period,
            multiplier,
            BollingerBand::Upper,
            format!("bb_upper_{period}_{multiplier}"),
        )
    }

    /// The middle band does not depend on the multiplier, so its key omits it.
    pub fn middle(period: usize) -> Self {
        Self::band(
            period,
            0.0,
            BollingerBand::Middle,
            format!("bb_middle_{period}"),
        )
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::band(
            period,
            multiplier,
            BollingerBand::Lower,
            format!("bb_lower_{period}_{multiplier}"),
        )
    }

    fn band(period: usize, multiplier: f64, band: BollingerBand, name: String) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            multiplier,
            band,
            name,
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Band
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        let bars = input.bars();
        let n = bars.len();
        let mut result = vec![None; n];

        if n < self.period {
            return result.into();
        }

        for i in (self.period - 1)..n {
            let window = &bars[i + 1 - self.period..=i];
            let mean = window.iter().map(|b| b.close).sum::<f64>() / self.period as f64;

            result[i] = Some(match self.band {
                BollingerBand::Middle => mean,
                BollingerBand::Upper | BollingerBand::Lower => {
                    let variance = window
                        .iter()
                        .map(|b| (b.close - mean).powi(2))
                        .sum::<f64>()
                        / self.period as f64;
                    let offset = self.multiplier * variance.sqrt();
                    if self.band == BollingerBand::Upper {
                        mean + offset
                    } else {
                        mean - offset
                    }
                }
            });
        }

        result.into()
    }
}
