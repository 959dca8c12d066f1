//! Cumulative volume indicators.
//!
//! - On-Balance Volume: running total of volume, signed by the close-to-close
//!   direction. OBV[0] = 0.
//! - Accumulation/Distribution line: running total of close-location value
//!   times volume, where CLV = ((close - low) - (high - close)) / (high - low)
//!   and a zero-width bar contributes 0.
//!
//! Both are defined from the first bar (lookback 0).

use crate::components::indicator::{Indicator, IndicatorFamily, IndicatorInput, Series};

#[derive(Debug, Clone, Default)]
pub struct OnBalanceVolume;

impl OnBalanceVolume {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for OnBalanceVolume {
    fn name(&self) -> &str {
        "obv"
    }

    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Volume
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        let bars = input.bars();
        let mut total = 0.0;
        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                if i > 0 {
                    let prev = bars[i - 1].close;
                    let volume = bar.volume as f64;
                    if bar.close > prev {
                        total += volume;
                    } else if bar.close < prev {
                        total -= volume;
                    }
                }
                Some(total)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccumulationDistribution;

impl AccumulationDistribution {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for AccumulationDistribution {
    fn name(&self) -> &str {
        "ad_line"
    }

    fn family(&self) -> IndicatorFamily {
        IndicatorFamily::Volume
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        let mut total = 0.0;
        input
            .bars()
            .iter()
            .map(|bar| {
                let range = bar.high - bar.low;
                if range > 0.0 {
                    let clv = ((bar.close - bar.low) - (bar.high - bar.close)) / range;
                    total += clv * bar.volume as f64;
                }
                Some(total)
            })
            .collect()
    }
}
