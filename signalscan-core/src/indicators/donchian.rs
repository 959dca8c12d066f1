//! Donchian Channel: highest high / lowest low over a lookback window.
//!
//! Produces three series (exposed as separate Indicator instances):
//! - Upper: max(high[t-period+1..=t])
//! - Lower: min(low[t-period+1..=t])
//! - Middle: (upper + lower) / 2, the basis of the Ichimoku lines
//!
//! Lookback: period - 1.

use crate::components::indicator::{Indicator, IndicatorFamily, IndicatorInput, Series};
use crate::domain::Bar;

/// Which band of the Donchian channel to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonchianBand {
    Upper,
    Lower,
    Middle,
}

#[derive(Debug, Clone)]
pub struct Donchian {
    period: usize,
    band: DonchianBand,
    name: String,
}

impl Donchian {
    pub fn upper(period: usize) -> Self {
        Self::band(period, DonchianBand::Upper, "upper")
    }

    pub fn lower(period: usize) -> Self {
        Self::band(period, DonchianBand::Lower, "lower")
    }

    pub fn middle(period: usize) -> Self {
        Self::band(period, DonchianBand::Middle, "middle")
    }

    fn band(period: usize, band: DonchianBand, label: &str) -> Self {
        assert!(period >= 1, "Donchian period must be >= 1");
        Self {
            period,
            band,
            name: format!("donchian_{label}_{period}"),
        }
    }
}

/// Highest high over the trailing window ending at each bar.
pub fn rolling_high(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    rolling(bars, period, |w| {
        w.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Lowest low over the trailing window ending at each bar.
pub fn rolling_low(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    rolling(bars, period, |w| {
        w.iter().map(|b| b.low).fold(f64::INFINITY, f64::min)
    })
}

fn rolling(bars: &[Bar], period: usize, f: impl Fn(&[Bar]) -> f64) -> Vec<Option<f64>> {
    let n = bars.len();
    let mut result = vec![None; n];
    if period == 0 || n < period {
        return result;
    }
    for i in (period - 1)..n {
        result[i] = Some(f(&bars[i + 1 - period..=i]));
    }
    result
}

impl Indicator for Donchian {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> IndicatorFamily {
        match self.band {
            DonchianBand::Middle => IndicatorFamily::Trend,
            DonchianBand::Upper | DonchianBand::Lower => IndicatorFamily::Band,
        }
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, input: &IndicatorInput<'_>) -> Series {
        let bars = input.bars();
        match self.band {
            DonchianBand::Upper => rolling_high(bars, self.period).into(),
            DonchianBand::Lower => rolling_low(bars, self.period).into(),
            DonchianBand::Middle => rolling_high(bars, self.period)
                .into_iter()
                .zip(rolling_low(bars, self.period))
                .map(|(h, l)| Some((h? + l?) / 2.0))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, compute_raw, make_ohlc_bars, DEFAULT_EPSILON};

    fn sample() -> Vec<Bar> {
        make_ohlc_bars(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 15.0, 10.0, 14.0),
            (14.0, 14.5, 8.0, 9.0),
            (9.0, 11.0, 8.5, 10.0),
        ])
    }

    #[test]
    fn upper_and_lower() {
        let bars = sample();
        let up = compute_raw(&Donchian::upper(3), &bars);
        let lo = compute_raw(&Donchian::lower(3), &bars);

        assert_eq!(up.first_defined(), Some(2));
        assert_approx(up.get(2).unwrap(), 15.0, DEFAULT_EPSILON);
        assert_approx(lo.get(2).unwrap(), 8.0, DEFAULT_EPSILON);
        assert_approx(up.get(3).unwrap(), 15.0, DEFAULT_EPSILON);
        assert_approx(lo.get(3).unwrap(), 8.0, DEFAULT_EPSILON);
    }

    #[test]
    fn middle_is_channel_midpoint() {
        let bars = sample();
        let mid = compute_raw(&Donchian::middle(2), &bars);
        assert_eq!(mid.get(0), None);
        // bars 0..=1: high 15, low 9
        assert_approx(mid.get(1).unwrap(), 12.0, DEFAULT_EPSILON);
        // bars 2..=3: high 14.5, low 8
        assert_approx(mid.get(3).unwrap(), 11.25, DEFAULT_EPSILON);
    }

    #[test]
    fn names() {
        assert_eq!(Donchian::middle(9).name(), "donchian_middle_9");
        assert_eq!(Donchian::upper(20).name(), "donchian_upper_20");
    }
}
