//! Concrete indicator implementations.
//!
//! Raw indicators read bars directly. Layered indicators (`layered`) combine
//! or smooth other named series, which is how MACD, slow stochastics, the
//! Ichimoku cloud and the OBV average are assembled. The registry resolves
//! the dependency order once per scan.
//!
//! Multi-series indicators (Bollinger, Donchian, ADX) are exposed as
//! separate named instances per line, keeping the single-series `Indicator`
//! trait unchanged.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod donchian;
pub mod ema;
pub mod layered;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volume;

pub use adx::{Adx, AdxLine};
pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand};
pub use donchian::{Donchian, DonchianBand};
pub use ema::Ema;
pub use layered::{Extreme, ExtremeKind, Midpoint, Shifted, Smoothed, Smoothing, Spread};
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::StochasticFastK;
pub use volume::{AccumulationDistribution, OnBalanceVolume};

/// Default parameters. These are part of the external contract: signal
/// labels and exported results refer to indicators built with them.
pub mod defaults {
    pub const RSI_PERIOD: usize = 14;
    pub const SMA_SHORT: usize = 20;
    pub const SMA_MID: usize = 50;
    pub const SMA_LONG: usize = 200;
    pub const MACD_FAST: usize = 12;
    pub const MACD_SLOW: usize = 26;
    pub const MACD_SIGNAL: usize = 9;
    pub const BOLLINGER_PERIOD: usize = 20;
    pub const BOLLINGER_DEVIATIONS: f64 = 2.0;
    pub const STOCH_FASTK: usize = 14;
    pub const STOCH_SLOWK: usize = 3;
    pub const STOCH_SLOWD: usize = 3;
    pub const ATR_PERIOD: usize = 14;
    pub const ADX_PERIOD: usize = 14;
    pub const DONCHIAN_PERIOD: usize = 20;
    pub const ICHIMOKU_TENKAN: usize = 9;
    pub const ICHIMOKU_KIJUN: usize = 26;
    pub const ICHIMOKU_SENKOU_B: usize = 52;
    pub const ICHIMOKU_DISPLACEMENT: usize = 26;
    pub const OBV_SIGNAL: usize = 20;
}

/// Keys of the standard registry's indicators.
pub mod keys {
    pub const SMA_SHORT: &str = "sma_20";
    pub const SMA_MID: &str = "sma_50";
    pub const SMA_LONG: &str = "sma_200";
    pub const EMA_FAST: &str = "ema_12";
    pub const EMA_SLOW: &str = "ema_26";
    pub const MACD: &str = "macd_12_26";
    pub const MACD_SIGNAL: &str = "macd_signal_12_26_9";
    pub const MACD_HIST: &str = "macd_hist_12_26_9";
    pub const RSI: &str = "rsi_14";
    pub const BB_UPPER: &str = "bb_upper_20_2";
    pub const BB_MIDDLE: &str = "bb_middle_20";
    pub const BB_LOWER: &str = "bb_lower_20_2";
    pub const STOCH_FASTK: &str = "stoch_fastk_14";
    pub const STOCH_K: &str = "stoch_k_14_3";
    pub const STOCH_D: &str = "stoch_d_14_3_3";
    pub const ATR: &str = "atr_14";
    pub const ADX: &str = "adx_14";
    pub const PLUS_DI: &str = "plus_di_14";
    pub const MINUS_DI: &str = "minus_di_14";
    pub const DONCHIAN_UPPER: &str = "donchian_upper_20";
    pub const DONCHIAN_LOWER: &str = "donchian_lower_20";
    pub const ICHIMOKU_TENKAN: &str = "donchian_middle_9";
    pub const ICHIMOKU_KIJUN: &str = "donchian_middle_26";
    pub const ICHIMOKU_SENKOU_B_BASE: &str = "donchian_middle_52";
    pub const ICHIMOKU_MID: &str = "ichimoku_mid_9_26";
    pub const ICHIMOKU_SPAN_A: &str = "ichimoku_span_a_9_26";
    pub const ICHIMOKU_SPAN_B: &str = "ichimoku_span_b_52";
    pub const ICHIMOKU_CLOUD_TOP: &str = "ichimoku_cloud_top";
    pub const ICHIMOKU_CLOUD_BOTTOM: &str = "ichimoku_cloud_bottom";
    pub const OBV: &str = "obv";
    pub const OBV_SMA: &str = "obv_sma_20";
    pub const AD_LINE: &str = "ad_line";
}

/// Close prices as an always-defined input series.
pub(crate) fn close_values(bars: &[crate::domain::Bar]) -> Vec<Option<f64>> {
    bars.iter().map(|b| Some(b.close)).collect()
}

/// First index `s` such that `values[s..s + period]` is fully defined.
pub(crate) fn first_full_window(values: &[Option<f64>], period: usize) -> Option<usize> {
    if period == 0 {
        return None;
    }
    let mut run = 0;
    for (i, v) in values.iter().enumerate() {
        if v.is_some() {
            run += 1;
            if run == period {
                return Some(i + 1 - period);
            }
        } else {
            run = 0;
        }
    }
    None
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Bars from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000,
        })
        .collect()
}

/// Compute a raw indicator straight from bars (no layered inputs).
#[cfg(test)]
pub fn compute_raw(
    indicator: &dyn crate::components::indicator::Indicator,
    bars: &[crate::domain::Bar],
) -> crate::components::indicator::Series {
    use crate::components::indicator::{IndicatorInput, IndicatorValues};
    let values = IndicatorValues::new();
    indicator.compute(&IndicatorInput::new(bars, &values))
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_full_window_skips_leading_gaps() {
        let values = [None, Some(1.0), None, Some(2.0), Some(3.0), Some(4.0)];
        assert_eq!(first_full_window(&values, 3), Some(3));
        assert_eq!(first_full_window(&values, 4), None);
        assert_eq!(first_full_window(&values, 0), None);
    }
}
