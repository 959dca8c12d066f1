//! Indicator registry: named indicators plus dependency resolution.
//!
//! Layered indicators name their inputs, so the registry forms a DAG. A
//! request for a set of keys resolves to its dependency closure in
//! topological order; each indicator appears once, after all of its inputs.

use std::collections::{BTreeMap, HashMap};

use crate::indicators::{
    defaults as d, keys, AccumulationDistribution, Adx, Atr, Bollinger, Donchian, Ema, Extreme,
    ExtremeKind, Midpoint, OnBalanceVolume, Rsi, Shifted, Sma, Smoothed, Smoothing,
    StochasticFastK, Spread,
};

use super::indicator::{Indicator, IndicatorFamily};

// ─── Error type ──────────────────────────────────────────────────────

/// Structural catalog errors. These are fatal and surface before any
/// instrument is scanned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown indicator '{name}' (referenced by {referenced_by})")]
    UnknownIndicator { name: String, referenced_by: String },
    #[error("indicator '{0}' is registered twice")]
    DuplicateIndicator(String),
    #[error("indicator dependency cycle through '{0}'")]
    DependencyCycle(String),
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),
    #[error("signal '{0}' is defined twice")]
    DuplicateSignal(String),
}

// ─── Registry ────────────────────────────────────────────────────────

/// Owns every available indicator, keyed by its stable name.
#[derive(Default)]
pub struct IndicatorRegistry {
    indicators: BTreeMap<String, Box<dyn Indicator>>,
}

impl std::fmt::Debug for IndicatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorRegistry")
            .field("indicators", &self.indicators.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every indicator the standard signal catalog refers to, built with the
    /// default parameters.
    pub fn standard() -> Self {
        use IndicatorFamily::*;

        let all: Vec<Box<dyn Indicator>> = vec![
            // Trend
            Box::new(Sma::new(d::SMA_SHORT)),
            Box::new(Sma::new(d::SMA_MID)),
            Box::new(Sma::new(d::SMA_LONG)),
            Box::new(Ema::new(d::MACD_FAST)),
            Box::new(Ema::new(d::MACD_SLOW)),
            Box::new(Spread::new(keys::MACD, Trend, keys::EMA_FAST, keys::EMA_SLOW)),
            Box::new(Smoothed::new(
                keys::MACD_SIGNAL,
                Trend,
                keys::MACD,
                Smoothing::Ema,
                d::MACD_SIGNAL,
            )),
            Box::new(Spread::new(keys::MACD_HIST, Trend, keys::MACD, keys::MACD_SIGNAL)),
            // Momentum
            Box::new(Rsi::new(d::RSI_PERIOD)),
            Box::new(StochasticFastK::new(d::STOCH_FASTK)),
            Box::new(Smoothed::new(
                keys::STOCH_K,
                Momentum,
                keys::STOCH_FASTK,
                Smoothing::Sma,
                d::STOCH_SLOWK,
            )),
            Box::new(Smoothed::new(
                keys::STOCH_D,
                Momentum,
                keys::STOCH_K,
                Smoothing::Sma,
                d::STOCH_SLOWD,
            )),
            // Bands
            Box::new(Bollinger::upper(d::BOLLINGER_PERIOD, d::BOLLINGER_DEVIATIONS)),
            Box::new(Bollinger::middle(d::BOLLINGER_PERIOD)),
            Box::new(Bollinger::lower(d::BOLLINGER_PERIOD, d::BOLLINGER_DEVIATIONS)),
            Box::new(Donchian::upper(d::DONCHIAN_PERIOD)),
            Box::new(Donchian::lower(d::DONCHIAN_PERIOD)),
            // Trend strength
            Box::new(Atr::new(d::ATR_PERIOD)),
            Box::new(Adx::adx(d::ADX_PERIOD)),
            Box::new(Adx::plus_di(d::ADX_PERIOD)),
            Box::new(Adx::minus_di(d::ADX_PERIOD)),
            // Ichimoku cloud
            Box::new(Donchian::middle(d::ICHIMOKU_TENKAN)),
            Box::new(Donchian::middle(d::ICHIMOKU_KIJUN)),
            Box::new(Donchian::middle(d::ICHIMOKU_SENKOU_B)),
            Box::new(Midpoint::new(
                keys::ICHIMOKU_MID,
                Trend,
                keys::ICHIMOKU_TENKAN,
                keys::ICHIMOKU_KIJUN,
            )),
            Box::new(Shifted::new(
                keys::ICHIMOKU_SPAN_A,
                Trend,
                keys::ICHIMOKU_MID,
                d::ICHIMOKU_DISPLACEMENT,
            )),
            Box::new(Shifted::new(
                keys::ICHIMOKU_SPAN_B,
                Trend,
                keys::ICHIMOKU_SENKOU_B_BASE,
                d::ICHIMOKU_DISPLACEMENT,
            )),
            Box::new(Extreme::new(
                keys::ICHIMOKU_CLOUD_TOP,
                Trend,
                ExtremeKind::Max,
                keys::ICHIMOKU_SPAN_A,
                keys::ICHIMOKU_SPAN_B,
            )),
            Box::new(Extreme::new(
                keys::ICHIMOKU_CLOUD_BOTTOM,
                Trend,
                ExtremeKind::Min,
                keys::ICHIMOKU_SPAN_A,
                keys::ICHIMOKU_SPAN_B,
            )),
            // Volume
            Box::new(OnBalanceVolume::new()),
            Box::new(Smoothed::new(
                keys::OBV_SMA,
                Volume,
                keys::OBV,
                Smoothing::Sma,
                d::OBV_SIGNAL,
            )),
            Box::new(AccumulationDistribution::new()),
        ];

        let mut registry = Self::new();
        for indicator in all {
            registry
                .indicators
                .insert(indicator.name().to_string(), indicator);
        }
        registry
    }

    /// Add an indicator. Names must be unique.
    pub fn register(&mut self, indicator: Box<dyn Indicator>) -> Result<(), CatalogError> {
        let name = indicator.name().to_string();
        if self.indicators.contains_key(&name) {
            return Err(CatalogError::DuplicateIndicator(name));
        }
        self.indicators.insert(name, indicator);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Indicator> {
        self.indicators.get(name).map(|b| b.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indicators.contains_key(name)
    }

    /// Registered keys in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.indicators.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Indicator> {
        self.indicators.values().map(|b| b.as_ref())
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Resolve `requested` into its dependency closure, inputs first.
    ///
    /// Each indicator appears exactly once. Errors on unknown names (including
    /// unknown inputs of layered indicators) and on cycles.
    pub fn resolve<I, S>(&self, requested: I) -> Result<Vec<&dyn Indicator>, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut marks: HashMap<&str, Mark> = HashMap::new();
        let mut order: Vec<&dyn Indicator> = Vec::new();

        for name in requested {
            let name = name.as_ref();
            let Some((key, _)) = self.indicators.get_key_value(name) else {
                return Err(CatalogError::UnknownIndicator {
                    name: name.to_string(),
                    referenced_by: "request".to_string(),
                });
            };
            self.visit(key, &mut marks, &mut order)?;
        }

        Ok(order)
    }

    fn visit<'r>(
        &'r self,
        name: &'r str,
        marks: &mut HashMap<&'r str, Mark>,
        order: &mut Vec<&'r dyn Indicator>,
    ) -> Result<(), CatalogError> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(CatalogError::DependencyCycle(name.to_string())),
            None => {}
        }

        let indicator = self.indicators.get(name).map(|b| b.as_ref()).ok_or_else(|| {
            CatalogError::UnknownIndicator {
                name: name.to_string(),
                referenced_by: "request".to_string(),
            }
        })?;

        marks.insert(name, Mark::Visiting);
        for input in indicator.inputs() {
            if !self.indicators.contains_key(input.as_str()) {
                return Err(CatalogError::UnknownIndicator {
                    name: input.clone(),
                    referenced_by: name.to_string(),
                });
            }
            self.visit(input, marks, order)?;
        }
        marks.insert(name, Mark::Done);
        order.push(indicator);
        Ok(())
    }

    /// Total warm-up of every indicator in the closure of `requested`:
    /// own lookback plus the largest warm-up among its inputs.
    pub fn warmups<I, S>(&self, requested: I) -> Result<HashMap<String, usize>, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut warmups: HashMap<String, usize> = HashMap::new();
        for indicator in self.resolve(requested)? {
            let base = indicator
                .inputs()
                .iter()
                .filter_map(|input| warmups.get(input).copied())
                .max()
                .unwrap_or(0);
            warmups.insert(indicator.name().to_string(), base + indicator.lookback());
        }
        Ok(warmups)
    }

    /// Total warm-up of one indicator: the index of its first defined value
    /// on a long enough, gap-free bar series.
    pub fn warmup(&self, name: &str) -> Result<usize, CatalogError> {
        let warmups = self.warmups([name])?;
        Ok(warmups.get(name).copied().unwrap_or(0))
    }
}
