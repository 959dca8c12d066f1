//! The signal catalog: named conditions, in a fixed emission order.
//!
//! Names are used verbatim as the exported signal label. Adding a signal is
//! adding a row to `standard()`; the scanner and aggregator never change.

use std::collections::{BTreeSet, HashSet};

use crate::components::registry::{CatalogError, IndicatorRegistry};
use crate::indicators::keys;

use super::condition::{Condition, Operand};
use super::primitives::Direction;

/// Labels of the standard catalog.
pub mod names {
    pub const RSI_OVERSOLD_ENTRY: &str = "RSI: Oversold Entry (< 30)";
    pub const PRICE_ABOVE_SMA200: &str = "Price: Crossover above 200 SMA";
    pub const MACD_BULLISH: &str = "MACD: Bullish Crossover (MACD > Signal)";
    pub const BBANDS_LOWER_TOUCH: &str = "BBands: Close Touches Lower Band";
    pub const STOCH_BULLISH_OVERSOLD: &str = "STOCH: Bullish Crossover in Oversold (< 20)";
    pub const RSI_OVERBOUGHT_ENTRY: &str = "RSI: Overbought Entry (> 70)";
    pub const RSI_OVERSOLD_EXIT: &str = "RSI: Oversold Exit (>= 30)";
    pub const PRICE_BELOW_SMA200: &str = "Price: Crossunder below 200 SMA";
    pub const MACD_BEARISH: &str = "MACD: Bearish Crossover (MACD < Signal)";
    pub const BBANDS_UPPER_BREAK: &str = "BBands: Close Breaks Upper Band";
    pub const STOCH_BEARISH_OVERBOUGHT: &str = "STOCH: Bearish Crossover in Overbought (> 80)";
    pub const SMA_GOLDEN_CROSS: &str = "SMA: Golden Cross (50 > 200)";
    pub const SMA_DEATH_CROSS: &str = "SMA: Death Cross (50 < 200)";
    pub const MACD_TREND_CONFIRMED: &str =
        "MACD: Trend-Confirmed Bullish Crossover (ADX > 25, Close > 200 SMA)";
    pub const ADX_DI_CROSS: &str = "ADX: +DI Crosses Above -DI (ADX > 20)";
    pub const ICHIMOKU_ABOVE_CLOUD: &str = "Ichimoku: Close Breaks Above Cloud";
    pub const ICHIMOKU_BELOW_CLOUD: &str = "Ichimoku: Close Breaks Below Cloud";
    pub const OBV_ABOVE_SMA: &str = "OBV: Crosses Above 20 SMA";
}

/// One catalog entry: a stable label plus its condition.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDefinition {
    name: String,
    condition: Condition,
}

impl SignalDefinition {
    pub fn new(name: impl Into<String>, condition: Condition) -> Self {
        Self {
            name: name.into(),
            condition,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Indicator keys the condition reads directly.
    pub fn dependencies(&self) -> BTreeSet<String> {
        self.condition.dependencies()
    }
}

/// Ordered collection of uniquely named signals.
#[derive(Debug, Clone, Default)]
pub struct SignalCatalog {
    signals: Vec<SignalDefinition>,
}

impl SignalCatalog {
    /// Build a catalog. Signal names must be unique.
    pub fn new(signals: Vec<SignalDefinition>) -> Result<Self, CatalogError> {
        let catalog = Self { signals };
        catalog.check_unique_names()?;
        Ok(catalog)
    }

    /// The standard screening catalog over the default indicator set.
    pub fn standard() -> Self {
        use names::*;

        fn ind(key: &str) -> Operand {
            Operand::indicator(key)
        }
        let rsi = || ind(keys::RSI);
        let macd = || ind(keys::MACD);
        let macd_signal = || ind(keys::MACD_SIGNAL);
        let sma200 = || ind(keys::SMA_LONG);
        let stoch_k = || ind(keys::STOCH_K);
        let stoch_d = || ind(keys::STOCH_D);
        let adx = || ind(keys::ADX);

        let signals = vec![
            SignalDefinition::new(RSI_OVERSOLD_ENTRY, Condition::crosses_below(rsi(), 30.0)),
            SignalDefinition::new(
                PRICE_ABOVE_SMA200,
                Condition::crosses_above(Operand::Close, sma200()),
            ),
            SignalDefinition::new(MACD_BULLISH, Condition::crosses_above(macd(), macd_signal())),
            SignalDefinition::new(
                BBANDS_LOWER_TOUCH,
                Condition::below(Operand::Close, ind(keys::BB_LOWER)),
            ),
            SignalDefinition::new(
                STOCH_BULLISH_OVERSOLD,
                Condition::all(vec![
                    Condition::crosses_above(stoch_k(), stoch_d()),
                    Condition::below(stoch_d(), 20.0),
                ]),
            ),
            SignalDefinition::new(RSI_OVERBOUGHT_ENTRY, Condition::crosses_above(rsi(), 70.0)),
            SignalDefinition::new(
                RSI_OVERSOLD_EXIT,
                Condition::reaches(rsi(), 30.0, Direction::Up),
            ),
            SignalDefinition::new(
                PRICE_BELOW_SMA200,
                Condition::crosses_below(Operand::Close, sma200()),
            ),
            SignalDefinition::new(MACD_BEARISH, Condition::crosses_below(macd(), macd_signal())),
            SignalDefinition::new(
                BBANDS_UPPER_BREAK,
                Condition::above(Operand::Close, ind(keys::BB_UPPER)),
            ),
            SignalDefinition::new(
                STOCH_BEARISH_OVERBOUGHT,
                Condition::all(vec![
                    Condition::crosses_below(stoch_k(), stoch_d()),
                    Condition::above(stoch_d(), 80.0),
                ]),
            ),
            SignalDefinition::new(
                SMA_GOLDEN_CROSS,
                Condition::crosses_above(ind(keys::SMA_MID), sma200()),
            ),
            SignalDefinition::new(
                SMA_DEATH_CROSS,
                Condition::crosses_below(ind(keys::SMA_MID), sma200()),
            ),
            SignalDefinition::new(
                MACD_TREND_CONFIRMED,
                Condition::all(vec![
                    Condition::crosses_above(macd(), macd_signal()),
                    Condition::above(adx(), 25.0),
                    Condition::above(Operand::Close, sma200()),
                ]),
            ),
            SignalDefinition::new(
                ADX_DI_CROSS,
                Condition::all(vec![
                    Condition::crosses_above(ind(keys::PLUS_DI), ind(keys::MINUS_DI)),
                    Condition::above(adx(), 20.0),
                ]),
            ),
            SignalDefinition::new(
                ICHIMOKU_ABOVE_CLOUD,
                Condition::crosses_above(Operand::Close, ind(keys::ICHIMOKU_CLOUD_TOP)),
            ),
            SignalDefinition::new(
                ICHIMOKU_BELOW_CLOUD,
                Condition::crosses_below(Operand::Close, ind(keys::ICHIMOKU_CLOUD_BOTTOM)),
            ),
            SignalDefinition::new(
                OBV_ABOVE_SMA,
                Condition::crosses_above(ind(keys::OBV), ind(keys::OBV_SMA)),
            ),
        ];

        Self { signals }
    }

    fn check_unique_names(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for def in &self.signals {
            if !seen.insert(def.name()) {
                return Err(CatalogError::DuplicateSignal(def.name().to_string()));
            }
        }
        Ok(())
    }

    /// Structural check against the registry, run before any scanning.
    ///
    /// Every referenced indicator must exist and resolve without cycles, and
    /// signal names must be unique.
    pub fn validate(&self, registry: &IndicatorRegistry) -> Result<(), CatalogError> {
        self.check_unique_names()?;
        for def in &self.signals {
            for key in def.dependencies() {
                if !registry.contains(&key) {
                    return Err(CatalogError::UnknownIndicator {
                        name: key,
                        referenced_by: format!("signal '{}'", def.name()),
                    });
                }
            }
        }
        registry.resolve(self.required_indicators())?;
        Ok(())
    }

    /// Subset of this catalog, kept in catalog order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, CatalogError> {
        for name in names {
            let name = name.as_ref();
            if self.get(name).is_none() {
                return Err(CatalogError::UnknownSignal(name.to_string()));
            }
        }
        let wanted: HashSet<&str> = names.iter().map(|n| n.as_ref()).collect();
        Ok(Self {
            signals: self
                .signals
                .iter()
                .filter(|def| wanted.contains(def.name()))
                .cloned()
                .collect(),
        })
    }

    /// Indicator keys referenced by any signal, sorted.
    pub fn required_indicators(&self) -> Vec<String> {
        self.signals
            .iter()
            .flat_map(|def| def.dependencies())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// First bar index at which `def` can possibly be true: the largest
    /// warm-up among its indicators, plus one when the previous bar is read,
    /// and never before bar 1.
    pub fn first_eligible_index(
        def: &SignalDefinition,
        registry: &IndicatorRegistry,
    ) -> Result<usize, CatalogError> {
        let deps = def.dependencies();
        let warmups = registry.warmups(&deps)?;
        let warmup = deps
            .iter()
            .filter_map(|key| warmups.get(key).copied())
            .max()
            .unwrap_or(0);
        let previous = usize::from(def.condition().uses_previous_bar());
        Ok((warmup + previous).max(1))
    }

    pub fn get(&self, name: &str) -> Option<&SignalDefinition> {
        self.signals.iter().find(|def| def.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.signals.iter().map(|def| def.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalDefinition> {
        self.signals.iter()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
