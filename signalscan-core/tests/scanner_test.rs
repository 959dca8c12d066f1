//! End-to-end scanner scenarios over small synthetic series.

use chrono::NaiveDate;
use signalscan_core::components::IndicatorRegistry;
use signalscan_core::domain::{Bar, BarSeries};
use signalscan_core::engine::{aggregate, scan_instrument, Occurrence};
use signalscan_core::indicators::Sma;
use signalscan_core::signals::{names, Condition, Operand, SignalCatalog, SignalDefinition};

fn make_series(symbol: &str, closes: &[f64]) -> BarSeries {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 10_000,
            }
        })
        .collect();
    BarSeries::new(symbol, bars).unwrap()
}

fn ma_cross_catalog() -> (IndicatorRegistry, SignalCatalog) {
    let mut registry = IndicatorRegistry::standard();
    registry.register(Box::new(Sma::new(5))).unwrap();
    let catalog = SignalCatalog::new(vec![
        SignalDefinition::new(
            "Price: Crossover above 5 SMA",
            Condition::crosses_above(Operand::Close, Operand::indicator("sma_5")),
        ),
        SignalDefinition::new(
            "Price: Crossunder below 5 SMA",
            Condition::crosses_below(Operand::Close, Operand::indicator("sma_5")),
        ),
    ])
    .unwrap();
    catalog.validate(&registry).unwrap();
    (registry, catalog)
}

#[test]
fn twenty_bars_single_bullish_cross_at_bar_15() {
    let (registry, catalog) = ma_cross_catalog();
    // Flat at 100 (so the average is flat at 100), then a jump at bar 15
    let closes: Vec<f64> = (0..20).map(|i| if i < 15 { 100.0 } else { 110.0 }).collect();
    let series = make_series("XYZ", &closes);
    let bar15 = series.get(15).unwrap().date;

    let events = scan_instrument(series, &catalog, &registry).unwrap();

    assert_eq!(
        events,
        vec![Occurrence {
            instrument_id: "XYZ".into(),
            signal_name: "Price: Crossover above 5 SMA".into(),
            occurrence_date: bar15,
        }]
    );
}

#[test]
fn five_bars_with_fourteen_bar_window_yields_nothing() {
    let registry = IndicatorRegistry::standard();
    let catalog = SignalCatalog::standard();
    let series = make_series("SHORT", &[100.0, 90.0, 80.0, 70.0, 60.0]);
    let events = scan_instrument(series, &catalog, &registry).unwrap();
    assert!(events.is_empty());
}

#[test]
fn short_window_signal_fires_without_long_window_history() {
    // 30 rising bars, then a steady decline. Only 50 bars: SMA 200 never
    // resolves, but the RSI signal must still be reported.
    let closes: Vec<f64> = (0..50)
        .map(|i| {
            if i < 30 {
                100.0 + i as f64
            } else {
                129.0 - 3.0 * (i - 29) as f64
            }
        })
        .collect();
    let series = make_series("DIP", &closes);
    let bar37 = series.get(37).unwrap().date;

    let registry = IndicatorRegistry::standard();
    let catalog = SignalCatalog::standard();
    let events = scan_instrument(series, &catalog, &registry).unwrap();

    let rsi_entries: Vec<&Occurrence> = events
        .iter()
        .filter(|e| e.signal_name == names::RSI_OVERSOLD_ENTRY)
        .collect();
    assert_eq!(rsi_entries.len(), 1);
    assert_eq!(rsi_entries[0].occurrence_date, bar37);

    assert!(events
        .iter()
        .all(|e| e.signal_name != names::PRICE_ABOVE_SMA200
            && e.signal_name != names::PRICE_BELOW_SMA200));
}

#[test]
fn scan_is_repeatable() {
    let closes: Vec<f64> = (0..300)
        .map(|i| 100.0 + (i as f64 * 0.13).sin() * 12.0 + i as f64 * 0.05)
        .collect();
    let registry = IndicatorRegistry::standard();
    let catalog = SignalCatalog::standard();

    let a = scan_instrument(make_series("R", &closes), &catalog, &registry).unwrap();
    let b = scan_instrument(make_series("R", &closes), &catalog, &registry).unwrap();
    assert_eq!(a, b);
    assert!(!a.is_empty());
}

#[test]
fn aggregated_output_orders_instruments_descending_on_tied_dates() {
    let (registry, catalog) = ma_cross_catalog();
    let closes: Vec<f64> = (0..20).map(|i| if i < 15 { 100.0 } else { 110.0 }).collect();

    let per_instrument: Vec<Vec<Occurrence>> = ["AAA", "CCC", "BBB"]
        .iter()
        .map(|s| scan_instrument(make_series(s, &closes), &catalog, &registry).unwrap())
        .collect();
    let merged = aggregate(per_instrument);

    let order: Vec<&str> = merged.iter().map(|e| e.instrument_id.as_str()).collect();
    assert_eq!(order, vec!["CCC", "BBB", "AAA"]);
}
