//! Look-ahead contamination tests for every registered indicator.
//!
//! Invariant: no indicator value at bar t may depend on price data from bar
//! t+1 or later.
//!
//! Method: augment a truncated series (bars 0..200) and the full series
//! (bars 0..320) with the whole standard registry. Positions 0..200 must be
//! identical in both runs. Any difference means the indicator is leaking
//! future data into past values.

use chrono::NaiveDate;
use signalscan_core::components::IndicatorRegistry;
use signalscan_core::domain::{Bar, BarSeries};
use signalscan_core::engine::augment;

/// N bars of synthetic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05; // -5.0 to +5.0
        price += change;
        price = f64::max(price, 10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        let high = open.max(close) + 2.0;
        let low = open.min(close) - 2.0;

        bars.push(Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000 + (i as u64 * 100),
        });
    }

    bars
}

#[test]
fn no_indicator_reads_future_bars() {
    let registry = IndicatorRegistry::standard();
    let names: Vec<String> = registry.names().map(String::from).collect();

    let bars = make_test_bars(320);
    let truncated_len = 200;

    let full = augment(BarSeries::new("TEST", bars.clone()).unwrap(), &registry, &names).unwrap();
    let truncated = augment(
        BarSeries::new("TEST", bars[..truncated_len].to_vec()).unwrap(),
        &registry,
        &names,
    )
    .unwrap();

    for name in &names {
        let f = full.indicators().series(name).unwrap();
        let t = truncated.indicators().series(name).unwrap();
        assert_eq!(f.len(), 320, "{name}: full length mismatch");
        assert_eq!(t.len(), truncated_len, "{name}: truncated length mismatch");

        for i in 0..truncated_len {
            match (t.get(i), f.get(i)) {
                (None, None) => {}
                (Some(a), Some(b)) => assert!(
                    (a - b).abs() <= 1e-9 * a.abs().max(1.0),
                    "{name}: look-ahead at bar {i} (truncated={a}, full={b})"
                ),
                (a, b) => panic!("{name}: definedness differs at bar {i} ({a:?} vs {b:?})"),
            }
        }
    }
}

#[test]
fn every_indicator_becomes_defined_at_its_warmup() {
    let registry = IndicatorRegistry::standard();
    let names: Vec<String> = registry.names().map(String::from).collect();
    let data = augment(
        BarSeries::new("TEST", make_test_bars(320)).unwrap(),
        &registry,
        &names,
    )
    .unwrap();

    for name in &names {
        let warmup = registry.warmup(name).unwrap();
        let series = data.indicators().series(name).unwrap();
        assert_eq!(
            series.first_defined(),
            Some(warmup),
            "{name}: first defined value is not at its warm-up boundary"
        );
        assert_eq!(
            series.defined_count(),
            320 - warmup,
            "{name}: gap after warm-up"
        );
    }
}
