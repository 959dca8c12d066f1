//! Bar and BarSeries: the market data units the engine consumes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::InstrumentId;

/// OHLCV bar for a single trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: positive prices, `low <= open,close <= high`.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.low > 0.0
    }
}

/// Structural violations of a bar series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar dates must be strictly increasing: {previous} is followed by {next} at index {index}")]
    NonIncreasingDate {
        index: usize,
        previous: NaiveDate,
        next: NaiveDate,
    },
}

/// Ordered, date-indexed bars for one instrument.
///
/// Dates are strictly increasing. Calendar gaps (weekends, holidays) are
/// expected and are not errors. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    instrument: InstrumentId,
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(instrument: impl Into<InstrumentId>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, pair) in bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::NonIncreasingDate {
                    index: index + 1,
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self {
            instrument: instrument.into(),
            bars,
        })
    }

    pub fn instrument(&self) -> &InstrumentId {
        &self.instrument
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Position of the bar dated `date`, if present.
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&date, |b| b.date).ok()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Close prices in series order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar(day: u32) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar(2).is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar(2);
        bar.open = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar(2);
        bar.high = 97.0; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_rejects_non_positive_price() {
        let mut bar = sample_bar(2);
        bar.low = 0.0;
        bar.open = 0.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn series_accepts_calendar_gaps() {
        // Friday → Monday
        let series = BarSeries::new("SPY", vec![sample_bar(5), sample_bar(8)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.position_of(sample_bar(8).date), Some(1));
        assert_eq!(series.position_of(sample_bar(6).date), None);
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let err = BarSeries::new("SPY", vec![sample_bar(2), sample_bar(3), sample_bar(3)]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NonIncreasingDate {
                index: 2,
                previous: sample_bar(3).date,
                next: sample_bar(3).date,
            }
        );
    }

    #[test]
    fn series_rejects_out_of_order_dates() {
        assert!(BarSeries::new("SPY", vec![sample_bar(4), sample_bar(3)]).is_err());
    }

    #[test]
    fn empty_series_is_valid() {
        let series = BarSeries::new("SPY", vec![]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.first_date(), None);
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar(2);
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
