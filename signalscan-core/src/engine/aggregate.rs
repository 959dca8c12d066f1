//! Result aggregation.

use std::collections::HashSet;

use super::scanner::Occurrence;

/// Merge per-instrument occurrence lists into the external order:
/// `occurrence_date` descending, then `instrument_id` descending.
///
/// The sort is stable, so events tied on both keys keep their emission
/// (catalog) order. Only exact duplicate rows are removed.
pub fn aggregate(batches: Vec<Vec<Occurrence>>) -> Vec<Occurrence> {
    let mut all: Vec<Occurrence> = batches.into_iter().flatten().collect();

    all.sort_by(|a, b| {
        b.occurrence_date
            .cmp(&a.occurrence_date)
            .then_with(|| b.instrument_id.cmp(&a.instrument_id))
    });

    let mut seen = HashSet::new();
    all.retain(|occ| seen.insert(occ.clone()));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn occ(instrument: &str, signal: &str, day: u32) -> Occurrence {
        Occurrence {
            instrument_id: instrument.into(),
            signal_name: signal.into(),
            occurrence_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        }
    }

    #[test]
    fn sorts_by_date_then_instrument_descending() {
        let merged = aggregate(vec![
            vec![occ("AAA", "s1", 1), occ("AAA", "s1", 3)],
            vec![occ("BBB", "s1", 1), occ("CCC", "s2", 2)],
        ]);
        let keys: Vec<(&str, u32)> = merged
            .iter()
            .map(|o| {
                use chrono::Datelike;
                (o.instrument_id.as_str(), o.occurrence_date.day())
            })
            .collect();
        assert_eq!(keys, vec![("AAA", 3), ("CCC", 2), ("BBB", 1), ("AAA", 1)]);
    }

    #[test]
    fn full_ties_keep_emission_order() {
        let merged = aggregate(vec![vec![occ("AAA", "second", 1), occ("AAA", "first", 1)]]);
        let names: Vec<&str> = merged.iter().map(|o| o.signal_name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn only_exact_duplicates_are_removed() {
        let merged = aggregate(vec![
            vec![occ("AAA", "s1", 1), occ("AAA", "s2", 1)],
            vec![occ("AAA", "s1", 1)],
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn empty_input() {
        assert!(aggregate(Vec::new()).is_empty());
    }
}
