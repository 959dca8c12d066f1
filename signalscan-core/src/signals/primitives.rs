//! Crossing primitives shared by every signal.
//!
//! A crossing compares two operands at bars `i-1` and `i`. Thresholds are the
//! special case where one operand is a constant.

use serde::{Deserialize, Serialize};

/// Direction of a crossing: `a` moving above `b` (Up) or below it (Down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

/// Which bar an exact tie belongs to.
///
/// - `Before`: equality at `i-1` still counts as "not yet crossed"; the
///   current bar must be strictly past. Series crossings and entry thresholds.
/// - `After`: the previous bar must be strictly on the starting side; the
///   current bar may land on the line. Exit thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tie {
    #[default]
    Before,
    After,
}

/// Whether `a` crossed `b` between the previous and the current bar.
pub fn crossed(
    prev_a: f64,
    prev_b: f64,
    curr_a: f64,
    curr_b: f64,
    direction: Direction,
    tie: Tie,
) -> bool {
    match (direction, tie) {
        (Direction::Up, Tie::Before) => prev_a <= prev_b && curr_a > curr_b,
        (Direction::Down, Tie::Before) => prev_a >= prev_b && curr_a < curr_b,
        (Direction::Up, Tie::After) => prev_a < prev_b && curr_a >= curr_b,
        (Direction::Down, Tie::After) => prev_a > prev_b && curr_a <= curr_b,
    }
}

/// Whether `value` crossed a constant `threshold`.
pub fn crossed_threshold(
    prev: f64,
    curr: f64,
    threshold: f64,
    direction: Direction,
    tie: Tie,
) -> bool {
    crossed(prev, threshold, curr, threshold, direction, tie)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_cross_up() {
        assert!(crossed(1.0, 2.0, 3.0, 2.0, Direction::Up, Tie::Before));
        assert!(!crossed(3.0, 2.0, 4.0, 2.0, Direction::Up, Tie::Before));
    }

    #[test]
    fn tie_before_previous_equal_counts_as_not_crossed() {
        // Flat tie at i-1, strictly above at i → fires
        assert!(crossed(2.0, 2.0, 2.5, 2.0, Direction::Up, Tie::Before));
        // Landing exactly on the line does not fire
        assert!(!crossed(1.0, 2.0, 2.0, 2.0, Direction::Up, Tie::Before));
    }

    #[test]
    fn tie_after_landing_on_line_fires() {
        assert!(crossed_threshold(29.0, 30.0, 30.0, Direction::Up, Tie::After));
        assert!(!crossed_threshold(30.0, 31.0, 30.0, Direction::Up, Tie::After));
        assert!(crossed_threshold(71.0, 70.0, 70.0, Direction::Down, Tie::After));
    }

    #[test]
    fn threshold_fires_once_for_monotonic_series() {
        let values: Vec<f64> = (0..20).map(|i| 20.0 + i as f64).collect();
        let fires: Vec<usize> = (1..values.len())
            .filter(|&i| {
                crossed_threshold(values[i - 1], values[i], 30.0, Direction::Up, Tie::Before)
            })
            .collect();
        // 30.0 at index 10, 31.0 at index 11 → strict crossing at 11
        assert_eq!(fires, vec![11]);
    }

    #[test]
    fn up_and_down_never_fire_together() {
        let cases = [
            (1.0, 2.0, 3.0, 2.0),
            (2.0, 2.0, 2.0, 2.0),
            (3.0, 2.0, 1.0, 2.0),
            (2.0, 2.0, 1.0, 2.0),
        ];
        for tie in [Tie::Before, Tie::After] {
            for (pa, pb, ca, cb) in cases {
                let up = crossed(pa, pb, ca, cb, Direction::Up, tie);
                let down = crossed(pa, pb, ca, cb, Direction::Down, tie);
                assert!(!(up && down));
            }
        }
    }
}
