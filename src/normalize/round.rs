//! Integer rendering of normalized values.

use crate::data::Measure;
use serde::{Deserialize, Serialize};

/// Rule for rounding a value to zero decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Ties go to the even neighbour (`0.5 -> 0`, `1.5 -> 2`).
    #[default]
    HalfEven,
    /// Ties go away from zero (`0.5 -> 1`, `-0.5 -> -1`).
    HalfAwayFromZero,
}

impl Rounding {
    /// Round a value to an integral float.
    pub fn apply(self, value: f64) -> f64 {
        let r = match self {
            Rounding::HalfEven => value.round_ties_even(),
            Rounding::HalfAwayFromZero => value.round(),
        };
        // Collapse -0.0 so it never renders as "-0".
        if r == 0.0 {
            0.0
        } else {
            r
        }
    }
}

/// Render a measure with zero decimal places.
///
/// Missing values render as `missing_marker`.
pub fn format_measure(value: Measure, rounding: Rounding, missing_marker: &str) -> String {
    match value.value() {
        Some(v) => format!("{:.0}", rounding.apply(v)),
        None => missing_marker.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(v: f64, rounding: Rounding) -> String {
        format_measure(Measure::new(v), rounding, "")
    }

    #[test]
    fn test_half_even() {
        assert_eq!(fmt(123456.4, Rounding::HalfEven), "123456");
        assert_eq!(fmt(123456.5, Rounding::HalfEven), "123456");
        assert_eq!(fmt(123457.5, Rounding::HalfEven), "123458");
        assert_eq!(fmt(123456.6, Rounding::HalfEven), "123457");
    }

    #[test]
    fn test_half_away_from_zero() {
        assert_eq!(fmt(123456.4, Rounding::HalfAwayFromZero), "123456");
        assert_eq!(fmt(123456.5, Rounding::HalfAwayFromZero), "123457");
        assert_eq!(fmt(-2.5, Rounding::HalfAwayFromZero), "-3");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(fmt(-0.4, Rounding::HalfEven), "0");
        assert_eq!(fmt(-0.4, Rounding::HalfAwayFromZero), "0");
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(format_measure(Measure::MISSING, Rounding::HalfEven, ""), "");
        assert_eq!(format_measure(Measure::MISSING, Rounding::HalfEven, "NA"), "NA");
    }

    #[test]
    fn test_large_values_not_scientific() {
        assert_eq!(fmt(1_000_000.0, Rounding::HalfEven), "1000000");
        assert_eq!(fmt(633333.333, Rounding::HalfEven), "633333");
    }
}
