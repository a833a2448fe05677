//! Optional numeric measurement with absence-propagating arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};

/// A concentration value that may be missing.
///
/// Any arithmetic touching a missing operand yields a missing result.
/// Division by zero and non-finite results are also missing, so a
/// `Measure` never holds NaN or an infinity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measure(Option<f64>);

impl Measure {
    /// The missing value.
    pub const MISSING: Measure = Measure(None);

    /// Wrap a number; non-finite input becomes missing.
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Measure(Some(value))
        } else {
            Measure(None)
        }
    }

    /// Coerce text to a measure.
    ///
    /// Surrounding whitespace is ignored. Anything that does not parse as a
    /// finite number (detection-limit markers, blanks, `NaN`) is missing.
    pub fn parse(text: &str) -> Self {
        text.trim()
            .parse::<f64>()
            .map(Measure::new)
            .unwrap_or(Measure::MISSING)
    }

    /// Numeric value, if present.
    #[inline]
    pub fn value(self) -> Option<f64> {
        self.0
    }

    #[inline]
    pub fn is_missing(self) -> bool {
        self.0.is_none()
    }

    /// Zero-valued measures count as zero; missing ones do not.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == Some(0.0)
    }

    fn zip_with(self, rhs: Measure, f: impl FnOnce(f64, f64) -> f64) -> Measure {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Measure::new(f(a, b)),
            _ => Measure::MISSING,
        }
    }
}

impl From<f64> for Measure {
    fn from(value: f64) -> Self {
        Measure::new(value)
    }
}

impl From<Option<f64>> for Measure {
    fn from(value: Option<f64>) -> Self {
        value.map(Measure::new).unwrap_or(Measure::MISSING)
    }
}

impl Add for Measure {
    type Output = Measure;

    fn add(self, rhs: Measure) -> Measure {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for Measure {
    type Output = Measure;

    fn sub(self, rhs: Measure) -> Measure {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul for Measure {
    type Output = Measure;

    fn mul(self, rhs: Measure) -> Measure {
        self.zip_with(rhs, |a, b| a * b)
    }
}

impl Div for Measure {
    type Output = Measure;

    fn div(self, rhs: Measure) -> Measure {
        if rhs.is_zero() {
            return Measure::MISSING;
        }
        self.zip_with(rhs, |a, b| a / b)
    }
}

/// Poisoning sum: a single missing term makes the total missing.
impl Sum for Measure {
    fn sum<I: Iterator<Item = Measure>>(iter: I) -> Measure {
        iter.fold(Measure::new(0.0), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Measure> for Measure {
    fn sum<I: Iterator<Item = &'a Measure>>(iter: I) -> Measure {
        iter.copied().sum()
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "NA"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(Measure::parse("700000").value(), Some(700000.0));
        assert_eq!(Measure::parse("  12.5 ").value(), Some(12.5));
        assert_eq!(Measure::parse("1e3").value(), Some(1000.0));
    }

    #[test]
    fn test_parse_placeholder_is_missing() {
        assert!(Measure::parse("<LOD").is_missing());
        assert!(Measure::parse("n.d.").is_missing());
        assert!(Measure::parse("").is_missing());
        assert!(Measure::parse("NaN").is_missing());
        assert!(Measure::parse("inf").is_missing());
    }

    #[test]
    fn test_arithmetic_propagates_missing() {
        let a = Measure::new(10.0);
        let m = Measure::MISSING;

        assert!((a + m).is_missing());
        assert!((m - a).is_missing());
        assert!((a * m).is_missing());
        assert!((m / a).is_missing());
        assert_relative_eq!((a * Measure::new(3.0)).value().unwrap(), 30.0);
        assert_relative_eq!((a - Measure::new(4.0)).value().unwrap(), 6.0);
    }

    #[test]
    fn test_division_by_zero_is_missing() {
        let q = Measure::new(5.0) / Measure::new(0.0);
        assert!(q.is_missing());

        let q = Measure::new(0.0) / Measure::new(0.0);
        assert!(q.is_missing());
    }

    #[test]
    fn test_sum_poisoned_by_missing() {
        let values = [Measure::new(1.0), Measure::MISSING, Measure::new(2.0)];
        let total: Measure = values.iter().sum();
        assert!(total.is_missing());

        let values = [Measure::new(1.0), Measure::new(2.0)];
        let total: Measure = values.iter().sum();
        assert_eq!(total.value(), Some(3.0));
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Measure = std::iter::empty::<Measure>().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_non_finite_constructor() {
        assert!(Measure::new(f64::NAN).is_missing());
        assert!(Measure::from(f64::INFINITY).is_missing());
        assert!(Measure::from(None).is_missing());
        assert_eq!(Measure::from(Some(2.0)).value(), Some(2.0));
    }
}
