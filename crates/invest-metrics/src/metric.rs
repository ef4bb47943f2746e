//! The [`Metric`] value type and guarded ratio helpers.

use serde::{Deserialize, Serialize};

/// A computed financial figure: either a finite number or unavailable.
///
/// `Unavailable` means the figure cannot be computed from the data given. It is
/// never interchangeable with zero. Serialized as a JSON number or `null`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Metric {
    /// A finite value.
    Value(f64),
    /// Cannot be computed from the available data.
    #[default]
    Unavailable,
}

impl Metric {
    /// Wraps a value, turning NaN and infinities into [`Metric::Unavailable`].
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self::Value(value)
        } else {
            Self::Unavailable
        }
    }

    /// Wraps an optional value; `None` and non-finite values are unavailable.
    #[must_use]
    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Self::Unavailable, Self::new)
    }

    /// Returns the value if available.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    /// Returns true if a value is present.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Applies `f` to an available value; the result is re-checked for finiteness.
    #[must_use]
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Value(v) => Self::new(f(v)),
            Self::Unavailable => Self::Unavailable,
        }
    }

    /// Returns `self` if available, otherwise `other`.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        match self {
            Self::Value(_) => self,
            Self::Unavailable => other,
        }
    }
}

impl From<Option<f64>> for Metric {
    fn from(value: Option<f64>) -> Self {
        Self::from_option(value)
    }
}

impl From<Metric> for Option<f64> {
    fn from(metric: Metric) -> Self {
        metric.value()
    }
}

/// Drops non-finite inputs so they read as missing.
pub(crate) fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// `numerator / denominator`, unavailable if either is missing or the denominator is zero.
#[must_use]
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Metric {
    match (finite(numerator), finite(denominator)) {
        (Some(n), Some(d)) if d != 0.0 => Metric::new(n / d),
        _ => Metric::Unavailable,
    }
}

/// `numerator / denominator`, unavailable unless the denominator is strictly positive.
///
/// For ratios where a negative base (negative equity, negative EBITDA) would flip
/// the meaning of the result.
#[must_use]
pub fn ratio_over_positive(numerator: Option<f64>, denominator: Option<f64>) -> Metric {
    match (finite(numerator), finite(denominator)) {
        (Some(n), Some(d)) if d > 0.0 => Metric::new(n / d),
        _ => Metric::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_is_unavailable() {
        assert_eq!(Metric::new(f64::INFINITY), Metric::Unavailable);
        assert_eq!(Metric::new(f64::NEG_INFINITY), Metric::Unavailable);
        assert_eq!(Metric::new(f64::NAN), Metric::Unavailable);
        assert_eq!(Metric::new(1.5), Metric::Value(1.5));
        assert_eq!(Metric::from_option(None), Metric::Unavailable);
    }

    #[test]
    fn test_ratio_guards() {
        assert_eq!(ratio(Some(10.0), Some(4.0)), Metric::Value(2.5));
        assert_eq!(ratio(Some(10.0), Some(0.0)), Metric::Unavailable);
        assert_eq!(ratio(Some(10.0), None), Metric::Unavailable);
        assert_eq!(ratio(None, Some(2.0)), Metric::Unavailable);
        assert_eq!(ratio(Some(-10.0), Some(4.0)), Metric::Value(-2.5));
        assert_eq!(ratio(Some(1.0), Some(f64::INFINITY)), Metric::Unavailable);

        assert_eq!(ratio_over_positive(Some(10.0), Some(-5.0)), Metric::Unavailable);
        assert_eq!(ratio_over_positive(Some(10.0), Some(0.0)), Metric::Unavailable);
        assert_eq!(ratio_over_positive(Some(-10.0), Some(5.0)), Metric::Value(-2.0));
    }

    #[test]
    fn test_serde_as_nullable_number() {
        let json = serde_json::to_string(&[Metric::Value(0.25), Metric::Unavailable]).unwrap();
        assert_eq!(json, "[0.25,null]");

        let back: Vec<Metric> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Metric::Value(0.25), Metric::Unavailable]);
    }

    #[test]
    fn test_map_and_or() {
        assert_eq!(Metric::Value(2.0).map(|v| v * 3.0), Metric::Value(6.0));
        assert_eq!(Metric::Value(0.0).map(|v| 1.0 / v), Metric::Unavailable);
        assert_eq!(Metric::Unavailable.or(Metric::Value(1.0)), Metric::Value(1.0));
        assert_eq!(Metric::Value(2.0).or(Metric::Value(1.0)), Metric::Value(2.0));
    }
}
