//! Numeric string validators
//!
//! Request values arrive as text; these checks decide whether the text is an
//! integer or a float, optionally within bounds.

use std::sync::LazyLock;

use crate::foundation::{Validate, ValidationError};

static INT_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[-+]?[0-9]+$").unwrap());

static FLOAT_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[-+]?(?:[0-9]+)?(?:\.[0-9]*)?(?:[eE][-+]?[0-9]+)?$").unwrap()
});

fn check_bounds<T: PartialOrd + Copy>(min: Option<T>, max: Option<T>) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => {
            Err(ValidationError::new("invalid_range", "min must be <= max"))
        }
        _ => Ok(()),
    }
}

fn within<T: PartialOrd + Copy>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

// ============================================================================
// INTEGER
// ============================================================================

/// Validates that a string is an integer, optionally within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IsInt {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IsInt {
    /// Returns an error if both bounds are set and `min > max`.
    pub fn new(min: Option<i64>, max: Option<i64>) -> Result<Self, ValidationError> {
        check_bounds(min, max)?;
        Ok(Self { min, max })
    }
}

impl Validate for IsInt {
    type Input = str;

    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError> {
        if !INT_REGEX.is_match(input) {
            return Err(ValidationError::invalid_format("integer"));
        }
        if self.min.is_none() && self.max.is_none() {
            return Ok(());
        }
        match input.parse::<i64>() {
            Ok(value) if within(value, self.min, self.max) => Ok(()),
            Ok(value) => Err(ValidationError::out_of_range(self.min, self.max, value)),
            Err(_) => Err(ValidationError::new("out_of_range", "Integer does not fit in 64 bits")),
        }
    }
}

/// Creates an unbounded integer validator.
#[must_use]
pub fn is_int() -> IsInt {
    IsInt::default()
}

// ============================================================================
// FLOAT
// ============================================================================

/// Validates that a string is a decimal or exponent-notation float,
/// optionally within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IsFloat {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl IsFloat {
    /// Returns an error if both bounds are set and `min > max`.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Self, ValidationError> {
        check_bounds(min, max)?;
        Ok(Self { min, max })
    }
}

impl Validate for IsFloat {
    type Input = str;

    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError> {
        let parsed = match input {
            "" | "." | "-" | "+" => None,
            _ if FLOAT_REGEX.is_match(input) => input.parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(value) if within(value, self.min, self.max) => Ok(()),
            Some(value) => Err(ValidationError::out_of_range(self.min, self.max, value)),
            None => Err(ValidationError::invalid_format("float")),
        }
    }
}

/// Creates an unbounded float validator.
#[must_use]
pub fn is_float() -> IsFloat {
    IsFloat::default()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", true)]
    #[case("-7", true)]
    #[case("+3", true)]
    #[case("007", true)]
    #[case("4.2", false)]
    #[case("", false)]
    #[case("abc", false)]
    #[case(" 1", false)]
    fn int_syntax(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(is_int().validate(input).is_ok(), ok);
    }

    #[test]
    fn int_bounds() {
        let positive = IsInt::new(Some(1), None).unwrap();
        assert!(positive.validate("1").is_ok());
        assert_eq!(positive.validate("0").unwrap_err().code, "out_of_range");
        assert!(positive.validate("99999999999999999999999").is_err());
        assert!(is_int().validate("99999999999999999999999").is_ok());
    }

    #[test]
    fn int_invalid_bounds() {
        assert!(IsInt::new(Some(5), Some(1)).is_err());
    }

    #[rstest]
    #[case("1.5", true)]
    #[case("-0.25", true)]
    #[case(".5", true)]
    #[case("1.", true)]
    #[case("1e3", true)]
    #[case("10", true)]
    #[case(".", false)]
    #[case("-", false)]
    #[case("e5", false)]
    #[case("1.2.3", false)]
    #[case("NaN", false)]
    fn float_syntax(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(is_float().validate(input).is_ok(), ok);
    }

    #[test]
    fn float_bounds() {
        let unit = IsFloat::new(Some(0.0), Some(1.0)).unwrap();
        assert!(unit.validate("0.5").is_ok());
        assert!(unit.validate("1.5").is_err());
        assert!(IsFloat::new(Some(2.0), Some(1.0)).is_err());
    }
}
