//! String length validators
//!
//! Length is measured in Unicode scalar values (chars), so a multi-byte
//! character counts once.

use crate::foundation::{Validate, ValidationError};

// ============================================================================
// LENGTH RANGE
// ============================================================================

/// Validates that a string length is within a range.
///
/// The upper bound is optional; `isLength` with only `min` set accepts any
/// string at least that long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LengthRange {
    /// Minimum length (inclusive).
    pub min: usize,
    /// Maximum length (inclusive), unbounded when `None`.
    pub max: Option<usize>,
}

impl LengthRange {
    /// Creates a new length range validator.
    ///
    /// Returns an error if `min > max`.
    pub fn new(min: usize, max: Option<usize>) -> Result<Self, ValidationError> {
        if max.is_some_and(|max| min > max) {
            return Err(ValidationError::new("invalid_range", "min must be <= max"));
        }
        Ok(Self { min, max })
    }
}

impl Validate for LengthRange {
    type Input = str;

    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError> {
        let len = input.chars().count();
        if len >= self.min && self.max.is_none_or(|max| len <= max) {
            Ok(())
        } else {
            Err(ValidationError::out_of_range(Some(self.min), self.max, len)
                .with_param("unit", "chars"))
        }
    }
}

/// Creates a length range validator.
pub fn length_range(min: usize, max: Option<usize>) -> Result<LengthRange, ValidationError> {
    LengthRange::new(min, max)
}

// ============================================================================
// TESTS
// ============================================================================
