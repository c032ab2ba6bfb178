//! Core trait for the check kinds
//!
//! Every built-in check implements [`Validate`]; the rule layer dispatches
//! to it after stringifying the raw request value.

// ============================================================================
// CORE VALIDATOR TRAIT
// ============================================================================

/// The trait that all built-in checks implement.
///
/// Generic over the input type so a check states exactly what it inspects.
/// Every check the rule layer dispatches to works on `str`, because raw
/// request values are stringified before they are checked.
///
/// # Examples
///
/// ```rust
/// use sieve_validator::foundation::{Validate, ValidationError};
///
/// struct NotBlank;
///
/// impl Validate for NotBlank {
///     type Input = str;
///
///     fn validate(&self, input: &Self::Input) -> Result<(), ValidationError> {
///         if input.trim().is_empty() {
///             Err(ValidationError::new("not_blank", "must not be blank"))
///         } else {
///             Ok(())
///         }
///     }
/// }
///
/// assert!(NotBlank.validate("x").is_ok());
/// assert!(NotBlank.validate("  ").is_err());
/// ```
pub trait Validate {
    /// The type of input being validated.
    ///
    /// Use `?Sized` to allow validation of unsized types like `str`.
    type Input: ?Sized;

    /// Validates the input value.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if validation succeeds
    /// * `Err(ValidationError)` if validation fails
    fn validate(&self, input: &Self::Input) -> Result<(), crate::foundation::ValidationError>;

    /// Returns `true` when the input passes.
    fn is_valid(&self, input: &Self::Input) -> bool {
        self.validate(input).is_ok()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ValidationError;

    struct AlwaysValid;

    impl Validate for AlwaysValid {
        type Input = str;

        fn validate(&self, _input: &Self::Input) -> Result<(), ValidationError> {
            Ok(())
        }
    }

    struct AlwaysFails;

    impl Validate for AlwaysFails {
        type Input = str;

        fn validate(&self, _input: &Self::Input) -> Result<(), ValidationError> {
            Err(ValidationError::new("always_fails", "Always fails"))
        }
    }

    #[test]
    fn test_validator_trait() {
        assert!(AlwaysValid.validate("test").is_ok());
        assert!(AlwaysValid.is_valid("test"));
    }

    #[test]
    fn test_is_valid_on_failure() {
        assert!(!AlwaysFails.is_valid("test"));
        let dyn_check: &dyn Validate<Input = str> = &AlwaysFails;
        assert_eq!(dyn_check.validate("x").unwrap_err().code, "always_fails");
    }
}
