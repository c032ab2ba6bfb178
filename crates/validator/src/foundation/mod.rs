//! Core check types and traits
//!
//! This module contains the building blocks every built-in check relies on:
//!
//! - **Traits**: `Validate`
//! - **Errors**: `ValidationError`
//!
//! Checks are generic over their input type and return a structured
//! [`ValidationError`] describing the rejection:
//!
//! ```rust
//! use sieve_validator::foundation::Validate;
//! use sieve_validator::validators::email;
//!
//! assert!(email().validate("user@example.com").is_ok());
//! assert_eq!(email().validate("nope").unwrap_err().code, "invalid_format");
//! ```

pub mod error;
pub mod traits;

pub use error::ValidationError;
pub use traits::Validate;

/// A check result using the standard `ValidationError`.
pub type ValidationResult<T> = Result<T, ValidationError>;
