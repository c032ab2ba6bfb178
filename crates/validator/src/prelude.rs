//! Prelude module for convenient imports.
//!
//! `use sieve_validator::prelude::*;` brings in everything needed to declare
//! and run a validator.

// ============================================================================
// ENGINE
// ============================================================================

pub use crate::base::{BaseValidator, Declare, Validated};
pub use crate::config::ValidatorConfig;
pub use crate::discovery::{CustomResult, Schema, SchemaBuilder};
pub use crate::error::{ConfigurationFault, Error, ParameterValidation};
pub use crate::params::{Namespace, Params, RawRequest, RequestSource};
pub use crate::rule::{Check, Rule};

// ============================================================================
// CHECK KINDS
// ============================================================================

pub use crate::foundation::{Validate, ValidationError};
pub use crate::validators::PasswordPolicy;
