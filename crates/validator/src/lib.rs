//! # sieve-validator
//!
//! Declarative validation of untrusted request parameters.
//!
//! A validator declares, per field, a list of [`Rule`]s or a custom async
//! check. [`BaseValidator`] snapshots the request's four namespaces (`query`,
//! `body`, `path`, `header`), resolves every field, coerces the legal values
//! and either returns a sanitized [`Validated`] view or one
//! [`ParameterValidation`] error listing every rejected field.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sieve_validator::prelude::*;
//!
//! # futures::executor::block_on(async {
//! let schema = Schema::builder("RegisterValidator")
//!     .field("username", [Rule::length(2, Some(20), "username must be 2-20 characters")])
//!     .field("email", [Rule::email("invalid email")])
//!     .build()?;
//!
//! let request = RawRequest::new().body(json!({ "username": "ab", "email": "a@b.com" }));
//! let validated = BaseValidator::new(&request, &schema)?.validate().await?;
//! assert_eq!(validated.get("body.username"), Some(&json!("ab")));
//! # Ok::<(), Error>(())
//! # }).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`foundation`]: the [`Validate`](foundation::Validate) trait and
//!   [`ValidationError`](foundation::ValidationError)
//! - [`validators`]: built-in check kinds over `str`
//! - [`rule`]: [`Rule`] and the closed [`Check`] set
//! - [`discovery`]: ordered [`Schema`]s, typed or loaded from JSON
//! - [`field`]: resolution and coercion of one rule-list field
//! - [`params`]: request snapshots and dotted-path lookup
//! - [`base`]: the orchestrator
//!
//! New check kinds are written with the [`validator!`] macro.

pub mod base;
pub mod config;
pub mod discovery;
pub mod error;
pub mod field;
pub mod foundation;
mod macros;
pub mod params;
pub mod prelude;
pub mod rule;
pub mod validators;

pub use base::{BaseValidator, Declare, Validated};
pub use config::{ConfigError, ValidatorConfig};
pub use discovery::{CustomCheck, CustomResult, FieldSpec, Schema, SchemaBuilder};
pub use error::{ConfigurationFault, Error, ParameterValidation};
pub use field::{FieldOutcome, ValidateField};
pub use params::{Namespace, Params, RawRequest, RequestSource};
pub use rule::{Check, Coercion, Rule, RuleFailure};
