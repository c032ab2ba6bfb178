//! Engine error types.
//!
//! Two kinds of failure leave [`BaseValidator::validate`](crate::BaseValidator::validate):
//!
//! - [`ConfigurationFault`]: a validator declared its fields wrongly. This is
//!   a server defect; it is raised the moment it is detected and is never
//!   mixed into the user-facing aggregate.
//! - [`ParameterValidation`]: one or more fields rejected the request. It
//!   carries every field's message, in declaration order, as structured data.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A defect in how a validator declares its fields or rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationFault {
    /// A rule list was declared with no rules.
    #[error("validator `{validator}`: field `{field}` declares an empty rule list")]
    EmptyRules { validator: String, field: String },

    /// A declared rule list contains an element that is not a rule.
    #[error(
        "validator `{validator}`: field `{field}` must contain only rules, element {index} is not a rule"
    )]
    MixedRules {
        validator: String,
        field: String,
        index: usize,
    },

    /// A declared member is not a rule list at all.
    #[error("validator `{validator}`: field `{field}` must be declared as a list of rules")]
    NotARuleList { validator: String, field: String },

    /// A rule names a check that does not exist.
    #[error("validator `{validator}`: field `{field}` uses unknown check `{check}`")]
    UnknownCheck {
        validator: String,
        field: String,
        check: String,
    },

    /// A rule declaration or its options are malformed or contradictory.
    #[error("validator `{validator}`: field `{field}` has invalid options for `{check}`: {reason}")]
    InvalidOptions {
        validator: String,
        field: String,
        check: String,
        reason: String,
    },

    /// More than one `isOptional` rule on the same field.
    #[error("validator `{validator}`: field `{field}` declares `isOptional` more than once")]
    DuplicateOptional { validator: String, field: String },

    /// An optional field was absent and its `isOptional` rule has no usable default.
    #[error("validator `{validator}`: optional field `{field}` has no default value")]
    MissingDefault { validator: String, field: String },

    /// The same field name was declared twice.
    #[error("validator `{validator}`: field `{field}` is declared more than once")]
    DuplicateField { validator: String, field: String },

    /// A custom check name does not follow the `validateXxx` convention.
    #[error(
        "validator `{validator}`: custom check `{field}` must be named `validate` followed by a capitalized identifier"
    )]
    InvalidCustomName { validator: String, field: String },

    /// The declaration document itself is not an object of fields.
    #[error("validator `{validator}`: field declarations must be an object, got {found}")]
    MalformedDeclarations { validator: String, found: String },
}

impl ConfigurationFault {
    /// Name of the validator whose declaration is at fault.
    pub fn validator(&self) -> &str {
        match self {
            Self::EmptyRules { validator, .. }
            | Self::MixedRules { validator, .. }
            | Self::NotARuleList { validator, .. }
            | Self::UnknownCheck { validator, .. }
            | Self::InvalidOptions { validator, .. }
            | Self::DuplicateOptional { validator, .. }
            | Self::MissingDefault { validator, .. }
            | Self::DuplicateField { validator, .. }
            | Self::InvalidCustomName { validator, .. }
            | Self::MalformedDeclarations { validator, .. } => validator,
        }
    }

    /// Name of the offending field, when the fault concerns one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::EmptyRules { field, .. }
            | Self::MixedRules { field, .. }
            | Self::NotARuleList { field, .. }
            | Self::UnknownCheck { field, .. }
            | Self::InvalidOptions { field, .. }
            | Self::DuplicateOptional { field, .. }
            | Self::MissingDefault { field, .. }
            | Self::DuplicateField { field, .. }
            | Self::InvalidCustomName { field, .. } => Some(field),
            Self::MalformedDeclarations { .. } => None,
        }
    }
}

/// Aggregate failure of one `validate()` call.
///
/// Serializes as `{"messages": [...]}` so the HTTP boundary can render it
/// directly as a client error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterValidation {
    messages: Vec<String>,
}

impl ParameterValidation {
    /// Creates the aggregate from per-field messages in declaration order.
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    /// Per-field failure messages, in declaration order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Consumes the error and returns the messages.
    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always `false` for an error produced by the engine.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl fmt::Display for ParameterValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parameter validation failed with {} error(s)",
            self.messages.len()
        )?;
        for (i, message) in self.messages.iter().enumerate() {
            write!(f, "\n  {}. {}", i + 1, message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParameterValidation {}

/// Everything `validate()` can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationFault),

    #[error(transparent)]
    Parameter(#[from] ParameterValidation),
}

impl Error {
    /// Returns the aggregate when the request itself was rejected.
    pub fn as_parameter(&self) -> Option<&ParameterValidation> {
        match self {
            Self::Parameter(err) => Some(err),
            Self::Configuration(_) => None,
        }
    }

    /// Returns the fault when a validator declaration is broken.
    pub fn as_configuration(&self) -> Option<&ConfigurationFault> {
        match self {
            Self::Configuration(fault) => Some(fault),
            Self::Parameter(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fault_names_validator_and_field() {
        let fault = ConfigurationFault::MixedRules {
            validator: "RegisterValidator".into(),
            field: "email".into(),
            index: 1,
        };
        assert_eq!(fault.validator(), "RegisterValidator");
        assert_eq!(fault.field(), Some("email"));
        let text = fault.to_string();
        assert!(text.contains("RegisterValidator"));
        assert!(text.contains("email"));
    }

    #[test]
    fn malformed_declarations_have_no_field() {
        let fault = ConfigurationFault::MalformedDeclarations {
            validator: "V".into(),
            found: "array".into(),
        };
        assert_eq!(fault.field(), None);
    }

    #[test]
    fn aggregate_serializes_as_message_list() {
        let err = ParameterValidation::new(vec!["a".into(), "b".into()]);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({ "messages": ["a", "b"] })
        );
        assert_eq!(
            err.to_string(),
            "parameter validation failed with 2 error(s)\n  1. a\n  2. b"
        );
    }

    #[test]
    fn error_accessors() {
        let err = Error::from(ParameterValidation::new(vec!["x".into()]));
        assert_eq!(err.as_parameter().map(ParameterValidation::len), Some(1));
        assert!(err.as_configuration().is_none());
    }
}
