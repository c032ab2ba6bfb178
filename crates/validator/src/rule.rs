//! Rules: one configurable check bound to a field, with its failure message.
//!
//! The set of checks is closed ([`Check`]), so a typo in a check name is a
//! compile error in typed declarations and a [`ConfigurationFault`] when
//! declarations are loaded from data, never a silently failing rule.
//!
//! [`ConfigurationFault`]: crate::ConfigurationFault

use std::borrow::Cow;

use serde_json::Value;

use crate::foundation::{Validate, ValidationError, ValidationResult};
use crate::validators::{
    Alphanumeric, Email, IsBoolean, IsFloat, IsInt, LengthRange, Matches, PasswordPolicy,
    StrongPassword, Url,
};

/// Target type a passing value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coercion {
    Integer,
    Float,
    Boolean,
}

/// The closed set of checks a [`Rule`] can run.
#[derive(Debug, Clone)]
pub enum Check {
    /// Sentinel marking the field as not required. Always passes.
    Optional,
    Length(LengthRange),
    Email(Email),
    StrongPassword(StrongPassword),
    Int(IsInt),
    Float(IsFloat),
    Boolean(IsBoolean),
    Url(Url),
    Alphanumeric(Alphanumeric),
    Matches(Matches),
}

impl Check {
    /// Wire name used in data-driven declarations.
    pub const fn name(&self) -> &'static str {
        match self {
            Check::Optional => "isOptional",
            Check::Length(_) => "isLength",
            Check::Email(_) => "isEmail",
            Check::StrongPassword(_) => "isStrongPassword",
            Check::Int(_) => "isInt",
            Check::Float(_) => "isFloat",
            Check::Boolean(_) => "isBoolean",
            Check::Url(_) => "isURL",
            Check::Alphanumeric(_) => "isAlphanumeric",
            Check::Matches(_) => "matches",
        }
    }

    /// The coercion a passing value undergoes, if this check implies a type.
    pub const fn coercion(&self) -> Option<Coercion> {
        match self {
            Check::Int(_) => Some(Coercion::Integer),
            Check::Float(_) => Some(Coercion::Float),
            Check::Boolean(_) => Some(Coercion::Boolean),
            _ => None,
        }
    }

    /// Re-checks option invariants. Typed constructors build options without
    /// validating them; schema construction calls this.
    pub fn verify(&self) -> ValidationResult<()> {
        match self {
            Check::Length(range) => LengthRange::new(range.min, range.max).map(drop),
            Check::Int(int) => IsInt::new(int.min, int.max).map(drop),
            Check::Float(float) => IsFloat::new(float.min, float.max).map(drop),
            _ => Ok(()),
        }
    }

    fn run(&self, input: &str) -> ValidationResult<()> {
        match self {
            Check::Optional => Ok(()),
            Check::Length(v) => v.validate(input),
            Check::Email(v) => v.validate(input),
            Check::StrongPassword(v) => v.validate(input),
            Check::Int(v) => v.validate(input),
            Check::Float(v) => v.validate(input),
            Check::Boolean(v) => v.validate(input),
            Check::Url(v) => v.validate(input),
            Check::Alphanumeric(v) => v.validate(input),
            Check::Matches(v) => v.validate(input),
        }
    }
}

/// Why a rule rejected a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure<'r> {
    /// The rule's own message, `None` when it was declared without one.
    pub message: Option<&'r str>,
    /// The check's structured diagnosis.
    pub cause: ValidationError,
}

/// One named, configurable check plus its failure message.
///
/// Immutable once constructed.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use sieve_validator::Rule;
///
/// let rule = Rule::length(2, Some(20), "username must be 2-20 characters");
/// assert!(rule.validate(&json!("ab")).is_ok());
/// assert!(rule.validate(&json!("a")).is_err());
///
/// let optional = Rule::optional(json!(1));
/// assert!(optional.is_optional());
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    check: Check,
    message: Cow<'static, str>,
    default: Value,
}

impl Rule {
    pub fn new(check: Check, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            check,
            message: message.into(),
            default: Value::Null,
        }
    }

    /// The `isOptional` sentinel carrying the field's default value.
    pub fn optional(default: impl Into<Value>) -> Self {
        Self {
            check: Check::Optional,
            message: Cow::Borrowed(""),
            default: default.into(),
        }
    }

    pub fn length(min: usize, max: Option<usize>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Check::Length(LengthRange { min, max }), message)
    }

    pub fn email(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Check::Email(Email), message)
    }

    /// Strong password with the default policy.
    pub fn strong_password(message: impl Into<Cow<'static, str>>) -> Self {
        Self::strong_password_with(PasswordPolicy::default(), message)
    }

    pub fn strong_password_with(
        policy: PasswordPolicy,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(Check::StrongPassword(StrongPassword::new(policy)), message)
    }

    pub fn int(min: Option<i64>, max: Option<i64>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Check::Int(IsInt { min, max }), message)
    }

    pub fn float(min: Option<f64>, max: Option<f64>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Check::Float(IsFloat { min, max }), message)
    }

    pub fn boolean(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Check::Boolean(IsBoolean { loose: false }), message)
    }

    pub fn url(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Check::Url(Url), message)
    }

    pub fn alphanumeric(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Check::Alphanumeric(Alphanumeric), message)
    }

    /// Regex rule. Fails when `pattern` does not compile.
    pub fn matches(
        pattern: &str,
        message: impl Into<Cow<'static, str>>,
    ) -> Result<Self, regex::Error> {
        Ok(Self::new(Check::Matches(Matches::new(pattern)?), message))
    }

    /// Sets the default value carried by this rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn check(&self) -> &Check {
        &self.check
    }

    pub fn name(&self) -> &'static str {
        self.check.name()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.check, Check::Optional)
    }

    /// Runs the check against the stringified value. The sentinel always passes.
    pub fn validate(&self, value: &Value) -> Result<(), RuleFailure<'_>> {
        if self.is_optional() {
            return Ok(());
        }
        self.check
            .run(&stringify(value))
            .map_err(|cause| RuleFailure {
                message: Some(self.message.as_ref()).filter(|m| !m.is_empty()),
                cause,
            })
    }
}

/// Renders a JSON value the way string concatenation would in the clients
/// these requests come from: numbers without a trailing `.0`, arrays
/// comma-joined, objects as `[object Object]`.
pub fn stringify(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed("null"),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                Cow::Owned(format!("{f:.0}"))
            }
            _ => Cow::Owned(n.to_string()),
        },
        Value::Array(items) => Cow::Owned(
            items
                .iter()
                .map(|item| match item {
                    Value::Null => Cow::Borrowed(""),
                    other => stringify(other),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Cow::Borrowed("[object Object]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn optional_always_passes() {
        let rule = Rule::optional(json!("fallback"));
        assert!(rule.validate(&json!(null)).is_ok());
        assert!(rule.validate(&json!("anything")).is_ok());
        assert_eq!(rule.default_value(), &json!("fallback"));
        assert_eq!(rule.name(), "isOptional");
    }

    #[test]
    fn failure_carries_message_and_cause() {
        let rule = Rule::email("bad email");
        let failure = rule.validate(&json!("nope")).unwrap_err();
        assert_eq!(failure.message, Some("bad email"));
        assert_eq!(failure.cause.code, "invalid_format");
    }

    #[test]
    fn empty_message_defers_to_fallback() {
        let rule = Rule::int(None, None, "");
        assert_eq!(rule.validate(&json!("x")).unwrap_err().message, None);
    }

    #[test]
    fn values_are_stringified_before_checking() {
        let rule = Rule::int(Some(1), None, "positive");
        assert!(rule.validate(&json!(5)).is_ok());
        assert!(rule.validate(&json!(0)).is_err());
        assert!(Rule::boolean("").validate(&json!(true)).is_ok());
        assert!(Rule::float(None, None, "").validate(&json!(2.5)).is_ok());
    }

    #[test]
    fn coercion_kinds() {
        assert_eq!(Rule::int(None, None, "").check().coercion(), Some(Coercion::Integer));
        assert_eq!(Rule::float(None, None, "").check().coercion(), Some(Coercion::Float));
        assert_eq!(Rule::boolean("").check().coercion(), Some(Coercion::Boolean));
        assert_eq!(Rule::email("").check().coercion(), None);
    }

    #[test]
    fn verify_catches_inverted_bounds() {
        assert!(Rule::length(5, Some(1), "").check().verify().is_err());
        assert!(Rule::int(Some(3), Some(2), "").check().verify().is_err());
        assert!(Rule::length(1, Some(5), "").check().verify().is_ok());
    }

    #[test]
    fn matches_requires_valid_pattern() {
        assert!(Rule::matches("(", "").is_err());
        let rule = Rule::matches(r"^[a-z]+$", "lowercase only").unwrap();
        assert!(rule.validate(&json!("abc")).is_ok());
    }

    #[rstest]
    #[case(json!("s"), "s")]
    #[case(json!(42), "42")]
    #[case(json!(-1.0), "-1")]
    #[case(json!(2.5), "2.5")]
    #[case(json!(true), "true")]
    #[case(json!(null), "null")]
    #[case(json!([1, null, "a"]), "1,,a")]
    #[case(json!({ "k": 1 }), "[object Object]")]
    fn stringify_cases(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(stringify(&value), expected);
    }
}
