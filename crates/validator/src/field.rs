//! Resolution of a single rule-list field.
//!
//! [`ValidateField`] turns a field's raw value (or its absence) and its rule
//! list into a [`FieldOutcome`]: either a coerced legal value or the joined
//! failure messages of every rule that rejected it.

use serde_json::{Number, Value};

use crate::config::ValidatorConfig;
use crate::error::ConfigurationFault;
use crate::rule::{Coercion, Rule, stringify};

/// Result of resolving one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// The field passed; carries its legal value.
    Pass(Value),
    /// The field failed; carries its user-facing message.
    Fail(String),
}

impl FieldOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, FieldOutcome::Pass(_))
    }

    pub fn legal_value(&self) -> Option<&Value> {
        match self {
            FieldOutcome::Pass(value) => Some(value),
            FieldOutcome::Fail(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FieldOutcome::Pass(_) => None,
            FieldOutcome::Fail(message) => Some(message),
        }
    }
}

/// Applies one field's rule list to its raw value.
#[derive(Debug, Clone, Copy)]
pub struct ValidateField<'a> {
    validator: &'a str,
    field: &'a str,
    rules: &'a [Rule],
    config: &'a ValidatorConfig,
}

impl<'a> ValidateField<'a> {
    pub fn new(
        validator: &'a str,
        field: &'a str,
        rules: &'a [Rule],
        config: &'a ValidatorConfig,
    ) -> Self {
        Self {
            validator,
            field,
            rules,
            config,
        }
    }

    /// Resolves the field. `None` means no namespace holds a value for it.
    ///
    /// An absent optional field whose `isOptional` rule carries no usable
    /// (non-null) default is a [`ConfigurationFault::MissingDefault`].
    pub fn validate(&self, value: Option<&Value>) -> Result<FieldOutcome, ConfigurationFault> {
        let Some(value) = value else {
            return self.resolve_absent();
        };

        let messages: Vec<&str> = self
            .rules
            .iter()
            .filter_map(|rule| rule.validate(value).err())
            .map(|failure| {
                tracing::trace!(
                    field = self.field,
                    code = %failure.cause.code,
                    "rule rejected value"
                );
                failure.message.unwrap_or(self.config.fallback_message.as_str())
            })
            .collect();

        if messages.is_empty() {
            Ok(FieldOutcome::Pass(coerce(self.rules, value)))
        } else {
            Ok(FieldOutcome::Fail(messages.join("\n")))
        }
    }

    fn resolve_absent(&self) -> Result<FieldOutcome, ConfigurationFault> {
        match self.rules.iter().find(|rule| rule.is_optional()) {
            Some(rule) if rule.default_value().is_null() => Err(ConfigurationFault::MissingDefault {
                validator: self.validator.to_owned(),
                field: self.field.to_owned(),
            }),
            Some(rule) => Ok(FieldOutcome::Pass(rule.default_value().clone())),
            None => Ok(FieldOutcome::Fail(self.config.required_message.clone())),
        }
    }
}

/// Computes the legal value of a passing field: the first rule implying a
/// type decides the coercion; without one the value is returned unchanged.
pub fn coerce(rules: &[Rule], value: &Value) -> Value {
    let coercion = rules.iter().find_map(|rule| rule.check().coercion());
    match coercion {
        Some(Coercion::Integer) => to_integer(value).unwrap_or_else(|| value.clone()),
        Some(Coercion::Float) => to_float(value).unwrap_or_else(|| value.clone()),
        Some(Coercion::Boolean) => Value::Bool(to_boolean(value)),
        None => value.clone(),
    }
}

fn to_integer(value: &Value) -> Option<Value> {
    let text = stringify(value);
    match text.trim().parse::<i64>() {
        Ok(int) => Some(Value::Number(int.into())),
        Err(_) => to_float(value),
    }
}

fn to_float(value: &Value) -> Option<Value> {
    stringify(value)
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Boolean cast used for `isBoolean` fields.
///
/// Strings are false when empty or spelling a negative (`0`, `false`, `no`,
/// `off`, any case, surrounding whitespace ignored) and true otherwise.
/// Numbers are true unless zero; null is false; arrays and objects are true.
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty()
                || ["0", "false", "no", "off"]
                    .iter()
                    .any(|negative| negative.eq_ignore_ascii_case(s)))
        }
        Value::Array(_) | Value::Object(_) => true,
    }
}
