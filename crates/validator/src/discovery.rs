//! Field discovery: the ordered schema of a validator.
//!
//! A validator declares its fields explicitly, in order, through
//! [`SchemaBuilder`]:
//!
//! - a **rule field** maps a request key to a non-empty list of [`Rule`]s;
//! - a **custom check** is an async function named `validateXxx` that sees the
//!   whole raw request and either returns the field's legal value or a
//!   failure message.
//!
//! Declarations can also be loaded from JSON with
//! [`SchemaBuilder::declarations`], which is where malformed rule lists
//! (mixed elements, unknown check names, bad options) are caught.
//!
//! Every defect is reported as a [`ConfigurationFault`] naming the validator
//! and the field when [`SchemaBuilder::build`] runs.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, LazyLock};

use futures::FutureExt;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ConfigurationFault;
use crate::params::Params;
use crate::rule::{Check, Rule};
use crate::validators::{
    Alphanumeric, Email, IsBoolean, IsFloat, IsInt, LengthRange, Matches, PasswordPolicy,
    StrongPassword, Url,
};

static CUSTOM_NAME: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^validate[A-Z]\w*$").unwrap());

/// Result of a custom check: the legal value, or the failure message.
pub type CustomResult = Result<Value, String>;

type CustomFn = dyn Fn(Arc<Params>) -> BoxFuture<'static, CustomResult> + Send + Sync;

/// An async check over the whole raw request.
///
/// # Examples
///
/// ```rust
/// use serde_json::Value;
/// use sieve_validator::CustomCheck;
///
/// let check = CustomCheck::new(|raw| async move {
///     match (raw.get("body.password"), raw.get("body.confirm_password")) {
///         (Some(a), Some(b)) if a == b => Ok(Value::Null),
///         _ => Err("passwords do not match".to_owned()),
///     }
/// });
/// ```
#[derive(Clone)]
pub struct CustomCheck(Arc<CustomFn>);

impl CustomCheck {
    pub fn new<F, Fut>(check: F) -> Self
    where
        F: Fn(Arc<Params>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CustomResult> + Send + 'static,
    {
        Self(Arc::new(move |raw: Arc<Params>| -> BoxFuture<'static, CustomResult> {
            check(raw).boxed()
        }))
    }

    /// Runs the check against the raw snapshot.
    pub fn call(&self, raw: Arc<Params>) -> BoxFuture<'static, CustomResult> {
        (self.0)(raw)
    }
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomCheck(<function>)")
    }
}

/// How one field is resolved.
#[derive(Debug, Clone)]
pub enum FieldSpec {
    Rules(Vec<Rule>),
    Custom(CustomCheck),
}

/// The ordered field declarations of one validator.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: IndexMap<String, FieldSpec>,
}

impl Schema {
    /// Starts a schema for the validator called `name`. The name appears in
    /// every configuration fault.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            pending: None,
        }
    }

    /// Builds a schema purely from JSON declarations.
    pub fn from_declarations(
        name: impl Into<String>,
        declarations: &Value,
    ) -> Result<Self, ConfigurationFault> {
        Self::builder(name).declarations(declarations).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Declarative builder for [`Schema`].
///
/// Faults are deferred: the first one encountered is returned by
/// [`build`](Self::build), so declarations chain without intermediate `?`.
///
/// # Examples
///
/// ```rust
/// use serde_json::Value;
/// use sieve_validator::{Rule, Schema};
///
/// let schema = Schema::builder("RegisterValidator")
///     .field("username", [Rule::length(2, Some(20), "username must be 2-20 characters")])
///     .field("email", [Rule::email("invalid email")])
///     .custom("validateTerms", |raw| async move {
///         raw.get("body.terms").cloned().ok_or_else(|| "terms must be accepted".to_owned())
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     schema.field_names().collect::<Vec<_>>(),
///     ["username", "email", "validateTerms"]
/// );
/// ```
#[derive(Debug)]
#[must_use = "a schema builder does nothing until `build` is called"]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<(String, FieldSpec)>,
    pending: Option<ConfigurationFault>,
}

impl SchemaBuilder {
    /// Declares a rule-list field.
    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields
            .push((name.into(), FieldSpec::Rules(rules.into_iter().collect())));
        self
    }

    /// Declares a custom check. `name` must follow the `validateXxx` convention.
    pub fn custom<F, Fut>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(Arc<Params>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CustomResult> + Send + 'static,
    {
        self.fields
            .push((name.into(), FieldSpec::Custom(CustomCheck::new(check))));
        self
    }

    /// Declares every field of `base` first, in its order. This is how a
    /// validator builds on another one.
    pub fn extend(mut self, base: &Schema) -> Self {
        self.fields.extend(
            base.fields
                .iter()
                .map(|(name, spec)| (name.clone(), spec.clone())),
        );
        self
    }

    /// Declares fields from a JSON object mapping field names to arrays of
    /// rule declarations:
    ///
    /// ```json
    /// { "username": [{ "name": "isLength", "message": "2-20 chars", "options": { "min": 2, "max": 20 } }],
    ///   "page":     [{ "name": "isOptional", "default": 1 }, { "name": "isInt" }] }
    /// ```
    pub fn declarations(mut self, declarations: &Value) -> Self {
        if self.pending.is_some() {
            return self;
        }
        let Value::Object(members) = declarations else {
            self.pending = Some(ConfigurationFault::MalformedDeclarations {
                validator: self.name.clone(),
                found: json_kind(declarations).to_owned(),
            });
            return self;
        };
        for (field, declaration) in members {
            match parse_rule_list(&self.name, field, declaration) {
                Ok(rules) => self.fields.push((field.clone(), FieldSpec::Rules(rules))),
                Err(fault) => {
                    self.pending = Some(fault);
                    return self;
                }
            }
        }
        self
    }

    /// Checks every declaration and freezes the schema.
    pub fn build(self) -> Result<Schema, ConfigurationFault> {
        if let Some(fault) = self.pending {
            return Err(fault);
        }
        let validator = self.name;
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for (field, spec) in self.fields {
            check_spec(&validator, &field, &spec)?;
            if fields.contains_key(&field) {
                return Err(ConfigurationFault::DuplicateField { validator, field });
            }
            fields.insert(field, spec);
        }
        Ok(Schema {
            name: validator,
            fields,
        })
    }
}

fn check_spec(validator: &str, field: &str, spec: &FieldSpec) -> Result<(), ConfigurationFault> {
    let (validator, field) = (validator.to_owned(), field.to_owned());
    match spec {
        FieldSpec::Custom(_) if !CUSTOM_NAME.is_match(&field) => {
            Err(ConfigurationFault::InvalidCustomName { validator, field })
        }
        FieldSpec::Custom(_) => Ok(()),
        FieldSpec::Rules(rules) if rules.is_empty() => {
            Err(ConfigurationFault::EmptyRules { validator, field })
        }
        FieldSpec::Rules(rules) if rules.iter().filter(|r| r.is_optional()).count() > 1 => {
            Err(ConfigurationFault::DuplicateOptional { validator, field })
        }
        FieldSpec::Rules(rules) => rules.iter().try_for_each(|rule| {
            rule.check()
                .verify()
                .map_err(|err| ConfigurationFault::InvalidOptions {
                    validator: validator.clone(),
                    field: field.clone(),
                    check: rule.name().to_owned(),
                    reason: err.message.into_owned(),
                })
        }),
    }
}

// ============================================================================
// DATA-DRIVEN DECLARATIONS
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleDeclaration {
    name: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    default: Value,
    #[serde(default)]
    options: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Bounds<T> {
    min: Option<T>,
    max: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BooleanOptions {
    loose: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatternOptions {
    pattern: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoOptions {}

enum OptionError {
    UnknownCheck,
    Invalid(String),
}

fn parse_rule_list(
    validator: &str,
    field: &str,
    declaration: &Value,
) -> Result<Vec<Rule>, ConfigurationFault> {
    let Value::Array(elements) = declaration else {
        return Err(ConfigurationFault::NotARuleList {
            validator: validator.to_owned(),
            field: field.to_owned(),
        });
    };
    elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let Value::Object(members) = element else {
                return Err(ConfigurationFault::MixedRules {
                    validator: validator.to_owned(),
                    field: field.to_owned(),
                    index,
                });
            };
            let declaration = RuleDeclaration::deserialize(element).map_err(|err| {
                ConfigurationFault::InvalidOptions {
                    validator: validator.to_owned(),
                    field: field.to_owned(),
                    check: members
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or("rule")
                        .to_owned(),
                    reason: err.to_string(),
                }
            })?;
            parse_rule(declaration).map_err(|(check, err)| match err {
                OptionError::UnknownCheck => ConfigurationFault::UnknownCheck {
                    validator: validator.to_owned(),
                    field: field.to_owned(),
                    check,
                },
                OptionError::Invalid(reason) => ConfigurationFault::InvalidOptions {
                    validator: validator.to_owned(),
                    field: field.to_owned(),
                    check,
                    reason,
                },
            })
        })
        .collect()
}

fn parse_rule(declaration: RuleDeclaration) -> Result<Rule, (String, OptionError)> {
    let RuleDeclaration {
        name,
        message,
        default,
        options,
    } = declaration;
    match parse_check(&name, options) {
        Ok(check) => Ok(Rule::new(check, message).with_default(default)),
        Err(err) => Err((name, err)),
    }
}

fn parse_check(name: &str, options: Value) -> Result<Check, OptionError> {
    let check = match name {
        "isOptional" => {
            options_as::<NoOptions>(options)?;
            Check::Optional
        }
        "isLength" => {
            let Bounds { min, max } = options_as::<Bounds<usize>>(options)?;
            Check::Length(LengthRange::new(min.unwrap_or(0), max).map_err(invalid)?)
        }
        "isEmail" => {
            options_as::<NoOptions>(options)?;
            Check::Email(Email)
        }
        "isStrongPassword" => {
            Check::StrongPassword(StrongPassword::new(options_as::<PasswordPolicy>(options)?))
        }
        "isInt" => {
            let Bounds { min, max } = options_as::<Bounds<i64>>(options)?;
            Check::Int(IsInt::new(min, max).map_err(invalid)?)
        }
        "isFloat" => {
            let Bounds { min, max } = options_as::<Bounds<f64>>(options)?;
            Check::Float(IsFloat::new(min, max).map_err(invalid)?)
        }
        "isBoolean" => {
            let BooleanOptions { loose } = options_as(options)?;
            Check::Boolean(IsBoolean::new(loose))
        }
        "isURL" => {
            options_as::<NoOptions>(options)?;
            Check::Url(Url)
        }
        "isAlphanumeric" => {
            options_as::<NoOptions>(options)?;
            Check::Alphanumeric(Alphanumeric)
        }
        "matches" => {
            let PatternOptions { pattern } = options_as(options)?;
            Check::Matches(Matches::new(&pattern).map_err(invalid)?)
        }
        _ => return Err(OptionError::UnknownCheck),
    };
    Ok(check)
}

fn options_as<T: DeserializeOwned>(options: Value) -> Result<T, OptionError> {
    let options = match options {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(options).map_err(invalid)
}

fn invalid(err: impl fmt::Display) -> OptionError {
    OptionError::Invalid(err.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
