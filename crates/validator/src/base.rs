//! The orchestrator.
//!
//! [`BaseValidator`] snapshots a request, resolves every declared field and
//! either returns the sanitized [`Validated`] view or one
//! [`ParameterValidation`] listing every rejected field.
//!
//! ```rust
//! use serde_json::json;
//! use sieve_validator::{BaseValidator, RawRequest, Rule, Schema};
//!
//! # futures::executor::block_on(async {
//! let schema = Schema::builder("PageValidator")
//!     .field("page", [Rule::optional(1), Rule::int(Some(1), None, "page must be positive")])
//!     .field("q", [Rule::length(1, Some(64), "query too long")])
//!     .build()?;
//!
//! let request = RawRequest::new().query(json!({ "q": "rust" }));
//! let validated = BaseValidator::with_schema(&request, schema).validate().await?;
//!
//! assert_eq!(validated.get("query.q"), Some(&json!("rust")));
//! assert_eq!(validated.get("page"), Some(&json!(1)));
//! # Ok::<(), sieve_validator::Error>(())
//! # }).unwrap();
//! ```

use std::sync::Arc;

use futures::future::try_join_all;
use indexmap::IndexMap;
use serde_json::Value;

use crate::config::ValidatorConfig;
use crate::discovery::{FieldSpec, Schema};
use crate::error::{ConfigurationFault, Error, ParameterValidation};
use crate::field::{FieldOutcome, ValidateField};
use crate::params::{DEFAULT_NAMESPACE, Namespace, Params, RequestSource};

/// Something that can declare a validator's fields.
///
/// The raw snapshot is passed in so a declaration may depend on what the
/// client sent, e.g. a login validator that checks `email` or `username`
/// depending on which one is present.
pub trait Declare {
    fn declare(&self, raw: &Params) -> Result<Schema, ConfigurationFault>;
}

impl Declare for Schema {
    fn declare(&self, _raw: &Params) -> Result<Schema, ConfigurationFault> {
        Ok(self.clone())
    }
}

/// A validator bound to one request, not yet run.
///
/// [`validate`](Self::validate) consumes it, so each instance runs exactly once.
#[derive(Debug)]
#[must_use = "a validator does nothing until `validate` is awaited"]
pub struct BaseValidator {
    raw: Arc<Params>,
    checked: Params,
    schema: Schema,
    config: ValidatorConfig,
}

impl BaseValidator {
    /// Snapshots `request` and asks `declaration` for the schema.
    pub fn new<R, D>(request: &R, declaration: &D) -> Result<Self, ConfigurationFault>
    where
        R: RequestSource + ?Sized,
        D: Declare + ?Sized,
    {
        let raw = Params::snapshot(request);
        let schema = declaration.declare(&raw).inspect_err(log_fault)?;
        Ok(Self::from_parts(raw, schema))
    }

    /// Snapshots `request` and validates it against a prebuilt schema.
    pub fn with_schema<R: RequestSource + ?Sized>(request: &R, schema: Schema) -> Self {
        Self::from_parts(Params::snapshot(request), schema)
    }

    fn from_parts(raw: Params, schema: Schema) -> Self {
        Self {
            checked: raw.clone(),
            raw: Arc::new(raw),
            schema,
            config: ValidatorConfig::default(),
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn raw(&self) -> &Params {
        &self.raw
    }

    /// Resolves every declared field.
    ///
    /// Fields are resolved concurrently, so custom checks may overlap; the
    /// aggregate always lists failures in declaration order. A configuration
    /// fault stops validation immediately and is never part of the aggregate.
    pub async fn validate(self) -> Result<Validated, Error> {
        let Self {
            raw,
            mut checked,
            schema,
            config,
        } = self;

        tracing::debug!(
            validator = schema.name(),
            fields = schema.len(),
            "validating request"
        );

        let resolved = try_join_all(
            schema
                .fields()
                .map(|(field, spec)| resolve(schema.name(), field, spec, &raw, &config)),
        )
        .await
        .inspect_err(log_fault)?;

        let mut fields = IndexMap::with_capacity(resolved.len());
        let mut messages = Vec::new();
        for Resolved {
            field,
            location,
            defaulted,
            outcome,
        } in resolved
        {
            tracing::trace!(
                field,
                namespace = location.map_or(DEFAULT_NAMESPACE, Namespace::as_str),
                passed = outcome.is_pass(),
                "field resolved"
            );
            match outcome {
                FieldOutcome::Pass(value) => {
                    match location {
                        Some(namespace) => checked.set(namespace, field, value.clone()),
                        None => checked.set_default(field, value.clone()),
                    }
                    if defaulted {
                        // Falsy raw entries were skipped as absent; none may survive
                        // in the checked view.
                        for &namespace in &config.namespace_order {
                            checked.replace_falsy(namespace, field, &value);
                        }
                    }
                    fields.insert(field.to_owned(), value);
                }
                FieldOutcome::Fail(message) => messages.push(message),
            }
        }

        tracing::debug!(
            validator = schema.name(),
            failures = messages.len(),
            "validation finished"
        );

        if !messages.is_empty() {
            return Err(ParameterValidation::new(messages).into());
        }
        Ok(Validated {
            raw,
            checked,
            fields,
        })
    }
}

struct Resolved<'a> {
    field: &'a str,
    /// Namespace the value was found in; `None` for defaults and custom checks.
    location: Option<Namespace>,
    /// A rule field that took its `isOptional` default.
    defaulted: bool,
    outcome: FieldOutcome,
}

async fn resolve<'a>(
    validator: &'a str,
    field: &'a str,
    spec: &'a FieldSpec,
    raw: &Arc<Params>,
    config: &'a ValidatorConfig,
) -> Result<Resolved<'a>, ConfigurationFault> {
    match spec {
        FieldSpec::Custom(check) => {
            let outcome = match check.call(Arc::clone(raw)).await {
                Ok(value) => FieldOutcome::Pass(value),
                Err(message) if message.is_empty() => {
                    FieldOutcome::Fail(config.custom_fallback_message.clone())
                }
                Err(message) => FieldOutcome::Fail(message),
            };
            Ok(Resolved {
                field,
                location: None,
                defaulted: false,
                outcome,
            })
        }
        FieldSpec::Rules(rules) => {
            let located = raw.locate(field, &config.namespace_order);
            let outcome = ValidateField::new(validator, field, rules, config)
                .validate(located.map(|(_, value)| value))?;
            Ok(Resolved {
                field,
                location: located.map(|(namespace, _)| namespace),
                defaulted: located.is_none(),
                outcome,
            })
        }
    }
}

fn log_fault(fault: &ConfigurationFault) {
    tracing::error!(
        validator = fault.validator(),
        field = fault.field(),
        error = %fault,
        "invalid validator declaration"
    );
}

/// The sanitized result of a successful [`BaseValidator::validate`].
#[derive(Debug, Clone)]
pub struct Validated {
    raw: Arc<Params>,
    checked: Params,
    fields: IndexMap<String, Value>,
}

impl Validated {
    /// Checked lookup with the `default` namespace fallback, see [`get_with`](Self::get_with).
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.get_with(path, true)
    }

    /// Raw lookup, bypassing coercion.
    pub fn get_raw(&self, path: &str) -> Option<&Value> {
        self.get_with(path, false)
    }

    /// Dotted-path lookup into the checked tree, or into the raw snapshot when
    /// `want_checked` is false.
    ///
    /// A checked lookup that finds nothing (or null) falls back to the path's
    /// last segment in the `default` namespace, which is where defaults and
    /// custom-check results live.
    pub fn get_with(&self, path: &str, want_checked: bool) -> Option<&Value> {
        if !want_checked {
            return self.raw.get(path);
        }
        let direct = self.checked.get(path);
        if direct.is_some_and(|value| !value.is_null()) {
            return direct;
        }
        let last = path.rsplit_once('.').map_or(path, |(_, last)| last);
        self.checked
            .get(DEFAULT_NAMESPACE)
            .and_then(|defaults| defaults.get(last))
            .or(direct)
    }

    /// Legal value of a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Every passed field with its legal value, in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn raw(&self) -> &Params {
        &self.raw
    }

    pub fn checked(&self) -> &Params {
        &self.checked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RawRequest;
    use crate::rule::Rule;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(request: &RawRequest, schema: Schema) -> Result<Validated, Error> {
        futures::executor::block_on(BaseValidator::with_schema(request, schema).validate())
    }

    #[test]
    fn located_values_are_coerced_in_place() {
        let schema = Schema::builder("V")
            .field("age", [Rule::int(Some(0), None, "bad age")])
            .build()
            .unwrap();
        let request = RawRequest::new().body(json!({ "age": "42" }));
        let validated = run(&request, schema).unwrap();

        assert_eq!(validated.get("body.age"), Some(&json!(42)));
        assert_eq!(validated.get_raw("body.age"), Some(&json!("42")));
        assert_eq!(validated.field("age"), Some(&json!(42)));
        assert_eq!(validated.raw().get("body.age"), Some(&json!("42")));
    }

    #[test]
    fn query_wins_over_body() {
        let schema = Schema::builder("V")
            .field("name", [Rule::length(1, None, "")])
            .build()
            .unwrap();
        let request = RawRequest::new()
            .body(json!({ "name": "from-body" }))
            .query(json!({ "name": "from-query" }));
        let validated = run(&request, schema).unwrap();
        assert_eq!(validated.field("name"), Some(&json!("from-query")));
    }

    #[test]
    fn falsy_value_counts_as_absent() {
        let schema = Schema::builder("V")
            .field("flag", [Rule::optional(true), Rule::boolean("")])
            .build()
            .unwrap();
        let request = RawRequest::new().body(json!({ "flag": "" }));
        let validated = run(&request, schema).unwrap();
        assert_eq!(validated.get("flag"), Some(&json!(true)));
        assert_eq!(validated.get("body.flag"), Some(&json!(true)));
        assert_eq!(validated.get_raw("body.flag"), Some(&json!("")));
    }

    #[test]
    fn falsy_raw_value_never_leaks_through_checked_view() {
        let schema = Schema::builder("V")
            .field("page", [Rule::optional(1), Rule::int(Some(1), None, "bad page")])
            .build()
            .unwrap();
        let request = RawRequest::new()
            .query(json!({ "page": 0 }))
            .header(json!({ "page": false }));
        let validated = run(&request, schema).unwrap();

        assert_eq!(validated.get("query.page"), Some(&json!(1)));
        assert_eq!(validated.get("header.page"), Some(&json!(1)));
        assert_eq!(validated.get("body.page"), Some(&json!(1)));
        assert_eq!(validated.field("page"), Some(&json!(1)));
        assert_eq!(validated.get_raw("query.page"), Some(&json!(0)));
        assert_eq!(validated.checked().get("body.page"), None);
    }

    #[test]
    fn configured_order_is_honored() {
        let schema = Schema::builder("V")
            .field("id", [Rule::int(None, None, "")])
            .build()
            .unwrap();
        let request = RawRequest::new()
            .query(json!({ "id": "1" }))
            .path(json!({ "id": "2" }));
        let config = ValidatorConfig::default()
            .with_namespace_order([Namespace::Path, Namespace::Query])
            .unwrap();
        let validated = futures::executor::block_on(
            BaseValidator::with_schema(&request, schema)
                .with_config(config)
                .validate(),
        )
        .unwrap();
        assert_eq!(validated.get("path.id"), Some(&json!(2)));
        assert_eq!(validated.get("query.id"), Some(&json!("1")));
    }

    #[test]
    fn every_failure_is_collected_in_order() {
        let schema = Schema::builder("V")
            .field("a", [Rule::email("a is not an email")])
            .field("b", [Rule::int(None, None, "b is not an int")])
            .field("c", [Rule::length(1, None, "")])
            .build()
            .unwrap();
        let request = RawRequest::new().body(json!({ "a": "x", "b": "y" }));
        let err = run(&request, schema).unwrap_err();
        assert_eq!(
            err.as_parameter().unwrap().messages(),
            ["a is not an email", "b is not an int", "field is required"]
        );
    }

    #[test]
    fn configuration_fault_is_not_aggregated() {
        let schema = Schema::builder("V")
            .field("bad", [Rule::email("bad email")])
            .field("opt", [Rule::optional(Value::Null)])
            .build()
            .unwrap();
        let err = run(&RawRequest::new(), schema).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationFault::MissingDefault { ref field, .. }) if field == "opt"
        ));
    }

    #[test]
    fn custom_results_live_in_default_namespace() {
        let schema = Schema::builder("V")
            .custom("validateToken", |raw| async move {
                raw.get("header.x-token")
                    .map(|token| json!({ "token": token }))
                    .ok_or_else(String::new)
            })
            .build()
            .unwrap();

        let request = RawRequest::new().header(json!({ "x-token": "t" }));
        let validated = run(&request, schema.clone()).unwrap();
        assert_eq!(validated.get("validateToken"), Some(&json!({ "token": "t" })));
        assert_eq!(validated.get("default.validateToken.token"), Some(&json!("t")));

        let err = run(&RawRequest::new(), schema).unwrap_err();
        assert_eq!(err.as_parameter().unwrap().messages(), ["parameter error"]);
    }

    #[test]
    fn declare_can_read_raw_params() {
        struct Login;

        impl Declare for Login {
            fn declare(&self, raw: &Params) -> Result<Schema, ConfigurationFault> {
                let builder = Schema::builder("Login");
                let builder = if raw.get("body.email").is_some() {
                    builder.field("email", [Rule::email("bad email")])
                } else {
                    builder.field("username", [Rule::length(2, None, "bad username")])
                };
                builder.build()
            }
        }

        let request = RawRequest::new().body(json!({ "email": "a@b.com" }));
        let validator = BaseValidator::new(&request, &Login).unwrap();
        assert_eq!(validator.schema().field_names().collect::<Vec<_>>(), ["email"]);
        assert_eq!(validator.raw().get("body.email"), Some(&json!("a@b.com")));
    }

    #[test]
    fn fields_iterate_in_declaration_order() {
        let schema = Schema::builder("V")
            .field("z", [Rule::optional(0)])
            .field("a", [Rule::optional(1)])
            .build()
            .unwrap();
        let validated = run(&RawRequest::new(), schema).unwrap();
        let names: Vec<_> = validated.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["z", "a"]);
        assert_eq!(validated.checked().get("default.z"), Some(&json!(0)));
    }
}
