//! Engine configuration.
//!
//! The defaults reproduce the classic behavior: values are looked up in
//! `query`, then `body`, then `path`, then `header`, and a missing required
//! field reports `"field is required"`.

use serde::Deserialize;
use thiserror::Error;

use crate::params::Namespace;

/// Failure to load a [`ValidatorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid validator config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("namespace `{0}` appears more than once in namespace_order")]
    DuplicateNamespace(Namespace),

    #[error("namespace_order must name at least one namespace")]
    EmptyNamespaceOrder,
}

/// Tunables shared by every validator instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Namespaces searched for a field's value, first truthy hit wins.
    pub namespace_order: Vec<Namespace>,
    /// Message for a required field absent from every namespace.
    pub required_message: String,
    /// Message for a failing rule declared without one.
    pub fallback_message: String,
    /// Message for a custom check that failed without one.
    pub custom_fallback_message: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            namespace_order: Namespace::ALL.to_vec(),
            required_message: "field is required".to_owned(),
            fallback_message: "invalid parameter".to_owned(),
            custom_fallback_message: "parameter error".to_owned(),
        }
    }
}

impl ValidatorConfig {
    /// Parses and checks a config from JSON. Missing keys keep their defaults.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_value(value)?;
        config.check()?;
        Ok(config)
    }

    /// Same as [`from_json`](Self::from_json), from text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Self::from_json(serde_json::from_str(text)?)
    }

    /// Replaces the namespace extraction order.
    pub fn with_namespace_order(
        mut self,
        order: impl IntoIterator<Item = Namespace>,
    ) -> Result<Self, ConfigError> {
        self.namespace_order = order.into_iter().collect();
        self.check()?;
        Ok(self)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.namespace_order.is_empty() {
            return Err(ConfigError::EmptyNamespaceOrder);
        }
        for (i, namespace) in self.namespace_order.iter().enumerate() {
            if self.namespace_order[..i].contains(namespace) {
                return Err(ConfigError::DuplicateNamespace(*namespace));
            }
        }
        Ok(())
    }
}
