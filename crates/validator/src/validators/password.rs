//! Password strength validator

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::foundation::{Validate, ValidationError};

/// Minimum character-class counts a strong password must meet.
///
/// Defaults: 8 characters, at least one lowercase letter, one uppercase
/// letter, one digit and one symbol. Letters are counted in ASCII only.
///
/// Deserializes from camelCase options. The scoring options validator.js
/// accepts (`returnScore`, `pointsPer*`) are accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "PolicyOptions")]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub min_lowercase: usize,
    pub min_uppercase: usize,
    pub min_numbers: usize,
    pub min_symbols: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_lowercase: 1,
            min_uppercase: 1,
            min_numbers: 1,
            min_symbols: 1,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PolicyOptions {
    #[serde(rename = "minLength")]
    min_length: Option<usize>,
    #[serde(rename = "minLowercase")]
    min_lowercase: Option<usize>,
    #[serde(rename = "minUppercase")]
    min_uppercase: Option<usize>,
    #[serde(rename = "minNumbers")]
    min_numbers: Option<usize>,
    #[serde(rename = "minSymbols")]
    min_symbols: Option<usize>,
    #[serde(rename = "returnScore")]
    _return_score: Option<IgnoredAny>,
    #[serde(rename = "pointsPerUnique")]
    _points_per_unique: Option<IgnoredAny>,
    #[serde(rename = "pointsPerRepeat")]
    _points_per_repeat: Option<IgnoredAny>,
    #[serde(rename = "pointsForContainingLower")]
    _points_for_containing_lower: Option<IgnoredAny>,
    #[serde(rename = "pointsForContainingUpper")]
    _points_for_containing_upper: Option<IgnoredAny>,
    #[serde(rename = "pointsForContainingNumber")]
    _points_for_containing_number: Option<IgnoredAny>,
    #[serde(rename = "pointsForContainingSymbol")]
    _points_for_containing_symbol: Option<IgnoredAny>,
}

impl From<PolicyOptions> for PasswordPolicy {
    fn from(options: PolicyOptions) -> Self {
        let defaults = Self::default();
        Self {
            min_length: options.min_length.unwrap_or(defaults.min_length),
            min_lowercase: options.min_lowercase.unwrap_or(defaults.min_lowercase),
            min_uppercase: options.min_uppercase.unwrap_or(defaults.min_uppercase),
            min_numbers: options.min_numbers.unwrap_or(defaults.min_numbers),
            min_symbols: options.min_symbols.unwrap_or(defaults.min_symbols),
        }
    }
}

#[derive(Debug, Default)]
struct Counts {
    length: usize,
    lowercase: usize,
    uppercase: usize,
    numbers: usize,
    symbols: usize,
}

impl Counts {
    fn of(input: &str) -> Self {
        input.chars().fold(Self::default(), |mut counts, c| {
            counts.length += 1;
            if c.is_ascii_lowercase() {
                counts.lowercase += 1;
            } else if c.is_ascii_uppercase() {
                counts.uppercase += 1;
            } else if c.is_ascii_digit() {
                counts.numbers += 1;
            } else if is_symbol(c) {
                counts.symbols += 1;
            }
            counts
        })
    }
}

fn is_symbol(c: char) -> bool {
    c.is_ascii_punctuation() || c == ' ' || c == '£'
}

/// Validates that a password meets a [`PasswordPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StrongPassword {
    pub policy: PasswordPolicy,
}

impl StrongPassword {
    #[must_use]
    pub fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }
}

impl Validate for StrongPassword {
    type Input = str;

    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError> {
        let counts = Counts::of(input);
        let policy = &self.policy;
        let shortfalls = [
            ("length", counts.length, policy.min_length),
            ("lowercase", counts.lowercase, policy.min_lowercase),
            ("uppercase", counts.uppercase, policy.min_uppercase),
            ("numbers", counts.numbers, policy.min_numbers),
            ("symbols", counts.symbols, policy.min_symbols),
        ];

        shortfalls
            .into_iter()
            .filter(|(_, actual, min)| actual < min)
            .fold(None, |error: Option<ValidationError>, (class, actual, min)| {
                let error = error.unwrap_or_else(|| {
                    ValidationError::new("strong_password", "Password is not strong enough")
                });
                Some(error.with_param(class, format!("{actual}/{min}")))
            })
            .map_or(Ok(()), Err)
    }
}

/// Creates a strong password validator with the default policy.
#[must_use]
pub fn strong_password() -> StrongPassword {
    StrongPassword::default()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let validator = strong_password();
        assert!(validator.validate("Str0ng!Pass1").is_ok());
        assert!(validator.validate("weak").is_err());
        assert!(validator.validate("alllowercase1!").is_err());
        assert!(validator.validate("NoSymbols123").is_err());
    }

    #[test]
    fn test_reports_every_shortfall() {
        let err = strong_password().validate("weak").unwrap_err();
        assert_eq!(err.code, "strong_password");
        assert_eq!(err.param("length"), Some("4/8"));
        assert_eq!(err.param("uppercase"), Some("0/1"));
        assert_eq!(err.param("numbers"), Some("0/1"));
        assert_eq!(err.param("symbols"), Some("0/1"));
        assert_eq!(err.param("lowercase"), None);
    }

    #[test]
    fn test_custom_policy() {
        let validator = StrongPassword::new(PasswordPolicy {
            min_length: 4,
            min_symbols: 0,
            ..PasswordPolicy::default()
        });
        assert!(validator.validate("aB3x").is_ok());
    }

    #[test]
    fn test_policy_from_camel_case_json() {
        let policy: PasswordPolicy =
            serde_json::from_value(serde_json::json!({ "minLength": 12 })).unwrap();
        assert_eq!(policy.min_length, 12);
        assert_eq!(policy.min_symbols, 1);
    }

    #[test]
    fn test_non_ascii_letters_do_not_count() {
        let validator = strong_password();
        assert!(validator.validate("Пароль1!x").is_err());
        let err = validator.validate("ÄÖÜßäöü1!").unwrap_err();
        assert_eq!(err.param("lowercase"), Some("0/1"));
        assert_eq!(err.param("uppercase"), Some("0/1"));
        assert!(validator.validate("Ab1!ÄÖÜß").is_ok());
    }

    #[test]
    fn test_scoring_options_are_ignored() {
        let policy: PasswordPolicy = serde_json::from_value(serde_json::json!({
            "minSymbols": 0,
            "returnScore": false,
            "pointsPerUnique": 1,
            "pointsPerRepeat": 0.5,
            "pointsForContainingLower": 10,
            "pointsForContainingUpper": 10,
            "pointsForContainingNumber": 10,
            "pointsForContainingSymbol": 10
        }))
        .unwrap();
        assert_eq!(
            policy,
            PasswordPolicy {
                min_symbols: 0,
                ..PasswordPolicy::default()
            }
        );
    }

    #[test]
    fn test_misspelled_option_is_rejected() {
        let result =
            serde_json::from_value::<PasswordPolicy>(serde_json::json!({ "minLenght": 12 }));
        assert!(result.unwrap_err().to_string().contains("minLenght"));
    }
}
