//! String content validators
//!
//! Validators for checking string content and patterns.

use std::sync::LazyLock;

use crate::foundation::ValidationError;

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\.[a-zA-Z]{2,63}$"
    ).unwrap()
});

static URL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap()
});

// ============================================================================
// REGEX VALIDATOR
// ============================================================================

crate::validator! {
    /// Validates that a string matches a regular expression.
    pub Matches { pattern: regex::Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) {
        ValidationError::invalid_format("regex")
            .with_param("pattern", self.pattern.as_str().to_string())
    }
    new(pattern: &str) -> regex::Error {
        Ok(Self {
            pattern: regex::Regex::new(pattern)?,
        })
    }
    fn matches(pattern: &str) -> regex::Error;
}

// ============================================================================
// EMAIL VALIDATOR
// ============================================================================

crate::validator! {
    /// Validates email format.
    ///
    /// Uses a simple but effective regex pattern. The domain must end in an
    /// alphabetic top-level label, so `user@localhost` is rejected.
    pub Email for str;
    rule(input) { EMAIL_REGEX.is_match(input) }
    error(input) { ValidationError::invalid_format("email") }
    fn email();
}

// ============================================================================
// URL VALIDATOR
// ============================================================================

crate::validator! {
    /// Validates `http`/`https` URL format.
    pub Url for str;
    rule(input) { URL_REGEX.is_match(input) }
    error(input) { ValidationError::invalid_format("url") }
    fn url();
}

// ============================================================================
// ALPHANUMERIC VALIDATOR
// ============================================================================

crate::validator! {
    /// Validates that a string is non-empty and holds only ASCII letters and digits.
    pub Alphanumeric for str;
    rule(input) { !input.is_empty() && input.chars().all(|c| c.is_ascii_alphanumeric()) }
    error(input) { ValidationError::invalid_format("alphanumeric") }
    fn alphanumeric();
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Validate;

    #[test]
    fn test_regex() {
        let validator = matches(r"^\d{3}-\d{4}$").unwrap();
        assert!(validator.validate("123-4567").is_ok());
        assert!(validator.validate("invalid").is_err());
    }

    #[test]
    fn test_bad_regex() {
        assert!(matches("(unclosed").is_err());
    }

    #[test]
    fn test_email() {
        let validator = email();
        assert!(validator.validate("a@b.com").is_ok());
        assert!(validator.validate("user@example.com").is_ok());
        assert!(validator.validate("invalid").is_err());
        assert!(validator.validate("@example.com").is_err());
        assert!(validator.validate("user@").is_err());
    }

    #[test]
    fn test_email_requires_tld() {
        let validator = email();
        assert!(validator.validate("a@localhost").is_err());
        assert!(validator.validate("a@example.c").is_err());
        assert!(validator.validate("a@127.0.0.1").is_err());
        assert!(validator.validate("a@mail.example.co").is_ok());
        assert!(validator.validate("a@sub-domain.example.museum").is_ok());
    }

    #[test]
    fn test_url() {
        let validator = url();
        assert!(validator.validate("http://example.com").is_ok());
        assert!(validator.validate("https://example.com/path").is_ok());
        assert!(validator.validate("invalid").is_err());
        assert!(validator.validate("ftp://example.com").is_err());
    }

    #[test]
    fn test_alphanumeric() {
        assert!(alphanumeric().validate("abc123").is_ok());
        assert!(alphanumeric().validate("").is_err());
        assert!(alphanumeric().validate("a b").is_err());
        assert_eq!(
            alphanumeric().validate("ü").unwrap_err().param("expected"),
            Some("alphanumeric")
        );
    }
}
