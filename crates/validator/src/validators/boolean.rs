//! Boolean string validator

use crate::foundation::ValidationError;

const STRICT: [&str; 4] = ["true", "false", "1", "0"];
const LOOSE: [&str; 6] = ["true", "false", "1", "0", "yes", "no"];

crate::validator! {
    /// Validates that a string spells a boolean.
    ///
    /// Strict mode accepts `true`, `false`, `1` and `0` exactly. Loose mode
    /// also accepts `yes` and `no`, ignoring case.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub IsBoolean { loose: bool } for str;
    rule(self, input) {
        if self.loose {
            LOOSE.iter().any(|word| word.eq_ignore_ascii_case(input))
        } else {
            STRICT.contains(&input)
        }
    }
    error(self, input) { ValidationError::invalid_format("boolean") }
    fn is_boolean(loose: bool);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Validate;

    #[test]
    fn test_strict() {
        let validator = is_boolean(false);
        assert!(validator.validate("true").is_ok());
        assert!(validator.validate("0").is_ok());
        assert!(validator.validate("TRUE").is_err());
        assert!(validator.validate("yes").is_err());
    }

    #[test]
    fn test_loose() {
        let validator = is_boolean(true);
        assert!(validator.validate("Yes").is_ok());
        assert!(validator.validate("NO").is_ok());
        assert!(validator.validate("TRUE").is_ok());
        assert!(validator.validate("maybe").is_err());
    }
}
