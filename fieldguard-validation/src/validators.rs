// Built-in rules

use crate::{RuleKind, Violation};
use once_cell::sync::Lazy;
use regex::Regex;

// local@domain, where local is dot-separated atoms or a quoted string and
// domain is a bracketed IPv4 literal or dot-separated labels ending in a
// TLD of two or more letters.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:(?:[^<>()\[\]\\.,;:\s@"]+(?:\.[^<>()\[\]\\.,;:\s@"]+)*)|(?:".+"))@(?:(?:\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(?:(?:[a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is valid")
});

/// Number of characters, not bytes.
fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Value must not be the empty string.
pub struct Required;

impl Required {
    pub fn check(value: &str) -> Result<(), Violation> {
        if value.is_empty() {
            Err(Violation::new(RuleKind::Required, "This field is required."))
        } else {
            Ok(())
        }
    }
}

/// Value must have at least this many characters.
///
/// Counts Unicode scalar values. A browser's `value.length` counts UTF-16
/// code units instead, so astral characters such as emoji count once here
/// and twice there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLength(pub usize);

impl MinLength {
    pub fn check(&self, value: &str) -> Result<(), Violation> {
        if char_len(value) < self.0 {
            Err(Violation::new(
                RuleKind::MinLength,
                format!("This field must be at least {} characters long.", self.0),
            ))
        } else {
            Ok(())
        }
    }
}

/// Value must have at most this many characters.
///
/// Counts Unicode scalar values, like [`MinLength`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLength(pub usize);

impl MaxLength {
    pub fn check(&self, value: &str) -> Result<(), Violation> {
        if char_len(value) > self.0 {
            Err(Violation::new(
                RuleKind::MaxLength,
                format!("This field cannot be more than {} characters long.", self.0),
            ))
        } else {
            Ok(())
        }
    }
}

/// Value must look like an email address. The empty string fails.
pub struct IsEmail;

impl IsEmail {
    pub fn check(value: &str) -> Result<(), Violation> {
        if EMAIL_REGEX.is_match(value) {
            Ok(())
        } else {
            Err(Violation::new(
                RuleKind::IsEmail,
                "This field must be a valid email address.",
            ))
        }
    }
}

/// Value must contain a match of a caller-supplied expression.
#[derive(Debug, Clone)]
pub struct Matches(pub Regex);

impl Matches {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self(Regex::new(pattern)?))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn check(&self, value: &str) -> Result<(), Violation> {
        if self.0.is_match(value) {
            Ok(())
        } else {
            Err(Violation::new(RuleKind::Pattern, "This field is invalid."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_count_scalar_values() {
        // four UTF-16 units, three chars
        let value = "\u{fc}\u{1f642}\u{e9}";
        assert!(MinLength(3).check(value).is_ok());
        assert!(MinLength(4).check(value).is_err());
        assert!(MaxLength(3).check(value).is_ok());
    }

    #[test]
    fn test_required() {
        assert!(Required::check("x").is_ok());
        assert!(Required::check(" ").is_ok());
        let err = Required::check("").unwrap_err();
        assert_eq!(err.rule, RuleKind::Required);
        assert_eq!(err.message, "This field is required.");
    }

    #[test]
    fn test_min_length() {
        let rule = MinLength(5);
        assert!(rule.check("hello").is_ok());
        assert_eq!(
            rule.check("abc").unwrap_err().message,
            "This field must be at least 5 characters long."
        );
    }

    #[test]
    fn test_max_length_exact() {
        let rule = MaxLength(5);
        assert!(rule.check("exact").is_ok());
        assert_eq!(
            rule.check("sixsix").unwrap_err().message,
            "This field cannot be more than 5 characters long."
        );
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(MaxLength(4).check("ü🙂éa").is_ok());
        assert!(MinLength(4).check("ü🙂é").is_err());
    }

    #[test]
    fn test_is_email() {
        assert!(IsEmail::check("a@b.co").is_ok());
        assert!(IsEmail::check("user.name+tag@example.co.uk").is_ok());
        assert!(IsEmail::check("\"john doe\"@example.com").is_ok());
        assert!(IsEmail::check("admin@[192.168.0.1]").is_ok());
        assert!(IsEmail::check("a@b").is_err());
        assert!(IsEmail::check("@example.com").is_err());
        assert!(IsEmail::check("user@").is_err());
        assert!(IsEmail::check("two words@example.com").is_err());
    }

    #[test]
    fn test_is_email_does_not_skip_empty() {
        assert_eq!(
            IsEmail::check("").unwrap_err().message,
            "This field must be a valid email address."
        );
    }

    #[test]
    fn test_matches_is_unanchored() {
        let rule = Matches::new("[0-9]").unwrap();
        assert!(rule.check("abc1").is_ok());
        assert_eq!(rule.check("abc").unwrap_err().message, "This field is invalid.");
        assert_eq!(rule.as_str(), "[0-9]");
    }

    #[test]
    fn test_matches_rejects_bad_pattern() {
        assert!(Matches::new("(").is_err());
    }
}
