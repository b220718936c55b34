// Rule violations

use serde::Serialize;
use std::fmt;

/// Which rule produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    IsEmail,
    Pattern,
    Custom,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MinLength => "minLength",
            RuleKind::MaxLength => "maxLength",
            RuleKind::IsEmail => "isEmail",
            RuleKind::Pattern => "pattern",
            RuleKind::Custom => "custom",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A violated rule and its human-readable message.
///
/// Not an error: a violation is an ordinary evaluation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: RuleKind,
    pub message: String,
}

impl Violation {
    pub fn new(rule: RuleKind, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered result of one evaluation pass. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations {
    items: Vec<Violation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, violation: Violation) {
        self.items.push(violation);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.items.iter()
    }

    /// The message shown natively and inline.
    pub fn first_message(&self) -> Option<&str> {
        self.items.first().map(|v| v.message.as_str())
    }

    pub fn messages(&self) -> Vec<String> {
        self.items.iter().map(|v| v.message.clone()).collect()
    }

    pub fn rules(&self) -> Vec<RuleKind> {
        self.items.iter().map(|v| v.rule).collect()
    }

    /// The same shape `Serialize` produces: an array of
    /// `{"rule": .., "message": ..}` objects in evaluation order.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.items
                .iter()
                .map(|v| {
                    serde_json::json!({
                        "rule": v.rule.as_str(),
                        "message": v.message,
                    })
                })
                .collect(),
        )
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for violation in &self.items {
            writeln!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(items: Vec<Violation>) -> Self {
        Self { items }
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_matches_serialize() {
        let mut violations = Violations::new();
        violations.push(Violation::new(RuleKind::Required, "This field is required."));
        violations.push(Violation::new(
            RuleKind::IsEmail,
            "This field must be a valid email address.",
        ));

        let json = violations.to_json();
        assert_eq!(json, serde_json::to_value(&violations).unwrap());
        assert_eq!(json[0]["rule"], "required");
        assert_eq!(json[1]["rule"], "isEmail");
    }

    #[test]
    fn test_empty_to_json() {
        assert_eq!(Violations::new().to_json(), serde_json::json!([]));
    }
}
