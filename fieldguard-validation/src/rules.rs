// Ordered rule set for one field

use crate::{CustomValidator, IsEmail, Matches, MaxLength, MinLength, Required, Violations};
use fieldguard_core::Control;
use std::fmt;
use std::sync::Arc;

type ValidatorRef = Arc<dyn CustomValidator>;

/// Built-in rules plus an ordered chain of custom validators.
///
/// Evaluation order is fixed: required, minLength, maxLength, isEmail,
/// pattern, then custom validators in registration order. Each rule adds
/// at most one violation.
#[derive(Clone, Default)]
pub struct RuleSet {
    required: bool,
    min_length: Option<MinLength>,
    max_length: Option<MaxLength>,
    email: bool,
    pattern: Option<Matches>,
    custom: Vec<ValidatorRef>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// A threshold of zero disables the rule.
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = (min > 0).then_some(MinLength(min));
        self
    }

    /// A threshold of zero disables the rule.
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = (max > 0).then_some(MaxLength(max));
        self
    }

    pub fn email(mut self, email: bool) -> Self {
        self.email = email;
        self
    }

    pub fn pattern(mut self, pattern: Matches) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Append a custom validator closure
    #[allow(clippy::should_implement_trait)]
    pub fn add<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str, &Control) -> Option<String> + Send + Sync + 'static,
    {
        self.custom.push(Arc::new(validator));
        self
    }

    /// Append a custom validator to an existing set.
    pub fn push_validator(&mut self, validator: ValidatorRef) {
        self.custom.push(validator);
    }

    pub fn custom_count(&self) -> usize {
        self.custom.len()
    }

    /// True when no rule at all is active.
    pub fn is_empty(&self) -> bool {
        !self.required
            && self.min_length.is_none()
            && self.max_length.is_none()
            && !self.email
            && self.pattern.is_none()
            && self.custom.is_empty()
    }

    /// Evaluate every rule against `value`, starting from an empty result.
    pub fn evaluate(&self, value: &str, control: &Control) -> Violations {
        let mut violations = Violations::new();

        let builtin = [
            self.required.then(|| Required::check(value)),
            self.min_length.map(|rule| rule.check(value)),
            self.max_length.map(|rule| rule.check(value)),
            self.email.then(|| IsEmail::check(value)),
            self.pattern.as_ref().map(|rule| rule.check(value)),
        ];
        for violation in builtin.into_iter().flatten().filter_map(Result::err) {
            violations.push(violation);
        }

        for validator in &self.custom {
            if let Some(message) = validator.check(value, control) {
                violations.push(crate::Violation::new(crate::RuleKind::Custom, message));
            }
        }

        violations
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("email", &self.email)
            .field("pattern", &self.pattern.as_ref().map(Matches::as_str))
            .field("custom", &self.custom.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleKind;
    use fieldguard_core::Surface;
    use fieldguard_testing::MemorySurface;

    fn control() -> Control {
        let surface = MemorySurface::new();
        let input = surface.append(None, "input");
        Control::new(input, surface.shared())
    }

    #[test]
    fn test_empty_rule_set_accepts_anything() {
        let rules = RuleSet::new();
        assert!(rules.is_empty());
        assert!(rules.evaluate("", &control()).is_empty());
    }

    #[test]
    fn test_required_then_min_length_on_empty_value() {
        let rules = RuleSet::new().required(true).min_length(3);
        let violations = rules.evaluate("", &control());

        assert_eq!(violations.rules(), vec![RuleKind::Required, RuleKind::MinLength]);
        assert_eq!(
            violations.messages(),
            vec![
                "This field is required.".to_string(),
                "This field must be at least 3 characters long.".to_string(),
            ]
        );
    }

    #[test]
    fn test_zero_thresholds_disable_rules() {
        let rules = RuleSet::new().min_length(0).max_length(0);
        assert!(rules.is_empty());
        assert!(rules.evaluate("anything", &control()).is_empty());
    }

    #[test]
    fn test_fixed_builtin_order() {
        let rules = RuleSet::new()
            .pattern(Matches::new("^[0-9]+$").unwrap())
            .email(true)
            .max_length(2)
            .min_length(10)
            .required(true);

        let violations = rules.evaluate("abc", &control());
        assert_eq!(
            violations.rules(),
            vec![
                RuleKind::MinLength,
                RuleKind::MaxLength,
                RuleKind::IsEmail,
                RuleKind::Pattern,
            ]
        );
    }

    #[test]
    fn test_custom_validators_follow_builtins_in_order() {
        let rules = RuleSet::new()
            .required(true)
            .add(|_, _| Some("A".to_string()))
            .add(|_, _| Some("B".to_string()));

        let violations = rules.evaluate("", &control());
        assert_eq!(
            violations.messages(),
            vec!["This field is required.".to_string(), "A".to_string(), "B".to_string()]
        );
        assert_eq!(rules.custom_count(), 2);
    }

    #[test]
    fn test_custom_validator_sees_control() {
        let surface = MemorySurface::new();
        let input = surface.append(None, "input");
        surface.set_attribute(input, "data-forbidden", "admin");
        let control = Control::new(input, surface.shared());

        let rules = RuleSet::new().add(|value, control| {
            let forbidden = control.attribute("data-forbidden")?;
            (value == forbidden).then(|| format!("'{}' is reserved.", forbidden))
        });

        assert!(rules.evaluate("alice", &control).is_empty());
        assert_eq!(
            rules.evaluate("admin", &control).first_message(),
            Some("'admin' is reserved.")
        );
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let rules = RuleSet::new().min_length(5).add(|v, _| v.contains('x').then(|| "no x".into()));
        let control = control();
        assert_eq!(rules.evaluate("xyz", &control), rules.evaluate("xyz", &control));
    }
}
