// Custom validator trait

use fieldguard_core::Control;

/// A caller-supplied rule evaluated after the built-in ones.
///
/// Returns `Some(message)` when the value is invalid. Implementations may
/// run any number of times per value and should not rely on side effects
/// between calls.
///
/// Any `Fn(&str, &Control) -> Option<String>` closure is a validator:
///
/// ```
/// use fieldguard_core::Control;
/// use fieldguard_validation::CustomValidator;
///
/// let no_spaces = |value: &str, _control: &Control| {
///     value.contains(' ').then(|| "Spaces are not allowed.".to_string())
/// };
/// fn assert_validator<V: CustomValidator>(_: &V) {}
/// assert_validator(&no_spaces);
/// ```
pub trait CustomValidator: Send + Sync {
    fn check(&self, value: &str, control: &Control) -> Option<String>;
}

impl<F> CustomValidator for F
where
    F: Fn(&str, &Control) -> Option<String> + Send + Sync,
{
    fn check(&self, value: &str, control: &Control) -> Option<String> {
        self(value, control)
    }
}
