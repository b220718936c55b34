//! Configuration for a single field validator.
//!
//! A [`FieldConfig`] starts from fixed defaults and takes an overlay on
//! top: per-key, the overlay wins. The set of keys is fixed; an overlay
//! naming a key that does not exist is rejected rather than silently
//! carried along.
//!
//! ```
//! use fieldguard_config::{ErrorDisplay, FieldConfig};
//!
//! let config = FieldConfig::from_overlay(serde_json::json!({
//!     "required": true,
//!     "minLength": 5,
//!     "errorDisplay": "inline",
//! }))
//! .unwrap();
//!
//! assert!(config.required);
//! assert_eq!(config.min_length, Some(5));
//! assert_eq!(config.max_length, None);
//! assert_eq!(config.error_display, ErrorDisplay::Inline);
//! assert_eq!(config.throttle, 700);
//! ```

pub mod error;
pub mod loader;
pub mod validation;

mod toggle;

pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::Validate;

use fieldguard_core::ElementId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Overlay key that names validator functions. Functions cannot come
/// from a document, so only an empty list is accepted here.
const CUSTOM_VALIDATORS_KEY: &str = "customValidators";

/// Where violation messages are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorDisplay {
    /// One child per message inside a feedback container
    #[default]
    Container,
    /// First message in the control's `title` attribute
    Inline,
    /// Nothing rendered, messages are only logged
    #[serde(other)]
    Silent,
}

/// Field validator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Shown in the container when the field is valid. Empty disables it.
    pub success_message: String,

    /// Evaluate when the control loses focus
    pub validate_on_blur: bool,

    /// Evaluate (debounced) as the user types
    pub validate_live: bool,

    /// Debounce delay for live validation, in milliseconds
    pub throttle: u64,

    /// Companion widget mirroring the control's state
    #[serde(rename = "elementSelect2", with = "toggle")]
    pub companion: Option<ElementId>,

    pub error_display: ErrorDisplay,

    /// Explicit feedback container. Auto-discovered when unset.
    #[serde(with = "toggle")]
    pub error_container: Option<ElementId>,

    pub class_valid: String,
    pub class_invalid: String,
    pub class_was_validated: String,

    pub required: bool,

    #[serde(with = "toggle")]
    pub min_length: Option<usize>,

    #[serde(with = "toggle")]
    pub max_length: Option<usize>,

    /// Regular expression the value must match (unanchored search)
    #[serde(with = "toggle")]
    pub pattern: Option<String>,

    pub is_email: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            success_message: String::new(),
            validate_on_blur: true,
            validate_live: true,
            throttle: 700,
            companion: None,
            error_display: ErrorDisplay::Container,
            error_container: None,
            class_valid: "is-valid".to_string(),
            class_invalid: "is-invalid".to_string(),
            class_was_validated: "was-validated".to_string(),
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            is_email: false,
        }
    }
}

impl FieldConfig {
    /// Merge `overlay` over the defaults and validate the result.
    ///
    /// `null` means "no overlay". Anything else must be an object whose
    /// keys all exist on the defaults.
    pub fn from_overlay(overlay: Value) -> Result<Self> {
        let overlay = match overlay {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(ConfigError::InvalidValue {
                    key: "<root>".to_string(),
                    reason: format!("expected an object, found {}", other),
                });
            }
        };

        let mut merged = match serde_json::to_value(Self::default()) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(ConfigError::SerializationError(
                    "defaults did not serialize to an object".to_string(),
                ));
            }
            Err(e) => return Err(ConfigError::SerializationError(e.to_string())),
        };

        for (key, value) in overlay {
            if key == CUSTOM_VALIDATORS_KEY {
                match &value {
                    Value::Array(items) if items.is_empty() => continue,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            key,
                            reason: "custom validators must be registered in code".to_string(),
                        });
                    }
                }
            }
            if !merged.contains_key(&key) {
                return Err(ConfigError::UnknownKey(key));
            }
            merged.insert(key, value);
        }

        let config: Self = serde_json::from_value(Value::Object(merged))
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_overlay(ConfigLoader::new(FileFormat::Json).parse(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_overlay(ConfigLoader::new(FileFormat::Toml).parse(content)?)
    }

    /// Load an overlay file, format picked by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let overlay = ConfigLoader::auto(path)?.load_file(path)?;
        Self::from_overlay(overlay)
    }

    /// Debounce delay as a `Duration`.
    pub fn throttle_duration(&self) -> Duration {
        Duration::from_millis(self.throttle)
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_email(mut self, is_email: bool) -> Self {
        self.is_email = is_email;
        self
    }

    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }

    pub fn with_display(mut self, display: ErrorDisplay) -> Self {
        self.error_display = display;
        self
    }

    pub fn with_error_container(mut self, container: ElementId) -> Self {
        self.error_container = Some(container);
        self
    }

    pub fn with_companion(mut self, companion: ElementId) -> Self {
        self.companion = Some(companion);
        self
    }

    pub fn with_throttle(mut self, millis: u64) -> Self {
        self.throttle = millis;
        self
    }

    pub fn with_validate_live(mut self, live: bool) -> Self {
        self.validate_live = live;
        self
    }

    pub fn with_validate_on_blur(mut self, on_blur: bool) -> Self {
        self.validate_on_blur = on_blur;
        self
    }

    pub fn with_classes(
        mut self,
        valid: impl Into<String>,
        invalid: impl Into<String>,
        was_validated: impl Into<String>,
    ) -> Self {
        self.class_valid = valid.into();
        self.class_invalid = invalid.into();
        self.class_was_validated = was_validated.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = FieldConfig::default();
        assert_eq!(config.success_message, "");
        assert!(config.validate_on_blur);
        assert!(config.validate_live);
        assert_eq!(config.throttle, 700);
        assert_eq!(config.error_display, ErrorDisplay::Container);
        assert_eq!(config.class_valid, "is-valid");
        assert_eq!(config.class_invalid, "is-invalid");
        assert_eq!(config.class_was_validated, "was-validated");
        assert!(!config.required);
        assert!(!config.is_email);
        assert_eq!(config.min_length, None);
        assert_eq!(config.pattern, None);
    }

    #[test]
    fn test_defaults_serialize_disabled_rules_as_false() {
        let value = serde_json::to_value(FieldConfig::default()).unwrap();
        assert_eq!(value["minLength"], json!(false));
        assert_eq!(value["pattern"], json!(false));
        assert_eq!(value["elementSelect2"], json!(false));
        assert_eq!(value["errorContainer"], json!(false));
        assert_eq!(value["errorDisplay"], json!("container"));
    }

    #[test]
    fn test_overlay_wins_per_key() {
        let config = FieldConfig::from_overlay(json!({
            "throttle": 250,
            "classValid": "ok",
            "pattern": "^[0-9]+$",
        }))
        .unwrap();

        assert_eq!(config.throttle, 250);
        assert_eq!(config.class_valid, "ok");
        assert_eq!(config.class_invalid, "is-invalid");
        assert_eq!(config.pattern.as_deref(), Some("^[0-9]+$"));
    }

    #[test]
    fn test_overlay_false_and_null_disable_rules() {
        let config = FieldConfig::from_overlay(json!({
            "minLength": false,
            "maxLength": null,
            "errorContainer": false,
        }))
        .unwrap();

        assert_eq!(config.min_length, None);
        assert_eq!(config.max_length, None);
        assert_eq!(config.error_container, None);
    }

    #[test]
    fn test_overlay_true_threshold_rejected() {
        let result = FieldConfig::from_overlay(json!({ "minLength": true }));
        assert!(matches!(result, Err(ConfigError::DeserializationError(_))));
    }

    #[test]
    fn test_overlay_element_references() {
        let config = FieldConfig::from_overlay(json!({
            "errorContainer": 9,
            "elementSelect2": 4,
        }))
        .unwrap();

        assert_eq!(config.error_container, Some(ElementId(9)));
        assert_eq!(config.companion, Some(ElementId(4)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = FieldConfig::from_overlay(json!({ "minLenght": 3 }));
        assert!(matches!(result, Err(ConfigError::UnknownKey(key)) if key == "minLenght"));
    }

    #[test]
    fn test_custom_validators_key() {
        assert!(FieldConfig::from_overlay(json!({ "customValidators": [] })).is_ok());
        assert!(matches!(
            FieldConfig::from_overlay(json!({ "customValidators": ["fn"] })),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_null_overlay_is_defaults() {
        assert_eq!(
            FieldConfig::from_overlay(Value::Null).unwrap(),
            FieldConfig::default()
        );
    }

    #[test]
    fn test_non_object_overlay_rejected() {
        assert!(FieldConfig::from_overlay(json!([1, 2])).is_err());
    }

    #[test]
    fn test_unrecognized_display_mode_is_silent() {
        let config = FieldConfig::from_overlay(json!({ "errorDisplay": "custom" })).unwrap();
        assert_eq!(config.error_display, ErrorDisplay::Silent);
    }

    #[test]
    fn test_overlay_with_bad_pattern_fails() {
        let result = FieldConfig::from_overlay(json!({ "pattern": "[" }));
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_from_toml_str() {
        let config = FieldConfig::from_toml_str(
            r#"
            required = true
            isEmail = true
            errorDisplay = "inline"
            successMessage = "Looks good!"
            "#,
        )
        .unwrap();

        assert!(config.required);
        assert!(config.is_email);
        assert_eq!(config.error_display, ErrorDisplay::Inline);
        assert_eq!(config.success_message, "Looks good!");
    }

    #[test]
    fn test_builder_setters() {
        let config = FieldConfig::default()
            .with_required(true)
            .with_min_length(2)
            .with_max_length(8)
            .with_throttle(100)
            .with_validate_live(false);

        assert!(config.required);
        assert_eq!(config.min_length, Some(2));
        assert_eq!(config.max_length, Some(8));
        assert_eq!(config.throttle_duration(), Duration::from_millis(100));
        assert!(!config.validate_live);
    }
}
