// Configuration validation

use crate::{ConfigError, FieldConfig, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Class names must be single non-empty tokens, as class lists reject
/// empty strings and whitespace.
fn class_token(value: &str, key: &str) -> Result<()> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("'{}' is not a single class token", value),
        });
    }
    Ok(())
}

impl Validate for FieldConfig {
    fn validate(&self) -> Result<()> {
        class_token(&self.class_valid, "classValid")?;
        class_token(&self.class_invalid, "classInvalid")?;
        class_token(&self.class_was_validated, "classWasValidated")?;

        if self.class_valid == self.class_invalid {
            return Err(ConfigError::InvalidValue {
                key: "classInvalid".to_string(),
                reason: "must differ from classValid".to_string(),
            });
        }

        if let Some(pattern) = &self.pattern {
            regex::Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }
}
