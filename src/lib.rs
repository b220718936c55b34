// fieldguard - validation, visual state and feedback for form controls
//
// A validator binds to one control on an injected rendering surface,
// evaluates its rules as the value changes and renders the outcome.

// Re-export the validator and its building blocks
pub use fieldguard_config::{ConfigError, ConfigLoader, ErrorDisplay, FieldConfig, FileFormat};
pub use fieldguard_core::*;
pub use fieldguard_validation::{
    CustomValidator, Matches, RuleKind, RuleSet, Violation, Violations,
};
pub use fieldguard_validator::{
    Debouncer, FieldHandle, FieldState, FieldValidator, ValidatorBuilder, ValidatorError,
    ValidatorRegistry,
};

// Re-export member crates
pub use fieldguard_config;
pub use fieldguard_log;
pub use fieldguard_validation;
pub use fieldguard_validator;

#[cfg(feature = "testing")]
pub use fieldguard_testing;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Control,
        ControlRef,
        CustomValidator,
        ElementId,
        EnhancementRuntime,
        ErrorDisplay,
        FieldConfig,
        FieldEvent,
        FieldHandle,
        FieldState,
        FieldValidator,
        Surface,
        ValidatorError,
        ValidatorRegistry,
        Violation,
        Violations,
    };

    #[cfg(feature = "testing")]
    pub use fieldguard_testing::{MemorySurface, MockEnhancementRuntime};
}
