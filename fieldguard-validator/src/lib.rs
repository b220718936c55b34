//! Field validation for fieldguard
//!
//! Binds to one form control on a [`Surface`](fieldguard_core::Surface),
//! evaluates its rules when the value changes and renders the outcome:
//! validity classes, the native validity message and, depending on the
//! display mode, a feedback container or the control's title.
//!
//! # Features
//!
//! - Input and blur evaluation, debounced live evaluation on key-up
//! - Container discovery among the control's next siblings
//! - Companion widget mirroring for enhanced select controls
//! - Capability handles and a control-keyed registry
//!
//! # Examples
//!
//! ```
//! use fieldguard_testing::MemorySurface;
//! use fieldguard_validator::{FieldValidator, ValidatorRegistry};
//! use serde_json::json;
//!
//! let surface = MemorySurface::new();
//! let form = surface.append(None, "form");
//! let email = surface.append(Some(form), "input");
//! let feedback = surface.element(Some(form), "div", &["invalid-feedback"]);
//!
//! let validator = FieldValidator::with_overlay(
//!     surface.shared(),
//!     email,
//!     json!({ "required": true, "isEmail": true }),
//! )
//! .unwrap();
//!
//! let registry = ValidatorRegistry::new();
//! registry.register(validator);
//!
//! surface.input(email, "a@b");
//! assert_eq!(
//!     surface.child_texts(feedback),
//!     vec!["This field must be a valid email address."]
//! );
//!
//! let handle = registry.handle(email).unwrap();
//! surface.set_value(email, "a@b.co");
//! assert!(handle.is_valid());
//! ```

pub mod companion;
pub mod container;
pub mod debounce;
pub mod error;
pub mod registry;
pub mod validator;

pub use debounce::Debouncer;
pub use error::{Result, ValidatorError};
pub use registry::{FieldHandle, ValidatorRegistry};
pub use validator::{
    FEEDBACK_INVALID_CLASS, FEEDBACK_VALID_CLASS, FieldState, FieldValidator, TITLE_ATTRIBUTE,
    ValidatorBuilder, WILL_VALIDATE_CLASS,
};
