//! Field rules for fieldguard
//!
//! Built-in rules for a single text value and an ordered chain of custom
//! validators, evaluated into a [`Violations`] list.
//!
//! # Examples
//!
//! ```
//! use fieldguard_validation::{Matches, MinLength, RuleSet, Required};
//!
//! assert!(Required::check("").is_err());
//! assert!(MinLength(3).check("abc").is_ok());
//!
//! let rules = RuleSet::new()
//!     .required(true)
//!     .min_length(5)
//!     .pattern(Matches::new("^[a-z]+$").unwrap());
//! assert!(!rules.is_empty());
//! ```

mod errors;
mod rules;
mod traits;
mod validators;

pub use errors::*;
pub use rules::*;
pub use traits::*;
pub use validators::*;
