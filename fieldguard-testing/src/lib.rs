//! Testing utilities for fieldguard.
//!
//! - **MemorySurface** - an in-memory element tree implementing `Surface`,
//!   with event dispatch to registered listeners
//! - **MockEnhancementRuntime** - records companion subscriptions and lets
//!   tests fire `change` / `select2:close` notifications
//!
//! ```
//! use fieldguard_core::{FieldEvent, Surface};
//! use fieldguard_testing::MemorySurface;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let surface = MemorySurface::new();
//! let form = surface.append(None, "form");
//! let input = surface.element(Some(form), "input", &["form-control"]);
//! surface.set_id(input, "email");
//!
//! assert_eq!(surface.query("#email"), Some(input));
//! assert_eq!(surface.query(".form-control"), Some(input));
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let counter = hits.clone();
//! surface.add_listener(input, FieldEvent::Input, Arc::new(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! }));
//! surface.dispatch(input, FieldEvent::Input);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

mod runtime;
mod surface;

pub use runtime::MockEnhancementRuntime;
pub use surface::MemorySurface;
