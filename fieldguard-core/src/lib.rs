// Core abstractions for fieldguard
// The validator never touches a real document: everything it reads or
// mutates goes through the `Surface` trait defined here.

pub mod element;
pub mod error;
pub mod event;
pub mod runtime;
pub mod surface;

pub use element::*;
pub use error::*;
pub use event::*;
pub use runtime::*;
pub use surface::*;
