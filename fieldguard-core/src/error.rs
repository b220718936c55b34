// Error types for surface access

use crate::ElementId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("No element matches selector: {0}")]
    ElementNotFound(String),

    #[error("Element {0} is not attached to the surface")]
    DetachedElement(ElementId),
}

pub type Result<T> = std::result::Result<T, CoreError>;
