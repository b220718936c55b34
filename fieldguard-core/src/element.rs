// Element identity and control references

use crate::{CoreError, Result, Surface};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque identity of an element on a [`Surface`].
///
/// Ids are assigned by the surface and are only meaningful to the
/// surface that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl ElementId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ElementId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// How the caller names the control a validator binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRef {
    /// An element the caller already holds
    Element(ElementId),
    /// A selector looked up with [`Surface::query`]
    Selector(String),
}

impl ControlRef {
    /// Resolve to an element that currently exists on `surface`.
    pub fn resolve(&self, surface: &dyn Surface) -> Result<ElementId> {
        match self {
            ControlRef::Element(id) => {
                if surface.contains(*id) {
                    Ok(*id)
                } else {
                    Err(CoreError::DetachedElement(*id))
                }
            }
            ControlRef::Selector(selector) => surface
                .query(selector)
                .ok_or_else(|| CoreError::ElementNotFound(selector.clone())),
        }
    }
}

impl From<ElementId> for ControlRef {
    fn from(id: ElementId) -> Self {
        ControlRef::Element(id)
    }
}

impl From<&str> for ControlRef {
    fn from(selector: &str) -> Self {
        ControlRef::Selector(selector.to_string())
    }
}

impl From<String> for ControlRef {
    fn from(selector: String) -> Self {
        ControlRef::Selector(selector)
    }
}

/// A bound control as seen by custom validators: its id plus read access
/// to the surface it lives on.
#[derive(Clone)]
pub struct Control {
    id: ElementId,
    surface: Arc<dyn Surface>,
}

impl Control {
    pub fn new(id: ElementId, surface: Arc<dyn Surface>) -> Self {
        Self { id, surface }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// Upper-case tag name, empty if the element is gone.
    pub fn tag_name(&self) -> String {
        self.surface.tag_name(self.id).unwrap_or_default()
    }

    pub fn value(&self) -> String {
        self.surface.value(self.id)
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.surface.attribute(self.id, name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.surface.has_class(self.id, class)
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control").field("id", &self.id).finish()
    }
}
