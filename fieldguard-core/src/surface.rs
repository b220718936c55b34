// The rendering surface the validator reads from and writes to

use crate::{ElementId, FieldEvent, Listener, ListenerId};

/// Abstraction over "the document".
///
/// Implementations wrap a real DOM binding, a terminal widget tree, or
/// the in-memory fake used in tests. Every mutating call on an element
/// that no longer exists is a silent no-op, and every query returns the
/// empty answer; the validator relies on that to degrade quietly when
/// its control has been removed.
///
/// Implementations must not hold internal locks while invoking
/// listeners, since listeners call straight back into the surface.
pub trait Surface: Send + Sync {
    /// First element matching `selector`.
    fn query(&self, selector: &str) -> Option<ElementId>;

    /// Whether `id` is still attached.
    fn contains(&self, id: ElementId) -> bool;

    /// Upper-case tag name (`INPUT`, `SELECT`, `DIV`).
    fn tag_name(&self, id: ElementId) -> Option<String>;

    /// Current value of an input-like control, empty for anything else.
    fn value(&self, id: ElementId) -> String;

    /// Next element sibling in document order.
    fn next_sibling(&self, id: ElementId) -> Option<ElementId>;

    fn has_class(&self, id: ElementId, class: &str) -> bool;

    fn add_class(&self, id: ElementId, class: &str);

    fn remove_class(&self, id: ElementId, class: &str);

    fn attribute(&self, id: ElementId, name: &str) -> Option<String>;

    fn set_attribute(&self, id: ElementId, name: &str, value: &str);

    fn remove_attribute(&self, id: ElementId, name: &str);

    /// Native constraint-validation message. Empty string means valid.
    fn set_custom_validity(&self, id: ElementId, message: &str);

    /// Remove all content of `id` (children and text).
    fn clear_content(&self, id: ElementId);

    /// Replace all content of `id` with a single text node.
    fn set_text(&self, id: ElementId, text: &str);

    /// Create a `tag` element holding `text` and append it to `parent`.
    fn append_text_child(&self, parent: ElementId, tag: &str, text: &str) -> Option<ElementId>;

    /// Subscribe `listener` to `event` on `id`.
    fn add_listener(&self, id: ElementId, event: FieldEvent, listener: Listener) -> ListenerId;

    /// Returns false if the listener was not registered.
    fn remove_listener(&self, listener: ListenerId) -> bool;
}
