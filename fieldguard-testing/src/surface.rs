// In-memory rendering surface

use fieldguard_core::{ElementId, FieldEvent, Listener, ListenerId, Surface};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    value: String,
    text: String,
    validity: String,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
}

struct Registration {
    element: ElementId,
    event: FieldEvent,
    listener: Listener,
}

#[derive(Default)]
struct Dom {
    next_element: u64,
    next_listener: u64,
    nodes: HashMap<ElementId, Node>,
    roots: Vec<ElementId>,
    listeners: BTreeMap<ListenerId, Registration>,
}

impl Dom {
    fn siblings(&self, id: ElementId) -> Option<&[ElementId]> {
        let node = self.nodes.get(&id)?;
        match node.parent {
            Some(parent) => self.nodes.get(&parent).map(|p| p.children.as_slice()),
            None => Some(self.roots.as_slice()),
        }
    }

    /// Drop `id`'s children and everything below them.
    fn drop_children(&mut self, id: ElementId) {
        let children = match self.nodes.get_mut(&id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.drop_subtree(child);
        }
    }

    fn drop_subtree(&mut self, id: ElementId) {
        self.drop_children(id);
        self.nodes.remove(&id);
        self.listeners.retain(|_, reg| reg.element != id);
    }

    fn document_order(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<ElementId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }
}

fn matches_selector(node: &Node, selector: &str) -> bool {
    if let Some(id) = selector.strip_prefix('#') {
        node.attributes.get("id").is_some_and(|v| v == id)
    } else if let Some(class) = selector.strip_prefix('.') {
        node.classes.iter().any(|c| c == class)
    } else {
        node.tag.eq_ignore_ascii_case(selector)
    }
}

/// Element tree held in memory.
///
/// Cloning yields another handle to the same tree. Supports the simple
/// selectors `#id`, `.class` and `tag`.
#[derive(Clone, Default)]
pub struct MemorySurface {
    dom: Arc<Mutex<Dom>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// This surface as the trait object validators take.
    pub fn shared(&self) -> Arc<dyn Surface> {
        Arc::new(self.clone())
    }

    /// Create a `tag` element as the last child of `parent`, or as the
    /// last top-level element.
    pub fn append(&self, parent: Option<ElementId>, tag: &str) -> ElementId {
        let mut dom = self.dom.lock();
        dom.next_element += 1;
        let id = ElementId(dom.next_element);

        let attached = match parent {
            Some(parent) => match dom.nodes.get_mut(&parent) {
                Some(p) => {
                    p.children.push(id);
                    Some(parent)
                }
                None => None,
            },
            None => None,
        };
        if attached.is_none() {
            dom.roots.push(id);
        }

        dom.nodes.insert(
            id,
            Node {
                tag: tag.to_uppercase(),
                parent: attached,
                ..Node::default()
            },
        );
        id
    }

    /// `append` plus classes.
    pub fn element(&self, parent: Option<ElementId>, tag: &str, classes: &[&str]) -> ElementId {
        let id = self.append(parent, tag);
        for class in classes {
            self.add_class(id, class);
        }
        id
    }

    pub fn set_id(&self, id: ElementId, html_id: &str) {
        self.set_attribute(id, "id", html_id);
    }

    pub fn set_value(&self, id: ElementId, value: &str) {
        if let Some(node) = self.dom.lock().nodes.get_mut(&id) {
            node.value = value.to_string();
        }
    }

    /// Detach `id` with its subtree and listeners.
    pub fn remove(&self, id: ElementId) {
        let mut dom = self.dom.lock();
        let parent = match dom.nodes.get(&id) {
            Some(node) => node.parent,
            None => return,
        };
        match parent.filter(|p| dom.nodes.contains_key(p)) {
            Some(p) => {
                if let Some(node) = dom.nodes.get_mut(&p) {
                    node.children.retain(|c| *c != id);
                }
            }
            None => dom.roots.retain(|r| *r != id),
        }
        dom.drop_subtree(id);
    }

    /// Fire `event` on `id`. Returns how many listeners ran.
    pub fn dispatch(&self, id: ElementId, event: FieldEvent) -> usize {
        let listeners: Vec<Listener> = {
            let dom = self.dom.lock();
            dom.listeners
                .values()
                .filter(|reg| reg.element == id && reg.event == event)
                .map(|reg| reg.listener.clone())
                .collect()
        };
        for listener in &listeners {
            listener();
        }
        listeners.len()
    }

    /// Set the value and fire `input`, as typing would.
    pub fn input(&self, id: ElementId, value: &str) -> usize {
        self.set_value(id, value);
        self.dispatch(id, FieldEvent::Input)
    }

    pub fn classes(&self, id: ElementId) -> Vec<String> {
        self.dom
            .lock()
            .nodes
            .get(&id)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    /// Own text content (not including children).
    pub fn text(&self, id: ElementId) -> String {
        self.dom
            .lock()
            .nodes
            .get(&id)
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.dom
            .lock()
            .nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Text of each direct child, in order.
    pub fn child_texts(&self, id: ElementId) -> Vec<String> {
        let dom = self.dom.lock();
        dom.nodes
            .get(&id)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|c| dom.nodes.get(c).map(|child| child.text.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The native validity message last set on `id`.
    pub fn custom_validity(&self, id: ElementId) -> String {
        self.dom
            .lock()
            .nodes
            .get(&id)
            .map(|n| n.validity.clone())
            .unwrap_or_default()
    }

    /// Number of listeners registered on `id` for `event`.
    pub fn listener_count(&self, id: ElementId, event: FieldEvent) -> usize {
        self.dom
            .lock()
            .listeners
            .values()
            .filter(|reg| reg.element == id && reg.event == event)
            .count()
    }
}

impl Surface for MemorySurface {
    fn query(&self, selector: &str) -> Option<ElementId> {
        let dom = self.dom.lock();
        dom.document_order()
            .into_iter()
            .find(|id| dom.nodes.get(id).is_some_and(|n| matches_selector(n, selector)))
    }

    fn contains(&self, id: ElementId) -> bool {
        self.dom.lock().nodes.contains_key(&id)
    }

    fn tag_name(&self, id: ElementId) -> Option<String> {
        self.dom.lock().nodes.get(&id).map(|n| n.tag.clone())
    }

    fn value(&self, id: ElementId) -> String {
        self.dom
            .lock()
            .nodes
            .get(&id)
            .map(|n| n.value.clone())
            .unwrap_or_default()
    }

    fn next_sibling(&self, id: ElementId) -> Option<ElementId> {
        let dom = self.dom.lock();
        let siblings = dom.siblings(id)?;
        let position = siblings.iter().position(|s| *s == id)?;
        siblings.get(position + 1).copied()
    }

    fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.dom
            .lock()
            .nodes
            .get(&id)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn add_class(&self, id: ElementId, class: &str) {
        if let Some(node) = self.dom.lock().nodes.get_mut(&id) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&self, id: ElementId, class: &str) {
        if let Some(node) = self.dom.lock().nodes.get_mut(&id) {
            node.classes.retain(|c| c != class);
        }
    }

    fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.dom
            .lock()
            .nodes
            .get(&id)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    fn set_attribute(&self, id: ElementId, name: &str, value: &str) {
        if let Some(node) = self.dom.lock().nodes.get_mut(&id) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&self, id: ElementId, name: &str) {
        if let Some(node) = self.dom.lock().nodes.get_mut(&id) {
            node.attributes.remove(name);
        }
    }

    fn set_custom_validity(&self, id: ElementId, message: &str) {
        if let Some(node) = self.dom.lock().nodes.get_mut(&id) {
            node.validity = message.to_string();
        }
    }

    fn clear_content(&self, id: ElementId) {
        let mut dom = self.dom.lock();
        dom.drop_children(id);
        if let Some(node) = dom.nodes.get_mut(&id) {
            node.text.clear();
        }
    }

    fn set_text(&self, id: ElementId, text: &str) {
        let mut dom = self.dom.lock();
        dom.drop_children(id);
        if let Some(node) = dom.nodes.get_mut(&id) {
            node.text = text.to_string();
        }
    }

    fn append_text_child(&self, parent: ElementId, tag: &str, text: &str) -> Option<ElementId> {
        if !self.contains(parent) {
            return None;
        }
        let child = self.append(Some(parent), tag);
        if let Some(node) = self.dom.lock().nodes.get_mut(&child) {
            node.text = text.to_string();
        }
        Some(child)
    }

    fn add_listener(&self, id: ElementId, event: FieldEvent, listener: Listener) -> ListenerId {
        let mut dom = self.dom.lock();
        dom.next_listener += 1;
        let listener_id = ListenerId(dom.next_listener);
        dom.listeners.insert(
            listener_id,
            Registration {
                element: id,
                event,
                listener,
            },
        );
        listener_id
    }

    fn remove_listener(&self, listener: ListenerId) -> bool {
        self.dom.lock().listeners.remove(&listener).is_some()
    }
}
