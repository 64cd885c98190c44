//! In-memory document for testing without a browser.
//!
//! [`MockElement`] is a shared handle like a browser node reference: clones
//! point at the same node. [`MockDocument`] records a [`MutationRecord`] for
//! every insertion and hands them out in batches, the way a mutation observer
//! delivers them after the inserting script yields.

use crate::target::CounterTarget;
use crate::watcher::NodeTree;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    is_text: bool,
    text_content: String,
    attributes: HashMap<String, String>,
    classes: Vec<String>,
    children: Vec<MockElement>,
    text_history: Vec<String>,
}

/// Handle to a node in a mock document
#[derive(Debug, Clone)]
pub struct MockElement {
    inner: Rc<RefCell<NodeData>>,
}

impl Default for MockElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl PartialEq for MockElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl MockElement {
    /// Create an element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NodeData {
                tag: tag.to_string(),
                ..NodeData::default()
            })),
        }
    }

    /// Create a text node
    #[must_use]
    pub fn text_node(text: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NodeData {
                tag: "#text".to_string(),
                is_text: true,
                text_content: text.to_string(),
                ..NodeData::default()
            })),
        }
    }

    /// Set the initial text (not recorded in the text history)
    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.inner.borrow_mut().text_content = text.to_string();
        self
    }

    /// Add a class
    #[must_use]
    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attr(self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Append a child
    #[must_use]
    pub fn with_child(self, child: MockElement) -> Self {
        self.append_child(child);
        self
    }

    /// Tag name (`#text` for text nodes)
    #[must_use]
    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    /// Current text content
    #[must_use]
    pub fn text(&self) -> String {
        self.inner.borrow().text_content.clone()
    }

    /// Every text written through [`CounterTarget::set_display_text`], in order
    #[must_use]
    pub fn text_history(&self) -> Vec<String> {
        self.inner.borrow().text_history.clone()
    }

    /// Get an attribute value
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<String> {
        self.inner.borrow().attributes.get(key).cloned()
    }

    /// Set an attribute value
    pub fn set_attr(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .attributes
            .insert(key.to_string(), value.to_string());
    }

    /// Add a class if not present
    pub fn add_class(&self, class: &str) {
        let mut data = self.inner.borrow_mut();
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
    }

    /// Check for a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.inner.borrow().classes.iter().any(|c| c == class)
    }

    /// Child nodes
    #[must_use]
    pub fn children(&self) -> Vec<MockElement> {
        self.inner.borrow().children.clone()
    }

    /// Append a child without recording a mutation
    pub fn append_child(&self, child: MockElement) {
        self.inner.borrow_mut().children.push(child);
    }
}

impl NodeTree for MockElement {
    fn is_element(&self) -> bool {
        !self.inner.borrow().is_text
    }

    fn has_class(&self, class: &str) -> bool {
        MockElement::has_class(self, class)
    }

    fn descendants_with_class(&self, class: &str) -> Vec<Self> {
        let mut found = Vec::new();
        let mut stack: Vec<MockElement> = self.children().into_iter().rev().collect();
        // depth-first, document order
        while let Some(node) = stack.pop() {
            if node.is_element() && node.has_class(class) {
                found.push(node.clone());
            }
            stack.extend(node.children().into_iter().rev());
        }
        found
    }
}

impl CounterTarget for MockElement {
    fn source_value(&self, attribute: &str) -> Option<String> {
        self.get_attr(attribute)
    }

    fn is_processing(&self, attribute: &str) -> bool {
        self.get_attr(attribute).as_deref() == Some("true")
    }

    fn mark_processing(&self, attribute: &str) {
        self.set_attr(attribute, "true");
    }

    fn set_display_text(&self, text: &str) {
        let mut data = self.inner.borrow_mut();
        data.text_content = text.to_string();
        data.text_history.push(text.to_string());
    }

    fn mark_complete(&self, class: &str) {
        self.add_class(class);
    }
}

/// A batch entry: nodes added under one parent
#[derive(Debug, Clone)]
pub struct MutationRecord {
    /// Parent the nodes were added to
    pub target: MockElement,
    /// Added nodes, roots only
    pub added_nodes: Vec<MockElement>,
}

/// Mock document with a body and queued mutation records
#[derive(Debug)]
pub struct MockDocument {
    body: MockElement,
    pending: Vec<MutationRecord>,
}

impl Default for MockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocument {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self {
            body: MockElement::new("body"),
            pending: Vec::new(),
        }
    }

    /// Create a document whose body already holds `children`.
    ///
    /// Nothing is recorded for these; they model markup present at load.
    #[must_use]
    pub fn with_body(children: Vec<MockElement>) -> Self {
        let document = Self::new();
        for child in children {
            document.body.append_child(child);
        }
        document
    }

    /// The body element
    #[must_use]
    pub fn body(&self) -> &MockElement {
        &self.body
    }

    /// Insert `child` under `parent` and record the mutation
    pub fn append_child(&mut self, parent: &MockElement, child: MockElement) {
        parent.append_child(child.clone());
        self.pending.push(MutationRecord {
            target: parent.clone(),
            added_nodes: vec![child],
        });
    }

    /// Insert several nodes under `parent` as one record
    pub fn append_children(&mut self, parent: &MockElement, children: Vec<MockElement>) {
        for child in &children {
            parent.append_child(child.clone());
        }
        self.pending.push(MutationRecord {
            target: parent.clone(),
            added_nodes: children,
        });
    }

    /// Records not yet delivered
    #[must_use]
    pub fn pending_mutations(&self) -> usize {
        self.pending.len()
    }

    /// Take the queued batch
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_builders() {
        let el = MockElement::new("span")
            .with_class("kpi-value-animate")
            .with_attr("data-value", "87.5%")
            .with_text("87.5%");
        assert_eq!(el.tag(), "span");
        assert!(el.has_class("kpi-value-animate"));
        assert_eq!(el.get_attr("data-value").as_deref(), Some("87.5%"));
        assert_eq!(el.text(), "87.5%");
        assert!(el.text_history().is_empty());
    }

    #[test]
    fn test_clones_are_same_node() {
        let el = MockElement::new("span");
        let other = el.clone();
        other.set_attr("k", "v");
        assert_eq!(el.get_attr("k").as_deref(), Some("v"));
        assert_eq!(el, other);
        assert_ne!(el, MockElement::new("span"));
    }

    #[test]
    fn test_add_class_dedupes() {
        let el = MockElement::new("div");
        el.add_class("a");
        el.add_class("a");
        assert_eq!(el.inner.borrow().classes.len(), 1);
    }

    #[test]
    fn test_text_node_is_not_element() {
        let text = MockElement::text_node("hello");
        assert!(!text.is_element());
        assert_eq!(text.tag(), "#text");
        assert!(MockElement::new("p").is_element());
    }

    #[test]
    fn test_descendants_in_document_order() {
        let first = MockElement::new("span").with_class("hit").with_attr("id", "1");
        let nested = MockElement::new("span").with_class("hit").with_attr("id", "2");
        let last = MockElement::new("span").with_class("hit").with_attr("id", "3");
        let root = MockElement::new("div")
            .with_child(first)
            .with_child(MockElement::new("div").with_child(nested).with_class("miss"))
            .with_child(MockElement::text_node("x"))
            .with_child(last);

        let ids: Vec<String> = root
            .descendants_with_class("hit")
            .iter()
            .filter_map(|e| e.get_attr("id"))
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_descendants_exclude_root() {
        let root = MockElement::new("div")
            .with_class("hit")
            .with_child(MockElement::new("span"));
        assert!(root.descendants_with_class("hit").is_empty());
    }

    #[test]
    fn test_counter_target_impl() {
        let el = MockElement::new("span");
        assert!(!el.is_processing("data-animating"));
        el.mark_processing("data-animating");
        assert!(el.is_processing("data-animating"));
        el.set_display_text("1");
        el.set_display_text("2");
        assert_eq!(el.text_history(), vec!["1", "2"]);
        el.mark_complete("animation-complete");
        assert!(el.has_class("animation-complete"));
    }

    #[test]
    fn test_document_records_mutations() {
        let mut doc = MockDocument::new();
        let body = doc.body().clone();
        doc.append_child(&body, MockElement::new("div"));
        doc.append_children(&body, vec![MockElement::new("p"), MockElement::new("p")]);
        assert_eq!(doc.pending_mutations(), 2);
        assert_eq!(body.children().len(), 3);

        let batch = doc.take_mutations();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].added_nodes.len(), 2);
        assert_eq!(batch[0].target, body);
        assert_eq!(doc.pending_mutations(), 0);
    }

    #[test]
    fn test_with_body_records_nothing() {
        let doc = MockDocument::with_body(vec![MockElement::new("main")]);
        assert_eq!(doc.pending_mutations(), 0);
        assert_eq!(doc.body().children().len(), 1);
    }
}
