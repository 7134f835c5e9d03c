//! In-memory document model
//!
//! A slotmap-backed element tree standing in for the page the form lives on.
//! Nodes are addressed by [`NodeId`] keys. Removing a node frees it and its
//! whole subtree; a handle to a freed node goes stale and every accessor
//! treats it as absent, so repeated feedback cycles do not grow the tree.
//!
//! # Examples
//!
//! ```rust
//! use ajax_validation::dom::{Document, Selector};
//!
//! let mut doc = Document::new();
//! let form = doc.create_element("form");
//! doc.append_child(doc.root(), form);
//!
//! let group = doc.create_element("div");
//! doc.add_class(group, "form-group");
//! doc.append_child(form, group);
//!
//! assert_eq!(doc.select(form, &Selector::class("form-group")), vec![group]);
//! assert_eq!(doc.outer_html(form), r#"<form><div class="form-group"></div></form>"#);
//!
//! doc.remove(group);
//! assert!(!doc.contains(group));
//! ```

mod render;
mod selector;

use slotmap::SlotMap;

pub use selector::Selector;

slotmap::new_key_type! {
    /// Handle to a node in a [`Document`]
    pub struct NodeId;
}

/// A file attached to an `<input type="file">`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Client-side file name
    pub file_name: String,
    /// MIME type sent with the part
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Create a file part
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// The part a browser sends for a file input with nothing selected
    #[must_use]
    pub fn empty() -> Self {
        Self::new("", mime::APPLICATION_OCTET_STREAM.essence_str(), Vec::new())
    }
}

/// An element node: tag, ordered attributes, visibility and attached files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    hidden: bool,
    files: Vec<FilePart>,
}

impl Element {
    /// Create an element; tag names are stored lowercase
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            hidden: false,
            files: Vec::new(),
        }
    }

    /// Tag name
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value, if present
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in insertion order
    #[must_use]
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// Set or replace an attribute
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Remove an attribute; returns whether it was present
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.attrs.len() != before
    }

    /// Whether the whitespace-separated `class` attribute contains `class`
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let list = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr("class", list);
    }

    fn remove_class(&mut self, class: &str) {
        let Some(existing) = self.attr("class") else {
            return;
        };
        if !existing.split_whitespace().any(|c| c == class) {
            return;
        }
        let remaining: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        let remaining = remaining.join(" ");
        self.set_attr("class", remaining);
    }

    /// Whether the element has been hidden
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Files attached to a file input
    #[must_use]
    pub fn files(&self) -> &[FilePart] {
        &self.files
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with attributes and children
    Element(Element),
    /// Text, escaped when rendered
    Text(String),
    /// Trusted markup fragment, rendered verbatim
    Markup(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    const fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// The element tree a form lives in
#[derive(Debug, Clone)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    base_url: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a `<body>` root
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(NodeKind::Element(Element::new("body"))));
        Self {
            nodes,
            root,
            base_url: None,
        }
    }

    /// Set the URL relative form actions are resolved against
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// URL relative form actions are resolved against
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// The root `<body>` element
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, attached or not
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `id` refers to a live node
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    // =========================================================================
    // Node creation
    // =========================================================================

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes
            .insert(Node::new(NodeKind::Element(Element::new(tag))))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Text(text.into())))
    }

    /// Create a detached trusted-markup node
    pub fn create_markup(&mut self, markup: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Markup(markup.into())))
    }

    // =========================================================================
    // Node inspection
    // =========================================================================

    /// Node payload, `None` for a freed node
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(|node| &node.kind)
    }

    /// Element payload, or `None` for text, markup and freed nodes
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id).map(|node| &mut node.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Tag name of an element node
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::tag)
    }

    /// Parent node, `None` for the root and detached nodes
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Child nodes in order
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map_or(&[] as &[NodeId], |node| node.children.as_slice())
    }

    // =========================================================================
    // Attributes, classes, visibility
    // =========================================================================

    /// Attribute value of an element
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    /// Set an attribute on an element
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            el.set_attr(name, value);
        }
    }

    /// Remove an attribute from an element
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.element_mut(id) {
            el.remove_attr(name);
        }
    }

    /// Whether an element carries a class
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    /// Add a class if missing
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.add_class(class);
        }
    }

    /// Remove a class if present
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.remove_class(class);
        }
    }

    /// Hide an element (`display: none`)
    pub fn hide(&mut self, id: NodeId) {
        if let Some(el) = self.element_mut(id) {
            el.hidden = true;
        }
    }

    /// Whether the element itself is hidden
    #[must_use]
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(Element::is_hidden)
    }

    /// Whether the element or any ancestor is hidden
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.is_hidden(node) {
                return false;
            }
            current = self.parent(node);
        }
        true
    }

    /// Attach a file to an `<input type="file">`
    pub fn attach_file(&mut self, input: NodeId, file: FilePart) {
        if let Some(el) = self.element_mut(input) {
            el.files.push(file);
        }
    }

    // =========================================================================
    // Tree mutation
    // =========================================================================

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.can_link(parent, child) {
            return;
        }
        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    /// Insert `child` as the first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.can_link(parent, child) {
            return;
        }
        self.detach(child);
        self.nodes[parent].children.insert(0, child);
        self.nodes[child].parent = Some(parent);
    }

    /// Insert `node` as the sibling preceding `reference`
    ///
    /// Returns `false` (and leaves `node` where it was) when `reference` has
    /// no parent.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) -> bool {
        self.insert_sibling(reference, node, 0)
    }

    /// Insert `node` as the sibling following `reference`
    ///
    /// Returns `false` (and leaves `node` where it was) when `reference` has
    /// no parent.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> bool {
        self.insert_sibling(reference, node, 1)
    }

    fn insert_sibling(&mut self, reference: NodeId, node: NodeId, offset: usize) -> bool {
        let Some(parent) = self.parent(reference) else {
            return false;
        };
        if reference == node || !self.can_link(parent, node) {
            return false;
        }
        self.detach(node);
        let siblings = &mut self.nodes[parent].children;
        let index = siblings
            .iter()
            .position(|&c| c == reference)
            .map_or(siblings.len(), |i| i + offset);
        siblings.insert(index, node);
        self.nodes[node].parent = Some(parent);
        true
    }

    // Both live, and `child` is neither the root nor an ancestor of `parent`
    fn can_link(&self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || child == self.root {
            return false;
        }
        let mut current = Some(parent);
        while let Some(node) = current {
            if node == child {
                return false;
            }
            current = self.parent(node);
        }
        true
    }

    /// Detach a node from the tree and free it with its whole subtree
    ///
    /// The root cannot be removed. Removing a freed node does nothing.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        self.detach(id);
        self.free_subtree(id);
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes.get_mut(id).and_then(|node| node.parent.take()) {
            if let Some(parent) = self.nodes.get_mut(parent) {
                parent.children.retain(|&c| c != id);
            }
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
            }
        }
    }

    /// Replace an element's children with a single trusted-markup node
    ///
    /// The previous children are freed.
    pub fn set_markup(&mut self, id: NodeId, markup: impl Into<String>) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        for child in std::mem::take(&mut node.children) {
            self.free_subtree(child);
        }
        let markup = self.create_markup(markup);
        self.append_child(id, markup);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether `id` is an element matching `selector`
    #[must_use]
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        self.element(id).is_some_and(|el| selector.matches(el))
    }

    /// Descendants of `scope` (excluding `scope`) matching `selector`, in document order
    #[must_use]
    pub fn select(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.matches(id, selector) {
                found.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        found
    }

    /// First descendant of `scope` matching `selector`
    #[must_use]
    pub fn select_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.select(scope, selector).into_iter().next()
    }

    /// Whether any descendant of `scope` matches `selector`
    #[must_use]
    pub fn has_descendant(&self, scope: NodeId, selector: &Selector) -> bool {
        self.select_first(scope, selector).is_some()
    }

    /// `id` itself or its nearest ancestor matching `selector`
    #[must_use]
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.matches(node, selector) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Concatenated text of all descendant text and markup nodes
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        self.collect_text(id, &mut text);
        text
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            Some(NodeKind::Text(t) | NodeKind::Markup(t)) => out.push_str(t),
            Some(NodeKind::Element(_)) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let form = doc.create_element("form");
        doc.append_child(doc.root(), form);
        let group = doc.create_element("div");
        doc.add_class(group, "form-group");
        doc.append_child(form, group);
        let input = doc.create_element("input");
        doc.set_attr(input, "name", "email");
        doc.append_child(group, input);
        (doc, form, group, input)
    }

    #[test]
    fn test_classes() {
        let (mut doc, _, group, _) = tree();
        doc.add_class(group, "has-error");
        doc.add_class(group, "has-error");
        assert_eq!(doc.attr(group, "class"), Some("form-group has-error"));

        doc.remove_class(group, "form-group");
        assert_eq!(doc.attr(group, "class"), Some("has-error"));
        assert!(!doc.has_class(group, "form-group"));
    }

    #[test]
    fn test_insert_before_and_after() {
        let (mut doc, form, _, _) = tree();
        let before = doc.create_element("div");
        let after = doc.create_element("p");
        assert!(doc.insert_before(form, before));
        assert!(doc.insert_after(form, after));
        assert_eq!(doc.children(doc.root()), &[before, form, after]);
    }

    #[test]
    fn test_insert_next_to_detached_node_fails() {
        let mut doc = Document::new();
        let lonely = doc.create_element("form");
        let banner = doc.create_element("div");
        assert!(!doc.insert_before(lonely, banner));
        assert_eq!(doc.parent(banner), None);
    }

    #[test]
    fn test_remove_frees_subtree() {
        let (mut doc, form, group, input) = tree();
        let before = doc.node_count();

        doc.remove(group);

        assert!(doc.children(form).is_empty());
        assert!(!doc.contains(group));
        assert!(!doc.contains(input));
        assert_eq!(doc.node_count(), before - 2);
        assert_eq!(doc.parent(input), None);
        assert_eq!(doc.attr(input, "name"), None);
    }

    #[test]
    fn test_stale_handles_are_inert() {
        let (mut doc, form, group, _) = tree();
        doc.remove(group);

        doc.remove(group);
        doc.add_class(group, "x");
        doc.append_child(form, group);
        doc.set_markup(group, "<b>x</b>");

        assert!(doc.children(form).is_empty());
        assert_eq!(doc.outer_html(group), "");
        assert_eq!(doc.text_content(group), "");
    }

    #[test]
    fn test_root_cannot_be_removed_or_moved() {
        let (mut doc, form, _, _) = tree();
        let root = doc.root();
        doc.remove(root);
        doc.append_child(form, root);
        assert!(doc.contains(root));
        assert_eq!(doc.parent(root), None);
        assert_eq!(doc.children(root), &[form]);
    }

    #[test]
    fn test_append_refuses_cycles() {
        let (mut doc, form, group, input) = tree();
        doc.append_child(input, form);
        assert_eq!(doc.parent(form), Some(doc.root()));
        assert_eq!(doc.parent(input), Some(group));
    }

    #[test]
    fn test_select_in_document_order() {
        let (mut doc, form, group, input) = tree();
        let second = doc.create_element("input");
        doc.append_child(form, second);
        let found = doc.select(form, &Selector::tag("input"));
        assert_eq!(found, vec![input, second]);
        assert!(doc.select(form, &Selector::tag("form")).is_empty());
        assert_eq!(doc.select_first(form, &Selector::class("form-group")), Some(group));
    }

    #[test]
    fn test_closest_includes_self() {
        let (doc, form, group, input) = tree();
        assert_eq!(doc.closest(input, &Selector::class("form-group")), Some(group));
        assert_eq!(doc.closest(group, &Selector::class("form-group")), Some(group));
        assert_eq!(doc.closest(input, &Selector::tag("form")), Some(form));
        assert_eq!(doc.closest(input, &Selector::class("modal")), None);
    }

    #[test]
    fn test_visibility_inherits() {
        let (mut doc, _, group, input) = tree();
        doc.hide(group);
        assert!(!doc.is_hidden(input));
        assert!(!doc.is_visible(input));
        assert!(doc.is_hidden(group));
    }

    #[test]
    fn test_set_markup_frees_old_children() {
        let (mut doc, _, group, input) = tree();
        let before = doc.node_count();

        doc.set_markup(group, "<b>Saved</b>");
        doc.set_markup(group, "<b>Saved again</b>");

        assert_eq!(doc.children(group).len(), 1);
        assert!(!doc.contains(input));
        assert_eq!(doc.node_count(), before);
        assert_eq!(doc.text_content(group), "<b>Saved again</b>");
    }
}
