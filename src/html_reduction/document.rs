//! Mutable markup tree used by the reduction engine.
//!
//! Nodes live in an `ego_tree` arena, so parents own their children by index
//! and dropping a deeply nested document never recurses. The arena root is a
//! synthetic [`Node::Fragment`] whose children are the document's top-level
//! nodes.

use ego_tree::{NodeId, NodeRef, Tree};
use indexmap::IndexMap;

/// Elements that make up the document skeleton itself.
///
/// The parser recreates these whenever they are missing, so removing one
/// would not survive a parse/serialize round trip.
const DOCUMENT_STRUCTURE_TAGS: &[&str] = &["html", "head", "body"];

/// A single node of the markup tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Root container holding the top-level nodes
    Fragment,
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment(_))
    }

    /// True for text nodes consisting solely of whitespace (or nothing)
    #[must_use]
    pub fn is_whitespace_text(&self) -> bool {
        match self {
            Node::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }
}

/// Namespace an element was parsed into.
///
/// Tag names alone are ambiguous: a `<noscript>` inside `<math>` is a MathML
/// element with ordinary text, not an HTML raw-text element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    MathMl,
    Other,
}

/// An element with an ordered, name-unique attribute map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: Namespace,
    attrs: IndexMap<String, String>,
}

impl Element {
    /// HTML element
    pub fn new(name: impl Into<String>) -> Self {
        Self::in_namespace(name, Namespace::Html)
    }

    pub fn in_namespace(name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            name: name.into(),
            namespace,
            attrs: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Case-insensitive tag comparison
    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    /// Like [`Element::is`], restricted to the HTML namespace
    #[must_use]
    pub fn is_html(&self, tag: &str) -> bool {
        self.namespace == Namespace::Html && self.is(tag)
    }

    #[must_use]
    pub fn is_document_structure(&self) -> bool {
        DOCUMENT_STRUCTURE_TAGS.iter().any(|tag| self.is(tag))
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    #[must_use]
    pub fn has_attributes(&self) -> bool {
        !self.attrs.is_empty()
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Insert an attribute only if the name is not present yet.
    ///
    /// Returns `false` when the attribute already existed (first one wins,
    /// matching how HTML parsers treat duplicate attributes).
    pub fn insert_attr_if_absent(&mut self, name: String, value: String) -> bool {
        if self.attrs.contains_key(&name) {
            return false;
        }
        self.attrs.insert(name, value);
        true
    }

    /// Keep only attributes for which `keep` returns true; returns how many were dropped
    pub fn retain_attrs<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str, &str) -> bool,
    {
        let before = self.attrs.len();
        self.attrs.retain(|name, value| keep(name, value));
        before - self.attrs.len()
    }

    pub(crate) fn attr_mut(&mut self, name: &str) -> Option<&mut String> {
        self.attrs.get_mut(name)
    }
}

/// Doctype of a full page.
///
/// Identifiers are kept because they decide the parser's quirks mode, which
/// changes tree construction (a `<table>` inside `<p>` only nests in quirks
/// mode).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctype {
    pub name: String,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
    /// Spell the doctype so that a re-parse is forced into quirks mode
    pub force_quirks: bool,
}

impl Doctype {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A parsed HTML document or fragment
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree<Node>,
    doctype: Option<Doctype>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with no top-level nodes
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Tree::new(Node::Fragment),
            doctype: None,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeRef<'_, Node> {
        self.tree.root()
    }

    #[must_use]
    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.tree.get(id)
    }

    /// Doctype of a document parsed from a full page
    #[must_use]
    pub fn doctype(&self) -> Option<&Doctype> {
        self.doctype.as_ref()
    }

    pub(crate) fn set_doctype(&mut self, doctype: Option<Doctype>) {
        self.doctype = doctype;
    }

    /// True when the document has no top-level nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.tree.root().has_children()
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// Returns `None` if `parent` does not belong to this document.
    pub fn append(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        let mut parent = self.tree.get_mut(parent)?;
        Some(parent.append(node).id())
    }

    /// Run `f` against the element stored at `id`.
    ///
    /// Returns `None` for unknown ids and non-element nodes.
    pub fn with_element_mut<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        let mut node = self.tree.get_mut(id)?;
        node.value().as_element_mut().map(f)
    }

    /// Detach a node (and its subtree) from its parent.
    ///
    /// The root is never detached.
    pub fn detach(&mut self, id: NodeId) {
        if id == self.root_id() {
            return;
        }
        if let Some(mut node) = self.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Detach every child of `id`, returning how many were removed
    pub fn clear_children(&mut self, id: NodeId) -> usize {
        let children: Vec<NodeId> = match self.tree.get(id) {
            Some(node) => node.children().map(|child| child.id()).collect(),
            None => return 0,
        };
        for child in &children {
            self.detach(*child);
        }
        children.len()
    }

    /// Ids of every attached node below the root in document (pre-)order.
    ///
    /// Uses an explicit stack, so nesting depth is bounded only by memory.
    #[must_use]
    pub fn preorder_ids(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = self
            .tree
            .root()
            .children()
            .rev()
            .map(|child| child.id())
            .collect();

        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.tree.get(id) {
                stack.extend(node.children().rev().map(|child| child.id()));
            }
        }
        order
    }
}
