//! Declarative element descriptors.
//!
//! An [`Element`] describes one node of the tree to render: its kind, its
//! attributes, and its ordered children. Descriptors are inert data; the
//! traversal engine turns them into fibers one unit of work at a time.

use rustc_hash::FxHashMap;

/// Semantic type of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// A named output node, e.g. `"div"`.
    Tag(String),
    /// Plain text content.
    Text(String),
}

impl ElementKind {
    /// Whether this kind can produce an output node.
    ///
    /// An empty tag name is representable through the builder but malformed;
    /// the traversal rejects it before constructing anything.
    pub fn is_well_formed(&self) -> bool {
        match self {
            ElementKind::Tag(name) => !name.is_empty(),
            ElementKind::Text(_) => true,
        }
    }
}

/// One node of the declarative input tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    attributes: FxHashMap<String, String>,
    children: Vec<Element>,
}

impl Element {
    /// Element with the given tag name, no attributes, no children.
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            kind: ElementKind::Tag(tag.into()),
            attributes: FxHashMap::default(),
            children: Vec::new(),
        }
    }

    /// Plain text element.
    pub fn text(content: impl Into<String>) -> Self {
        Element {
            kind: ElementKind::Text(content.into()),
            attributes: FxHashMap::default(),
            children: Vec::new(),
        }
    }

    /// Set one attribute.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Append one child.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append children in order.
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Element kind.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Attribute map (children excluded).
    pub fn attributes(&self) -> &FxHashMap<String, String> {
        &self.attributes
    }

    /// Ordered child descriptors.
    pub fn child_elements(&self) -> &[Element] {
        &self.children
    }

    /// Move the child descriptors out, leaving the element childless.
    pub(crate) fn take_children(&mut self) -> Vec<Element> {
        std::mem::take(&mut self.children)
    }
}
