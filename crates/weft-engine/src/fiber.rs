//! Fiber work nodes.
//!
//! A fiber is the explicit, linked representation of one tree element's
//! pending or completed work, replacing a recursive call frame. Fibers live
//! in an arena owned by the traversal and refer to each other by index:
//! `child` and `sibling` are the owning directions, `parent` is the weak
//! back-reference. The three links support iterative depth-first traversal
//! with O(1) next-unit computation, no recursion and no explicit stack.

use std::fmt;

use crate::element::Element;

/// Index of a fiber in its traversal's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiberId(pub(crate) u32);

impl FiberId {
    /// Numeric index value.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FiberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One pending or completed visit to a tree element.
pub struct Fiber<H> {
    /// Descriptor this fiber materializes. Its child descriptors are moved
    /// out when the fiber is visited.
    pub(crate) element: Element,

    /// Back-reference to the parent fiber, never owning.
    pub(crate) parent: Option<FiberId>,

    /// First child, reachable only through this fiber.
    pub(crate) child: Option<FiberId>,

    /// Next sibling, reachable only through this fiber (or the parent for
    /// a first child).
    pub(crate) sibling: Option<FiberId>,

    /// Constructed output node, absent until first visited. The synthetic
    /// root carries the host container from the start.
    pub(crate) output: Option<H>,

    /// Set once this fiber's unit of work has fully completed.
    pub(crate) visited: bool,
}

impl<H> Fiber<H> {
    pub(crate) fn new(element: Element, parent: Option<FiberId>) -> Self {
        Fiber {
            element,
            parent,
            child: None,
            sibling: None,
            output: None,
            visited: false,
        }
    }

    /// Element descriptor this fiber materializes.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Parent fiber, if any.
    pub fn parent(&self) -> Option<FiberId> {
        self.parent
    }

    /// First child fiber, once linked.
    pub fn child(&self) -> Option<FiberId> {
        self.child
    }

    /// Next sibling fiber, once linked.
    pub fn sibling(&self) -> Option<FiberId> {
        self.sibling
    }

    /// Handle of the constructed output node, once materialized.
    pub fn output(&self) -> Option<&H> {
        self.output.as_ref()
    }

    /// Whether this fiber's unit of work has completed.
    pub fn is_visited(&self) -> bool {
        self.visited
    }
}
