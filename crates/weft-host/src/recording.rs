//! Output tree that records construction and attachment order.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use weft_engine::{ElementKind, EngineError, OutputTree};

/// One node recorded by [`RecordingTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedNode {
    /// Display label: the tag name, `text:<content>`, or `container`.
    pub label: String,

    /// Parent node index, set when the node is attached.
    pub parent: Option<usize>,

    /// Attributes the node was constructed with, sorted by name.
    pub attributes: Vec<(String, String)>,
}

/// Output tree whose handles index a shared node table; every attachment
/// is logged in order.
///
/// Clones share the same underlying table, so a test can keep one clone
/// while the renderer owns another.
#[derive(Clone, Default)]
pub struct RecordingTree {
    inner: Arc<Mutex<Recorded>>,
}

#[derive(Default)]
struct Recorded {
    nodes: Vec<RecordedNode>,
    attach_log: Vec<(usize, usize)>,
}

impl RecordingTree {
    /// Empty tree.
    pub fn new() -> Self {
        RecordingTree::default()
    }

    /// Allocate the container node the traversal attaches the root under.
    pub fn container(&self) -> usize {
        let mut inner = self.inner.lock();
        let id = inner.nodes.len();
        inner.nodes.push(RecordedNode {
            label: "container".to_string(),
            parent: None,
            attributes: Vec::new(),
        });
        id
    }

    /// Number of constructed nodes, containers included.
    pub fn node_count(&self) -> usize {
        self.inner.lock().nodes.len()
    }

    /// Snapshot of one node.
    pub fn node(&self, id: usize) -> Option<RecordedNode> {
        self.inner.lock().nodes.get(id).cloned()
    }

    /// Raw attachment log as `(child, parent)` node indices, in order.
    pub fn attachments(&self) -> Vec<(usize, usize)> {
        self.inner.lock().attach_log.clone()
    }

    /// Attachment log as `(child label, parent label)` pairs, in order.
    pub fn attach_sequence(&self) -> Vec<(String, String)> {
        let inner = self.inner.lock();
        inner
            .attach_log
            .iter()
            .map(|&(child, parent)| {
                (
                    inner.nodes[child].label.clone(),
                    inner.nodes[parent].label.clone(),
                )
            })
            .collect()
    }

    /// How many attachments have happened.
    pub fn attach_count(&self) -> usize {
        self.inner.lock().attach_log.len()
    }
}

impl OutputTree for RecordingTree {
    type Handle = usize;

    fn construct_node(
        &mut self,
        kind: &ElementKind,
        attributes: &FxHashMap<String, String>,
    ) -> Result<usize, EngineError> {
        let label = match kind {
            ElementKind::Tag(name) => name.clone(),
            ElementKind::Text(content) => format!("text:{content}"),
        };
        let mut attrs: Vec<(String, String)> = attributes
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        attrs.sort();

        let mut inner = self.inner.lock();
        let id = inner.nodes.len();
        inner.nodes.push(RecordedNode {
            label,
            parent: None,
            attributes: attrs,
        });
        Ok(id)
    }

    fn attach_child(&mut self, parent: &usize, child: &usize) {
        let mut inner = self.inner.lock();
        inner.nodes[*child].parent = Some(*parent);
        inner.attach_log.push((*child, *parent));
    }
}
