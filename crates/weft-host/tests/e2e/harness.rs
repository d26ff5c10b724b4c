//! Shared fixtures for the end-to-end suite.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use weft_engine::{Element, Renderer, TaskQueue, Timestamp};
use weft_host::{AmpleDeadline, ManualHost, RecordingTree};

/// The sample document: `div[p[text a], text b]`.
pub fn sample_tree() -> Element {
    Element::new("div")
        .child(Element::new("p").child(Element::text("a")))
        .child(Element::text("b"))
}

/// Renderer over a fresh manual host and recording tree.
pub fn renderer_fixture() -> (
    Arc<ManualHost>,
    RecordingTree,
    Renderer<RecordingTree, ManualHost>,
) {
    let host = ManualHost::new();
    let tree = RecordingTree::new();
    let renderer = Renderer::new(Arc::clone(&host), tree.clone());
    (host, tree, renderer)
}

/// Task queue over a fresh manual host.
pub fn queue_fixture() -> (Arc<ManualHost>, Arc<TaskQueue<ManualHost>>) {
    let host = ManualHost::new();
    let queue = Arc::new(TaskQueue::new(Arc::clone(&host)));
    (host, queue)
}

/// Drive idle slices with an ample budget until the renderer goes quiet.
/// Returns how many slices ran.
pub fn drain_renderer(host: &ManualHost) -> usize {
    let mut slices = 0;
    while let Some(result) = host.fire_idle_slice(&AmpleDeadline) {
        result.expect("unit of work failed");
        slices += 1;
    }
    slices
}

/// Shared execution-order log for task callbacks.
pub fn task_log() -> Arc<Mutex<Vec<&'static str>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// Timestamp at `ms` milliseconds past the host epoch.
pub fn at_ms(ms: u64) -> Timestamp {
    Timestamp::from_offset(Duration::from_millis(ms))
}
