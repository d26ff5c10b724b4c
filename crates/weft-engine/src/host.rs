//! Injected host capabilities.
//!
//! The core never talks to a real event loop, output document, or clock.
//! Everything time- or output-shaped is a capability the embedding host
//! passes in, so a deterministic fake host can drive the engine in tests.
//!
//! Driver errors escape through the callback return values: the host invokes
//! a callback, and whatever `Err` it returns is the host's to handle. The
//! scheduler defines no recovery policy of its own.

use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::element::ElementKind;
use crate::error::EngineError;
use crate::time::Timestamp;

/// Remaining-time query handed to an idle-slice callback.
pub trait IdleDeadline {
    /// Time left in the current idle slice.
    fn time_remaining(&self) -> Duration;
}

/// Callback driven during host idle time.
pub type IdleCallback = Box<dyn FnOnce(&dyn IdleDeadline) -> Result<(), EngineError> + Send>;

/// Callback invoked once before the next refresh, with the frame start time.
pub type FrameCallback = Box<dyn FnOnce(Timestamp) -> Result<(), EngineError> + Send>;

/// Callback scheduled as a macrotask, after any pending microtasks.
pub type Macrotask = Box<dyn FnOnce() + Send>;

/// Timing and deferral primitives the host environment provides.
pub trait Host: Send + Sync + 'static {
    /// Current monotonic time.
    fn now(&self) -> Timestamp;

    /// Invoke `callback` when the host next has spare time.
    fn request_idle_slice(&self, callback: IdleCallback);

    /// Invoke `callback` once before the next refresh.
    fn request_animation_slice(&self, callback: FrameCallback);

    /// Run `task` as a macrotask, after any pending microtasks.
    fn post_macrotask(&self, task: Macrotask);
}

/// The two output-tree mutation primitives the traversal engine invokes.
pub trait OutputTree {
    /// Cheap, clonable reference to a constructed output node.
    type Handle: Clone;

    /// Allocate one output node of the given kind. Does not attach it.
    fn construct_node(
        &mut self,
        kind: &ElementKind,
        attributes: &FxHashMap<String, String>,
    ) -> Result<Self::Handle, EngineError>;

    /// Attach `child` under `parent`.
    fn attach_child(&mut self, parent: &Self::Handle, child: &Self::Handle);
}
