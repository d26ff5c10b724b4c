//! Weft is a cooperative, time-sliced work scheduler.
//!
//! Weft executes a large unit of work (rendering an element tree, or
//! draining a queue of deferred callbacks) incrementally across many short
//! host-granted time slices, so the host's periodic refresh duty is never
//! blocked for more than a small bounded duration. Two ideas carry the
//! crate:
//!
//! - **Fibers** ([`fiber`], [`traversal`]): a recursive tree render
//!   decomposed into explicit, resumable units of work over
//!   parent/child/sibling linked work nodes, giving an interruptible
//!   traversal with O(1) next-unit computation and no recursion.
//! - **Slice drivers** ([`scheduler`]): a generic driver that executes
//!   units within a time budget and re-yields control to the host between
//!   slices, with two façades: the incremental [`Renderer`] and the
//!   expiring [`TaskQueue`].
//!
//! All timing and output-tree mutation goes through injected [`host`]
//! capabilities, so a deterministic fake host can drive everything in
//! tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use weft_engine::{Element, Renderer};
//!
//! let tree = Element::new("div")
//!     .child(Element::new("p").child(Element::text("a")))
//!     .child(Element::text("b"));
//!
//! let renderer = Renderer::new(host, output);
//! renderer.render(tree, container);
//! // Host idle slices now drive the traversal one unit at a time.
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Declarative element descriptors.
pub mod element;

/// Engine error types.
pub mod error;

/// Fiber work nodes and their ids.
pub mod fiber;

/// Injected host capabilities.
pub mod host;

/// Slice drivers: the incremental renderer and the expiring task queue.
pub mod scheduler;

/// Host-relative timestamps.
pub mod time;

/// Iterative depth-first traversal over fibers.
pub mod traversal;


pub use element::{Element, ElementKind};
pub use error::EngineError;
pub use fiber::{Fiber, FiberId};
pub use host::{FrameCallback, Host, IdleCallback, IdleDeadline, Macrotask, OutputTree};
pub use scheduler::{Renderer, SchedulerConfig, SchedulerStats, TaskQueue};
pub use time::Timestamp;
pub use traversal::Traversal;
