//! Engine error types.

use crate::fiber::FiberId;

/// Errors surfaced by the traversal engine and slice drivers.
///
/// Task callbacks have no return value, so only tree-side units of work are
/// fallible. An error escaping a unit of work is not caught by the driver:
/// it propagates to the host's callback-invocation boundary with the pending
/// cursor still on the failed unit, and the next slice can retry it.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Element descriptor has an empty kind; rejected before any output
    /// node is constructed.
    #[error("element descriptor has an empty kind")]
    MissingKind,

    /// A unit of work was performed again after it already completed.
    #[error("unit of work for fiber {0} already performed")]
    FiberAlreadyVisited(FiberId),

    /// Fiber id does not belong to this traversal's arena.
    #[error("fiber {0} does not exist in this traversal")]
    UnknownFiber(FiberId),

    /// A fiber was visited before its parent produced an output node.
    #[error("fiber {0} visited before its parent was materialized")]
    ParentNotMaterialized(FiberId),

    /// The host failed to construct an output node.
    #[error("output node construction failed: {0}")]
    Output(String),
}
