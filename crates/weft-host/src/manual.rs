//! Manually pumped host implementation.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::trace;
use parking_lot::Mutex;

use weft_engine::{
    EngineError, FrameCallback, Host, IdleCallback, IdleDeadline, Macrotask, Timestamp,
};

/// Host whose clock and callback queues only move when a test pumps them.
///
/// Callback queues are first-in first-out: `fire_*` invokes the oldest
/// pending request, and requests made from inside a callback land behind
/// any already queued, exactly like a real event loop.
#[derive(Default)]
pub struct ManualHost {
    state: Mutex<HostState>,
}

#[derive(Default)]
struct HostState {
    now: Duration,
    idle: VecDeque<IdleCallback>,
    frames: VecDeque<FrameCallback>,
    macrotasks: VecDeque<Macrotask>,
}

impl ManualHost {
    /// Host at its epoch with empty queues.
    pub fn new() -> Arc<Self> {
        Arc::new(ManualHost::default())
    }

    /// Advance the fake clock.
    pub fn advance(&self, by: Duration) {
        self.state.lock().now += by;
    }

    /// Run every queued macrotask in order, including ones queued while
    /// running. Returns how many ran.
    pub fn run_macrotasks(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.state.lock().macrotasks.pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Invoke the oldest pending idle callback with the given deadline.
    ///
    /// `None` when no idle slice was requested.
    pub fn fire_idle_slice(
        &self,
        deadline: &dyn IdleDeadline,
    ) -> Option<Result<(), EngineError>> {
        let callback = self.state.lock().idle.pop_front()?;
        Some(callback(deadline))
    }

    /// Invoke the oldest pending animation callback with the current time
    /// as the frame start.
    ///
    /// `None` when no animation slice was requested.
    pub fn fire_animation_slice(&self) -> Option<Result<(), EngineError>> {
        let (callback, start) = {
            let mut state = self.state.lock();
            let callback = state.frames.pop_front()?;
            (callback, Timestamp::from_offset(state.now))
        };
        Some(callback(start))
    }

    /// Pending idle-slice requests.
    pub fn pending_idle(&self) -> usize {
        self.state.lock().idle.len()
    }

    /// Pending animation-slice requests.
    pub fn pending_frames(&self) -> usize {
        self.state.lock().frames.len()
    }

    /// Pending macrotasks.
    pub fn pending_macrotasks(&self) -> usize {
        self.state.lock().macrotasks.len()
    }
}

impl Host for ManualHost {
    fn now(&self) -> Timestamp {
        Timestamp::from_offset(self.state.lock().now)
    }

    fn request_idle_slice(&self, callback: IdleCallback) {
        trace!("idle slice requested");
        self.state.lock().idle.push_back(callback);
    }

    fn request_animation_slice(&self, callback: FrameCallback) {
        trace!("animation slice requested");
        self.state.lock().frames.push_back(callback);
    }

    fn post_macrotask(&self, task: Macrotask) {
        trace!("macrotask posted");
        self.state.lock().macrotasks.push_back(task);
    }
}

/// Idle deadline that never runs out.
pub struct AmpleDeadline;

impl IdleDeadline for AmpleDeadline {
    fn time_remaining(&self) -> Duration {
        Duration::from_secs(1)
    }
}

/// Idle deadline whose first `fresh_queries` calls report ample time and
/// whose later calls report none.
///
/// A driver that queries the budget between units therefore performs
/// `fresh_queries + 1` units in the slice before yielding.
pub struct CountdownDeadline {
    remaining: AtomicUsize,
}

impl CountdownDeadline {
    /// Deadline that stays fresh for `fresh_queries` budget checks.
    pub fn new(fresh_queries: usize) -> Self {
        CountdownDeadline {
            remaining: AtomicUsize::new(fresh_queries),
        }
    }
}

impl IdleDeadline for CountdownDeadline {
    fn time_remaining(&self) -> Duration {
        let fresh = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok();
        if fresh {
            Duration::from_millis(5)
        } else {
            Duration::ZERO
        }
    }
}
