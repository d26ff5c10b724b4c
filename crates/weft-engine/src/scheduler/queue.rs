//! Expiring task queue: the frame-slice façade over the generic driver.

use std::collections::VecDeque;
use std::sync::Arc;

use log::trace;
use parking_lot::Mutex;

use crate::error::EngineError;
use crate::host::Host;
use crate::scheduler::driver::{Driver, Pass, Progress, WorkSource};
use crate::scheduler::{SchedulerConfig, SchedulerStats};
use crate::time::Timestamp;

/// A deferred callback with an absolute expiration timestamp.
struct ExpiringTask {
    callback: Box<dyn FnOnce() + Send>,
    expires_at: Timestamp,
}

/// Pending FIFO, shared so submission never needs the driver lock.
type SharedTasks = Arc<Mutex<VecDeque<ExpiringTask>>>;

struct QueueSource {
    tasks: SharedTasks,
}

impl WorkSource for QueueSource {
    fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    fn run_next(&mut self, now: Timestamp) -> Result<Progress, EngineError> {
        // Bind the pop so the queue guard drops before the callback runs.
        let popped = self.tasks.lock().pop_front();
        let task = match popped {
            Some(task) => task,
            None => return Ok(Progress::Ran),
        };
        if now >= task.expires_at {
            // Overdue: run it. The queue lock is already released, so the
            // callback may schedule further tasks.
            (task.callback)();
            Ok(Progress::Ran)
        } else {
            // Not yet due: back of the queue, revisited only after every
            // other queued task has been offered once this pass.
            self.tasks.lock().push_back(task);
            Ok(Progress::Deferred)
        }
    }
}

/// Deadline-tagged callback queue drained within per-frame budgets.
///
/// Tasks are offered in submission order each pass. A task runs only once
/// current time has reached or passed its expiration and is otherwise
/// re-queued behind its siblings; a task with a far-future expiration stays
/// queued until the clock catches up. Scheduling from inside a running task
/// is safe and never double-arms the driver.
pub struct TaskQueue<H: Host> {
    driver: Arc<Driver<QueueSource, H>>,
    tasks: SharedTasks,
}

impl<H: Host> TaskQueue<H> {
    /// Queue driven by `host` with default policy.
    pub fn new(host: Arc<H>) -> Self {
        Self::with_config(host, SchedulerConfig::default())
    }

    /// Queue with explicit policy constants.
    pub fn with_config(host: Arc<H>, config: SchedulerConfig) -> Self {
        let tasks: SharedTasks = Arc::new(Mutex::new(VecDeque::new()));
        TaskQueue {
            driver: Driver::new(
                host,
                config,
                QueueSource {
                    tasks: Arc::clone(&tasks),
                },
            ),
            tasks,
        }
    }

    /// Append a task expiring at `expires_at`; arm the driver if idle.
    ///
    /// Driver start goes through the host's macrotask primitive, so the
    /// host's own rendering work keeps priority over the first frame slice.
    pub fn schedule(&self, callback: impl FnOnce() + Send + 'static, expires_at: Timestamp) {
        self.tasks.lock().push_back(ExpiringTask {
            callback: Box::new(callback),
            expires_at,
        });
        trace!("scheduled task expiring at {:?}", expires_at.as_offset());
        if self.driver.try_arm() {
            let driver = Arc::clone(&self.driver);
            self.driver.host.post_macrotask(Box::new(move || {
                Self::arm(&driver);
            }));
        }
    }

    /// Number of tasks currently pending.
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Whether no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// Counters across all slices so far.
    pub fn stats(&self) -> SchedulerStats {
        self.driver.stats()
    }

    /// Whether a driver slice is currently requested or running.
    pub fn is_scheduled(&self) -> bool {
        self.driver.is_scheduled()
    }

    /// Request the next frame slice.
    fn arm(driver: &Arc<Driver<QueueSource, H>>) {
        let drv = Arc::clone(driver);
        driver.host.request_animation_slice(Box::new(move |frame_start| {
            let frame_budget = drv.config.frame_budget;
            match drv.drive_pass(|now| now.saturating_since(frame_start) >= frame_budget) {
                Ok(Pass::Drained) => Ok(()),
                Ok(Pass::Yielded) => {
                    Self::arm(&drv);
                    Ok(())
                }
                Err(err) => {
                    Self::arm(&drv);
                    Err(err)
                }
            }
        }));
    }
}
