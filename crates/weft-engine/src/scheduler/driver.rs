//! Generic slice driver shared by both scheduler façades.
//!
//! A [`Driver`] owns a pending work source, the "driver scheduled" flag and
//! the pass loop that executes units until the slice budget is spent or the
//! source drains. The façades differ only in which host primitive re-arms
//! them and how their budget is measured.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};
use parking_lot::Mutex;

use crate::error::EngineError;
use crate::host::Host;
use crate::scheduler::{SchedulerConfig, SchedulerStats};
use crate::time::Timestamp;

/// Outcome of offering one unit to a work source.
pub(crate) enum Progress {
    /// A unit executed.
    Ran,
    /// The front task was not yet due and went to the back of the queue.
    Deferred,
}

/// A source of discrete, interruptible units of work.
///
/// `run_next` must release any lock it shares with submission paths before
/// invoking user code, so work can be scheduled from inside a running unit.
pub(crate) trait WorkSource: Send + 'static {
    /// Number of units currently pending.
    fn pending(&self) -> usize;

    /// Offer the next unit. Only called while `pending() > 0`. On `Err`
    /// the failed unit must stay current so the next slice can retry it.
    fn run_next(&mut self, now: Timestamp) -> Result<Progress, EngineError>;
}

/// How a driver pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    /// The source drained; the scheduled flag was cleared.
    Drained,
    /// Budget spent (or nothing runnable this slice) with work remaining;
    /// the caller must re-arm.
    Yielded,
}

/// Shared state behind both scheduler façades.
pub(crate) struct Driver<S, H> {
    pub(crate) host: Arc<H>,
    pub(crate) config: SchedulerConfig,
    pub(crate) source: Mutex<S>,

    /// True while a slice is requested or a pass is running. Atomic so a
    /// re-entrant schedule call never needs the source lock.
    pub(crate) scheduled: AtomicBool,

    stats: Mutex<SchedulerStats>,
}

impl<S: WorkSource, H: Host> Driver<S, H> {
    pub(crate) fn new(host: Arc<H>, config: SchedulerConfig, source: S) -> Arc<Self> {
        Arc::new(Driver {
            host,
            config,
            source: Mutex::new(source),
            scheduled: AtomicBool::new(false),
            stats: Mutex::new(SchedulerStats::default()),
        })
    }

    /// Set the scheduled flag; true when this caller armed it.
    pub(crate) fn try_arm(&self) -> bool {
        !self.scheduled.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn is_scheduled(&self) -> bool {
        self.scheduled.load(Ordering::Acquire)
    }

    pub(crate) fn stats(&self) -> SchedulerStats {
        *self.stats.lock()
    }

    /// Run one slice: execute units until the budget closure reports the
    /// slice spent, the source drains, or a full cycle of offers produced
    /// only deferrals (nothing can become due until time advances).
    ///
    /// The budget is queried between units, never before the first, so
    /// every slice makes progress and a source that drains on its last
    /// unit terminates without arming a further slice. On `Err` the
    /// pending unit stays current and the scheduled flag stays set; the
    /// caller re-arms before propagating.
    pub(crate) fn drive_pass(
        &self,
        mut out_of_time: impl FnMut(Timestamp) -> bool,
    ) -> Result<Pass, EngineError> {
        let mut executed = 0u64;
        let mut deferred = 0u64;
        let mut deferral_streak = 0usize;

        let mut source = self.source.lock();
        let pass = loop {
            let remaining = source.pending();
            if remaining == 0 {
                self.scheduled.store(false, Ordering::Release);
                break Pass::Drained;
            }
            // A full cycle of offers with nothing due: yield the slice
            // rather than re-offering against a clock that has not moved.
            if deferral_streak >= remaining {
                break Pass::Yielded;
            }
            if executed + deferred > 0 && out_of_time(self.host.now()) {
                break Pass::Yielded;
            }

            match source.run_next(self.host.now()) {
                Ok(Progress::Ran) => {
                    executed += 1;
                    deferral_streak = 0;
                }
                Ok(Progress::Deferred) => {
                    deferred += 1;
                    deferral_streak += 1;
                }
                Err(err) => {
                    drop(source);
                    self.record(executed, deferred);
                    return Err(err);
                }
            }
        };
        drop(source);
        self.record(executed, deferred);

        match pass {
            Pass::Drained => debug!("slice drained its work source after {executed} unit(s)"),
            Pass::Yielded => trace!("slice yielded with work pending, {executed} unit(s) run"),
        }
        Ok(pass)
    }

    fn record(&self, executed: u64, deferred: u64) {
        let mut stats = self.stats.lock();
        stats.executed += executed;
        stats.deferred += deferred;
        stats.slices += 1;
    }
}
