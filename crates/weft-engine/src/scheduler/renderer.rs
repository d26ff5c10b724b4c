//! Incremental renderer: the idle-slice façade over the generic driver.

use std::sync::Arc;

use crate::element::Element;
use crate::error::EngineError;
use crate::fiber::FiberId;
use crate::host::{Host, IdleDeadline, OutputTree};
use crate::scheduler::driver::{Driver, Pass, Progress, WorkSource};
use crate::scheduler::{SchedulerConfig, SchedulerStats};
use crate::time::Timestamp;
use crate::traversal::Traversal;

/// Pending traversal work: the fiber arena, the output tree and the cursor.
struct RenderSource<O: OutputTree> {
    output: O,
    walk: Option<Traversal<O>>,
    next: Option<FiberId>,
}

impl<O> WorkSource for RenderSource<O>
where
    O: OutputTree + Send + 'static,
    O::Handle: Send,
{
    fn pending(&self) -> usize {
        usize::from(self.next.is_some())
    }

    fn run_next(&mut self, _now: Timestamp) -> Result<Progress, EngineError> {
        if let (Some(walk), Some(cursor)) = (self.walk.as_mut(), self.next) {
            // The cursor advances only when the unit fully completed; on
            // `Err` it stays on the failed unit for the next slice.
            self.next = walk.perform_unit_of_work(&mut self.output, cursor)?;
        }
        Ok(Progress::Ran)
    }
}

/// Incremental renderer: walks an element tree across host idle slices.
///
/// [`render`](Renderer::render) resets the pending traversal to the seeded
/// root and ensures a driver is scheduled. Each idle slice performs units
/// of work until the host reports less than
/// [`min_slice`](SchedulerConfig::min_slice) remaining, then re-requests an
/// idle slice; when the traversal completes the driver goes quiet until the
/// next `render` call.
pub struct Renderer<O: OutputTree, H: Host> {
    driver: Arc<Driver<RenderSource<O>, H>>,
}

impl<O, H> Renderer<O, H>
where
    O: OutputTree + Send + 'static,
    O::Handle: Send,
    H: Host,
{
    /// Renderer over `output`, driven by `host`, with default policy.
    pub fn new(host: Arc<H>, output: O) -> Self {
        Self::with_config(host, output, SchedulerConfig::default())
    }

    /// Renderer with explicit policy constants.
    pub fn with_config(host: Arc<H>, output: O, config: SchedulerConfig) -> Self {
        Renderer {
            driver: Driver::new(
                host,
                config,
                RenderSource {
                    output,
                    walk: None,
                    next: None,
                },
            ),
        }
    }

    /// Reset scheduler state to a single pending unit of work (the seeded
    /// root fiber) and ensure a driver is scheduled.
    pub fn render(&self, root: Element, container: O::Handle) {
        {
            let mut source = self.driver.source.lock();
            let (walk, first) = Traversal::begin(root, container);
            source.walk = Some(walk);
            source.next = Some(first);
        }
        if self.driver.try_arm() {
            Self::arm(&self.driver);
        }
    }

    /// Counters across all slices so far.
    pub fn stats(&self) -> SchedulerStats {
        self.driver.stats()
    }

    /// Whether a driver slice is currently requested or running.
    pub fn is_scheduled(&self) -> bool {
        self.driver.is_scheduled()
    }

    /// Borrow the output tree, e.g. to inspect it after the traversal.
    pub fn with_output<R>(&self, f: impl FnOnce(&O) -> R) -> R {
        f(&self.driver.source.lock().output)
    }

    /// Request the next idle slice.
    fn arm(driver: &Arc<Driver<RenderSource<O>, H>>) {
        let drv = Arc::clone(driver);
        driver
            .host
            .request_idle_slice(Box::new(move |deadline: &dyn IdleDeadline| {
                let min_slice = drv.config.min_slice;
                match drv.drive_pass(|_| deadline.time_remaining() < min_slice) {
                    Ok(Pass::Drained) => Ok(()),
                    Ok(Pass::Yielded) => {
                        Self::arm(&drv);
                        Ok(())
                    }
                    Err(err) => {
                        // Work stays on the failed unit; give the next slice
                        // a chance before surfacing the error to the host.
                        Self::arm(&drv);
                        Err(err)
                    }
                }
            }));
    }
}
