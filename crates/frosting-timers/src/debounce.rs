//! Debouncing

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::scheduler::{Scheduler, Task, TimerId};

/// Runs the most recent task once no new call has arrived for `delay`.
///
/// All calls share one pending timer; each call cancels it before
/// scheduling the replacement.
pub struct Debouncer {
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
    pending: Rc<Cell<Option<TimerId>>>,
}

impl Debouncer {
    pub fn new(scheduler: Rc<dyn Scheduler>, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: Rc::new(Cell::new(None)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the quiet period with `task` as the work to run at its end
    pub fn call(&self, task: Task) {
        self.cancel();

        let slot = Rc::clone(&self.pending);
        let id = self.scheduler.schedule(
            self.delay,
            Box::new(move || {
                slot.set(None);
                task();
            }),
        );
        self.pending.set(Some(id));
    }

    /// Drop the pending task, if any
    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
