//! One-shot timers

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::time::Duration;

/// Deferred work
pub type Task = Box<dyn FnOnce()>;

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Runs tasks after a delay on the event loop
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerId;

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    fn cancel(&self, id: TimerId) -> bool;
}

/// Scheduler driven by a simulated clock.
///
/// Nothing runs until [`ManualScheduler::advance`] moves time forward.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    /// Keyed by `(deadline, id)` so equal deadlines run in scheduling order
    queue: RefCell<BTreeMap<(Duration, TimerId), Task>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the scheduler was created
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Move the clock forward by `by`, running every task that falls due.
    ///
    /// Tasks scheduled while advancing run in the same call if their deadline
    /// is within the window.
    pub fn advance(&self, by: Duration) {
        let until = self.now.get() + by;

        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                match queue.keys().next().copied() {
                    Some(key) if key.0 <= until => queue.remove(&key).map(|task| (key, task)),
                    _ => None,
                }
            };

            let Some(((deadline, id), task)) = next else {
                break;
            };

            self.now.set(deadline);
            tracing::trace!(timer = id.0, at_ms = deadline.as_millis() as u64, "Timer fired");
            task();
        }

        self.now.set(until);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let deadline = self.now.get() + delay;
        self.queue.borrow_mut().insert((deadline, id), task);
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut queue = self.queue.borrow_mut();
        let key = queue.keys().find(|(_, timer)| *timer == id).copied();
        match key {
            Some(key) => queue.remove(&key).is_some(),
            None => false,
        }
    }
}
