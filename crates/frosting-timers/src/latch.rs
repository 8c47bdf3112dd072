//! Fire-once countdown

use std::cell::{Cell, RefCell};

use crate::scheduler::Task;

/// Calls its callback exactly once: when the count reaches zero or when
/// released early, whichever happens first.
pub struct CountdownLatch {
    remaining: Cell<usize>,
    callback: RefCell<Option<Task>>,
}

impl CountdownLatch {
    /// A latch waiting for `count` signals. A zero count fires immediately.
    pub fn new(count: usize, callback: Task) -> Self {
        let latch = Self {
            remaining: Cell::new(count),
            callback: RefCell::new(Some(callback)),
        };
        if count == 0 {
            latch.fire();
        }
        latch
    }

    /// Record one signal. Returns true if this call fired the callback.
    pub fn count_down(&self) -> bool {
        let remaining = self.remaining.get().saturating_sub(1);
        self.remaining.set(remaining);
        remaining == 0 && self.fire()
    }

    /// Fire now regardless of outstanding signals. Returns true if this call
    /// fired the callback.
    pub fn release(&self) -> bool {
        self.remaining.set(0);
        self.fire()
    }

    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }

    pub fn is_released(&self) -> bool {
        self.callback.borrow().is_none()
    }

    fn fire(&self) -> bool {
        let callback = self.callback.borrow_mut().take();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}
