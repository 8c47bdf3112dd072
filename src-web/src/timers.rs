//! Ownership of `setTimeout` callbacks

use std::collections::HashMap;

/// Callbacks for live timer handles.
///
/// A cleared timer's callback is handed back to the caller to drop. A fired
/// one is still on the stack when it reports in, so it is parked until the
/// next timer fires.
pub struct TimerTable<C> {
    live: HashMap<i32, C>,
    finished: Option<C>,
}

impl<C> Default for TimerTable<C> {
    fn default() -> Self {
        Self {
            live: HashMap::new(),
            finished: None,
        }
    }
}

impl<C> TimerTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: i32, callback: C) {
        self.live.insert(handle, callback);
    }

    /// Record that `handle` fired. Returns false if it was not live.
    pub fn fired(&mut self, handle: i32) -> bool {
        match self.live.remove(&handle) {
            Some(callback) => {
                self.finished = Some(callback);
                true
            }
            None => false,
        }
    }

    /// Take the callback of a timer being cleared
    pub fn cancel(&mut self, handle: i32) -> Option<C> {
        self.live.remove(&handle)
    }

    pub fn is_live(&self, handle: i32) -> bool {
        self.live.contains_key(&handle)
    }

    /// Callbacks still held, live or parked
    pub fn held(&self) -> usize {
        self.live.len() + usize::from(self.finished.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_cancel_releases_callback() {
        let token = Rc::new(());
        let mut table = TimerTable::new();
        table.insert(7, Rc::clone(&token));
        assert!(table.is_live(7));

        let callback = table.cancel(7);
        assert!(callback.is_some());
        drop(callback);
        assert_eq!(Rc::strong_count(&token), 1);
        assert!(table.cancel(7).is_none());
        assert_eq!(table.held(), 0);
    }

    #[test]
    fn test_fired_callback_parked_until_next_fire() {
        let first = Rc::new(());
        let second = Rc::new(());
        let mut table = TimerTable::new();
        table.insert(1, Rc::clone(&first));
        table.insert(2, Rc::clone(&second));

        assert!(table.fired(1));
        assert!(!table.is_live(1));
        assert_eq!(Rc::strong_count(&first), 2, "still running");
        assert!(table.cancel(1).is_none());

        assert!(table.fired(2));
        assert_eq!(Rc::strong_count(&first), 1);
        assert_eq!(table.held(), 1);
        assert!(!table.fired(2));
    }

    #[test]
    fn test_resize_burst_holds_one_timer() {
        let mut table = TimerTable::new();
        let mut tokens = Vec::new();
        let mut pending = None;

        // Debounced resize: each event clears the previous timer
        for handle in 1..=60 {
            if let Some(previous) = pending.take() {
                drop(table.cancel(previous));
            }
            let token = Rc::new(());
            table.insert(handle, Rc::clone(&token));
            tokens.push(token);
            pending = Some(handle);
        }

        assert_eq!(table.held(), 1);
        assert!(tokens[..59].iter().all(|t| Rc::strong_count(t) == 1));
        assert_eq!(Rc::strong_count(&tokens[59]), 2);
    }
}
