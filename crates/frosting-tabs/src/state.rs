//! Tab selection state machine
//!
//! States are "tab i is active" for i in 0..n. Every event moves to exactly
//! one state, so the one-active-tab invariant holds by construction.

use frosting_dom::Key;
use serde::{Deserialize, Serialize};

use crate::error::TabError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabEvent {
    /// Pointer activation of a tab
    Select(usize),
    /// Move to the tab after `from`, wrapping at the end
    Next { from: usize },
    /// Move to the tab before `from`, wrapping at the start
    Previous { from: usize },
}

impl TabEvent {
    /// Arrow-key navigation from the tab at `from`.
    ///
    /// Right/Down advance, Left/Up go back; other keys are not tab events.
    pub fn from_key(key: &Key, from: usize) -> Option<Self> {
        match key {
            Key::ArrowRight | Key::ArrowDown => Some(TabEvent::Next { from }),
            Key::ArrowLeft | Key::ArrowUp => Some(TabEvent::Previous { from }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSet {
    len: usize,
    active: usize,
}

impl TabSet {
    pub fn new(len: usize, initial: usize) -> Result<Self> {
        if len == 0 {
            return Err(TabError::NoTabs(String::new()));
        }
        check_index(initial, len)?;

        Ok(Self {
            len,
            active: initial,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Where `event` leads from the current state, without applying it
    pub fn target(&self, event: TabEvent) -> Result<usize> {
        match event {
            TabEvent::Select(index) => check_index(index, self.len).map(|_| index),
            TabEvent::Next { from } => {
                check_index(from, self.len)?;
                Ok((from + 1) % self.len)
            }
            TabEvent::Previous { from } => {
                check_index(from, self.len)?;
                Ok((from + self.len - 1) % self.len)
            }
        }
    }

    pub fn apply(&mut self, event: TabEvent) -> Result<Transition> {
        let to = self.target(event)?;
        let transition = Transition {
            from: self.active,
            to,
        };
        self.active = to;
        Ok(transition)
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(TabError::OutOfRange { index, len })
    }
}
