//! Events delivered to page listeners

use std::cell::Cell;
use std::rc::Rc;

use crate::page::ElementRef;

/// The event types the page behaviours subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Document finished parsing (`DOMContentLoaded`)
    Ready,
    Click,
    KeyDown,
    /// Window resized
    Resize,
    /// Image finished loading
    Load,
    /// Image failed to load
    Error,
}

impl EventKind {
    /// DOM event type name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Ready => "DOMContentLoaded",
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
            EventKind::Resize => "resize",
            EventKind::Load => "load",
            EventKind::Error => "error",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Document,
    Element(ElementRef),
}

/// Keyboard key, named after `KeyboardEvent.key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Other(String),
}

impl Key {
    /// Parse a `KeyboardEvent.key` value.
    ///
    /// Accepts the legacy short names (`Esc`, `Left`, ...) some older engines
    /// still report.
    pub fn from_dom(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "Enter" => Key::Enter,
            other => Key::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Key::Escape => "Escape",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::Enter => "Enter",
            Key::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dispatched event as seen by a listener
#[derive(Debug)]
pub struct DomEvent {
    pub kind: EventKind,
    /// Element the event originated on (`None` for window/document events)
    pub target: Option<ElementRef>,
    /// Pressed key for `KeyDown`
    pub key: Option<Key>,
    default_prevented: Cell<bool>,
}

impl DomEvent {
    pub fn new(kind: EventKind, target: Option<ElementRef>) -> Self {
        Self {
            kind,
            target,
            key: None,
            default_prevented: Cell::new(false),
        }
    }

    pub fn key_down(target: Option<ElementRef>, key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyDown, target)
        }
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Identifies a registered listener so it can be removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Listener callback
pub type Handler = Rc<dyn Fn(&DomEvent)>;
