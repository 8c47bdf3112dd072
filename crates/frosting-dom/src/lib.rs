//! Frosting DOM Layer
//!
//! Everything the page behaviours need from a browser, expressed as the
//! [`Page`] trait. [`Document`] is an in-memory implementation used by the
//! controller crates' tests; the web crate binds the same trait to `web-sys`.

mod document;
mod error;
mod event;
mod page;
mod snapshot;

pub use document::Document;
pub use error::DomError;
pub use event::{DomEvent, EventKind, EventTarget, Handler, Key, ListenerId};
pub use page::{ElementRef, Page};
pub use snapshot::parse_selector;

pub type Result<T> = std::result::Result<T, DomError>;
