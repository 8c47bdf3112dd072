//! Frosting Navigation
//!
//! Mobile navigation toggle: a control that opens and closes the nav panel
//! and mirrors the state into `aria-expanded`.

mod controller;
mod error;
mod toggle;

pub use controller::MenuToggleController;
pub use error::NavigationError;
pub use toggle::{MenuState, MenuToggleConfig};

pub type Result<T> = std::result::Result<T, NavigationError>;
