//! Frosting Lightbox
//!
//! Clicking a menu card opens an enlarged preview of its image. The preview
//! closes on backdrop click, the close button, or Escape.
//!
//! ```text
//! Closed ──card click (src)──▶ Open(src)
//!   ▲                            │
//!   └── backdrop / close / Esc ──┘
//! ```

mod controller;
mod error;
mod markup;
mod state;

pub use controller::{LightboxConfig, LightboxController};
pub use error::LightboxError;
pub use markup::LIGHTBOX_MARKUP;
pub use state::{LightboxEvent, LightboxState};

pub type Result<T> = std::result::Result<T, LightboxError>;
