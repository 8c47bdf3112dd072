//! Frosting Equalizer
//!
//! Keeps the "about" aside as tall as the tallest menu section, so switching
//! tabs never changes the page height. Sections hidden behind inactive tabs
//! are measured by revealing them offscreen for the duration of one call.
//!
//! ```text
//! page ready ─▶ images settled (or 1500 ms) ─▶ compute
//! resize ─▶ 120 ms quiet ─▶ compute
//! ```

mod config;
mod equalizer;
mod error;
mod measure;
mod readiness;

pub use config::{EqualizerConfig, SectionSelector};
pub use equalizer::HeightEqualizer;
pub use error::EqualizerError;
pub use measure::{measure_section_height, RevealStyle};
pub use readiness::when_images_ready;

pub type Result<T> = std::result::Result<T, EqualizerError>;
