//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("DOM error: {0}")]
    Dom(#[from] frosting_dom::DomError),

    #[error("Tab error: {0}")]
    Tab(#[from] frosting_tabs::TabError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] frosting_navigation::NavigationError),

    #[error("Lightbox error: {0}")]
    Lightbox(#[from] frosting_lightbox::LightboxError),

    #[cfg(feature = "equalizer")]
    #[error("Equalizer error: {0}")]
    Equalizer(#[from] frosting_equalizer::EqualizerError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
