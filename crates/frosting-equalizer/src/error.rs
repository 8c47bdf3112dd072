//! Equalizer error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EqualizerError {
    #[error("Element not found: {0}")]
    MissingElement(String),
}
