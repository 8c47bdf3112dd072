//! Lightbox error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LightboxError {
    #[error("Lightbox markup is incomplete: missing {0}")]
    IncompleteMarkup(String),

    #[error("DOM error: {0}")]
    Dom(#[from] frosting_dom::DomError),
}
