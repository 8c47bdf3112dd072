//! DOM error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Document has no body")]
    NoBody,

    #[error("Script error: {0}")]
    Script(String),
}
