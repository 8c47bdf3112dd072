//! Tab error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabError {
    #[error("No tabs found for selector: {0}")]
    NoTabs(String),

    #[error("Tab index {index} out of range for {len} tabs")]
    OutOfRange { index: usize, len: usize },
}
