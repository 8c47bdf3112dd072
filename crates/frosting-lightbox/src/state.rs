//! Lightbox state machine

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LightboxState {
    #[default]
    Closed,
    /// Showing the image at `src` (never empty)
    Open { src: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightboxEvent {
    /// A menu card was clicked; `src` is its resolved full-size image, if any
    CardActivated { src: Option<String> },
    BackdropClicked,
    CloseClicked,
    EscapePressed,
}

impl LightboxState {
    pub fn is_open(&self) -> bool {
        matches!(self, LightboxState::Open { .. })
    }

    /// Displayed image source; empty while closed
    pub fn src(&self) -> &str {
        match self {
            LightboxState::Open { src } => src,
            LightboxState::Closed => "",
        }
    }

    pub fn transition(&self, event: LightboxEvent) -> LightboxState {
        match event {
            LightboxEvent::CardActivated { src: Some(src) } if !src.is_empty() => {
                LightboxState::Open { src }
            }
            // No usable image: the request is dropped
            LightboxEvent::CardActivated { .. } => self.clone(),
            LightboxEvent::BackdropClicked
            | LightboxEvent::CloseClicked
            | LightboxEvent::EscapePressed => LightboxState::Closed,
        }
    }
}
