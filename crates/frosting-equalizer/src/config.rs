//! Equalizer configuration

use std::time::Duration;

use frosting_dom::{ElementRef, Page};
use serde::{Deserialize, Serialize};

use crate::measure::RevealStyle;

/// A menu section located by a preferred selector, with a looser fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSelector {
    pub preferred: String,
    pub fallback: String,
}

impl SectionSelector {
    pub fn new(preferred: &str, fallback: &str) -> Self {
        Self {
            preferred: preferred.to_string(),
            fallback: fallback.to_string(),
        }
    }

    pub fn resolve(&self, page: &dyn Page) -> Option<ElementRef> {
        page.query(&self.preferred)
            .or_else(|| page.query(&self.fallback))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualizerConfig {
    /// Sections whose tallest height the aside follows
    pub sections: Vec<SectionSelector>,
    pub aside_selector: String,
    /// Images that must settle before the first measurement
    pub image_selector: String,
    /// Upper bound on the wait for images, in milliseconds
    pub timeout_ms: u64,
    /// Quiet period after the last resize, in milliseconds
    pub debounce_ms: u64,
    pub reveal: RevealStyle,
}

impl EqualizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for EqualizerConfig {
    fn default() -> Self {
        Self {
            sections: vec![
                SectionSelector::new(".cake-menu.menu-grid", ".cake-menu"),
                SectionSelector::new(".cookies-menu.menu-grid", ".cookies-menu"),
                SectionSelector::new(".other-menu.menu-grid", ".other-menu"),
            ],
            aside_selector: ".menu-about".to_string(),
            image_selector: ".menu-card img".to_string(),
            timeout_ms: 1500,
            debounce_ms: 120,
            reveal: RevealStyle::default(),
        }
    }
}
