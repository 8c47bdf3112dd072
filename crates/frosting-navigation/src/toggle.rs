//! Menu toggle state

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn from_open(open: bool) -> Self {
        if open {
            MenuState::Open
        } else {
            MenuState::Closed
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }

    /// Value for the toggle's `aria-expanded` attribute
    pub fn aria_expanded(self) -> &'static str {
        if self.is_open() {
            "true"
        } else {
            "false"
        }
    }
}

/// Where the toggle and its panel live in the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuToggleConfig {
    /// The control that opens the menu
    pub toggle_selector: String,
    /// The navigation panel
    pub panel_selector: String,
    /// Class placed on the panel while open
    pub open_class: String,
}

impl Default for MenuToggleConfig {
    fn default() -> Self {
        Self {
            toggle_selector: ".menu-icon".to_string(),
            panel_selector: ".nav-list".to_string(),
            open_class: "open".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let state = MenuState::default();
        assert!(!state.is_open());
        assert_eq!(state.aria_expanded(), "false");

        let state = state.toggled();
        assert!(state.is_open());
        assert_eq!(state.aria_expanded(), "true");
        assert_eq!(state.toggled(), MenuState::Closed);
    }
}
