//! Enhancer configuration

#[cfg(feature = "equalizer")]
use frosting_equalizer::EqualizerConfig;
use frosting_lightbox::LightboxConfig;
use frosting_navigation::MenuToggleConfig;
use frosting_tabs::TabConfig;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::Result;

/// Settings for every behaviour; missing sections take their defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub menu: MenuToggleConfig,
    pub tabs: TabConfig,
    pub lightbox: LightboxConfig,
    #[cfg(feature = "equalizer")]
    pub equalizer: EqualizerConfig,
}

impl Config {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every selector parses and required names are present
    pub fn validate(&self) -> Result<()> {
        for selector in self.selectors() {
            frosting_dom::parse_selector(selector)?;
        }

        let names = [
            ("menu.open_class", &self.menu.open_class),
            ("tabs.active_class", &self.tabs.active_class),
            ("tabs.section_class", &self.tabs.section_class),
            ("lightbox.full_image_attribute", &self.lightbox.full_image_attribute),
            ("lightbox.image_id", &self.lightbox.image_id),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(CoreError::Config(format!("{} must not be empty", field)));
            }
        }

        #[cfg(feature = "equalizer")]
        if self.equalizer.sections.is_empty() {
            return Err(CoreError::Config(
                "equalizer.sections must list at least one section".to_string(),
            ));
        }

        Ok(())
    }

    fn selectors(&self) -> Vec<&str> {
        let mut selectors = vec![
            self.menu.toggle_selector.as_str(),
            self.menu.panel_selector.as_str(),
            self.tabs.tab_selector.as_str(),
            self.lightbox.card_selector.as_str(),
            self.lightbox.overlay_selector.as_str(),
            self.lightbox.backdrop_selector.as_str(),
            self.lightbox.close_selector.as_str(),
        ];

        #[cfg(feature = "equalizer")]
        {
            let eq = &self.equalizer;
            selectors.push(&eq.aside_selector);
            selectors.push(&eq.image_selector);
            for section in &eq.sections {
                selectors.push(&section.preferred);
                selectors.push(&section.fallback);
            }
        }

        selectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tabs.default_tab_id.as_deref(), Some("tab-cakes"));
        assert_eq!(config.menu.toggle_selector, ".menu-icon");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_json(
            r#"{"tabs": {"default_tab_id": "tab-cookies"}, "lightbox": {"card_selector": ".card"}}"#,
        )
        .unwrap();
        assert_eq!(config.tabs.default_tab_id.as_deref(), Some("tab-cookies"));
        assert_eq!(config.tabs.active_class, "is-active");
        assert_eq!(config.lightbox.card_selector, ".card");
        assert_eq!(config.lightbox.image_id, "ff-lightbox-img");
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let result = Config::from_json(r#"{"menu": {"toggle_selector": ".menu-icon["}}"#);
        assert!(matches!(
            result,
            Err(CoreError::Dom(frosting_dom::DomError::InvalidSelector { .. }))
        ));
    }

    #[test]
    fn test_browser_selectors_accepted() {
        let config = Config::from_json(
            r##"{
                "menu": {"open_class": "is-open"},
                "tabs": {"tab_selector": ".menu-tabs .tab-btn:not([disabled])"},
                "lightbox": {"card_selector": "a[href^='#'].menu-card"}
            }"##,
        )
        .unwrap();
        assert_eq!(config.menu.open_class, "is-open");
        assert_eq!(config.tabs.tab_selector, ".menu-tabs .tab-btn:not([disabled])");
        assert_eq!(config.lightbox.card_selector, "a[href^='#'].menu-card");
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Config::from_json(r#"{"lightbox": {"image_id": " "}}"#);
        assert!(matches!(result, Err(CoreError::Config(msg)) if msg.contains("lightbox.image_id")));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Config::from_json("{\"menu\": 3}"),
            Err(CoreError::Serialization(_))
        ));
    }

    #[cfg(feature = "equalizer")]
    #[test]
    fn test_equalizer_section() {
        let config = Config::from_json(r#"{"equalizer": {"debounce_ms": 250}}"#).unwrap();
        assert_eq!(config.equalizer.debounce_ms, 250);
        assert_eq!(config.equalizer.timeout_ms, 1500);

        assert!(Config::from_json(r#"{"equalizer": {"sections": []}}"#).is_err());
    }
}
