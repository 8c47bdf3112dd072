//! Application state management

use std::cell::RefCell;
use std::rc::Rc;

use frosting_core::{Config, Enhancer, EnhancerStatus};

/// `id` of the `<script type="application/json">` holding config overrides
pub const CONFIG_SCRIPT_ID: &str = "frosting-config";

/// Keeps the page's enhancer alive for the lifetime of the page
#[derive(Default)]
pub struct AppState {
    enhancer: RefCell<Option<Rc<Enhancer>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `enhancer`, detaching any previous one
    pub fn set_enhancer(&self, enhancer: Rc<Enhancer>) {
        let previous = self.enhancer.borrow_mut().replace(enhancer);
        if let Some(previous) = previous {
            previous.detach();
        }
    }

    pub fn with_enhancer<F, T>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&Enhancer) -> T,
    {
        let guard = self.enhancer.borrow();
        guard.as_deref().map(f)
    }

    pub fn status(&self) -> EnhancerStatus {
        self.with_enhancer(Enhancer::status).unwrap_or_default()
    }

    pub fn status_json(&self) -> String {
        serde_json::to_string(&self.status()).unwrap_or_default()
    }
}

/// Whether `document.readyState` means the page is still parsing, so
/// behaviours wait for the ready event
pub fn defer_until_ready(ready_state: &str) -> bool {
    ready_state == "loading"
}

/// Config from the page's JSON script text; defaults when absent or invalid
pub fn load_config(text: Option<&str>) -> Config {
    let Some(json) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Config::default();
    };

    match Config::from_json(json) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "Invalid page configuration, using defaults");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frosting_core::{Document, ManualScheduler};

    const PAGE: &str = r#"<html><body>
      <button class="menu-icon"></button><ul class="nav-list"></ul>
      <div class="menu-tabs"><button class="tab-btn" id="tab-cakes">Cakes</button></div>
    </body></html>"#;

    #[test]
    fn test_load_config_fallbacks() {
        assert_eq!(load_config(None), Config::default());
        assert_eq!(load_config(Some("  \n")), Config::default());
        assert_eq!(load_config(Some("{not json")), Config::default());
        assert_eq!(
            load_config(Some(r#"{"tabs": {"tab_selector": "::"}}"#)),
            Config::default()
        );

        let config = load_config(Some(r#"{"menu": {"open_class": "is-open"}}"#));
        assert_eq!(config.menu.open_class, "is-open");
    }

    #[test]
    fn test_defer_only_while_loading() {
        assert!(defer_until_ready("loading"));
        assert!(!defer_until_ready("interactive"));
        assert!(!defer_until_ready("complete"));
    }

    #[test]
    fn test_load_config_keeps_browser_selectors() {
        let config = load_config(Some(
            r#"{"menu": {"open_class": "is-open"}, "tabs": {"tab_selector": ".menu-tabs .tab-btn:not([disabled])"}}"#,
        ));
        assert_eq!(config.menu.open_class, "is-open");
        assert_eq!(config.tabs.tab_selector, ".menu-tabs .tab-btn:not([disabled])");
    }

    #[test]
    fn test_state_keeps_enhancer() {
        let state = AppState::new();
        assert_eq!(state.status(), EnhancerStatus::default());

        let doc = Rc::new(Document::parse(PAGE));
        let enhancer = Enhancer::new(
            doc.clone(),
            Rc::new(ManualScheduler::new()),
            Config::default(),
        );
        enhancer.initialize();
        state.set_enhancer(enhancer);

        assert!(state.status().menu);
        assert!(state.status().tabs);
        assert!(state.status_json().contains("\"menu\":true"));

        // Replacing the enhancer releases the old listeners
        let listeners = doc.listener_count();
        assert!(listeners > 0);
        let fresh = Enhancer::new(doc.clone(), Rc::new(ManualScheduler::new()), Config::default());
        state.set_enhancer(fresh);
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(state.with_enhancer(|e| e.is_initialized()), Some(false));
    }
}
