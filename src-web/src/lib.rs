//! Frosting - Browser entry point
//!
//! Builds the page enhancer over the live DOM when the module loads. The
//! page may carry overrides as JSON:
//!
//! ```html
//! <script type="application/json" id="frosting-config">
//!   {"tabs": {"default_tab_id": "tab-cookies"}}
//! </script>
//! ```

#[cfg(target_arch = "wasm32")]
mod browser;
mod handles;
mod logging;
mod state;
mod timers;

pub use handles::{HandleTable, Tagged, EVENT_TARGET};
pub use logging::{ConsoleLog, ConsoleSink, ConsoleWriter};
pub use state::{defer_until_ready, load_config, AppState, CONFIG_SCRIPT_ID};
pub use timers::TimerTable;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::rc::Rc;

    use frosting_core::Enhancer;
    use wasm_bindgen::prelude::*;

    use crate::browser::{BrowserPage, BrowserScheduler};
    use crate::logging::ConsoleLog;
    use crate::state::{defer_until_ready, load_config, AppState, CONFIG_SCRIPT_ID};

    thread_local! {
        static APP: AppState = AppState::new();
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        frosting_core::init_logging_with(ConsoleLog::browser());

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let config_text = document
            .get_element_by_id(CONFIG_SCRIPT_ID)
            .and_then(|script| script.text_content());
        let config = load_config(config_text.as_deref());

        let loading = defer_until_ready(&document.ready_state());
        let page = Rc::new(BrowserPage::new(window.clone(), document));
        let scheduler = Rc::new(BrowserScheduler::new(window));
        let enhancer = Enhancer::new(page, scheduler, config);

        if loading {
            enhancer.install();
        } else {
            enhancer.initialize();
        }

        APP.with(|app| app.set_enhancer(enhancer));
        tracing::info!(deferred = loading, "Frosting started");

        Ok(())
    }

    /// Which behaviours are attached, as JSON
    #[wasm_bindgen]
    pub fn status() -> String {
        APP.with(AppState::status_json)
    }
}
