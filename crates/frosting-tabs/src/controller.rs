//! Tab controller

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use frosting_dom::{ElementRef, EventKind, EventTarget, ListenerId, Page};
use serde::{Deserialize, Serialize};

use crate::error::TabError;
use crate::state::{TabEvent, TabSet, Transition};
use crate::tab::Tab;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabConfig {
    /// Tab buttons, in order
    pub tab_selector: String,
    /// `id` of the tab active on load; falls back to the first tab
    pub default_tab_id: Option<String>,
    /// Class on the active button and `aria-controls` panel
    pub active_class: String,
    /// Class on the active `data-target` section
    pub section_class: String,
}

impl Default for TabConfig {
    fn default() -> Self {
        Self {
            tab_selector: ".menu-tabs .tab-btn".to_string(),
            default_tab_id: Some("tab-cakes".to_string()),
            active_class: "is-active".to_string(),
            section_class: "active".to_string(),
        }
    }
}

pub struct TabController {
    page: Rc<dyn Page>,
    tabs: Vec<Tab>,
    state: RefCell<TabSet>,
    active_class: String,
    section_class: String,
    listeners: RefCell<Vec<ListenerId>>,
}

impl TabController {
    /// Bind every tab, activate the default one and start listening.
    pub fn attach(page: Rc<dyn Page>, config: &TabConfig) -> Result<Rc<Self>> {
        let buttons = page.query_all(&config.tab_selector);
        if buttons.is_empty() {
            return Err(TabError::NoTabs(config.tab_selector.clone()));
        }

        let tabs: Vec<Tab> = buttons
            .iter()
            .map(|&button| Tab::resolve(page.as_ref(), button))
            .collect();

        let initial = config
            .default_tab_id
            .as_deref()
            .and_then(|id| tabs.iter().position(|t| t.id.as_deref() == Some(id)))
            .unwrap_or(0);

        let controller = Rc::new(Self {
            page: Rc::clone(&page),
            state: RefCell::new(TabSet::new(tabs.len(), initial)?),
            tabs,
            active_class: config.active_class.clone(),
            section_class: config.section_class.clone(),
            listeners: RefCell::new(Vec::new()),
        });

        controller.render(initial);

        for (index, tab) in controller.tabs.iter().enumerate() {
            let weak: Weak<Self> = Rc::downgrade(&controller);
            let click = page.listen(
                EventTarget::Element(tab.button),
                EventKind::Click,
                Rc::new(move |_| {
                    if let Some(controller) = weak.upgrade() {
                        controller.on_tab_event(TabEvent::Select(index));
                    }
                }),
            );

            let weak: Weak<Self> = Rc::downgrade(&controller);
            let keydown = page.listen(
                EventTarget::Element(tab.button),
                EventKind::KeyDown,
                Rc::new(move |event| {
                    let Some(controller) = weak.upgrade() else {
                        return;
                    };
                    let Some(tab_event) = event.key.as_ref().and_then(|k| TabEvent::from_key(k, index))
                    else {
                        return;
                    };
                    event.prevent_default();
                    if let Some(transition) = controller.on_tab_event(tab_event) {
                        controller.page.focus(controller.tabs[transition.to].button);
                    }
                }),
            );

            controller.listeners.borrow_mut().extend([click, keydown]);
        }

        tracing::info!(tabs = controller.tabs.len(), active = initial, "Tabs attached");

        Ok(controller)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Index of the active tab
    pub fn active(&self) -> usize {
        self.state.borrow().active()
    }

    pub fn active_button(&self) -> ElementRef {
        self.tabs[self.active()].button
    }

    /// Run one transition and reflect it onto the page
    pub fn apply(&self, event: TabEvent) -> Result<Transition> {
        let transition = self.state.borrow_mut().apply(event)?;
        self.render(transition.to);

        tracing::debug!(
            from = transition.from,
            to = transition.to,
            event = ?event,
            "Tab transition"
        );

        Ok(transition)
    }

    /// [`TabController::apply`] for listeners, which have nowhere to send an error
    fn on_tab_event(&self, event: TabEvent) -> Option<Transition> {
        match self.apply(event) {
            Ok(transition) => Some(transition),
            Err(err) => {
                tracing::debug!(event = ?event, error = %err, "Tab event ignored");
                None
            }
        }
    }

    pub fn detach(&self) {
        for id in self.listeners.borrow_mut().drain(..) {
            self.page.unlisten(id);
        }
    }

    fn render(&self, active: usize) {
        for (index, tab) in self.tabs.iter().enumerate() {
            tab.render(
                self.page.as_ref(),
                index == active,
                &self.active_class,
                &self.section_class,
            );
        }
    }
}
