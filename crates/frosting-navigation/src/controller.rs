//! Menu toggle controller

use std::cell::Cell;
use std::rc::{Rc, Weak};

use frosting_dom::{ElementRef, EventKind, EventTarget, ListenerId, Page};

use crate::error::NavigationError;
use crate::toggle::{MenuState, MenuToggleConfig};
use crate::Result;

pub struct MenuToggleController {
    page: Rc<dyn Page>,
    toggle: ElementRef,
    panel: ElementRef,
    open_class: String,
    state: Cell<MenuState>,
    listener: Cell<Option<ListenerId>>,
}

impl MenuToggleController {
    /// Find the toggle and panel and start listening for clicks.
    ///
    /// Fails without touching the page if either element is missing.
    pub fn attach(page: Rc<dyn Page>, config: &MenuToggleConfig) -> Result<Rc<Self>> {
        let toggle = page
            .query(&config.toggle_selector)
            .ok_or_else(|| NavigationError::MissingElement(config.toggle_selector.clone()))?;
        let panel = page
            .query(&config.panel_selector)
            .ok_or_else(|| NavigationError::MissingElement(config.panel_selector.clone()))?;

        let state = MenuState::from_open(page.has_class(panel, &config.open_class));
        page.set_attribute(toggle, "role", "button");
        page.set_attribute(toggle, "aria-expanded", state.aria_expanded());

        let controller = Rc::new(Self {
            page: Rc::clone(&page),
            toggle,
            panel,
            open_class: config.open_class.clone(),
            state: Cell::new(state),
            listener: Cell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&controller);
        let id = page.listen(
            EventTarget::Element(toggle),
            EventKind::Click,
            Rc::new(move |event| {
                let Some(controller) = weak.upgrade() else {
                    return;
                };
                // The toggle is usually an `<a href="#">`
                event.prevent_default();
                controller.toggle();
            }),
        );
        controller.listener.set(Some(id));

        tracing::info!(selector = %config.toggle_selector, "Menu toggle attached");

        Ok(controller)
    }

    pub fn state(&self) -> MenuState {
        self.state.get()
    }

    /// Flip the panel open or closed
    pub fn toggle(&self) -> MenuState {
        let state = self.state.get().toggled();
        self.state.set(state);

        self.page
            .toggle_class(self.panel, &self.open_class, Some(state.is_open()));
        self.page
            .set_attribute(self.toggle, "aria-expanded", state.aria_expanded());

        tracing::debug!(state = ?state, "Menu toggled");
        state
    }

    /// Stop listening for clicks
    pub fn detach(&self) {
        if let Some(id) = self.listener.take() {
            self.page.unlisten(id);
        }
    }
}
