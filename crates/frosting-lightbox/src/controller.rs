//! Lightbox controller

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use frosting_dom::{DomEvent, ElementRef, EventKind, EventTarget, Key, ListenerId, Page};
use serde::{Deserialize, Serialize};

use crate::error::LightboxError;
use crate::markup::LIGHTBOX_MARKUP;
use crate::state::{LightboxEvent, LightboxState};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightboxConfig {
    /// Clickable menu cards
    pub card_selector: String,
    /// Card attribute holding the full-size image URL
    pub full_image_attribute: String,
    pub overlay_selector: String,
    pub backdrop_selector: String,
    pub close_selector: String,
    /// `id` of the preview `<img>`
    pub image_id: String,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            card_selector: ".menu-card".to_string(),
            full_image_attribute: "data-full".to_string(),
            overlay_selector: ".ff-lightbox".to_string(),
            backdrop_selector: ".ff-backdrop".to_string(),
            close_selector: ".ff-close".to_string(),
            image_id: "ff-lightbox-img".to_string(),
        }
    }
}

pub struct LightboxController {
    page: Rc<dyn Page>,
    overlay: ElementRef,
    image: ElementRef,
    card_selector: String,
    full_image_attribute: String,
    state: RefCell<LightboxState>,
    listeners: RefCell<Vec<ListenerId>>,
}

impl LightboxController {
    /// Wire the lightbox, injecting its markup first if the page has none.
    pub fn attach(page: Rc<dyn Page>, config: &LightboxConfig) -> Result<Rc<Self>> {
        if page.query(&config.overlay_selector).is_none() {
            page.append_to_body(LIGHTBOX_MARKUP)?;
            tracing::info!("Injected lightbox markup");
        }

        let require = |found: Option<ElementRef>, what: &str| {
            found.ok_or_else(|| LightboxError::IncompleteMarkup(what.to_string()))
        };
        let overlay = require(
            page.query(&config.overlay_selector),
            config.overlay_selector.as_str(),
        )?;
        let backdrop = require(
            page.query(&config.backdrop_selector),
            config.backdrop_selector.as_str(),
        )?;
        let close = require(
            page.query(&config.close_selector),
            config.close_selector.as_str(),
        )?;
        let image_selector = format!("#{}", config.image_id);
        let image = require(
            page.element_by_id(&config.image_id),
            image_selector.as_str(),
        )?;

        let controller = Rc::new(Self {
            page: Rc::clone(&page),
            overlay,
            image,
            card_selector: config.card_selector.clone(),
            full_image_attribute: config.full_image_attribute.clone(),
            state: RefCell::new(LightboxState::Closed),
            listeners: RefCell::new(Vec::new()),
        });
        controller.render(&LightboxState::Closed);

        let mut listeners = Vec::with_capacity(4);

        let weak: Weak<Self> = Rc::downgrade(&controller);
        listeners.push(page.listen(
            EventTarget::Document,
            EventKind::Click,
            Rc::new(move |event| {
                if let Some(controller) = weak.upgrade() {
                    controller.on_document_click(event);
                }
            }),
        ));

        for (target, event) in [
            (backdrop, LightboxEvent::BackdropClicked),
            (close, LightboxEvent::CloseClicked),
        ] {
            let weak: Weak<Self> = Rc::downgrade(&controller);
            listeners.push(page.listen(
                EventTarget::Element(target),
                EventKind::Click,
                Rc::new(move |_| {
                    if let Some(controller) = weak.upgrade() {
                        controller.dispatch(event.clone());
                    }
                }),
            ));
        }

        let weak: Weak<Self> = Rc::downgrade(&controller);
        listeners.push(page.listen(
            EventTarget::Document,
            EventKind::KeyDown,
            Rc::new(move |event| {
                if event.key != Some(Key::Escape) {
                    return;
                }
                if let Some(controller) = weak.upgrade() {
                    controller.dispatch(LightboxEvent::EscapePressed);
                }
            }),
        ));

        *controller.listeners.borrow_mut() = listeners;

        tracing::info!(cards = %config.card_selector, "Lightbox attached");

        Ok(controller)
    }

    pub fn state(&self) -> LightboxState {
        self.state.borrow().clone()
    }

    /// Full-size image for a card: its `data-full` URL, else its first image
    pub fn card_source(&self, card: ElementRef) -> Option<String> {
        self.page
            .attribute(card, &self.full_image_attribute)
            .filter(|src| !src.trim().is_empty())
            .or_else(|| {
                self.page
                    .query_within(card, "img")
                    .and_then(|img| self.page.image_src(img))
            })
    }

    /// Apply one event and update the page if the state changed
    pub fn dispatch(&self, event: LightboxEvent) -> LightboxState {
        let current = self.state();
        let next = current.transition(event);

        if next != current {
            self.render(&next);
            tracing::debug!(open = next.is_open(), src = %next.src(), "Lightbox transition");
            *self.state.borrow_mut() = next.clone();
        }

        next
    }

    pub fn detach(&self) {
        for id in self.listeners.borrow_mut().drain(..) {
            self.page.unlisten(id);
        }
    }

    fn on_document_click(&self, event: &DomEvent) {
        let Some(card) = event
            .target
            .and_then(|target| self.page.closest(target, &self.card_selector))
        else {
            return;
        };

        // Cards are often `<a href="#">`
        if self.page.tag_name(card) == "a" {
            event.prevent_default();
        }

        let src = self.card_source(card);
        self.dispatch(LightboxEvent::CardActivated { src });
    }

    fn render(&self, state: &LightboxState) {
        match state {
            LightboxState::Open { src } => {
                self.page.set_attribute(self.image, "src", src);
                self.page.set_hidden(self.overlay, false);
            }
            LightboxState::Closed => {
                self.page.set_hidden(self.overlay, true);
                self.page.set_attribute(self.image, "src", "");
            }
        }
    }
}
