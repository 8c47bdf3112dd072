//! `Page` and `Scheduler` over the live browser DOM

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use frosting_dom::{
    DomError, DomEvent, ElementRef, EventKind, EventTarget, Handler, Key, ListenerId, Page,
};
use frosting_timers::{Scheduler, Task, TimerId};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Element, HtmlElement, HtmlImageElement, KeyboardEvent};

use crate::handles::{HandleTable, Tagged};
use crate::timers::TimerTable;

/// Attribute holding an element's handle index
const HANDLE_ATTR: &str = "data-frosting-ref";

impl Tagged for Element {
    fn tag(&self) -> Option<usize> {
        self.get_attribute(HANDLE_ATTR)?.parse().ok()
    }

    fn set_tag(&self, index: usize) {
        if let Err(err) = self.set_attribute(HANDLE_ATTR, &index.to_string()) {
            tracing::debug!(error = ?err, "Failed to tag element handle");
        }
    }
}

struct Registration {
    target: web_sys::EventTarget,
    kind: &'static str,
    callback: JsValue,
}

/// Element handles plus live listeners
#[derive(Default)]
struct Registry {
    handles: RefCell<HandleTable<Element>>,
    listeners: RefCell<HashMap<ListenerId, Registration>>,
}

impl Registry {
    fn handle(&self, el: Element) -> ElementRef {
        self.handles.borrow_mut().handle(el)
    }

    fn element(&self, el: ElementRef) -> Option<Element> {
        self.handles.borrow().element(el)
    }

    fn forget_listener(&self, id: ListenerId) -> Option<Registration> {
        self.listeners.borrow_mut().remove(&id)
    }
}

pub struct BrowserPage {
    window: web_sys::Window,
    document: web_sys::Document,
    registry: Rc<Registry>,
    next_listener: Cell<u64>,
}

impl BrowserPage {
    pub fn new(window: web_sys::Window, document: web_sys::Document) -> Self {
        Self {
            window,
            document,
            registry: Rc::new(Registry::default()),
            next_listener: Cell::new(1),
        }
    }

    fn element(&self, el: ElementRef) -> Option<Element> {
        self.registry.element(el)
    }

    fn html_element(&self, el: ElementRef) -> Option<HtmlElement> {
        self.element(el)?.dyn_into::<HtmlElement>().ok()
    }

    fn image(&self, el: ElementRef) -> Option<HtmlImageElement> {
        self.element(el)?.dyn_into::<HtmlImageElement>().ok()
    }

    fn event_target(&self, target: EventTarget) -> Option<web_sys::EventTarget> {
        match target {
            EventTarget::Window => Some(self.window.clone().into()),
            EventTarget::Document => Some(self.document.clone().into()),
            EventTarget::Element(el) => self.element(el).map(Into::into),
        }
    }

    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        handler: Handler,
        once: bool,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);

        let Some(js_target) = self.event_target(target) else {
            tracing::debug!(?target, %kind, "Listener target is gone");
            return id;
        };

        let registry = Rc::clone(&self.registry);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            if once {
                registry.forget_listener(id);
            }
            let dom_event = to_dom_event(&registry, kind, &event);
            handler(&dom_event);
            registry
                .handles
                .borrow_mut()
                .release_event_target(dom_event.target);
            if dom_event.default_prevented() {
                event.prevent_default();
            }
        });
        // Owned by the JS side from here on; removal only detaches it.
        let callback = closure.into_js_value();

        let added = if once {
            let options = AddEventListenerOptions::new();
            options.set_once(true);
            js_target.add_event_listener_with_callback_and_add_event_listener_options(
                kind.as_str(),
                callback.unchecked_ref(),
                &options,
            )
        } else {
            js_target.add_event_listener_with_callback(kind.as_str(), callback.unchecked_ref())
        };

        if let Err(err) = added {
            tracing::warn!(%kind, error = ?err, "Failed to add listener");
            return id;
        }

        self.registry.listeners.borrow_mut().insert(
            id,
            Registration {
                target: js_target,
                kind: kind.as_str(),
                callback,
            },
        );
        id
    }
}

fn to_dom_event(registry: &Registry, kind: EventKind, event: &web_sys::Event) -> DomEvent {
    let target = event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .map(|el| registry.handles.borrow_mut().event_target(el));

    match event.dyn_ref::<KeyboardEvent>() {
        Some(keyboard) if kind == EventKind::KeyDown => {
            DomEvent::key_down(target, Key::from_dom(&keyboard.key()))
        }
        _ => DomEvent::new(kind, target),
    }
}

fn log_failure(action: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        tracing::debug!(action, error = ?err, "DOM call failed");
    }
}

impl Page for BrowserPage {
    fn query(&self, selector: &str) -> Option<ElementRef> {
        let el = self.document.query_selector(selector).ok().flatten()?;
        Some(self.registry.handle(el))
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.registry.handle(el))
            .collect()
    }

    fn query_within(&self, root: ElementRef, selector: &str) -> Option<ElementRef> {
        let el = self.element(root)?.query_selector(selector).ok().flatten()?;
        Some(self.registry.handle(el))
    }

    fn element_by_id(&self, id: &str) -> Option<ElementRef> {
        let el = self.document.get_element_by_id(id)?;
        Some(self.registry.handle(el))
    }

    fn closest(&self, el: ElementRef, selector: &str) -> Option<ElementRef> {
        let found = self.element(el)?.closest(selector).ok().flatten()?;
        Some(self.registry.handle(found))
    }

    fn tag_name(&self, el: ElementRef) -> String {
        self.element(el)
            .map(|el| el.tag_name().to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn attribute(&self, el: ElementRef, name: &str) -> Option<String> {
        self.element(el)?.get_attribute(name)
    }

    fn set_attribute(&self, el: ElementRef, name: &str, value: &str) {
        if let Some(el) = self.element(el) {
            log_failure("setAttribute", el.set_attribute(name, value));
        }
    }

    fn remove_attribute(&self, el: ElementRef, name: &str) {
        if let Some(el) = self.element(el) {
            log_failure("removeAttribute", el.remove_attribute(name));
        }
    }

    fn has_class(&self, el: ElementRef, class: &str) -> bool {
        self.element(el)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn toggle_class(&self, el: ElementRef, class: &str, force: Option<bool>) -> bool {
        let Some(el) = self.element(el) else {
            return false;
        };
        let list = el.class_list();
        let result = match force {
            Some(force) => list.toggle_with_force(class, force),
            None => list.toggle(class),
        };
        result.unwrap_or_else(|err| {
            tracing::debug!(class, error = ?err, "classList.toggle failed");
            list.contains(class)
        })
    }

    fn style_property(&self, el: ElementRef, name: &str) -> String {
        self.html_element(el)
            .and_then(|el| el.style().get_property_value(name).ok())
            .unwrap_or_default()
    }

    fn set_style_property(&self, el: ElementRef, name: &str, value: &str) {
        let Some(el) = self.html_element(el) else {
            return;
        };
        let style = el.style();
        if value.is_empty() {
            log_failure("removeProperty", style.remove_property(name).map(|_| ()));
        } else {
            log_failure("setProperty", style.set_property(name, value));
        }
    }

    fn computed_display(&self, el: ElementRef) -> String {
        self.element(el)
            .and_then(|el| self.window.get_computed_style(&el).ok().flatten())
            .and_then(|style| style.get_property_value("display").ok())
            .unwrap_or_default()
    }

    fn bounding_height(&self, el: ElementRef) -> f64 {
        self.element(el)
            .map(|el| el.get_bounding_client_rect().height())
            .unwrap_or(0.0)
    }

    fn image_complete(&self, el: ElementRef) -> bool {
        self.image(el).map_or(true, |img| img.complete())
    }

    fn image_src(&self, el: ElementRef) -> Option<String> {
        // `src` reads back resolved against the document URL
        self.image(el)
            .map(|img| img.src())
            .filter(|src| !src.trim().is_empty())
    }

    fn focus(&self, el: ElementRef) {
        if let Some(el) = self.html_element(el) {
            log_failure("focus", el.focus());
        }
    }

    fn append_to_body(&self, markup: &str) -> frosting_dom::Result<()> {
        let body = self.document.body().ok_or(DomError::NoBody)?;
        body.insert_adjacent_html("beforeend", markup)
            .map_err(|err| DomError::Script(format!("{:?}", err)))
    }

    fn listen(&self, target: EventTarget, kind: EventKind, handler: Handler) -> ListenerId {
        self.add_listener(target, kind, handler, false)
    }

    fn listen_once(&self, target: EventTarget, kind: EventKind, handler: Handler) -> ListenerId {
        self.add_listener(target, kind, handler, true)
    }

    fn unlisten(&self, id: ListenerId) {
        let Some(registration) = self.registry.forget_listener(id) else {
            return;
        };
        log_failure(
            "removeEventListener",
            registration.target.remove_event_listener_with_callback(
                registration.kind,
                registration.callback.unchecked_ref(),
            ),
        );
    }
}

/// `setTimeout`-backed scheduler
pub struct BrowserScheduler {
    window: web_sys::Window,
    /// Callbacks of timers that have not fired or been cleared
    timers: Rc<RefCell<TimerTable<Closure<dyn FnMut()>>>>,
}

impl BrowserScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            timers: Rc::new(RefCell::new(TimerTable::new())),
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerId {
        let handle = Rc::new(Cell::new(0));
        let timers = Rc::downgrade(&self.timers);
        let fired = Rc::clone(&handle);
        let mut task = Some(task);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Some(timers) = timers.upgrade() {
                timers.borrow_mut().fired(fired.get());
            }
            if let Some(task) = task.take() {
                task();
            }
        });

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            millis,
        ) {
            Ok(id) => {
                handle.set(id);
                self.timers.borrow_mut().insert(id, callback);
                TimerId(id as u64)
            }
            Err(err) => {
                tracing::warn!(error = ?err, "setTimeout failed");
                TimerId(0)
            }
        }
    }

    fn cancel(&self, id: TimerId) -> bool {
        let Ok(handle) = i32::try_from(id.0) else {
            return false;
        };
        let Some(callback) = self.timers.borrow_mut().cancel(handle) else {
            return false;
        };
        self.window.clear_timeout_with_handle(handle);
        drop(callback);
        true
    }
}
