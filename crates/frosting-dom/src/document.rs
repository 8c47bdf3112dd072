//! In-memory document
//!
//! A small stand-in for a browser document: markup is parsed with `scraper`
//! into a mutable element arena, styling is limited to the `display`
//! property, and layout heights are supplied by the caller. Selectors are
//! matched by scraper against a snapshot of the arena.

use std::cell::{Cell, RefCell, RefMut};
use std::collections::HashSet;
use std::rc::Rc;

use scraper::{Html, Selector};
use url::Url;

use crate::error::DomError;
use crate::event::{DomEvent, EventKind, EventTarget, Handler, Key, ListenerId};
use crate::page::{ElementRef, Page};
use crate::snapshot::{self, Snapshot};
use crate::Result;

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    /// Inline style declarations, in insertion order
    style: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
    layout_height: f64,
    image_complete: bool,
}

impl Node {
    fn new(tag: String, parent: Option<usize>) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            style: Vec::new(),
            parent,
            children: Vec::new(),
            layout_height: 0.0,
            image_complete: true,
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn style(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_style(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.style.retain(|(k, _)| k != name);
            return;
        }
        match self.style.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.style.push((name.to_string(), value.to_string())),
        }
    }

    fn serialize_style(&self) -> String {
        self.style
            .iter()
            .map(|(k, v)| format!("{}: {};", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn push(&mut self, node: Node) -> usize {
        let id = self.nodes.len();
        if let Some(parent) = node.parent {
            self.nodes[parent].children.push(id);
        }
        self.nodes.push(node);
        id
    }

    /// Copy a parsed element and its element descendants under `parent`
    fn import(&mut self, parent: Option<usize>, el: scraper::ElementRef<'_>) -> usize {
        let value = el.value();
        let mut node = Node::new(value.name().to_ascii_lowercase(), parent);
        for (name, attr) in value.attrs() {
            if name.eq_ignore_ascii_case("style") {
                for declaration in attr.split(';') {
                    if let Some((k, v)) = declaration.split_once(':') {
                        node.set_style(k.trim(), v.trim());
                    }
                }
            } else {
                node.set_attr(&name.to_ascii_lowercase(), attr);
            }
        }

        let id = self.push(node);
        for child in el.children() {
            if let Some(child) = scraper::ElementRef::wrap(child) {
                self.import(Some(id), child);
            }
        }
        id
    }

    /// Every node below `root` in document order
    fn descendants(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[root].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id].children.iter().rev().copied());
        }
        out
    }

    fn ancestors(&self, node: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut current = self.nodes[node].parent;
        while let Some(id) = current {
            out.push(id);
            current = self.nodes[id].parent;
        }
        out
    }

    /// The arena as an HTML document, every element tagged with its index
    fn markup(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>");
        if !self.nodes.is_empty() {
            self.write_node(&mut out, 0);
        }
        out
    }

    fn write_node(&self, out: &mut String, id: usize) {
        let node = &self.nodes[id];
        let style = node.serialize_style();
        let attrs = node
            .attrs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain((!style.is_empty()).then_some(("style", style.as_str())));

        if let Some(tag) = snapshot::open_tag(out, id, &node.tag, attrs) {
            for &child in &node.children {
                self.write_node(out, child);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }

    fn body(&self) -> Option<usize> {
        self.descendants(0)
            .into_iter()
            .find(|&id| self.nodes[id].tag == "body")
    }
}

struct Listener {
    id: ListenerId,
    target: EventTarget,
    kind: EventKind,
    once: bool,
    handler: Handler,
}

/// In-memory [`Page`] implementation
pub struct Document {
    tree: RefCell<Tree>,
    /// Cleared on every tree mutation
    snapshot: RefCell<Option<Rc<Snapshot>>>,
    /// `(selector, display)` rules; later rules win
    display_rules: RefCell<Vec<(Selector, String)>>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
    focused: Cell<Option<ElementRef>>,
    base_url: Option<Url>,
}

impl Document {
    /// Parse a full HTML document
    pub fn parse(markup: &str) -> Self {
        Self::build(markup, None)
    }

    /// Parse a full HTML document; relative image sources resolve against `base_url`
    pub fn parse_with_base(markup: &str, base_url: Url) -> Self {
        Self::build(markup, Some(base_url))
    }

    fn build(markup: &str, base_url: Option<Url>) -> Self {
        let html = Html::parse_document(markup);
        let mut tree = Tree::default();
        tree.import(None, html.root_element());

        tracing::debug!(elements = tree.nodes.len(), "Parsed document");

        Self {
            tree: RefCell::new(tree),
            snapshot: RefCell::new(None),
            display_rules: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            focused: Cell::new(None),
            base_url,
        }
    }

    /// Add a stylesheet rule setting `display` for elements matching `selector`
    pub fn add_display_rule(&self, selector: &str, display: &str) -> Result<()> {
        let selector = snapshot::parse_selector(selector)?;
        self.display_rules
            .borrow_mut()
            .push((selector, display.to_string()));
        Ok(())
    }

    /// Set the height the element's layout box reports while rendered
    pub fn set_layout_height(&self, el: ElementRef, height: f64) {
        self.tree_mut().nodes[el.index()].layout_height = height;
    }

    /// Mark an image as still loading
    pub fn set_image_loading(&self, el: ElementRef) {
        self.tree_mut().nodes[el.index()].image_complete = false;
    }

    /// Complete an image load and fire `load` on it
    pub fn finish_image_load(&self, el: ElementRef) {
        self.tree_mut().nodes[el.index()].image_complete = true;
        let event = DomEvent::new(EventKind::Load, Some(el));
        self.dispatch(&event, &[EventTarget::Element(el)]);
    }

    /// Fail an image load and fire `error` on it
    pub fn fail_image_load(&self, el: ElementRef) {
        self.tree_mut().nodes[el.index()].image_complete = true;
        let event = DomEvent::new(EventKind::Error, Some(el));
        self.dispatch(&event, &[EventTarget::Element(el)]);
    }

    /// Fire the page-ready event
    pub fn ready(&self) -> DomEvent {
        let event = DomEvent::new(EventKind::Ready, None);
        self.dispatch(&event, &[EventTarget::Document]);
        event
    }

    /// Click an element; the event bubbles up to the document
    pub fn click(&self, el: ElementRef) -> DomEvent {
        let event = DomEvent::new(EventKind::Click, Some(el));
        let path = self.bubble_path(el);
        self.dispatch(&event, &path);
        event
    }

    /// Press a key on the focused element, or on the document when nothing has focus
    pub fn key_down(&self, key: Key) -> DomEvent {
        let target = self.focused.get();
        let event = DomEvent::key_down(target, key);
        let path = match target {
            Some(el) => self.bubble_path(el),
            None => vec![EventTarget::Document],
        };
        self.dispatch(&event, &path);
        event
    }

    /// Fire a window resize
    pub fn resize(&self) -> DomEvent {
        let event = DomEvent::new(EventKind::Resize, None);
        self.dispatch(&event, &[EventTarget::Window]);
        event
    }

    pub fn focused(&self) -> Option<ElementRef> {
        self.focused.get()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn bubble_path(&self, el: ElementRef) -> Vec<EventTarget> {
        let tree = self.tree.borrow();
        let mut path = vec![EventTarget::Element(el)];
        path.extend(
            tree.ancestors(el.index())
                .into_iter()
                .map(|id| EventTarget::Element(ElementRef::new(id))),
        );
        path.push(EventTarget::Document);
        path
    }

    fn dispatch(&self, event: &DomEvent, path: &[EventTarget]) {
        for target in path {
            let matching: Vec<(ListenerId, bool, Handler)> = self
                .listeners
                .borrow()
                .iter()
                .filter(|l| l.target == *target && l.kind == event.kind)
                .map(|l| (l.id, l.once, Rc::clone(&l.handler)))
                .collect();

            for (id, once, handler) in matching {
                // An earlier handler may have removed this one.
                if !self.listeners.borrow().iter().any(|l| l.id == id) {
                    continue;
                }
                if once {
                    self.unlisten(id);
                }
                handler(event);
            }
        }
    }

    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        once: bool,
        handler: Handler,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            target,
            kind,
            once,
            handler,
        });
        id
    }

    fn tree_mut(&self) -> RefMut<'_, Tree> {
        self.snapshot.borrow_mut().take();
        self.tree.borrow_mut()
    }

    fn snapshot(&self) -> Rc<Snapshot> {
        if let Some(snapshot) = self.snapshot.borrow().as_ref() {
            return Rc::clone(snapshot);
        }
        let snapshot = Rc::new(Snapshot::parse(&self.tree.borrow().markup()));
        *self.snapshot.borrow_mut() = Some(Rc::clone(&snapshot));
        snapshot
    }

    /// Arena indices matching `selector`, or `None` when it does not parse
    fn matching(&self, selector: &str) -> Option<HashSet<usize>> {
        match snapshot::parse_selector(selector) {
            Ok(selector) => Some(self.snapshot().matching(&selector)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring query with invalid selector");
                None
            }
        }
    }

    /// `display` from inline style, the `hidden` attribute, then the stylesheet
    fn display_of(&self, tree: &Tree, node: usize) -> String {
        let n = &tree.nodes[node];
        if let Some(display) = n.style("display") {
            return display.to_string();
        }
        if n.attr("hidden").is_some() {
            return "none".to_string();
        }
        self.display_rules
            .borrow()
            .iter()
            .rev()
            .find(|(selector, _)| self.snapshot().matching(selector).contains(&node))
            .map(|(_, display)| display.clone())
            .unwrap_or_else(|| "block".to_string())
    }

    fn is_rendered(&self, tree: &Tree, node: usize) -> bool {
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .all(|id| self.display_of(tree, id) != "none")
    }
}

impl Page for Document {
    fn query(&self, selector: &str) -> Option<ElementRef> {
        let matches = self.matching(selector)?;
        let tree = self.tree.borrow();
        std::iter::once(0)
            .chain(tree.descendants(0))
            .find(|id| matches.contains(id))
            .map(ElementRef::new)
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef> {
        let Some(matches) = self.matching(selector) else {
            return Vec::new();
        };
        let tree = self.tree.borrow();
        std::iter::once(0)
            .chain(tree.descendants(0))
            .filter(|id| matches.contains(id))
            .map(ElementRef::new)
            .collect()
    }

    fn query_within(&self, root: ElementRef, selector: &str) -> Option<ElementRef> {
        let matches = self.matching(selector)?;
        let tree = self.tree.borrow();
        tree.descendants(root.index())
            .into_iter()
            .find(|id| matches.contains(id))
            .map(ElementRef::new)
    }

    fn element_by_id(&self, id: &str) -> Option<ElementRef> {
        let tree = self.tree.borrow();
        std::iter::once(0)
            .chain(tree.descendants(0))
            .find(|&node| tree.nodes[node].attr("id") == Some(id))
            .map(ElementRef::new)
    }

    fn closest(&self, el: ElementRef, selector: &str) -> Option<ElementRef> {
        let matches = self.matching(selector)?;
        let tree = self.tree.borrow();
        std::iter::once(el.index())
            .chain(tree.ancestors(el.index()))
            .find(|id| matches.contains(id))
            .map(ElementRef::new)
    }

    fn tag_name(&self, el: ElementRef) -> String {
        self.tree.borrow().nodes[el.index()].tag.clone()
    }

    fn attribute(&self, el: ElementRef, name: &str) -> Option<String> {
        let tree = self.tree.borrow();
        let node = &tree.nodes[el.index()];
        if name == "style" {
            return (!node.style.is_empty()).then(|| node.serialize_style());
        }
        node.attr(name).map(str::to_string)
    }

    fn set_attribute(&self, el: ElementRef, name: &str, value: &str) {
        self.tree_mut().nodes[el.index()].set_attr(name, value);
    }

    fn remove_attribute(&self, el: ElementRef, name: &str) {
        self.tree_mut().nodes[el.index()]
            .attrs
            .retain(|(k, _)| k != name);
    }

    fn has_class(&self, el: ElementRef, class: &str) -> bool {
        self.tree.borrow().nodes[el.index()]
            .attr("class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == class))
    }

    fn toggle_class(&self, el: ElementRef, class: &str, force: Option<bool>) -> bool {
        let mut tree = self.tree_mut();
        let node = &mut tree.nodes[el.index()];
        let mut classes: Vec<String> = node
            .attr("class")
            .unwrap_or("")
            .split_ascii_whitespace()
            .map(str::to_string)
            .collect();

        let present = classes.iter().any(|c| c == class);
        let want = force.unwrap_or(!present);
        if want && !present {
            classes.push(class.to_string());
        } else if !want && present {
            classes.retain(|c| c != class);
        }

        node.set_attr("class", &classes.join(" "));
        want
    }

    fn style_property(&self, el: ElementRef, name: &str) -> String {
        self.tree.borrow().nodes[el.index()]
            .style(name)
            .unwrap_or("")
            .to_string()
    }

    fn set_style_property(&self, el: ElementRef, name: &str, value: &str) {
        self.tree_mut().nodes[el.index()].set_style(name, value);
    }

    fn computed_display(&self, el: ElementRef) -> String {
        let tree = self.tree.borrow();
        self.display_of(&tree, el.index())
    }

    fn bounding_height(&self, el: ElementRef) -> f64 {
        let tree = self.tree.borrow();
        if self.is_rendered(&tree, el.index()) {
            tree.nodes[el.index()].layout_height
        } else {
            0.0
        }
    }

    fn image_complete(&self, el: ElementRef) -> bool {
        self.tree.borrow().nodes[el.index()].image_complete
    }

    fn image_src(&self, el: ElementRef) -> Option<String> {
        let tree = self.tree.borrow();
        let raw = tree.nodes[el.index()].attr("src")?.trim();
        if raw.is_empty() {
            return None;
        }
        let resolved = self
            .base_url
            .as_ref()
            .and_then(|base| base.join(raw).ok())
            .map(String::from);
        Some(resolved.unwrap_or_else(|| raw.to_string()))
    }

    fn focus(&self, el: ElementRef) {
        self.focused.set(Some(el));
    }

    fn append_to_body(&self, markup: &str) -> Result<()> {
        let fragment = Html::parse_fragment(markup);
        let mut tree = self.tree_mut();
        let body = tree.body().ok_or(DomError::NoBody)?;

        for child in fragment.root_element().children() {
            if let Some(el) = scraper::ElementRef::wrap(child) {
                tree.import(Some(body), el);
            }
        }
        Ok(())
    }

    fn listen(&self, target: EventTarget, kind: EventKind, handler: Handler) -> ListenerId {
        self.add_listener(target, kind, false, handler)
    }

    fn listen_once(&self, target: EventTarget, kind: EventKind, handler: Handler) -> ListenerId {
        self.add_listener(target, kind, true, handler)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
    }
}
