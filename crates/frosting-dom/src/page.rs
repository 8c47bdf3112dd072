//! Page capability trait

use crate::event::{EventKind, EventTarget, Handler, ListenerId};
use crate::Result;

/// Opaque handle to an element of a [`Page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(usize);

impl ElementRef {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// What the page behaviours need from a document.
///
/// All methods take `&self`; implementations use interior mutability since
/// listeners call back into the page while it is dispatching.
pub trait Page {
    /// First element in document order matching `selector`
    fn query(&self, selector: &str) -> Option<ElementRef>;

    /// All elements in document order matching `selector`
    fn query_all(&self, selector: &str) -> Vec<ElementRef>;

    /// First descendant of `root` matching `selector`
    fn query_within(&self, root: ElementRef, selector: &str) -> Option<ElementRef>;

    fn element_by_id(&self, id: &str) -> Option<ElementRef>;

    /// `el` itself or its nearest ancestor matching `selector`
    fn closest(&self, el: ElementRef, selector: &str) -> Option<ElementRef>;

    /// Lowercase tag name
    fn tag_name(&self, el: ElementRef) -> String;

    fn attribute(&self, el: ElementRef, name: &str) -> Option<String>;

    fn set_attribute(&self, el: ElementRef, name: &str, value: &str);

    fn remove_attribute(&self, el: ElementRef, name: &str);

    fn has_class(&self, el: ElementRef, class: &str) -> bool;

    /// Toggle `class`, or force it on/off. Returns whether it is now present.
    fn toggle_class(&self, el: ElementRef, class: &str, force: Option<bool>) -> bool;

    /// Inline style property, empty when unset
    fn style_property(&self, el: ElementRef, name: &str) -> String;

    /// Set an inline style property; an empty value removes it
    fn set_style_property(&self, el: ElementRef, name: &str, value: &str);

    /// Computed `display` value
    fn computed_display(&self, el: ElementRef) -> String;

    /// Height of the element's layout box in CSS pixels
    fn bounding_height(&self, el: ElementRef) -> f64;

    /// Whether an image element has finished loading (successfully or not)
    fn image_complete(&self, el: ElementRef) -> bool;

    /// Resolved image source; `None` when the element has no usable `src`
    fn image_src(&self, el: ElementRef) -> Option<String>;

    fn set_hidden(&self, el: ElementRef, hidden: bool) {
        if hidden {
            self.set_attribute(el, "hidden", "");
        } else {
            self.remove_attribute(el, "hidden");
        }
    }

    fn is_hidden(&self, el: ElementRef) -> bool {
        self.attribute(el, "hidden").is_some()
    }

    fn focus(&self, el: ElementRef);

    /// Parse `markup` and append the resulting elements to the body
    fn append_to_body(&self, markup: &str) -> Result<()>;

    fn listen(&self, target: EventTarget, kind: EventKind, handler: Handler) -> ListenerId;

    /// Like [`Page::listen`], removed after its first invocation
    fn listen_once(&self, target: EventTarget, kind: EventKind, handler: Handler) -> ListenerId;

    fn unlisten(&self, id: ListenerId);
}
