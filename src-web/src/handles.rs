//! Element handles for the browser page

use frosting_dom::ElementRef;

/// Handle of the current event's target when it was never registered
pub const EVENT_TARGET: ElementRef = ElementRef::new(usize::MAX);

/// An element that can carry its handle index
pub trait Tagged: Clone + PartialEq {
    fn tag(&self) -> Option<usize>;

    fn set_tag(&self, index: usize);
}

/// Elements handed out as [`ElementRef`]s.
///
/// Lookups read the index back from the element, so finding an existing
/// handle does not scan the table.
pub struct HandleTable<E> {
    elements: Vec<E>,
    /// Unregistered targets of the events being dispatched, innermost last
    event_targets: Vec<E>,
}

impl<E> Default for HandleTable<E> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            event_targets: Vec::new(),
        }
    }
}

impl<E: Tagged> HandleTable<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, el: E) -> ElementRef {
        if let Some(index) = self.lookup(&el) {
            return ElementRef::new(index);
        }
        let index = self.elements.len();
        el.set_tag(index);
        self.elements.push(el);
        ElementRef::new(index)
    }

    fn lookup(&self, el: &E) -> Option<usize> {
        let index = el.tag()?;
        // Cloned nodes carry their source's tag
        (self.elements.get(index)? == el).then_some(index)
    }

    pub fn element(&self, el: ElementRef) -> Option<E> {
        if el == EVENT_TARGET {
            return self.event_targets.last().cloned();
        }
        self.elements.get(el.index()).cloned()
    }

    /// Handle for an event target. Unknown elements are not registered and
    /// resolve only until [`HandleTable::release_event_target`].
    pub fn event_target(&mut self, el: E) -> ElementRef {
        if let Some(index) = self.lookup(&el) {
            return ElementRef::new(index);
        }
        self.event_targets.push(el);
        EVENT_TARGET
    }

    pub fn release_event_target(&mut self, target: Option<ElementRef>) {
        if target == Some(EVENT_TARGET) {
            self.event_targets.pop();
        }
    }

    /// Number of registered elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
