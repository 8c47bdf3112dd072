//! Image readiness gate

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use frosting_dom::{ElementRef, EventKind, EventTarget, ListenerId, Page};
use frosting_timers::{CountdownLatch, Scheduler, Task, TimerId};

/// Images still loading, each settled once by its `load` or `error`.
struct PendingImages {
    page: Rc<dyn Page>,
    scheduler: Rc<dyn Scheduler>,
    latch: CountdownLatch,
    /// `[load, error]` listener pair per image
    listeners: RefCell<Vec<[ListenerId; 2]>>,
    timeout: Cell<Option<TimerId>>,
}

impl PendingImages {
    fn settle(&self, index: usize) {
        let pair = self.listeners.borrow().get(index).copied();
        if let Some(pair) = pair {
            for id in pair {
                self.page.unlisten(id);
            }
        }
        self.latch.count_down();
    }

    fn on_timeout(&self) {
        self.timeout.set(None);
        let outstanding = self.latch.remaining();
        if self.latch.release() {
            tracing::debug!(outstanding, "Image wait timed out");
        }
    }

    /// Tear down whatever is still pending once the gate has opened
    fn finish(&self) {
        if let Some(id) = self.timeout.take() {
            self.scheduler.cancel(id);
        }
        let listeners: Vec<[ListenerId; 2]> = self.listeners.borrow_mut().drain(..).collect();
        for id in listeners.into_iter().flatten() {
            self.page.unlisten(id);
        }
    }
}

/// Call `callback` once every image matching `selector` has loaded or
/// failed, or once `timeout` has elapsed, whichever comes first.
///
/// Images already complete are not waited for; when none are pending the
/// callback runs before this returns.
pub fn when_images_ready(
    page: &Rc<dyn Page>,
    scheduler: &Rc<dyn Scheduler>,
    selector: &str,
    timeout: Duration,
    callback: Task,
) {
    let pending: Vec<ElementRef> = page
        .query_all(selector)
        .into_iter()
        .filter(|&img| !page.image_complete(img))
        .collect();

    if pending.is_empty() {
        callback();
        return;
    }

    tracing::debug!(pending = pending.len(), ?timeout, "Waiting for images");

    let gate = Rc::new_cyclic(|weak: &Weak<PendingImages>| {
        let weak = weak.clone();
        PendingImages {
            page: Rc::clone(page),
            scheduler: Rc::clone(scheduler),
            latch: CountdownLatch::new(
                pending.len(),
                Box::new(move || {
                    if let Some(gate) = weak.upgrade() {
                        gate.finish();
                    }
                    callback();
                }),
            ),
            listeners: RefCell::new(Vec::with_capacity(pending.len())),
            timeout: Cell::new(None),
        }
    });

    for (index, &img) in pending.iter().enumerate() {
        let mut pair = [ListenerId(0); 2];
        for (slot, kind) in pair.iter_mut().zip([EventKind::Load, EventKind::Error]) {
            let gate_ref = Rc::clone(&gate);
            *slot = page.listen_once(
                EventTarget::Element(img),
                kind,
                Rc::new(move |_| gate_ref.settle(index)),
            );
        }
        gate.listeners.borrow_mut().push(pair);
    }

    let gate_ref = Rc::clone(&gate);
    let id = scheduler.schedule(timeout, Box::new(move || gate_ref.on_timeout()));
    gate.timeout.set(Some(id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use frosting_dom::Document;
    use frosting_timers::ManualScheduler;

    const PAGE: &str = r#"<html><body>
      <div class="menu-card"><img src="a.jpg"></div>
      <div class="menu-card"><img src="b.jpg"></div>
      <div class="menu-card"><img src="c.jpg"></div>
      <img class="logo" src="logo.png">
    </body></html>"#;

    struct Fixture {
        doc: Rc<Document>,
        scheduler: Rc<ManualScheduler>,
        images: Vec<ElementRef>,
        calls: Rc<Cell<usize>>,
    }

    /// Marks the first `loading` card images as still loading, then waits
    fn setup(loading: usize) -> Fixture {
        let doc = Rc::new(Document::parse(PAGE));
        let scheduler = Rc::new(ManualScheduler::new());
        let images = doc.query_all(".menu-card img");
        for &img in &images[..loading] {
            doc.set_image_loading(img);
        }

        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let page: Rc<dyn Page> = doc.clone();
        let timers: Rc<dyn Scheduler> = scheduler.clone();
        when_images_ready(
            &page,
            &timers,
            ".menu-card img",
            Duration::from_millis(1500),
            Box::new(move || counter.set(counter.get() + 1)),
        );

        Fixture {
            doc,
            scheduler,
            images,
            calls,
        }
    }

    #[test]
    fn test_nothing_pending_runs_immediately() {
        let f = setup(0);
        assert_eq!(f.calls.get(), 1);
        assert_eq!(f.scheduler.pending(), 0);
        assert_eq!(f.doc.listener_count(), 0);
    }

    #[test]
    fn test_all_settled_fires_once_and_cancels_timeout() {
        let f = setup(2);
        assert_eq!(f.calls.get(), 0);
        assert_eq!(f.doc.listener_count(), 4);
        assert_eq!(f.scheduler.pending(), 1);

        f.doc.finish_image_load(f.images[0]);
        assert_eq!(f.calls.get(), 0);
        assert_eq!(f.doc.listener_count(), 2);

        f.doc.fail_image_load(f.images[1]);
        assert_eq!(f.calls.get(), 1);
        assert_eq!(f.scheduler.pending(), 0);
        assert_eq!(f.doc.listener_count(), 0);

        f.scheduler.advance(Duration::from_millis(5000));
        assert_eq!(f.calls.get(), 1);
    }

    #[test]
    fn test_image_settles_only_once() {
        let f = setup(2);

        // load then error on the same image counts as one
        f.doc.finish_image_load(f.images[0]);
        f.doc.fail_image_load(f.images[0]);
        assert_eq!(f.calls.get(), 0);

        f.doc.finish_image_load(f.images[1]);
        assert_eq!(f.calls.get(), 1);
    }

    #[test]
    fn test_timeout_forces_callback_once() {
        let f = setup(3);
        f.doc.finish_image_load(f.images[2]);

        f.scheduler.advance(Duration::from_millis(1499));
        assert_eq!(f.calls.get(), 0);

        f.scheduler.advance(Duration::from_millis(1));
        assert_eq!(f.calls.get(), 1);
        assert_eq!(f.doc.listener_count(), 0);

        // Stragglers after the timeout change nothing
        f.doc.finish_image_load(f.images[0]);
        f.doc.fail_image_load(f.images[1]);
        f.scheduler.advance(Duration::from_millis(1500));
        assert_eq!(f.calls.get(), 1);
    }
}
