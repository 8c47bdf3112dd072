//! Aside height equalizer

use std::cell::Cell;
use std::rc::{Rc, Weak};

use frosting_dom::{ElementRef, EventKind, EventTarget, ListenerId, Page};
use frosting_timers::{Debouncer, Scheduler};

use crate::config::EqualizerConfig;
use crate::error::EqualizerError;
use crate::readiness::when_images_ready;
use crate::Result;

pub struct HeightEqualizer {
    page: Rc<dyn Page>,
    scheduler: Rc<dyn Scheduler>,
    aside: ElementRef,
    config: EqualizerConfig,
    resize: Debouncer,
    /// Last height written to the aside
    locked: Cell<Option<u32>>,
    listener: Cell<Option<ListenerId>>,
}

impl HeightEqualizer {
    /// Find the aside, start the image wait that leads to the first
    /// measurement, and recompute on window resize from then on.
    pub fn attach(
        page: Rc<dyn Page>,
        scheduler: Rc<dyn Scheduler>,
        config: &EqualizerConfig,
    ) -> Result<Rc<Self>> {
        let aside = page
            .query(&config.aside_selector)
            .ok_or_else(|| EqualizerError::MissingElement(config.aside_selector.clone()))?;

        let equalizer = Rc::new(Self {
            page: Rc::clone(&page),
            scheduler: Rc::clone(&scheduler),
            aside,
            config: config.clone(),
            resize: Debouncer::new(Rc::clone(&scheduler), config.debounce()),
            locked: Cell::new(None),
            listener: Cell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&equalizer);
        let listener = page.listen(
            EventTarget::Window,
            EventKind::Resize,
            Rc::new(move |_| {
                let Some(equalizer) = weak.upgrade() else {
                    return;
                };
                let weak = weak.clone();
                equalizer.resize.call(Box::new(move || {
                    if let Some(equalizer) = weak.upgrade() {
                        equalizer.compute_and_lock_heights();
                    }
                }));
            }),
        );
        equalizer.listener.set(Some(listener));

        let weak: Weak<Self> = Rc::downgrade(&equalizer);
        equalizer.when_images_ready(Box::new(move || {
            if let Some(equalizer) = weak.upgrade() {
                equalizer.compute_and_lock_heights();
            }
        }));

        tracing::info!(
            aside = %config.aside_selector,
            sections = config.sections.len(),
            "Height equalizer attached"
        );

        Ok(equalizer)
    }

    /// Measure every section and pin the aside's `min-height` to the
    /// tallest. Returns the height applied, if any.
    ///
    /// Nothing is written when a measurement is not finite, the tallest
    /// section has no height, or it does not fit a pixel count.
    pub fn compute_and_lock_heights(&self) -> Option<u32> {
        let page = self.page.as_ref();
        let heights: Vec<f64> = self
            .config
            .sections
            .iter()
            .map(|section| self.config.reveal.measure(page, section.resolve(page)))
            .collect();

        if heights.iter().any(|h| !h.is_finite()) {
            tracing::debug!(?heights, "Skipping height lock: non-finite measurement");
            return None;
        }

        let tallest = heights.iter().copied().fold(0.0, f64::max);
        if tallest <= 0.0 {
            tracing::debug!("Skipping height lock: no section has height");
            return None;
        }

        if tallest > f64::from(u32::MAX) {
            tracing::debug!(tallest, "Skipping height lock: measurement out of range");
            return None;
        }

        let height = tallest as u32;
        page.set_style_property(self.aside, "min-height", &format!("{}px", height));
        self.locked.set(Some(height));

        tracing::debug!(height, ?heights, "Locked aside height");

        Some(height)
    }

    /// Run `callback` once the menu images have settled or the wait has
    /// timed out
    pub fn when_images_ready(&self, callback: frosting_timers::Task) {
        when_images_ready(
            &self.page,
            &self.scheduler,
            &self.config.image_selector,
            self.config.timeout(),
            callback,
        );
    }

    pub fn aside(&self) -> ElementRef {
        self.aside
    }

    /// Height most recently applied to the aside
    pub fn locked_height(&self) -> Option<u32> {
        self.locked.get()
    }

    /// Whether a resize recompute is waiting out its quiet period
    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    pub fn detach(&self) {
        if let Some(id) = self.listener.take() {
            self.page.unlisten(id);
        }
        self.resize.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use frosting_dom::Document;
    use frosting_timers::ManualScheduler;

    const PAGE: &str = r#"<html><body>
      <div class="menu-tabs">
        <button class="tab-btn" id="tab-cakes">Cakes</button>
        <button class="tab-btn" id="tab-cookies">Cookies</button>
      </div>
      <aside class="menu-about"><p>Baked fresh every morning.</p></aside>
      <section class="cake-menu menu-grid active"><div class="menu-card"><img src="cake.jpg"></div></section>
      <section class="cookies-menu menu-grid"><div class="menu-card"><img src="cookie.jpg"></div></section>
      <section class="other-menu menu-grid" hidden><div class="menu-card"><img src="tart.jpg"></div></section>
    </body></html>"#;

    struct Fixture {
        doc: Rc<Document>,
        scheduler: Rc<ManualScheduler>,
        aside: ElementRef,
        sections: [ElementRef; 3],
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Cakes visible at 100px, Cookies hidden by the stylesheet at 250px,
    /// Other hidden by attribute at 180px
    fn fixture() -> Fixture {
        let doc = Rc::new(Document::parse(PAGE));
        doc.add_display_rule(".menu-grid", "none").unwrap();
        doc.add_display_rule(".menu-grid.active", "grid").unwrap();

        let sections = [
            doc.query(".cake-menu").unwrap(),
            doc.query(".cookies-menu").unwrap(),
            doc.query(".other-menu").unwrap(),
        ];
        for (&section, height) in sections.iter().zip([100.0, 250.0, 180.0]) {
            doc.set_layout_height(section, height);
        }

        Fixture {
            aside: doc.query(".menu-about").unwrap(),
            doc,
            scheduler: Rc::new(ManualScheduler::new()),
            sections,
        }
    }

    fn attach(f: &Fixture) -> Rc<HeightEqualizer> {
        HeightEqualizer::attach(
            f.doc.clone(),
            f.scheduler.clone(),
            &EqualizerConfig::default(),
        )
        .unwrap()
    }

    fn min_height(f: &Fixture) -> String {
        f.doc.style_property(f.aside, "min-height")
    }

    #[test]
    fn test_tallest_section_wins() {
        let f = fixture();
        let equalizer = attach(&f);

        assert_eq!(equalizer.locked_height(), Some(250));
        assert_eq!(min_height(&f), "250px");

        // Hidden sections are left as they were
        for &section in &f.sections[1..] {
            assert_eq!(f.doc.computed_display(section), "none");
            assert_eq!(f.doc.attribute(section, "style"), None);
        }
        assert_eq!(f.doc.computed_display(f.sections[0]), "grid");
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let f = fixture();
        let equalizer = attach(&f);
        let before = f.doc.attribute(f.aside, "style");

        assert_eq!(equalizer.compute_and_lock_heights(), Some(250));
        assert_eq!(equalizer.compute_and_lock_heights(), Some(250));
        assert_eq!(f.doc.attribute(f.aside, "style"), before);
    }

    #[test]
    fn test_follows_active_section_change() {
        let f = fixture();
        let equalizer = attach(&f);

        // Cookies becomes the visible section; the answer does not change
        f.doc.toggle_class(f.sections[0], "active", Some(false));
        f.doc.toggle_class(f.sections[1], "active", Some(true));
        assert_eq!(equalizer.compute_and_lock_heights(), Some(250));
    }

    #[test]
    fn test_waits_for_images() {
        let f = fixture();
        let images = f.doc.query_all(".menu-card img");
        f.doc.set_image_loading(images[0]);
        f.doc.set_image_loading(images[2]);

        let equalizer = attach(&f);
        assert_eq!(equalizer.locked_height(), None);
        assert_eq!(min_height(&f), "");

        f.doc.finish_image_load(images[0]);
        assert_eq!(min_height(&f), "");

        f.doc.fail_image_load(images[2]);
        assert_eq!(min_height(&f), "250px");
        assert_eq!(f.scheduler.pending(), 0);
    }

    #[test]
    fn test_image_timeout_computes_once() {
        let f = fixture();
        let images = f.doc.query_all(".menu-card img");
        f.doc.set_image_loading(images[1]);

        let equalizer = attach(&f);
        f.scheduler.advance(ms(1499));
        assert_eq!(equalizer.locked_height(), None);

        f.scheduler.advance(ms(1));
        assert_eq!(equalizer.locked_height(), Some(250));

        // A late load does not trigger another measurement
        f.doc.set_layout_height(f.sections[1], 300.0);
        f.doc.finish_image_load(images[1]);
        assert_eq!(min_height(&f), "250px");
    }

    #[test]
    fn test_resize_burst_recomputes_once() {
        let f = fixture();
        let equalizer = attach(&f);
        f.doc.set_layout_height(f.sections[2], 400.0);

        for _ in 0..5 {
            f.doc.resize();
            assert_eq!(f.scheduler.pending(), 1);
            f.scheduler.advance(ms(50));
        }
        assert!(equalizer.resize_pending());
        assert_eq!(min_height(&f), "250px");

        // Last resize at t=200
        f.scheduler.advance(ms(69));
        assert_eq!(min_height(&f), "250px");
        f.scheduler.advance(ms(1));
        assert_eq!(min_height(&f), "400px");
        assert!(!equalizer.resize_pending());
        assert_eq!(f.scheduler.pending(), 0);
    }

    #[test]
    fn test_tab_click_does_not_recompute() {
        let f = fixture();
        attach(&f);
        f.doc.set_layout_height(f.sections[1], 500.0);

        for button in f.doc.query_all(".tab-btn") {
            f.doc.click(button);
        }
        assert_eq!(f.scheduler.pending(), 0);
        assert_eq!(min_height(&f), "250px");
    }

    #[test]
    fn test_unusable_heights_not_applied() {
        let f = fixture();
        let equalizer = attach(&f);

        f.doc.set_layout_height(f.sections[0], f64::NAN);
        assert_eq!(equalizer.compute_and_lock_heights(), None);
        assert_eq!(min_height(&f), "250px");

        // Finite but beyond any pixel count
        f.doc.set_layout_height(f.sections[0], 1e12);
        assert_eq!(equalizer.compute_and_lock_heights(), None);
        assert_eq!(min_height(&f), "250px");
        assert_eq!(equalizer.locked_height(), Some(250));

        let empty = fixture();
        for &section in &empty.sections {
            empty.doc.set_layout_height(section, 0.0);
        }
        let equalizer = attach(&empty);
        assert_eq!(equalizer.locked_height(), None);
        assert_eq!(min_height(&empty), "");
    }

    #[test]
    fn test_missing_aside_does_not_attach() {
        let doc = Rc::new(Document::parse(
            r#"<html><body><section class="cake-menu menu-grid"></section></body></html>"#,
        ));
        let result = HeightEqualizer::attach(
            doc.clone(),
            Rc::new(ManualScheduler::new()),
            &EqualizerConfig::default(),
        );
        assert!(matches!(result, Err(EqualizerError::MissingElement(ref s)) if s == ".menu-about"));
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_detach_stops_resize() {
        let f = fixture();
        let equalizer = attach(&f);

        f.doc.resize();
        equalizer.detach();
        f.doc.set_layout_height(f.sections[0], 900.0);
        f.doc.resize();
        f.scheduler.advance(ms(500));

        assert_eq!(min_height(&f), "250px");
        assert_eq!(f.doc.listener_count(), 0);
    }
}
