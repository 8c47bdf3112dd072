//! Page enhancer
//!
//! Owns every behaviour attached to one page. Behaviours attach
//! independently: a missing piece of markup disables only the behaviour
//! that needs it.

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::{Rc, Weak};

use frosting_dom::{EventKind, EventTarget, ListenerId, Page};
#[cfg(feature = "equalizer")]
use frosting_equalizer::HeightEqualizer;
use frosting_lightbox::LightboxController;
use frosting_navigation::MenuToggleController;
use frosting_tabs::TabController;
use frosting_timers::Scheduler;
use serde::Serialize;

use crate::config::Config;

/// Which behaviours are live on the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnhancerStatus {
    pub menu: bool,
    pub tabs: bool,
    pub lightbox: bool,
    pub equalizer: bool,
}

pub struct Enhancer {
    page: Rc<dyn Page>,
    #[cfg_attr(not(feature = "equalizer"), allow(dead_code))]
    scheduler: Rc<dyn Scheduler>,
    config: Config,
    initialized: Cell<bool>,
    ready_listener: Cell<Option<ListenerId>>,
    menu: RefCell<Option<Rc<MenuToggleController>>>,
    tabs: RefCell<Option<Rc<TabController>>>,
    lightbox: RefCell<Option<Rc<LightboxController>>>,
    #[cfg(feature = "equalizer")]
    equalizer: RefCell<Option<Rc<HeightEqualizer>>>,
}

impl Enhancer {
    pub fn new(page: Rc<dyn Page>, scheduler: Rc<dyn Scheduler>, config: Config) -> Rc<Self> {
        Rc::new(Self {
            page,
            scheduler,
            config,
            initialized: Cell::new(false),
            ready_listener: Cell::new(None),
            menu: RefCell::new(None),
            tabs: RefCell::new(None),
            lightbox: RefCell::new(None),
            #[cfg(feature = "equalizer")]
            equalizer: RefCell::new(None),
        })
    }

    /// Initialize when the page signals it is ready
    pub fn install(self: &Rc<Self>) {
        if self.ready_listener.get().is_some() {
            return;
        }

        let weak: Weak<Self> = Rc::downgrade(self);
        let id = self.page.listen_once(
            EventTarget::Document,
            EventKind::Ready,
            Rc::new(move |_| {
                if let Some(enhancer) = weak.upgrade() {
                    enhancer.ready_listener.set(None);
                    enhancer.initialize();
                }
            }),
        );
        self.ready_listener.set(Some(id));

        tracing::debug!("Waiting for page ready");
    }

    /// Attach every behaviour the page has markup for.
    ///
    /// Runs once; later calls report the existing status.
    pub fn initialize(&self) -> EnhancerStatus {
        if self.initialized.replace(true) {
            return self.status();
        }

        if let Some(id) = self.ready_listener.take() {
            self.page.unlisten(id);
        }

        let page = &self.page;
        *self.menu.borrow_mut() = attached(
            "menu",
            MenuToggleController::attach(Rc::clone(page), &self.config.menu),
        );
        *self.tabs.borrow_mut() = attached(
            "tabs",
            TabController::attach(Rc::clone(page), &self.config.tabs),
        );
        *self.lightbox.borrow_mut() = attached(
            "lightbox",
            LightboxController::attach(Rc::clone(page), &self.config.lightbox),
        );

        // Measured after the tabs have settled which section is visible
        #[cfg(feature = "equalizer")]
        {
            *self.equalizer.borrow_mut() = attached(
                "equalizer",
                HeightEqualizer::attach(
                    Rc::clone(page),
                    Rc::clone(&self.scheduler),
                    &self.config.equalizer,
                ),
            );
        }

        let status = self.status();
        tracing::info!(
            menu = status.menu,
            tabs = status.tabs,
            lightbox = status.lightbox,
            equalizer = status.equalizer,
            "Page enhanced"
        );

        status
    }

    pub fn status(&self) -> EnhancerStatus {
        EnhancerStatus {
            menu: self.menu.borrow().is_some(),
            tabs: self.tabs.borrow().is_some(),
            lightbox: self.lightbox.borrow().is_some(),
            #[cfg(feature = "equalizer")]
            equalizer: self.equalizer.borrow().is_some(),
            #[cfg(not(feature = "equalizer"))]
            equalizer: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn menu(&self) -> Option<Rc<MenuToggleController>> {
        self.menu.borrow().clone()
    }

    pub fn tabs(&self) -> Option<Rc<TabController>> {
        self.tabs.borrow().clone()
    }

    pub fn lightbox(&self) -> Option<Rc<LightboxController>> {
        self.lightbox.borrow().clone()
    }

    #[cfg(feature = "equalizer")]
    pub fn equalizer(&self) -> Option<Rc<HeightEqualizer>> {
        self.equalizer.borrow().clone()
    }

    /// Remove every listener the behaviours registered
    pub fn detach(&self) {
        if let Some(id) = self.ready_listener.take() {
            self.page.unlisten(id);
        }
        if let Some(menu) = self.menu.borrow_mut().take() {
            menu.detach();
        }
        if let Some(tabs) = self.tabs.borrow_mut().take() {
            tabs.detach();
        }
        if let Some(lightbox) = self.lightbox.borrow_mut().take() {
            lightbox.detach();
        }
        #[cfg(feature = "equalizer")]
        if let Some(equalizer) = self.equalizer.borrow_mut().take() {
            equalizer.detach();
        }
    }
}

fn attached<T, E: Display>(behaviour: &str, result: Result<Rc<T>, E>) -> Option<Rc<T>> {
    match result {
        Ok(controller) => Some(controller),
        Err(err) => {
            tracing::debug!(behaviour, error = %err, "Behaviour not attached");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use frosting_dom::{Document, ElementRef, Key};
    use frosting_lightbox::LightboxState;
    use frosting_navigation::MenuState;
    use frosting_timers::ManualScheduler;

    const MENU_PAGE: &str = r##"<html><body>
      <header>
        <button class="menu-icon" aria-label="Menu">☰</button>
        <ul class="nav-list"><li><a href="#menu">Menu</a></li></ul>
      </header>
      <main>
        <div class="menu-tabs" role="tablist">
          <button class="tab-btn" id="tab-cookies" aria-controls="panel-cookies" data-target=".cookies-menu">Cookies</button>
          <button class="tab-btn" id="tab-cakes" aria-controls="panel-cakes" data-target=".cake-menu">Cakes</button>
          <button class="tab-btn" id="tab-other" aria-controls="panel-other" data-target=".other-menu">Other</button>
        </div>
        <aside class="menu-about"><p>Everything is baked in-house.</p></aside>
        <section id="panel-cookies" class="cookies-menu menu-grid">
          <a class="menu-card" href="#" data-full="img/cookie-full.jpg"><img src="img/cookie.jpg"></a>
        </section>
        <section id="panel-cakes" class="cake-menu menu-grid">
          <a class="menu-card" href="#"><img src="img/cake.jpg"></a>
        </section>
        <section id="panel-other" class="other-menu menu-grid">
          <div class="menu-card"><img src="img/scone.jpg"></div>
        </section>
      </main>
    </body></html>"##;

    struct Fixture {
        doc: Rc<Document>,
        scheduler: Rc<ManualScheduler>,
        enhancer: Rc<Enhancer>,
    }

    fn fixture(markup: &str) -> Fixture {
        let doc = Rc::new(Document::parse(markup));
        doc.add_display_rule(".menu-grid", "none").unwrap();
        doc.add_display_rule(".menu-grid.active", "grid").unwrap();
        for (selector, height) in [
            (".cake-menu", 120.0),
            (".cookies-menu", 340.0),
            (".other-menu", 210.5),
        ] {
            if let Some(section) = doc.query(selector) {
                doc.set_layout_height(section, height);
            }
        }

        let scheduler = Rc::new(ManualScheduler::new());
        let enhancer = Enhancer::new(doc.clone(), scheduler.clone(), Config::default());
        Fixture {
            doc,
            scheduler,
            enhancer,
        }
    }

    fn section(doc: &Document, selector: &str) -> ElementRef {
        doc.query(selector).unwrap()
    }

    #[test]
    fn test_initializes_on_ready() {
        let f = fixture(MENU_PAGE);
        f.enhancer.install();
        assert!(!f.enhancer.is_initialized());
        assert_eq!(f.enhancer.status(), EnhancerStatus::default());

        f.doc.ready();
        assert!(f.enhancer.is_initialized());
        assert_eq!(
            f.enhancer.status(),
            EnhancerStatus {
                menu: true,
                tabs: true,
                lightbox: true,
                equalizer: cfg!(feature = "equalizer"),
            }
        );

        // A second ready event does not attach twice
        let listeners = f.doc.listener_count();
        f.doc.ready();
        assert_eq!(f.doc.listener_count(), listeners);
    }

    #[test]
    fn test_initialize_runs_once() {
        let f = fixture(MENU_PAGE);
        let first = f.enhancer.initialize();
        let listeners = f.doc.listener_count();

        assert_eq!(f.enhancer.initialize(), first);
        assert_eq!(f.doc.listener_count(), listeners);
    }

    #[test]
    fn test_behaviours_work_together() {
        let f = fixture(MENU_PAGE);
        f.enhancer.initialize();
        let doc = &f.doc;

        // Cakes is active on load even though Cookies comes first
        let tabs = f.enhancer.tabs().unwrap();
        assert_eq!(tabs.active(), 1);
        assert_eq!(doc.computed_display(section(doc, ".cake-menu")), "grid");
        assert!(doc.is_hidden(section(doc, ".cookies-menu")));

        let menu = f.enhancer.menu().unwrap();
        doc.click(section(doc, ".menu-icon"));
        assert_eq!(menu.state(), MenuState::Open);

        doc.click(doc.query_all(".tab-btn")[2]);
        assert_eq!(tabs.active(), 2);
        assert_eq!(doc.computed_display(section(doc, ".other-menu")), "grid");

        let lightbox = f.enhancer.lightbox().unwrap();
        let cookie_card = doc.query(".cookies-menu .menu-card").unwrap();
        let event = doc.click(cookie_card);
        assert!(event.default_prevented());
        assert_eq!(
            lightbox.state(),
            LightboxState::Open {
                src: "img/cookie-full.jpg".to_string()
            }
        );

        doc.key_down(Key::Escape);
        assert_eq!(lightbox.state(), LightboxState::Closed);
    }

    #[cfg(feature = "equalizer")]
    #[test]
    fn test_aside_matches_tallest_hidden_section() {
        let f = fixture(MENU_PAGE);
        f.enhancer.initialize();
        let doc = &f.doc;
        let aside = section(doc, ".menu-about");

        // Only Cakes (120px) is visible; Cookies is the tallest
        assert_eq!(doc.bounding_height(section(doc, ".cookies-menu")), 0.0);
        assert_eq!(doc.style_property(aside, "min-height"), "340px");

        // Switching tabs leaves the lock alone
        for button in doc.query_all(".tab-btn") {
            doc.click(button);
            assert_eq!(doc.style_property(aside, "min-height"), "340px");
        }
        assert_eq!(f.scheduler.pending(), 0);

        // A resize picks up new layout after the quiet period
        doc.set_layout_height(section(doc, ".other-menu"), 401.2);
        doc.resize();
        f.scheduler.advance(Duration::from_millis(120));
        assert_eq!(doc.style_property(aside, "min-height"), "402px");
        assert_eq!(f.enhancer.equalizer().unwrap().locked_height(), Some(402));
    }

    #[cfg(feature = "equalizer")]
    #[test]
    fn test_equalizer_waits_for_menu_images() {
        let f = fixture(MENU_PAGE);
        let images = f.doc.query_all(".menu-card img");
        for &img in &images {
            f.doc.set_image_loading(img);
        }
        f.enhancer.initialize();
        let aside = section(&f.doc, ".menu-about");
        assert_eq!(f.doc.style_property(aside, "min-height"), "");

        f.doc.finish_image_load(images[0]);
        f.scheduler.advance(Duration::from_millis(1500));
        assert_eq!(f.doc.style_property(aside, "min-height"), "340px");
    }

    #[test]
    fn test_missing_markup_skips_behaviour() {
        let f = fixture(
            r#"<html><body>
              <aside class="menu-about"></aside>
              <section class="cake-menu menu-grid active"></section>
            </body></html>"#,
        );
        let status = f.enhancer.initialize();

        assert!(!status.menu);
        assert!(!status.tabs);
        // The lightbox brings its own markup
        assert!(status.lightbox);
        assert!(f.doc.query(".ff-lightbox").is_some());
        assert_eq!(status.equalizer, cfg!(feature = "equalizer"));
        assert!(f.enhancer.menu().is_none());
    }

    #[test]
    fn test_detach_removes_listeners() {
        let f = fixture(MENU_PAGE);
        f.enhancer.initialize();
        assert!(f.doc.listener_count() > 0);

        f.enhancer.detach();
        assert_eq!(f.doc.listener_count(), 0);
        assert_eq!(f.enhancer.status(), EnhancerStatus::default());
    }

    #[test]
    fn test_status_serializes() {
        let status = EnhancerStatus {
            menu: true,
            tabs: false,
            lightbox: true,
            equalizer: false,
        };
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::json!({"menu": true, "tabs": false, "lightbox": true, "equalizer": false})
        );
    }
}
