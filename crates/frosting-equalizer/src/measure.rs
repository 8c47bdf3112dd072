//! Measuring sections that may be hidden

use frosting_dom::{ElementRef, Page};
use serde::{Deserialize, Serialize};

/// Inline properties touched while a hidden section is revealed
const REVEAL_PROPERTIES: [&str; 4] = ["display", "position", "visibility", "left"];

/// How a hidden section is laid out while it is measured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealStyle {
    /// `display` forced onto the section; menu grids lay out as `grid`
    pub display: String,
    /// `left` offset that keeps the section out of view
    pub left: String,
}

impl Default for RevealStyle {
    fn default() -> Self {
        Self {
            display: "grid".to_string(),
            left: "-9999px".to_string(),
        }
    }
}

impl RevealStyle {
    /// Rendered height of `section` in whole pixels, rounded up.
    ///
    /// A section whose computed display is `none` is laid out invisibly and
    /// offscreen for the measurement, then its inline style is put back.
    pub fn measure(&self, page: &dyn Page, section: Option<ElementRef>) -> f64 {
        let Some(section) = section else {
            return 0.0;
        };

        let height = if page.computed_display(section) == "none" {
            let _reveal = OffscreenReveal::apply(page, section, self);
            page.bounding_height(section)
        } else {
            page.bounding_height(section)
        };

        height.ceil()
    }
}

/// Height of `section` with the default reveal style; 0 when absent
pub fn measure_section_height(page: &dyn Page, section: Option<ElementRef>) -> f64 {
    RevealStyle::default().measure(page, section)
}

/// Restores the saved inline properties when dropped, including ones that
/// were unset before.
struct OffscreenReveal<'a> {
    page: &'a dyn Page,
    el: ElementRef,
    saved: Vec<(&'static str, String)>,
}

impl<'a> OffscreenReveal<'a> {
    fn apply(page: &'a dyn Page, el: ElementRef, style: &RevealStyle) -> Self {
        let saved = REVEAL_PROPERTIES
            .iter()
            .map(|&name| (name, page.style_property(el, name)))
            .collect();

        page.set_style_property(el, "display", &style.display);
        page.set_style_property(el, "position", "absolute");
        page.set_style_property(el, "visibility", "hidden");
        page.set_style_property(el, "left", &style.left);

        Self { page, el, saved }
    }
}

impl Drop for OffscreenReveal<'_> {
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            self.page.set_style_property(self.el, name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frosting_dom::Document;

    fn page() -> Document {
        let doc = Document::parse(
            r#"<html><body>
              <div class="cake-menu menu-grid active"></div>
              <div class="cookies-menu menu-grid" style="left: 4px"></div>
              <div class="other-menu menu-grid" hidden></div>
            </body></html>"#,
        );
        doc.add_display_rule(".menu-grid", "none").unwrap();
        doc.add_display_rule(".menu-grid.active", "grid").unwrap();
        doc
    }

    #[test]
    fn test_absent_section_is_zero() {
        let doc = page();
        assert_eq!(measure_section_height(&doc, None), 0.0);
    }

    #[test]
    fn test_visible_section_rounds_up() {
        let doc = page();
        let cake = doc.query(".cake-menu").unwrap();
        doc.set_layout_height(cake, 99.2);

        assert_eq!(measure_section_height(&doc, Some(cake)), 100.0);
        assert_eq!(doc.attribute(cake, "style"), None);
    }

    #[test]
    fn test_hidden_sections_measured_and_restored() {
        let doc = page();
        let cookies = doc.query(".cookies-menu").unwrap();
        let other = doc.query(".other-menu").unwrap();
        doc.set_layout_height(cookies, 250.0);
        doc.set_layout_height(other, 180.4);

        // Not rendered as they stand
        assert_eq!(doc.bounding_height(cookies), 0.0);
        assert_eq!(doc.bounding_height(other), 0.0);

        assert_eq!(measure_section_height(&doc, Some(cookies)), 250.0);
        assert_eq!(measure_section_height(&doc, Some(other)), 181.0);

        // Prior inline values come back, unset ones stay unset
        assert_eq!(doc.style_property(cookies, "left"), "4px");
        for name in ["display", "position", "visibility"] {
            assert_eq!(doc.style_property(cookies, name), "");
            assert_eq!(doc.style_property(other, name), "");
        }
        assert_eq!(doc.style_property(other, "left"), "");
        assert_eq!(doc.computed_display(cookies), "none");
        assert_eq!(doc.computed_display(other), "none");
        assert!(doc.is_hidden(other));
    }

    #[test]
    fn test_reveal_style_is_configurable() {
        let doc = page();
        let cookies = doc.query(".cookies-menu").unwrap();
        doc.set_layout_height(cookies, 40.0);

        let style = RevealStyle {
            display: "flex".to_string(),
            left: "-1px".to_string(),
        };
        assert_eq!(style.measure(&doc, Some(cookies)), 40.0);
        assert_eq!(doc.style_property(cookies, "left"), "4px");
    }
}
