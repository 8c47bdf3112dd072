//! A tab button and the content it controls

use frosting_dom::{ElementRef, Page};

/// One tab button with its bound content.
///
/// A tab may point at its panel two ways, and both are honoured:
/// - `aria-controls="<panel id>"`: the panel is shown/hidden through `hidden`
///   and marked with the active class
/// - `data-target="<selector>"`: the menu section gets the section class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub button: ElementRef,
    /// The button's `id`, used to find the default tab
    pub id: Option<String>,
    /// Panel named by `aria-controls`
    pub panel: Option<ElementRef>,
    /// Section named by `data-target`
    pub section: Option<ElementRef>,
}

impl Tab {
    pub fn resolve(page: &dyn Page, button: ElementRef) -> Self {
        let panel = page
            .attribute(button, "aria-controls")
            .filter(|id| !id.is_empty())
            .and_then(|id| page.element_by_id(&id));
        let section = page
            .attribute(button, "data-target")
            .filter(|sel| !sel.is_empty())
            .and_then(|sel| page.query(&sel));

        Self {
            button,
            id: page.attribute(button, "id"),
            panel,
            section,
        }
    }

    /// Reflect the selection onto the button and its content
    pub fn render(&self, page: &dyn Page, selected: bool, active_class: &str, section_class: &str) {
        page.toggle_class(self.button, active_class, Some(selected));
        page.set_attribute(
            self.button,
            "aria-selected",
            if selected { "true" } else { "false" },
        );

        if let Some(panel) = self.panel {
            page.set_hidden(panel, !selected);
            page.toggle_class(panel, active_class, Some(selected));
        }

        if let Some(section) = self.section {
            page.toggle_class(section, section_class, Some(selected));
        }
    }
}
