//! Selector matching through scraper
//!
//! The in-memory document keeps its own mutable arena. To match a selector
//! the arena is written back out as markup, each element tagged with its
//! arena index, and reparsed by scraper. The snapshot is reused until the
//! next mutation.

use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::error::DomError;
use crate::Result;

/// Attribute carrying an element's arena index in snapshot markup
pub(crate) const NODE_MARKER: &str = "data-frosting-node";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Parse a CSS selector the way the browser's `querySelector` would
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|err| DomError::InvalidSelector {
        selector: selector.to_string(),
        reason: err.to_string(),
    })
}

pub(crate) struct Snapshot {
    html: Html,
}

impl Snapshot {
    pub(crate) fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Arena indices of every element matching `selector`
    pub(crate) fn matching(&self, selector: &Selector) -> HashSet<usize> {
        self.html
            .select(selector)
            .filter_map(|el| el.attr(NODE_MARKER))
            .filter_map(|index| index.parse().ok())
            .collect()
    }
}

/// Open tag for one arena element; `None` means the element has no closing tag
pub(crate) fn open_tag<'a>(
    out: &mut String,
    index: usize,
    tag: &'a str,
    attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Option<&'a str> {
    out.push('<');
    out.push_str(tag);
    out.push_str(&format!(" {}=\"{}\"", NODE_MARKER, index));
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(out, value);
        out.push('"');
    }
    out.push('>');
    (!VOID_ELEMENTS.contains(&tag)).then_some(tag)
}

fn escape_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
