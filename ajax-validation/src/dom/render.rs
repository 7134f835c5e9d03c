//! Document serialization to HTML
//!
//! Text nodes and attribute values are escaped; markup nodes are trusted and
//! written verbatim. Hidden elements carry `display: none;` in their style.

use std::fmt::Write;

use super::{Document, NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

impl Document {
    /// Render a node and its subtree
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut html = String::with_capacity(256);
        self.write_node(&mut html, id);
        html
    }

    /// Render a node's children
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut html = String::with_capacity(128);
        for &child in self.children(id) {
            self.write_node(&mut html, child);
        }
        html
    }

    fn write_node(&self, html: &mut String, id: NodeId) {
        let el = match self.kind(id) {
            Some(NodeKind::Text(text)) => {
                html.push_str(&escape_html(text));
                return;
            }
            Some(NodeKind::Markup(markup)) => {
                html.push_str(markup);
                return;
            }
            Some(NodeKind::Element(el)) => el,
            None => return,
        };

        let _ = write!(html, "<{}", el.tag());
        let mut wrote_style = false;
        for (name, value) in el.attrs() {
            if el.is_hidden() && name.eq_ignore_ascii_case("style") {
                let value = format!("{}; display: none;", value.trim().trim_end_matches(';'));
                write_attr(html, name, &value);
                wrote_style = true;
            } else {
                write_attr(html, name, value);
            }
        }
        if el.is_hidden() && !wrote_style {
            write_attr(html, "style", "display: none;");
        }
        html.push('>');

        if VOID_ELEMENTS.contains(&el.tag()) {
            return;
        }

        for &child in self.children(id) {
            self.write_node(html, child);
        }
        let _ = write!(html, "</{}>", el.tag());
    }
}

fn write_attr(html: &mut String, name: &str, value: &str) {
    let _ = write!(html, r#" {}="{}""#, name, escape_attr(value));
}

/// Escape a string for use in HTML attribute values
pub(crate) fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a string for use in HTML content
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
