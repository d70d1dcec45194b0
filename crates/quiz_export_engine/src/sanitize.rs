use std::collections::HashMap;

use ego_tree::NodeRef;
use scraper::node::{Element, Node};
use scraper::Html;

/// Elements that survive sanitizing. `img` is added when images are kept.
pub const ALLOWED_TAGS: &[&str] = &["a", "br", "p", "ul", "ol", "li", "strong", "em"];
/// Attributes removed from every element.
pub const DENIED_ATTRIBUTES: &[&str] = &["style", "class", "id"];

const VOID_TAGS: &[&str] = &["br", "img"];

/// Image `src` rewrites applied while sanitizing, keyed by the original value.
pub type ImageReplacements = HashMap<String, String>;

/// Rebuilds a markup fragment from its parsed tree with an explicit keep or
/// unwrap decision per element.
///
/// Disallowed elements are unwrapped: their markers disappear, their text and
/// allowed descendants stay. Comments and other non-content nodes are dropped.
/// Whitespace runs (including non-breaking spaces) collapse to one space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sanitizer {
    keep_images: bool,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self { keep_images: true }
    }
}

impl Sanitizer {
    pub fn new(keep_images: bool) -> Self {
        Self { keep_images }
    }

    pub fn keeps_images(&self) -> bool {
        self.keep_images
    }

    pub fn sanitize(&self, fragment: &str) -> String {
        self.sanitize_with(fragment, &ImageReplacements::new())
    }

    pub fn sanitize_with(&self, fragment: &str, images: &ImageReplacements) -> String {
        if fragment.trim().is_empty() {
            return String::new();
        }
        let document = Html::parse_fragment(fragment);
        let mut out = String::with_capacity(fragment.len());
        let mut open = Vec::new();
        for child in document.root_element().children() {
            self.visit_node(child, images, &mut open, &mut out);
        }
        collapse_whitespace(&out)
    }

    pub fn is_allowed(&self, tag: &str) -> bool {
        ALLOWED_TAGS.contains(&tag) || (self.keep_images && tag == "img")
    }

    /// `open` holds the retained elements enclosing `node`, outermost first.
    fn visit_node<'a>(
        &self,
        node: NodeRef<'a, Node>,
        images: &ImageReplacements,
        open: &mut Vec<&'a str>,
        out: &mut String,
    ) {
        match node.value() {
            Node::Text(text) => push_escaped_text(text, out),
            Node::Element(element) => {
                let tag = element.name();
                if !self.is_allowed(tag) || closes_open_ancestor(tag, open) {
                    self.visit_children(node, images, open, out);
                    return;
                }
                push_start_tag(element, images, out);
                if VOID_TAGS.contains(&tag) {
                    return;
                }
                open.push(tag);
                self.visit_children(node, images, open, out);
                open.pop();
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            Node::Fragment | Node::Document => self.visit_children(node, images, open, out),
            _ => {}
        }
    }

    fn visit_children<'a>(
        &self,
        node: NodeRef<'a, Node>,
        images: &ImageReplacements,
        open: &mut Vec<&'a str>,
        out: &mut String,
    ) {
        for child in node.children() {
            self.visit_node(child, images, open, out);
        }
    }
}

/// True when an HTML parser reading `<tag>` inside the `open` elements would
/// close one of them rather than nest. Unwrapping such an element keeps the
/// output stable under re-parsing, once the table or button that allowed the
/// nesting has been unwrapped.
fn closes_open_ancestor(tag: &str, open: &[&str]) -> bool {
    match tag {
        "a" => open.contains(&"a"),
        "p" | "ul" | "ol" => open.contains(&"p"),
        "li" => {
            open.contains(&"p")
                || open
                    .iter()
                    .rev()
                    .find(|t| matches!(**t, "li" | "ul" | "ol"))
                    .is_some_and(|t| *t == "li")
        }
        _ => false,
    }
}

fn push_start_tag(element: &Element, images: &ImageReplacements, out: &mut String) {
    let tag = element.name();
    // Attribute order is normalized so repeated runs give identical output.
    let mut attrs: Vec<(&str, &str)> = element
        .attrs()
        .filter(|(name, _)| keeps_attribute(tag, name))
        .collect();
    attrs.sort_by(|a, b| a.0.cmp(b.0));

    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        let value = match (tag, name) {
            ("img", "src") => images.get(value).map(String::as_str).unwrap_or(value),
            _ => value,
        };
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        push_escaped_attribute(value, out);
        out.push('"');
    }
    out.push('>');
}

fn keeps_attribute(tag: &str, name: &str) -> bool {
    if DENIED_ATTRIBUTES.iter().any(|denied| denied.eq_ignore_ascii_case(name)) {
        return false;
    }
    tag != "a" || name.eq_ignore_ascii_case("href")
}

pub(crate) fn push_escaped_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Escape plain text so it can be fed through the sanitizer as markup.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped_text(text, &mut out);
    out
}

/// Collapse every whitespace run, non-breaking spaces included, to one ASCII
/// space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
