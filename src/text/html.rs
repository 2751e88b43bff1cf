//! Edit-text contents: plain strings pass through, HTML fragments are flattened.
//!
//! The fragment is parsed inside a `<span>` wrapper. Only the text an element holds before its
//! first child counts; tails after closing tags or void elements such as `<br>` are dropped.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Extract display text and effective font size (pixels) from an edit-text record.
///
/// The returned size is the smaller of `font_height_px` and any `size` attribute on `font`
/// elements or `font-size` attribute on other elements.
pub fn extract_text(initial_text: Option<&str>, font_height_px: f64) -> (String, f64) {
    let Some(text) = initial_text else {
        return (String::new(), font_height_px);
    };
    if !text.starts_with('<') {
        return (text.to_string(), font_height_px);
    }

    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .one(format!("<span>{text}</span>"));
    let Some(wrapper) = find_element(&dom.document, "span") else {
        tracing::debug!("edit text fragment has no content");
        return (String::new(), font_height_px);
    };

    let mut walk = TextWalk {
        parts: Vec::new(),
        size: font_height_px,
    };
    walk.visit(&wrapper);
    (walk.parts.join(" "), walk.size)
}

struct TextWalk {
    parts: Vec<String>,
    size: f64,
}

impl TextWalk {
    /// Pre-order walk over elements, collecting each element's leading text.
    fn visit(&mut self, handle: &Handle) {
        let NodeData::Element { name, attrs, .. } = &handle.data else {
            return;
        };
        let key = if &*name.local == "font" {
            "size"
        } else {
            "font-size"
        };
        if let Some(px) = attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == key)
            .and_then(|a| parse_size(&a.value))
        {
            self.size = self.size.min(px);
        }

        let leading = leading_text(handle);
        let trimmed = leading.trim();
        if !trimmed.is_empty() {
            self.parts.push(trimmed.to_string());
        }
        for child in handle.children.borrow().iter() {
            self.visit(child);
        }
    }
}

/// Text nodes before the first non-text child.
fn leading_text(handle: &Handle) -> String {
    let mut out = String::new();
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            _ => break,
        }
    }
    out
}

/// First element named `tag` in document order.
fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data
        && &*name.local == tag
    {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

/// Leading integer of an attribute value (`"12"`, `"12px"`).
fn parse_size(v: &str) -> Option<f64> {
    let v = v.trim();
    let digits = v.find(|c: char| !c.is_ascii_digit()).unwrap_or(v.len());
    v[..digits].parse::<u32>().ok().map(f64::from)
}

#[cfg(test)]
#[path = "../../tests/unit/text/html.rs"]
mod tests;
