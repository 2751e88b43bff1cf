use std::fmt::Write as _;

use crate::foundation::core::{Bounds, fmt_num};
use crate::foundation::error::ExportError;

/// SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
/// XLink namespace URI (used by `xlink:href`).
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Child of an [`Element`].
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Character data (escaped on output).
    Text(String),
}

/// Minimal ordered XML element. Attribute order is insertion order, which keeps output stable.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Tag name (may carry a prefix, e.g. `xlink:href` attributes live in `attrs`).
    pub name: String,
    attrs: Vec<(String, String)>,
    /// Children in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    /// Set (or replace) an attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attrs.push((key, value));
        }
    }

    /// Remove an attribute if present.
    pub fn remove(&mut self, key: &str) {
        self.attrs.retain(|(k, _)| k != key);
    }

    /// Attribute lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in insertion order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append character data.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Child elements (text nodes skipped).
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Depth-first search for a descendant (or self) with the given `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.get("id") == Some(id) {
            return Some(self);
        }
        self.elements().find_map(|e| e.find_by_id(id))
    }

    /// Serialize into `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attrs {
            let _ = write!(out, " {k}=\"{}\"", escape(v, true));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_to(out),
                Node::Text(t) => out.push_str(&escape(t, false)),
            }
        }
        let _ = write!(out, "</{}>", self.name);
    }

    /// Serialized markup of this element alone.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

fn escape(s: &str, attr: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// One exported frame.
///
/// The visible tree references reusable fragments in `defs` by id. Errors the composer recovered
/// from (skipped instances, dropped filters, disabled glyph store) are kept in `recovered`.
#[derive(Debug)]
pub struct Document {
    /// Root `width`/`height` in whole pixels.
    pub size: (f64, f64),
    /// Root `viewBox` rectangle.
    pub view_box: Bounds,
    /// Reusable fragments in materialization order.
    pub defs: Vec<Element>,
    /// Visible root group.
    pub root: Element,
    /// Skip-level errors encountered while composing.
    pub recovered: Vec<ExportError>,
}

impl Document {
    /// Empty document for a stage rectangle (pixels), optionally grown by a uniform margin.
    pub fn new(stage: Bounds, margin: f64) -> Self {
        let view_box = if margin > 0.0 {
            stage.grow(margin)
        } else {
            stage
        };
        Self {
            size: (stage.width().round(), stage.height().round()),
            view_box,
            defs: Vec::new(),
            root: Element::new("g"),
            recovered: Vec::new(),
        }
    }

    /// Look up a definition by id.
    pub fn def(&self, id: &str) -> Option<&Element> {
        self.defs.iter().find(|e| e.get("id") == Some(id))
    }

    /// Mutable lookup of a definition by id.
    pub fn def_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.defs.iter_mut().find(|e| e.get("id") == Some(id))
    }

    /// Complete `<svg>` element.
    pub fn to_element(&self) -> Element {
        let vb = self.view_box;
        let mut svg = Element::new("svg")
            .with("xmlns", SVG_NS)
            .with("xmlns:xlink", XLINK_NS)
            .with("version", "1.1")
            .with("width", format!("{}px", fmt_num(self.size.0)))
            .with("height", format!("{}px", fmt_num(self.size.1)))
            .with(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    fmt_num(vb.x_min),
                    fmt_num(vb.y_min),
                    fmt_num(vb.width()),
                    fmt_num(vb.height())
                ),
            );
        let mut defs = Element::new("defs");
        defs.children = self.defs.iter().cloned().map(Node::Element).collect();
        svg.push(defs);
        svg.push(self.root.clone());
        svg
    }

    /// Serialized document with XML declaration.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        self.to_element().write_to(&mut out);
        out.push('\n');
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/svg/document.rs"]
mod tests;
