//! Dense HTML rendering.
//!
//! Rendering walks the element tree and produces markup with no added
//! whitespace: text exactly as stored (decoded, then escaped), attributes in
//! insertion order, children in content order. Void elements render as
//! `<name />` with no end tag; their content, if any was added, follows the
//! self-closing tag.

use std::fmt::Write;

use crate::escape::{decode_entities, escape_attr, escape_text};
use crate::tag::{Content, Tag, TagInner};

/// Elements that render self-closing, with no end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "wbr",
];

/// Check if a tag name is a void element.
pub(crate) fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

/// Render the element and everything below it.
pub(crate) fn render(tag: &Tag) -> String {
    let mut out = String::new();
    write_tag(&mut out, tag);
    out
}

/// Render just the attribute list, without the surrounding tag.
pub(crate) fn render_attrs(tag: &Tag) -> String {
    let mut out = String::new();
    write_attrs(&mut out, &tag.inner.borrow());
    out
}

/// Render just the content sequence, without the surrounding tag.
pub(crate) fn render_content(tag: &Tag) -> String {
    let mut out = String::new();
    write_content(&mut out, &tag.inner.borrow());
    out
}

fn write_tag(out: &mut String, tag: &Tag) {
    let inner = tag.inner.borrow();
    let _ = write!(out, "<{}", inner.name);
    if !inner.attrs.is_empty() {
        out.push(' ');
        write_attrs(out, &inner);
    }
    if inner.void {
        out.push_str(" />");
        write_content(out, &inner);
    } else {
        out.push('>');
        write_content(out, &inner);
        let _ = write!(out, "</{}>", inner.name);
    }
}

/// Write `name="value"` pairs separated by single spaces, values escaped.
fn write_attrs(out: &mut String, inner: &TagInner) {
    let mut first = true;
    for (name, value) in &inner.attrs {
        if !first {
            out.push(' ');
        }
        first = false;
        let _ = write!(out, "{}=\"{}\"", name, escape_attr(&value.to_text()));
    }
}

fn write_content(out: &mut String, inner: &TagInner) {
    for item in &inner.content {
        match item {
            Content::Text(text) => out.push_str(&escape_text(&decode_entities(text))),
            Content::Child(child) => write_tag(out, child),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
