//! Tag handles and the attribute, class, and content stores.
//!
//! A [`Tag`] is a cheap reference-counted handle to one element. Every
//! setter takes `&self` and returns another handle to the same element, so
//! calls chain fluently and a child handle kept by the caller stays live
//! after the child is appended somewhere: mutations through any handle show
//! up in the next render of every tree that contains the element.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use compact_str::{CompactString, format_compact};
use indexmap::IndexMap;
use regex::Regex;

use crate::inline;
use crate::render;

#[allow(unused_imports)]
use crate::debug;

/// A stored attribute value.
///
/// Values keep their original, unescaped form; escaping happens at render
/// time. Scalars render via a fixed textual form: booleans as `"1"` (true)
/// or `""` (false), integers in decimal, floats via the shortest
/// representation that round-trips. `Tokens` is the ordered class-token
/// sequence kept under the reserved `class` key; it renders space-joined.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(CompactString),
    Tokens(Vec<CompactString>),
}

impl AttrValue {
    /// The textual form used for rendering, before escaping.
    pub fn to_text(&self) -> String {
        match self {
            AttrValue::Bool(true) => "1".to_string(),
            AttrValue::Bool(false) => String::new(),
            AttrValue::Int(n) => n.to_string(),
            AttrValue::Float(x) => x.to_string(),
            AttrValue::Text(s) => s.to_string(),
            AttrValue::Tokens(tokens) => tokens.join(" "),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v.into())
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<u32> for AttrValue {
    fn from(v: u32) -> Self {
        AttrValue::Int(v.into())
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.into())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v.into())
    }
}

impl From<CompactString> for AttrValue {
    fn from(v: CompactString) -> Self {
        AttrValue::Text(v)
    }
}

/// One entry in an element's content sequence.
#[derive(Debug, Clone)]
pub enum Content {
    /// A text segment, stored raw and escaped at render time.
    Text(String),
    /// A child element; the handle shares state with every other handle to
    /// the same element.
    Child(Tag),
}

impl From<&str> for Content {
    fn from(v: &str) -> Self {
        Content::Text(v.to_string())
    }
}

impl From<String> for Content {
    fn from(v: String) -> Self {
        Content::Text(v)
    }
}

impl From<CompactString> for Content {
    fn from(v: CompactString) -> Self {
        Content::Text(v.into())
    }
}

impl From<Tag> for Content {
    fn from(v: Tag) -> Self {
        Content::Child(v)
    }
}

impl From<&Tag> for Content {
    fn from(v: &Tag) -> Self {
        Content::Child(v.clone())
    }
}

/// Conversion into class tokens for [`Tag::add_class`] and
/// [`Tag::set_class`].
///
/// String inputs collapse whitespace runs and split, handing over each
/// non-empty token in order; sequences apply the same treatment per element.
/// `None` hands over nothing, which still materializes the `class`
/// attribute as an empty token list.
pub trait IntoClasses {
    /// Feed each token to `push`, in order.
    fn each_token(self, push: &mut dyn FnMut(&str));
}

impl IntoClasses for &str {
    fn each_token(self, push: &mut dyn FnMut(&str)) {
        for token in self.split_whitespace() {
            push(token);
        }
    }
}

impl IntoClasses for String {
    fn each_token(self, push: &mut dyn FnMut(&str)) {
        self.as_str().each_token(push);
    }
}

impl IntoClasses for &String {
    fn each_token(self, push: &mut dyn FnMut(&str)) {
        self.as_str().each_token(push);
    }
}

impl IntoClasses for &CompactString {
    fn each_token(self, push: &mut dyn FnMut(&str)) {
        self.as_str().each_token(push);
    }
}

impl<T: IntoClasses> IntoClasses for Option<T> {
    fn each_token(self, push: &mut dyn FnMut(&str)) {
        if let Some(value) = self {
            value.each_token(push);
        }
    }
}

impl<T: IntoClasses> IntoClasses for Vec<T> {
    fn each_token(self, push: &mut dyn FnMut(&str)) {
        for value in self {
            value.each_token(push);
        }
    }
}

impl<T: IntoClasses + Copy> IntoClasses for &[T] {
    fn each_token(self, push: &mut dyn FnMut(&str)) {
        for value in self {
            value.each_token(push);
        }
    }
}

impl<T: IntoClasses, const N: usize> IntoClasses for [T; N] {
    fn each_token(self, push: &mut dyn FnMut(&str)) {
        for value in self {
            value.each_token(push);
        }
    }
}

pub(crate) struct TagInner {
    pub(crate) name: CompactString,
    pub(crate) void: bool,
    pub(crate) alias: Option<CompactString>,
    pub(crate) attrs: IndexMap<CompactString, AttrValue>,
    pub(crate) content: Vec<Content>,
}

/// A handle to one element in the markup tree.
///
/// Cloning a `Tag` never copies the element; it hands out another reference
/// to the same shared state. Handles are single-threaded (`!Send`, `!Sync`);
/// a tree shared across threads needs external synchronization the crate
/// does not provide.
#[derive(Clone)]
pub struct Tag {
    pub(crate) inner: Rc<RefCell<TagInner>>,
}

impl Tag {
    /// Create an element with the given tag name.
    ///
    /// The element is classified as void (self-closing, no end tag) when the
    /// name is one of the well-known void elements, compared
    /// ASCII-case-insensitively. The classification is fixed at construction;
    /// see [`Tag::force_void`] and [`Tag::set_name`].
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl Into<CompactString>) -> Tag {
        let name = name.into();
        assert!(!name.is_empty(), "tag name must not be empty");
        let void = render::is_void_element(&name);
        Tag {
            inner: Rc::new(RefCell::new(TagInner {
                name,
                void,
                alias: None,
                attrs: IndexMap::new(),
                content: Vec::new(),
            })),
        }
    }

    /// The element name.
    pub fn name(&self) -> String {
        self.inner.borrow().name.to_string()
    }

    /// Rename the element.
    ///
    /// Renaming does not reclassify the void flag; that is decided at
    /// construction and only [`Tag::force_void`] changes it afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn set_name(&self, name: impl Into<CompactString>) -> Tag {
        let name = name.into();
        assert!(!name.is_empty(), "tag name must not be empty");
        self.inner.borrow_mut().name = name;
        self.clone()
    }

    /// Whether the element renders self-closing with no end tag.
    pub fn is_void(&self) -> bool {
        self.inner.borrow().void
    }

    /// Force the element to render as a void element. The flag only turns
    /// on; a void element cannot be made paired again.
    pub fn force_void(&self) -> Tag {
        self.inner.borrow_mut().void = true;
        self.clone()
    }

    /// Set the non-rendered lookup label used by [`Tag::find_first`].
    pub fn set_alias(&self, alias: impl Into<CompactString>) -> Tag {
        self.inner.borrow_mut().alias = Some(alias.into());
        self.clone()
    }

    /// The lookup label, if one was set.
    pub fn alias(&self) -> Option<String> {
        self.inner.borrow().alias.as_ref().map(|a| a.to_string())
    }

    /// Whether two handles point at the same element.
    pub fn same_node(a: &Tag, b: &Tag) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    // -------------------------------------------------------------------------
    // Attribute store
    // -------------------------------------------------------------------------

    /// Set an attribute, replacing any existing value.
    ///
    /// The reserved name `class` is special: assigning it appends class
    /// tokens instead of replacing the list (see [`Tag::add_class`]), so a
    /// generic attribute write can never clobber accumulated classes.
    pub fn set_attr(&self, name: impl Into<CompactString>, value: impl Into<AttrValue>) -> Tag {
        let name = name.into();
        let value = value.into();
        if name == "class" {
            return self.add_class(value.to_text());
        }
        self.inner.borrow_mut().attrs.insert(name, value);
        self.clone()
    }

    /// The stored attribute value, unescaped. `None` when absent.
    pub fn get_attr(&self, name: &str) -> Option<AttrValue> {
        self.inner.borrow().attrs.get(name).cloned()
    }

    /// The stored attribute value in its textual form, unescaped.
    pub fn attr_text(&self, name: &str) -> Option<String> {
        self.inner.borrow().attrs.get(name).map(AttrValue::to_text)
    }

    /// Whether the attribute exists.
    pub fn has_attr(&self, name: &str) -> bool {
        self.inner.borrow().attrs.contains_key(name)
    }

    /// Remove an attribute. No-op when absent.
    pub fn remove_attr(&self, name: &str) -> Tag {
        self.inner.borrow_mut().attrs.shift_remove(name);
        self.clone()
    }

    /// Render the attribute list alone: `name="value"` pairs separated by
    /// single spaces, in insertion order, values escaped. Empty string when
    /// there are no attributes.
    pub fn render_attrs(&self) -> String {
        render::render_attrs(self)
    }

    // -------------------------------------------------------------------------
    // Data attributes
    // -------------------------------------------------------------------------

    /// Set a `data-{name}` attribute.
    pub fn set_data(&self, name: &str, value: impl Into<AttrValue>) -> Tag {
        self.set_attr(format_compact!("data-{name}"), value)
    }

    /// The stored `data-{name}` value, unescaped.
    pub fn get_data(&self, name: &str) -> Option<AttrValue> {
        self.get_attr(format_compact!("data-{name}").as_str())
    }

    /// Whether `data-{name}` exists.
    pub fn has_data(&self, name: &str) -> bool {
        self.has_attr(format_compact!("data-{name}").as_str())
    }

    /// Remove `data-{name}`. No-op when absent.
    pub fn remove_data(&self, name: &str) -> Tag {
        self.remove_attr(format_compact!("data-{name}").as_str())
    }

    // -------------------------------------------------------------------------
    // Class-list store
    // -------------------------------------------------------------------------

    /// Append class tokens.
    ///
    /// Accepts a single token, a whitespace-separated token string, or a
    /// sequence of either; runs of whitespace collapse and each non-empty
    /// token is appended in order, duplicates kept. Any call materializes
    /// the `class` attribute, so an empty input still renders `class=""`.
    pub fn add_class(&self, classes: impl IntoClasses) -> Tag {
        let mut inner = self.inner.borrow_mut();
        let entry = inner
            .attrs
            .entry("class".into())
            .or_insert_with(|| AttrValue::Tokens(Vec::new()));
        if let AttrValue::Tokens(tokens) = entry {
            classes.each_token(&mut |token| tokens.push(token.into()));
        }
        self.clone()
    }

    /// Replace the class list: clear, then add.
    pub fn set_class(&self, classes: impl IntoClasses) -> Tag {
        self.inner.borrow_mut().attrs.shift_remove("class");
        self.add_class(classes)
    }

    /// The stored class tokens in order; empty when the attribute is absent.
    pub fn classes(&self) -> Vec<String> {
        match self.inner.borrow().attrs.get("class") {
            Some(AttrValue::Tokens(tokens)) => tokens.iter().map(|t| t.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether any class token matches `pattern` as a whole-token regular
    /// expression.
    ///
    /// The pattern is anchored on both ends: `has_class("test")` is false
    /// for the token `test_foo`, while `has_class("test.+")` is true. An
    /// invalid pattern matches nothing.
    pub fn has_class(&self, pattern: &str) -> bool {
        let inner = self.inner.borrow();
        let Some(AttrValue::Tokens(tokens)) = inner.attrs.get("class") else {
            return false;
        };
        if tokens.is_empty() {
            return false;
        }
        let re = match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(re) => re,
            Err(_) => {
                debug!("has_class: invalid pattern {:?}", pattern);
                return false;
            }
        };
        tokens.iter().any(|token| re.is_match(token))
    }

    /// Remove the first token equal to `name`.
    ///
    /// Removing the last token drops the `class` attribute entirely;
    /// otherwise the remaining tokens re-sort in ascending order (a
    /// documented side effect of deletion).
    pub fn remove_class(&self, name: &str) -> Tag {
        let mut inner = self.inner.borrow_mut();
        let mut drop_attr = false;
        if let Some(AttrValue::Tokens(tokens)) = inner.attrs.get_mut("class")
            && let Some(pos) = tokens.iter().position(|t| t.as_str() == name)
        {
            tokens.remove(pos);
            if tokens.is_empty() {
                drop_attr = true;
            } else {
                tokens.sort_unstable();
            }
        }
        if drop_attr {
            inner.attrs.shift_remove("class");
        }
        self.clone()
    }

    // -------------------------------------------------------------------------
    // Content store
    // -------------------------------------------------------------------------

    /// Append content.
    ///
    /// A `Tag` is appended as a child and keeps sharing its state with the
    /// caller's handle. Text runs through the inline fragment recognizer:
    /// allow-listed inline markup is promoted to child elements, everything
    /// else stays text and escapes at render time. Empty text is a no-op.
    pub fn add(&self, content: impl Into<Content>) -> Tag {
        match content.into() {
            Content::Child(child) => {
                self.inner.borrow_mut().content.push(Content::Child(child));
            }
            Content::Text(text) => {
                if !text.is_empty() {
                    let mut inner = self.inner.borrow_mut();
                    inline::append_recognized(&mut inner.content, &text);
                }
            }
        }
        self.clone()
    }

    /// Replace the content: clear, then add.
    pub fn set_content(&self, content: impl Into<Content>) -> Tag {
        self.inner.borrow_mut().content.clear();
        self.add(content)
    }

    /// Whether any content has been added.
    pub fn has_content(&self) -> bool {
        !self.inner.borrow().content.is_empty()
    }

    /// Remove all content.
    pub fn clear_content(&self) -> Tag {
        self.inner.borrow_mut().content.clear();
        self.clone()
    }

    /// Render just the content sequence: text segments decoded then
    /// escaped, child elements rendered in full, in order.
    pub fn render_content(&self) -> String {
        render::render_content(self)
    }

    /// Append a text segment without running the fragment recognizer.
    pub(crate) fn push_raw_text(&self, text: &str) {
        if !text.is_empty() {
            self.inner
                .borrow_mut()
                .content
                .push(Content::Text(text.to_string()));
        }
    }

    /// Handles to the direct child elements, in content order.
    pub fn children(&self) -> Vec<Tag> {
        self.inner
            .borrow()
            .content
            .iter()
            .filter_map(|item| match item {
                Content::Child(child) => Some(child.clone()),
                Content::Text(_) => None,
            })
            .collect()
    }

    /// Find the first direct child matching `selector`.
    ///
    /// A child matches when the selector equals its alias (falling back to
    /// its tag name when no alias is set) or the textual value of its `id`
    /// attribute. The returned handle shares the child's state, so mutating
    /// it is visible in this element's next render.
    pub fn find_first(&self, selector: &str) -> Option<Tag> {
        self.children().into_iter().find(|child| {
            let inner = child.inner.borrow();
            let label_matches = match &inner.alias {
                Some(alias) => alias.as_str() == selector,
                None => inner.name.as_str() == selector,
            };
            label_matches
                || inner
                    .attrs
                    .get("id")
                    .is_some_and(|value| value.to_text() == selector)
        })
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Render the element and its content to a dense HTML string.
    pub fn render(&self) -> String {
        render::render(self)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Tag")
                .field("name", &inner.name)
                .field("void", &inner.void)
                .field("attrs", &inner.attrs)
                .field("content", &inner.content)
                .finish(),
            Err(_) => f.debug_struct("Tag").finish_non_exhaustive(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
