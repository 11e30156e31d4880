//! Shorthand constructors for common elements.
//!
//! These cover the boilerplate of everyday form and layout markup. Each
//! returns an ordinary [`Tag`] handle, so the result chains like any other
//! element.

use compact_str::CompactString;

use crate::tag::{Content, Tag};

/// `<div>` with the given content.
pub fn div(content: impl Into<Content>) -> Tag {
    Tag::new("div").add(content)
}

/// `<span>` with the given content.
pub fn span(content: impl Into<Content>) -> Tag {
    Tag::new("span").add(content)
}

/// `<label>` with the given content and no `for` attribute.
pub fn label(content: impl Into<Content>) -> Tag {
    Tag::new("label").add(content)
}

/// `<caption>` with the given content.
pub fn caption(content: impl Into<Content>) -> Tag {
    Tag::new("caption").add(content)
}

/// `<a>` pointing at `href`.
pub fn a(href: &str, content: impl Into<Content>) -> Tag {
    Tag::new("a").set_attr("href", href).add(content)
}

/// `<img>` for `src`. The `alt` attribute is always present, empty by
/// default, so the caller can fill it in later via the attribute store.
pub fn img(src: &str) -> Tag {
    Tag::new("img").set_attr("src", src).set_attr("alt", "")
}

/// `<form>` posting to `action`.
///
/// `method` is lowercased. Methods other than `get` and `post` cannot be
/// submitted natively, so they tunnel through a hidden `_method` input and
/// the form itself posts. A non-empty `token` adds a hidden `_token` input
/// for request forgery protection.
pub fn form(action: &str, method: &str, token: Option<&str>) -> Tag {
    let tag = Tag::new("form").set_attr("action", action);
    let mut method = method.to_ascii_lowercase();
    if method != "get" && method != "post" {
        tag.add(hidden("_method", &method));
        method = "post".to_string();
    }
    if let Some(token) = token
        && !token.is_empty()
    {
        tag.add(hidden("_token", token));
    }
    tag.set_attr("method", method)
}

/// A target for [`label_for`]: an element id, or a tag whose `id` attribute
/// supplies it.
pub enum LabelTarget {
    Id(CompactString),
    Tag(Tag),
}

impl From<&str> for LabelTarget {
    fn from(v: &str) -> Self {
        LabelTarget::Id(v.into())
    }
}

impl From<String> for LabelTarget {
    fn from(v: String) -> Self {
        LabelTarget::Id(v.into())
    }
}

impl From<Tag> for LabelTarget {
    fn from(v: Tag) -> Self {
        LabelTarget::Tag(v)
    }
}

impl From<&Tag> for LabelTarget {
    fn from(v: &Tag) -> Self {
        LabelTarget::Tag(v.clone())
    }
}

/// `<label>` bound to a target element.
///
/// The `for` attribute takes the target's id; when the target is a tag with
/// no `id` attribute, or the id is empty, `for` is omitted.
pub fn label_for(target: impl Into<LabelTarget>, content: impl Into<Content>) -> Tag {
    let tag = Tag::new("label");
    let id = match target.into() {
        LabelTarget::Id(id) => {
            if id.is_empty() {
                None
            } else {
                Some(id.to_string())
            }
        }
        LabelTarget::Tag(target) => target.attr_text("id").filter(|id| !id.is_empty()),
    };
    if let Some(id) = id {
        tag.set_attr("for", id);
    }
    tag.add(content)
}

/// `<input>` of the given type. A `None` or empty value leaves the `value`
/// attribute off.
pub fn input(ty: &str, name: &str, value: Option<&str>) -> Tag {
    let tag = Tag::new("input").set_attr("type", ty).set_attr("name", name);
    if let Some(value) = value
        && !value.is_empty()
    {
        tag.set_attr("value", value);
    }
    tag
}

/// `<input type="text">`.
pub fn text(name: &str, value: Option<&str>) -> Tag {
    input("text", name, value)
}

/// `<input type="password">`, never pre-filled.
pub fn password(name: &str) -> Tag {
    input("password", name, None)
}

/// `<input type="hidden">`.
pub fn hidden(name: &str, value: &str) -> Tag {
    input("hidden", name, Some(value))
}

/// `<input type="checkbox">`, marked `checked="checked"` when selected.
pub fn checkbox(name: &str, value: Option<&str>, checked: bool) -> Tag {
    let tag = input("checkbox", name, value);
    if checked {
        tag.set_attr("checked", "checked");
    }
    tag
}

/// `<input type="radio">`, marked `checked="checked"` when selected.
pub fn radio(name: &str, value: Option<&str>, checked: bool) -> Tag {
    let tag = input("radio", name, value);
    if checked {
        tag.set_attr("checked", "checked");
    }
    tag
}

/// `<select>` with the given option elements.
pub fn select(name: &str, options: impl IntoIterator<Item = Tag>) -> Tag {
    let tag = Tag::new("select").set_attr("name", name);
    for option in options {
        tag.add(option);
    }
    tag
}

/// `<option>` with a value and label, marked `selected="selected"` when
/// selected.
pub fn option(value: &str, text: impl Into<Content>, selected: bool) -> Tag {
    let tag = Tag::new("option").set_attr("value", value).add(text);
    if selected {
        tag.set_attr("selected", "selected");
    }
    tag
}

/// `<textarea>` with the given name and content.
pub fn textarea(name: &str, value: impl Into<Content>) -> Tag {
    Tag::new("textarea").set_attr("name", name).add(value)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_containers() {
        assert_eq!(div("text").render(), "<div>text</div>");
        assert_eq!(span("text").render(), "<span>text</span>");
        assert_eq!(caption("text").render(), "<caption>text</caption>");
        assert_eq!(label("").render(), "<label></label>");
    }

    #[test]
    fn test_anchor() {
        assert_eq!(a("url", "text").render(), r#"<a href="url">text</a>"#);
    }

    #[test]
    fn test_img_always_carries_alt() {
        assert_eq!(img("url").render(), r#"<img src="url" alt="" />"#);
    }

    #[test]
    fn test_form_defaults_to_post() {
        assert_eq!(
            form("url", "post", None).render(),
            r#"<form action="url" method="post"></form>"#
        );
        assert_eq!(
            form("url", "GET", None).render(),
            r#"<form action="url" method="get"></form>"#
        );
    }

    #[test]
    fn test_form_with_token() {
        assert_eq!(
            form("url", "post", Some("token")).render(),
            r#"<form action="url" method="post"><input type="hidden" name="_token" value="token" /></form>"#
        );
        assert_eq!(
            form("url", "post", Some("")).render(),
            r#"<form action="url" method="post"></form>"#
        );
    }

    #[test]
    fn test_form_tunnels_other_methods() {
        assert_eq!(
            form("url", "put", None).render(),
            r#"<form action="url" method="post"><input type="hidden" name="_method" value="put" /></form>"#
        );
        assert_eq!(
            form("url", "PUT", Some("token")).render(),
            r#"<form action="url" method="post"><input type="hidden" name="_method" value="put" /><input type="hidden" name="_token" value="token" /></form>"#
        );
    }

    #[test]
    fn test_label_for_variants() {
        assert_eq!(label_for("id", "").render(), r#"<label for="id"></label>"#);

        let target = Tag::new("input").set_attr("id", "stuff");
        assert_eq!(
            label_for(&target, "test").render(),
            r#"<label for="stuff">test</label>"#
        );

        let anonymous = Tag::new("input");
        assert_eq!(label_for(&anonymous, "test").render(), "<label>test</label>");
        assert_eq!(label_for("", "test").render(), "<label>test</label>");
    }

    #[test]
    fn test_inputs() {
        assert_eq!(
            text("stuff", None).render(),
            r#"<input type="text" name="stuff" />"#
        );
        assert_eq!(
            text("stuff", Some("foobar")).render(),
            r#"<input type="text" name="stuff" value="foobar" />"#
        );
        assert_eq!(
            text("stuff", Some("")).render(),
            r#"<input type="text" name="stuff" />"#
        );
        assert_eq!(
            password("stuff").render(),
            r#"<input type="password" name="stuff" />"#
        );
        assert_eq!(
            hidden("stuff", "foobar").render(),
            r#"<input type="hidden" name="stuff" value="foobar" />"#
        );
    }

    #[test]
    fn test_checkbox_and_radio() {
        assert_eq!(
            checkbox("stuff", None, false).render(),
            r#"<input type="checkbox" name="stuff" />"#
        );
        assert_eq!(
            checkbox("stuff", Some("foobar"), false).render(),
            r#"<input type="checkbox" name="stuff" value="foobar" />"#
        );
        assert_eq!(
            checkbox("stuff", Some("foobar"), true).render(),
            r#"<input type="checkbox" name="stuff" value="foobar" checked="checked" />"#
        );
        assert_eq!(
            radio("stuff", Some("foobar"), true).render(),
            r#"<input type="radio" name="stuff" value="foobar" checked="checked" />"#
        );
    }

    #[test]
    fn test_select_and_options() {
        assert_eq!(select("test", []).render(), r#"<select name="test"></select>"#);

        assert_eq!(
            option("test", "stuff", false).render(),
            r#"<option value="test">stuff</option>"#
        );
        assert_eq!(
            option("test", "stuff", true).render(),
            r#"<option value="test" selected="selected">stuff</option>"#
        );

        let rendered = select(
            "test",
            [
                option("a", "first", false),
                option("b", "second", true),
            ],
        )
        .render();
        assert_eq!(
            rendered,
            r#"<select name="test"><option value="a">first</option><option value="b" selected="selected">second</option></select>"#
        );
    }

    #[test]
    fn test_textarea() {
        assert_eq!(
            textarea("test", "stuff").render(),
            r#"<textarea name="test">stuff</textarea>"#
        );
    }
}
