//! Inline fragment recognition for text added to an element.
//!
//! Text handed to [`Tag::add`](crate::Tag::add) is scanned once, left to
//! right, for a small allow-list of inline markup. A recognized fragment is
//! promoted to a real child element: its attributes land in the child's
//! attribute store and, for paired tags, the enclosed text becomes the
//! child's content verbatim. The enclosed text is NOT scanned again, so
//! markup inside a fragment stays text and escapes at render time.
//!
//! Everything the scan does not recognize, including tags outside the
//! allow-list, unclosed open tags, and self-closed paired tags, remains part
//! of the surrounding text segment.

use std::sync::LazyLock;

use compact_str::CompactString;
use regex::Regex;
use smallvec::SmallVec;

use crate::tag::{Content, Tag};

#[allow(unused_imports)]
use crate::trace;

/// Paired inline tags eligible for promotion; a closing tag is required.
const PAIRED_TAGS: &[&str] = &[
    "a", "abbr", "b", "cite", "code", "em", "i", "kbd", "mark", "q", "s", "samp", "small", "span",
    "strong", "sub", "sup", "u", "var",
];

/// Void inline tags eligible for promotion, with or without a `/`.
const VOID_TAGS: &[&str] = &["br", "hr", "wbr"];

/// An open tag with optional double-quoted attributes and an optional
/// self-closing slash. Attribute values may not contain `"`, `<` or `>`.
static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<(?P<tag>[a-z][a-z0-9]*)(?P<attrs>(?:\s+[a-z][a-z0-9-]*="[^"<>]*")*)\s*(?P<slash>/)?>"#)
        .unwrap()
});

/// One `name="value"` pair inside the attribute region of [`OPEN_TAG`].
static ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)([a-z][a-z0-9-]*)="([^"<>]*)""#).unwrap());

type AttrPairs = SmallVec<[(CompactString, CompactString); 4]>;

/// Scan `text` once and append the resulting text segments and promoted
/// children to `out`, in order. Empty segments are never stored.
pub(crate) fn append_recognized(out: &mut Vec<Content>, text: &str) {
    let mut flushed = 0;
    let mut search_from = 0;

    while search_from <= text.len() {
        let Some(caps) = OPEN_TAG.captures_at(text, search_from) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        let Some(name) = caps.name("tag").map(|m| m.as_str()) else {
            break;
        };
        let lower = name.to_ascii_lowercase();
        let self_closed = caps.name("slash").is_some();
        let paired = PAIRED_TAGS.contains(&lower.as_str());

        // A tag outside the allow-list, or a self-closed paired tag, stays
        // text; resume one byte past the rejected `<`.
        if (!paired && !VOID_TAGS.contains(&lower.as_str())) || (paired && self_closed) {
            search_from = whole.start() + 1;
            continue;
        }

        let attrs = parse_attrs(caps.name("attrs").map_or("", |m| m.as_str()));

        let inner_span = if paired {
            match find_closing(text, whole.end(), &lower) {
                Some(span) => Some(span),
                None => {
                    trace!("no closing tag for <{}>, kept as text", lower);
                    search_from = whole.start() + 1;
                    continue;
                }
            }
        } else {
            None
        };

        if whole.start() > flushed {
            out.push(Content::Text(text[flushed..whole.start()].to_string()));
        }

        // The child keeps the tag's original casing.
        let child = Tag::new(name);
        for (attr_name, attr_value) in attrs {
            child.set_attr(attr_name, attr_value);
        }

        let consumed_end = match inner_span {
            Some((close_start, close_end)) => {
                child.push_raw_text(&text[whole.end()..close_start]);
                close_end
            }
            None => whole.end(),
        };
        trace!("promoted <{}> fragment", lower);
        out.push(Content::Child(child));

        flushed = consumed_end;
        search_from = consumed_end;
    }

    if flushed < text.len() {
        out.push(Content::Text(text[flushed..].to_string()));
    }
}

fn parse_attrs(src: &str) -> AttrPairs {
    let mut attrs = AttrPairs::new();
    for caps in ATTR.captures_iter(src) {
        if let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) {
            attrs.push((name.as_str().into(), value.as_str().into()));
        }
    }
    attrs
}

/// Find the closing tag `</name>` at or after `from`, matching the name
/// ASCII-case-insensitively on original bytes. Returns the byte span of the
/// closing tag.
fn find_closing(haystack: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let name = name.as_bytes();
    let needle_len = name.len() + 3;
    let mut i = from;
    while i + needle_len <= bytes.len() {
        if bytes[i] == b'<'
            && bytes[i + 1] == b'/'
            && bytes[i + 2..i + 2 + name.len()].eq_ignore_ascii_case(name)
            && bytes[i + 2 + name.len()] == b'>'
        {
            return Some((i, i + needle_len));
        }
        i += 1;
    }
    None
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn recognize(text: &str) -> Vec<Content> {
        let mut out = Vec::new();
        append_recognized(&mut out, text);
        out
    }

    fn render_added(text: &str) -> String {
        Tag::new("div").add(text).render_content()
    }

    #[test]
    fn test_plain_text_passes_through() {
        let out = recognize("just some text");
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], Content::Text(t) if t == "just some text"));
    }

    #[test]
    fn test_paired_fragment_is_promoted() {
        let out = recognize("before <span>hi</span> after");
        assert_eq!(out.len(), 3);
        assert!(matches!(&out[0], Content::Text(t) if t == "before "));
        match &out[1] {
            Content::Child(child) => {
                assert_eq!(child.name(), "span");
                assert_eq!(child.render(), "<span>hi</span>");
            }
            other => panic!("expected child, got {other:?}"),
        }
        assert!(matches!(&out[2], Content::Text(t) if t == " after"));
    }

    #[test]
    fn test_fragment_attributes_land_in_the_store() {
        let out = recognize(r#"<a href="url" class="x y">text</a>"#);
        assert_eq!(out.len(), 1);
        match &out[0] {
            Content::Child(child) => {
                assert_eq!(child.attr_text("href").as_deref(), Some("url"));
                assert_eq!(child.classes(), vec!["x", "y"]);
                assert_eq!(child.render(), r#"<a href="url" class="x y">text</a>"#);
            }
            other => panic!("expected child, got {other:?}"),
        }
    }

    #[test]
    fn test_void_fragment_with_and_without_slash() {
        for text in ["line<br>break", "line<br/>break", "line<br />break"] {
            assert_eq!(render_added(text), "line<br />break");
        }
    }

    #[test]
    fn test_disallowed_tag_stays_text() {
        assert_eq!(
            render_added(r#"<input type="text">"#),
            "&lt;input type=&quot;text&quot;&gt;"
        );
        assert_eq!(render_added("<div>block</div>"), "&lt;div&gt;block&lt;/div&gt;");
    }

    #[test]
    fn test_self_closed_paired_tag_stays_text() {
        assert_eq!(render_added("<span/>"), "&lt;span/&gt;");
        assert_eq!(render_added("<span />"), "&lt;span /&gt;");
    }

    #[test]
    fn test_unclosed_paired_tag_stays_text() {
        assert_eq!(render_added("<em>oops"), "&lt;em&gt;oops");
    }

    #[test]
    fn test_enclosed_text_is_not_rescanned() {
        let out = recognize("<em>a<em>b</em>");
        assert_eq!(out.len(), 1);
        match &out[0] {
            Content::Child(child) => {
                assert_eq!(child.name(), "em");
                assert!(child.children().is_empty());
                assert_eq!(child.render(), "<em>a&lt;em&gt;b</em>");
            }
            other => panic!("expected child, got {other:?}"),
        }
    }

    #[test]
    fn test_rejected_candidate_before_accepted_one() {
        let out = recognize("a <input> b <br> c");
        assert_eq!(out.len(), 3);
        assert!(matches!(&out[0], Content::Text(t) if t == "a <input> b "));
        assert!(matches!(&out[1], Content::Child(child) if child.name() == "br"));
        assert!(matches!(&out[2], Content::Text(t) if t == " c"));
    }

    #[test]
    fn test_original_tag_case_is_kept() {
        assert_eq!(render_added("<EM>x</eM>"), "<EM>x</EM>");
    }

    #[test]
    fn test_stray_closing_tag_stays_text() {
        assert_eq!(render_added("<br></br>"), "<br />&lt;/br&gt;");
    }

    #[test]
    fn test_empty_fragment_has_no_content() {
        let out = recognize("<em></em>");
        assert_eq!(out.len(), 1);
        match &out[0] {
            Content::Child(child) => {
                assert!(!child.has_content());
                assert_eq!(child.render(), "<em></em>");
            }
            other => panic!("expected child, got {other:?}"),
        }
    }

    #[test]
    fn test_adjacent_fragments() {
        assert_eq!(
            render_added("<b>x</b><i>y</i>"),
            "<b>x</b><i>y</i>"
        );
    }

    #[test]
    fn test_malformed_attributes_reject_the_open_tag() {
        assert_eq!(render_added("<em foo=bar>x</em>"), "&lt;em foo=bar&gt;x&lt;/em&gt;");
    }

    #[test]
    fn test_closing_tag_with_space_does_not_close() {
        assert_eq!(render_added("<em>x</em >"), "&lt;em&gt;x&lt;/em &gt;");
    }

    #[test]
    fn test_multibyte_text_around_fragments() {
        assert_eq!(render_added("héllo <br> wörld"), "héllo <br /> wörld");
    }
}
