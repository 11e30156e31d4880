//! Escaping and entity decoding for rendered output.
//!
//! Values are stored raw and converted only at render time:
//! - Text content runs through [`decode_entities`] and then [`escape_text`],
//!   so input that already carries entities comes out escaped exactly once.
//! - Attribute values run through [`escape_attr`] alone; single quotes stay
//!   as-is because attribute values always render double-quoted.

/// Escape text content for element bodies.
///
/// Replaces `&`, `<`, `>`, `"` with named entities and `'` with `&#039;`.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an attribute value for double-quoted output.
///
/// Replaces `&`, `<`, `>`, `"`; single quotes pass through.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Named entities understood by [`decode_entities`], stored with their
/// trailing semicolon.
const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp;", '&'),
    ("lt;", '<'),
    ("gt;", '>'),
    ("quot;", '"'),
    ("apos;", '\''),
    ("nbsp;", '\u{a0}'),
];

/// Digit-run caps for numeric references. The largest scalar value is
/// U+10FFFF, so longer runs can never name a valid character.
const MAX_DEC_DIGITS: usize = 7;
const MAX_HEX_DIGITS: usize = 6;

/// Decode the HTML entities produced by the escape functions, plus `&nbsp;`
/// and numeric character references.
///
/// Anything malformed, unknown, or naming an invalid scalar value is copied
/// through unchanged. Decoding consumes each entity exactly once and never
/// re-examines its output, so `&amp;lt;` becomes `&lt;` and stops there.
pub fn decode_entities(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copy_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'&' {
            i += 1;
            continue;
        }
        match decode_one(&text[i..]) {
            Some((c, consumed)) => {
                out.push_str(&text[copy_start..i]);
                out.push(c);
                i += consumed;
                copy_start = i;
            }
            None => i += 1,
        }
    }

    out.push_str(&text[copy_start..]);
    out
}

/// Decode one entity at the start of `s` (which begins with `&`). Returns
/// the character and the number of bytes consumed.
fn decode_one(s: &str) -> Option<(char, usize)> {
    let rest = &s[1..];

    if let Some(num) = rest.strip_prefix('#') {
        return decode_numeric(num).map(|(c, len)| (c, 2 + len));
    }

    for (name, c) in NAMED_ENTITIES {
        if rest.starts_with(name) {
            return Some((*c, 1 + name.len()));
        }
    }

    None
}

/// Decode the `x41;` / `65;` part of a numeric reference.
fn decode_numeric(s: &str) -> Option<(char, usize)> {
    let bytes = s.as_bytes();
    let (digits_at, radix, max_digits) = match bytes.first() {
        Some(b'x') | Some(b'X') => (1, 16, MAX_HEX_DIGITS),
        _ => (0, 10, MAX_DEC_DIGITS),
    };

    let digits = &bytes[digits_at..];
    let mut len = 0;
    for &b in digits {
        let is_digit = if radix == 16 {
            b.is_ascii_hexdigit()
        } else {
            b.is_ascii_digit()
        };
        if !is_digit {
            break;
        }
        len += 1;
        if len > max_digits {
            return None;
        }
    }

    if len == 0 || digits.get(len) != Some(&b';') {
        return None;
    }

    let value = u32::from_str_radix(&s[digits_at..digits_at + len], radix).ok()?;
    let c = char::from_u32(value)?;
    Some((c, digits_at + len + 1))
}

// =============================================================================
// Tests
// =============================================================================
