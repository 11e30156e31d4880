#![no_main]

//! Text handling fuzzer.
//!
//! Feeds arbitrary text through entity decoding, escaping, fragment
//! recognition and rendering, and checks the invariants that hold for any
//! input: escaping round-trips through decoding, recognition never panics,
//! and text that promotes no fragments renders stably when added again.

use libfuzzer_sys::fuzz_target;
use tagwright::{Tag, decode_entities, escape_text};

fuzz_target!(|text: &str| {
    // every `&` in escaped output starts an entity that decodes back to the
    // character it escaped, so decoding inverts escaping exactly
    assert_eq!(decode_entities(&escape_text(text)), text);

    let tag = Tag::new("div");
    tag.add(text);
    let rendered = tag.render();
    assert!(rendered.starts_with("<div>"));
    assert!(rendered.ends_with("</div>"));

    for child in tag.children() {
        let name = child.name();
        assert!(!name.is_empty());
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    // with no promoted children the content is a single escaped text
    // segment, and escaped text never promotes anything on a second pass
    if tag.children().is_empty() {
        let first = tag.render_content();
        let again = Tag::new("div");
        again.add(first.as_str());
        assert_eq!(again.render_content(), first);
    }
});
