#![no_main]

//! Class store fuzzer.
//!
//! Applies an arbitrary sequence of class operations and checks after every
//! step that the token list and the rendered attribute agree: tokens are
//! non-empty and whitespace-free, and `class="..."` appears exactly when the
//! attribute exists.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tagwright::{Tag, escape_attr};

#[derive(Arbitrary, Debug)]
enum Op {
    Add(String),
    Set(String),
    Remove(String),
    Has(String),
    AssignAttr(String),
}

fuzz_target!(|ops: Vec<Op>| {
    let tag = Tag::new("div");
    for op in ops {
        match op {
            Op::Add(s) => {
                tag.add_class(s.as_str());
            }
            Op::Set(s) => {
                tag.set_class(s.as_str());
            }
            Op::Remove(s) => {
                tag.remove_class(&s);
            }
            Op::Has(s) => {
                // arbitrary strings include invalid patterns; this must
                // answer false rather than panic
                let _ = tag.has_class(&s);
            }
            Op::AssignAttr(s) => {
                tag.set_attr("class", s);
            }
        }

        let classes = tag.classes();
        for token in &classes {
            assert!(!token.is_empty());
            assert!(!token.contains(char::is_whitespace));
        }

        let expected = if tag.has_attr("class") {
            format!("class=\"{}\"", escape_attr(&classes.join(" ")))
        } else {
            String::new()
        };
        assert_eq!(tag.render_attrs(), expected);
    }
});
