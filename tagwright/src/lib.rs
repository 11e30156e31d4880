//! Programmatic HTML element builder.
//!
//! tagwright provides:
//! - **Shared handles**: every [`Tag`] clone is a cheap reference to the same
//!   element, so a child handle kept around stays live after the child is
//!   added to a tree
//! - **Three stores per element**: insertion-ordered attributes, a class
//!   token list with whole-token regex lookup, and a content sequence mixing
//!   text and child elements
//! - **Inline fragment promotion**: allow-listed inline markup inside added
//!   text becomes real child elements; everything else stays text
//! - **Escaped rendering**: dense HTML output with entity-aware text
//!   escaping and void-element handling
//!
//! # Example
//!
//! ```rust
//! use tagwright::factory;
//!
//! let root = factory::div("Hello, ");
//! root.add("<strong>world</strong>");
//! root.add(factory::img("logo.png"));
//!
//! assert_eq!(
//!     root.render(),
//!     r#"<div>Hello, <strong>world</strong><img src="logo.png" alt="" /></div>"#
//! );
//! ```

mod tracing_macros;

mod escape;
pub mod factory;
mod inline;
mod render;
mod tag;

// Re-export escaping helpers
pub use escape::{decode_entities, escape_attr, escape_text};

// Re-export the core handle and its store types at crate root
pub use tag::{AttrValue, Content, IntoClasses, Tag};
