//! A Markdown to HTML renderer for untrusted user text.
//!
//! The dialect is reddit's: spoilers (`>!block` and `>!inline!<`),
//! superscripts, strikethrough, pipe tables, `/r/` and `/u/` mentions and
//! bare-URL autolinking. Raw HTML is always escaped, link targets must use
//! a known-safe scheme, and nesting is capped, so rendering any input is
//! total and produces markup that cannot run script.
//!
//! ```
//! use snoomark::{markdown, RenderMode};
//!
//! assert_eq!(markdown("Hello, **world** >!and /r/rust!<", RenderMode::UserText),
//!            "<p>Hello, <strong>world</strong> <span class=\"md-spoiler-text\">\
//!             and <a href=\"/r/rust\">/r/rust</a></span></p>\n");
//! ```
//!
//! The two phases are also available separately, with the block tree held
//! in an [`Arena`]:
//!
//! ```
//! use snoomark::{format_html, parse_document, Arena, NodeValue, Options};
//!
//! let arena = Arena::new();
//! let options = Options::default();
//! let doc = parse_document(&arena, "# Title\n\nbody", &options);
//! assert!(matches!(doc.root.first_child().unwrap().data, NodeValue::Heading(..)));
//!
//! let mut html = vec![];
//! format_html(&doc, &options, &mut html).unwrap();
//! assert_eq!(String::from_utf8(html).unwrap(), "<h1>Title</h1>\n\n<p>body</p>\n");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_debug_implementations)]

mod arena_tree;
mod ctype;
pub mod entity;
pub mod html;
pub mod nodes;
mod parser;
#[cfg(test)]
mod tests;

pub use crate::arena_tree::{Children, Descendants, Node};
pub use crate::html::{escape, escape_href, format_html};
pub use crate::nodes::{AstNode, NodeValue};
pub use crate::parser::{
    parse_document, Document, Options, RefMap, Reference, Render, RenderMode,
};

/// Convenience type alias for arena types used throughout the API.
pub type Arena<'a> = typed_arena::Arena<AstNode<'a>>;

/// Render `input` as HTML in the given mode, with every other option at its
/// default.
pub fn markdown(input: &str, mode: RenderMode) -> String {
    markdown_to_html(input, &Options::with_mode(mode))
}

/// Render Markdown to HTML.
///
/// See the documentation of the crate root for an example.
pub fn markdown_to_html(input: &str, options: &Options) -> String {
    let _span = tracing::trace_span!("markdown_to_html", mode = ?options.mode, len = input.len())
        .entered();

    let arena = Arena::new();
    let document = parse_document(&arena, input, options);

    let mut out = Vec::with_capacity(input.len() + input.len() / 2);
    html::format_into(&mut out, &document, options);
    String::from_utf8(out)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}
