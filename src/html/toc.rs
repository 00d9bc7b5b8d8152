//! The table of contents written ahead of the document body.

use crate::html::{escape, Flavor, Renderer};
use crate::nodes::{AstNode, NodeValue};
use crate::parser::inlines::Subject;
use crate::parser::{Options, RefMap};

/// Write a nested `<ul>` of links to the document's top-level headers.
///
/// Headers inside quotes, spoilers and lists get no entry but still take
/// up a number, so entry `n` always links to the `n`th header of the body.
pub(super) fn format_toc<'a>(
    out: &mut Vec<u8>,
    root: &'a AstNode<'a>,
    options: &Options,
    refs: &RefMap,
) {
    let mut toc = Toc::default();
    let mut subject = Subject::new(Renderer::new(options, Flavor::Toc), refs);

    for (n, node) in root
        .descendants()
        .filter(|node| matches!(node.data, NodeValue::Heading(..)))
        .enumerate()
    {
        let NodeValue::Heading(ref nh) = node.data else {
            continue;
        };
        let top_level = node
            .parent()
            .map_or(false, |p| matches!(p.data, NodeValue::Document));
        if !top_level {
            continue;
        }

        let mut text = vec![];
        subject.parse_inline(&mut text, &nh.content);
        toc.entry(out, nh.level as usize, n, options, &text);
    }

    toc.finish(out);
}

#[derive(Default)]
struct Toc {
    current_level: usize,
    level_offset: usize,
}

impl Toc {
    fn entry(&mut self, out: &mut Vec<u8>, level: usize, n: usize, options: &Options, text: &[u8]) {
        if self.current_level == 0 {
            out.extend_from_slice(b"<div class=\"toc\">\n");
            self.level_offset = level - 1;
        }
        let level = level.saturating_sub(self.level_offset).max(1);

        if level > self.current_level {
            while level > self.current_level {
                out.extend_from_slice(b"<ul>\n<li>\n");
                self.current_level += 1;
            }
        } else if level < self.current_level {
            out.extend_from_slice(b"</li>\n");
            while level < self.current_level {
                out.extend_from_slice(b"</ul>\n</li>\n");
                self.current_level -= 1;
            }
            out.extend_from_slice(b"<li>\n");
        } else {
            out.extend_from_slice(b"</li>\n<li>\n");
        }

        out.extend_from_slice(b"<a href=\"#");
        if let Some(ref prefix) = options.render.toc_id_prefix {
            escape(out, prefix.as_bytes());
        }
        out.extend_from_slice(b"toc_");
        out.extend_from_slice(n.to_string().as_bytes());
        out.extend_from_slice(b"\">");
        escape(out, text);
        out.extend_from_slice(b"</a>\n");
    }

    fn finish(self, out: &mut Vec<u8>) {
        for _ in 0..self.current_level {
            out.extend_from_slice(b"</li>\n</ul>\n");
        }
        if self.current_level > 0 {
            out.extend_from_slice(b"</div>\n");
        }
    }
}
