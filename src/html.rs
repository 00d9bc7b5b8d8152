//! The HTML renderer for the block tree, and the escaping primitives every
//! other writer goes through.

mod spans;
mod toc;
mod wiki;

use std::io::{self, Write};

use crate::ctype::{byte_set, isspace};
use crate::nodes::{AstNode, NodeCodeBlock, NodeHeading, NodeTableCell, NodeValue};
use crate::parser::inlines::Subject;
use crate::parser::{Document, Options, RefMap};

pub(crate) use self::spans::{Flavor, Renderer, Span};
pub use self::wiki::{ATTRIBUTE_WHITELIST, ELEMENT_WHITELIST};

/// Formats an AST as HTML, modified by the given options.
pub fn format_html<'a>(
    document: &Document<'a>,
    options: &Options,
    output: &mut dyn Write,
) -> io::Result<()> {
    let mut out = Vec::new();
    format_into(&mut out, document, options);
    output.write_all(&out)
}

pub(crate) fn format_into<'a>(out: &mut Vec<u8>, document: &Document<'a>, options: &Options) {
    HtmlFormatter::new(options, &document.refs).format(out, document.root);
}

const NEEDS_ESCAPED: [bool; 256] = byte_set(b"\"&'<>");

const HREF_SAFE: [bool; 256] = byte_set(
    b"-_.+!*(),%#@?=;:/$~\
      abcdefghijklmnopqrstuvwxyz\
      ABCDEFGHIJKLMNOPQRSTUVWXYZ\
      0123456789",
);

const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Writes `buffer` to `output`, escaped for HTML text and attribute values.
///
/// `&`, `<`, `>`, `"` and `'` are escaped; everything else, including
/// `/`, passes through unchanged.
pub fn escape(output: &mut Vec<u8>, buffer: &[u8]) {
    let mut offset = 0;
    for (i, &byte) in buffer.iter().enumerate() {
        if NEEDS_ESCAPED[byte as usize] {
            let esc: &[u8] = match byte {
                b'"' => b"&quot;",
                b'&' => b"&amp;",
                b'<' => b"&lt;",
                b'>' => b"&gt;",
                _ => b"&#39;",
            };
            output.extend_from_slice(&buffer[offset..i]);
            output.extend_from_slice(esc);
            offset = i + 1;
        }
    }
    output.extend_from_slice(&buffer[offset..]);
}

/// Writes `buffer` to `output`, escaped for an `href` or `src` attribute.
///
/// URL-safe bytes pass through, `&` and `'` become entities, and every
/// other byte (including each byte of a non-ASCII character, spaces and
/// newlines) is percent-encoded with upper-case hex digits.
pub fn escape_href(output: &mut Vec<u8>, buffer: &[u8]) {
    let size = buffer.len();
    let mut i = 0;

    while i < size {
        let org = i;
        while i < size && HREF_SAFE[buffer[i] as usize] {
            i += 1;
        }

        if i > org {
            output.extend_from_slice(&buffer[org..i]);
        }

        if i >= size {
            break;
        }

        match buffer[i] {
            b'&' => output.extend_from_slice(b"&amp;"),
            b'\'' => output.extend_from_slice(b"&#x27;"),
            b => output.extend_from_slice(&[
                b'%',
                HEX_CHARS[(b >> 4) as usize],
                HEX_CHARS[(b & 0xF) as usize],
            ]),
        }

        i += 1;
    }
}

/// Walks the block tree, running the inline scanner over each block's
/// text as it goes.
struct HtmlFormatter<'o> {
    options: &'o Options,
    refs: &'o RefMap,
    header_count: usize,
}

impl<'o> HtmlFormatter<'o> {
    fn new(options: &'o Options, refs: &'o RefMap) -> Self {
        HtmlFormatter {
            options,
            refs,
            header_count: 0,
        }
    }

    fn format<'a>(&mut self, out: &mut Vec<u8>, root: &'a AstNode<'a>) {
        // The body is separated from a table of contents like any other
        // block from its predecessor.
        let mark = out.len();
        if self.options.render.toc {
            toc::format_toc(out, root, self.options, self.refs);
        }
        for child in root.children() {
            self.format_node(out, child, mark);
        }
    }

    fn subject(&self, flavor: Flavor) -> Subject<'o> {
        Subject::new(Renderer::new(self.options, flavor), self.refs)
    }

    fn inline(&self, out: &mut Vec<u8>, text: &[u8]) {
        self.subject(Flavor::Body).parse_inline(out, text);
    }

    fn format_children<'a>(&mut self, out: &mut Vec<u8>, node: &'a AstNode<'a>) {
        let mark = out.len();
        for child in node.children() {
            self.format_node(out, child, mark);
        }
    }

    /// Blocks written into a container that already has output are
    /// separated from it by a newline.
    fn cr(out: &mut Vec<u8>, mark: usize) {
        if out.len() > mark {
            out.push(b'\n');
        }
    }

    fn format_node<'a>(&mut self, out: &mut Vec<u8>, node: &'a AstNode<'a>, mark: usize) {
        match node.data {
            NodeValue::Document => self.format_children(out, node),
            NodeValue::BlockQuote => {
                Self::cr(out, mark);
                out.extend_from_slice(b"<blockquote>\n");
                self.format_children(out, node);
                out.extend_from_slice(b"</blockquote>\n");
            }
            NodeValue::BlockSpoiler => {
                Self::cr(out, mark);
                out.extend_from_slice(b"<blockquote class=\"md-spoiler-text\">\n");
                self.format_children(out, node);
                out.extend_from_slice(b"</blockquote>\n");
            }
            NodeValue::List(ref nl) => {
                Self::cr(out, mark);
                let (open, close): (&[u8], &[u8]) = if nl.ordered {
                    (b"<ol>\n", b"</ol>\n")
                } else {
                    (b"<ul>\n", b"</ul>\n")
                };
                out.extend_from_slice(open);
                for item in node.children() {
                    self.format_item(out, item);
                }
                out.extend_from_slice(close);
            }
            NodeValue::Item(..) => self.format_item(out, node),
            NodeValue::ItemText(ref text) => self.inline(out, text),
            NodeValue::Paragraph(ref text) => {
                Self::cr(out, mark);
                let mut work = Vec::with_capacity(text.len());
                self.inline(&mut work, text);
                if let Some(start) = work.iter().position(|&c| !isspace(c)) {
                    out.extend_from_slice(b"<p>");
                    out.extend_from_slice(&work[start..]);
                    out.extend_from_slice(b"</p>\n");
                }
            }
            NodeValue::Heading(ref nh) => {
                Self::cr(out, mark);
                self.format_heading(out, nh);
            }
            NodeValue::CodeBlock(ref ncb) => {
                Self::cr(out, mark);
                format_code_block(out, ncb);
            }
            NodeValue::ThematicBreak => {
                Self::cr(out, mark);
                out.extend_from_slice(b"<hr/>\n");
            }
            NodeValue::Table(..) => {
                Self::cr(out, mark);
                out.extend_from_slice(b"<table><thead>\n");
                let mut rows = node.children();
                if let Some(header) = rows.next() {
                    self.format_row(out, header);
                }
                out.extend_from_slice(b"</thead><tbody>\n");
                for row in rows {
                    self.format_row(out, row);
                }
                out.extend_from_slice(b"</tbody></table>\n");
            }
            NodeValue::TableRow(..) => self.format_row(out, node),
            NodeValue::TableCell(ref cell) => self.format_cell(out, cell, false),
        }
    }

    fn format_item<'a>(&mut self, out: &mut Vec<u8>, item: &'a AstNode<'a>) {
        out.extend_from_slice(b"<li>");
        let mark = out.len();
        for child in item.children() {
            self.format_node(out, child, mark);
        }
        while out.len() > mark && out.last() == Some(&b'\n') {
            out.pop();
        }
        out.extend_from_slice(b"</li>\n");
    }

    fn format_heading(&mut self, out: &mut Vec<u8>, nh: &NodeHeading) {
        let level = nh.level.to_string();
        out.extend_from_slice(b"<h");
        out.extend_from_slice(level.as_bytes());
        if self.options.render.toc {
            out.extend_from_slice(b" id=\"");
            if let Some(ref prefix) = self.options.render.toc_id_prefix {
                escape(out, prefix.as_bytes());
            }
            out.extend_from_slice(b"toc_");
            out.extend_from_slice(self.header_count.to_string().as_bytes());
            out.push(b'"');
            self.header_count += 1;
        }
        out.push(b'>');
        self.inline(out, &nh.content);
        out.extend_from_slice(b"</h");
        out.extend_from_slice(level.as_bytes());
        out.extend_from_slice(b">\n");
    }

    fn format_row<'a>(&mut self, out: &mut Vec<u8>, row: &'a AstNode<'a>) {
        let header = matches!(row.data, NodeValue::TableRow(true));
        out.extend_from_slice(b"<tr>\n");
        for cell in row.children() {
            if let NodeValue::TableCell(ref nc) = cell.data {
                self.format_cell(out, nc, header);
            }
        }
        out.extend_from_slice(b"</tr>\n");
    }

    fn format_cell(&mut self, out: &mut Vec<u8>, cell: &NodeTableCell, header: bool) {
        out.extend_from_slice(if header { b"<th" } else { b"<td" });
        if cell.colspan > 1 {
            out.extend_from_slice(b" colspan=\"");
            out.extend_from_slice(cell.colspan.to_string().as_bytes());
            out.extend_from_slice(b"\" ");
        }
        match cell.alignment.xml_name() {
            Some(align) => {
                out.extend_from_slice(b" align=\"");
                out.extend_from_slice(align.as_bytes());
                out.extend_from_slice(b"\">");
            }
            None => out.push(b'>'),
        }
        self.inline(out, &cell.content);
        out.extend_from_slice(if header { b"</th>\n" } else { b"</td>\n" });
    }
}

fn format_code_block(out: &mut Vec<u8>, ncb: &NodeCodeBlock) {
    match ncb.info {
        Some(ref lang) if !lang.is_empty() => {
            out.extend_from_slice(b"<pre><code class=\"md-code-language-");
            let mut first = true;
            for word in lang.split(|&c| isspace(c)).filter(|w| !w.is_empty()) {
                if !first {
                    out.push(b' ');
                }
                first = false;
                escape(out, word.strip_prefix(b".").unwrap_or(word));
            }
            out.extend_from_slice(b"\">");
        }
        _ => out.extend_from_slice(b"<pre><code>"),
    }
    escape(out, &ncb.literal);
    out.extend_from_slice(b"</code></pre>\n");
}
