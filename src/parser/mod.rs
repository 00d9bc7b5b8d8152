//! The block parser.
//!
//! Input is normalized once (reference definitions pulled out, tabs
//! expanded, line endings unified), then split line by line into a tree of
//! blocks allocated in a [`typed_arena::Arena`]. Block text is kept raw; the
//! inline scanner runs over it only when the tree is formatted.

pub(crate) mod autolink;
pub(crate) mod inlines;
pub mod options;
mod table;

use std::borrow::Cow;
use std::collections::HashMap;

use crate::arena_tree::Node;
use crate::ctype::{isdigit, is_md_space};
use crate::nodes::{AstNode, NodeCodeBlock, NodeHeading, NodeItem, NodeList, NodeValue};
use crate::Arena;

pub use self::options::{Options, Render, RenderMode};

/// How deep block quotes, spoilers and list items may nest, and how many
/// inline spans may nest inside one another.
pub(crate) const MAX_NESTING: usize = 16;

/// Tables with more columns than this are left as paragraphs.
pub(crate) const MAX_TABLE_COLUMNS: usize = 64;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";
const TAB_STOP: usize = 4;

/// A parsed document: the block tree plus the link reference definitions
/// that were lifted out of the text.
#[derive(Debug)]
pub struct Document<'a> {
    /// The [`NodeValue::Document`] node at the root of the tree.
    pub root: &'a AstNode<'a>,

    /// Reference definitions for `[text][id]` and `[id]` links.
    pub refs: RefMap,
}

/// The target of a `[id]: url "title"` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub url: Vec<u8>,
    pub title: Option<Vec<u8>>,
}

/// Reference definitions by id. Ids compare ignoring ASCII case, and a
/// later definition of an id replaces an earlier one.
#[derive(Debug, Default, Clone)]
pub struct RefMap {
    map: HashMap<Vec<u8>, Reference>,
}

impl RefMap {
    pub fn lookup(&self, id: &[u8]) -> Option<&Reference> {
        self.map.get(&id.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn insert(&mut self, id: &[u8], reference: Reference) {
        self.map.insert(id.to_ascii_lowercase(), reference);
    }
}

/// Parse a Markdown document to a block tree.
///
/// ```rust
/// # use snoomark::{format_html, parse_document, Arena, Options};
/// let arena = Arena::new();
/// let options = Options::default();
/// let doc = parse_document(&arena, "> quoted\n\n[x]: /r/x", &options);
/// assert_eq!(doc.refs.len(), 1);
///
/// let mut html = vec![];
/// format_html(&doc, &options, &mut html).unwrap();
/// assert_eq!(String::from_utf8(html).unwrap(),
///            "<blockquote>\n<p>quoted</p>\n</blockquote>\n");
/// ```
pub fn parse_document<'a>(arena: &'a Arena<'a>, md: &str, options: &Options) -> Document<'a> {
    let _span = tracing::trace_span!("parse_document", mode = ?options.mode, len = md.len())
        .entered();

    let root = arena.alloc(Node::new(NodeValue::Document));
    let (text, refs) = preprocess(md.as_bytes());

    let mut parser = Parser { arena, depth: 0 };
    parser.parse_block(root, &text);

    Document { root, refs }
}

/// Pull reference definitions out of `input` and normalize what remains.
fn preprocess(input: &[u8]) -> (Vec<u8>, RefMap) {
    let doc: Cow<[u8]> = if input.iter().any(|&c| c == 0 || c == 3) {
        Cow::Owned(input.iter().copied().filter(|&c| c != 0 && c != 3).collect())
    } else {
        Cow::Borrowed(input)
    };

    let size = doc.len();
    let mut text = Vec::with_capacity(size + size / 8);
    let mut refs = RefMap::default();
    let matcher = jetscii::bytes!(b'\r', b'\n');

    let mut beg = if doc.starts_with(UTF8_BOM) { 3 } else { 0 };

    while beg < size {
        if let Some(end) = parse_reference(&doc, beg, &mut refs) {
            beg = end;
            continue;
        }

        let mut end = match matcher.find(&doc[beg..]) {
            Some(offset) => beg + offset,
            None => size,
        };

        if end > beg {
            expand_tabs(&mut text, &doc[beg..end]);
        }

        // One `\n` per line ending. A `\r` at the very end of input counts
        // for nothing; the final newline is added below.
        while end < size && (doc[end] == b'\n' || doc[end] == b'\r') {
            if doc[end] == b'\n' || (end + 1 < size && doc[end + 1] != b'\n') {
                text.push(b'\n');
            }
            end += 1;
        }

        beg = end;
    }

    if text.last().map_or(false, |&c| c != b'\n') {
        text.push(b'\n');
    }

    (text, refs)
}

/// Expand tabs to the next multiple of [`TAB_STOP`] columns. UTF-8
/// continuation bytes take up no column.
fn expand_tabs(out: &mut Vec<u8>, line: &[u8]) {
    let mut column = 0;
    for &c in line {
        if c == b'\t' {
            loop {
                out.push(b' ');
                column += 1;
                if column % TAB_STOP == 0 {
                    break;
                }
            }
        } else {
            if c & 0xc0 != 0x80 {
                column += 1;
            }
            out.push(c);
        }
    }
}

/// Recognize a `[id]: url "title"` definition starting at `data[beg]`.
/// On success the definition is recorded and the offset of its line
/// ending is returned.
fn parse_reference(data: &[u8], beg: usize, refs: &mut RefMap) -> Option<usize> {
    let end = data.len();

    // Up to three spaces of indentation.
    if beg + 3 >= end {
        return None;
    }
    let mut i = beg;
    while i < beg + 3 && data[i] == b' ' {
        i += 1;
    }
    if data[i] == b' ' {
        return None;
    }

    if data[i] != b'[' {
        return None;
    }
    i += 1;
    let id_offset = i;
    while i < end && data[i] != b'\n' && data[i] != b'\r' && data[i] != b']' {
        i += 1;
    }
    if i >= end || data[i] != b']' {
        return None;
    }
    let id_end = i;

    // `:`, spaces, at most one line break, spaces.
    i += 1;
    if i >= end || data[i] != b':' {
        return None;
    }
    i += 1;
    while i < end && data[i] == b' ' {
        i += 1;
    }
    if i < end && (data[i] == b'\n' || data[i] == b'\r') {
        i += 1;
        if i < end && data[i] == b'\r' && data[i - 1] == b'\n' {
            i += 1;
        }
    }
    while i < end && data[i] == b' ' {
        i += 1;
    }
    if i >= end {
        return None;
    }

    // The link, optionally in angle brackets.
    if data[i] == b'<' {
        i += 1;
    }
    let link_offset = i;
    while i < end && data[i] != b' ' && data[i] != b'\n' && data[i] != b'\r' {
        i += 1;
    }
    let link_end = if data[i - 1] == b'>' { i - 1 } else { i };

    while i < end && data[i] == b' ' {
        i += 1;
    }
    if i < end && !matches!(data[i], b'\n' | b'\r' | b'\'' | b'"' | b'(') {
        return None;
    }

    let mut line_end = None;
    if i >= end || data[i] == b'\r' || data[i] == b'\n' {
        line_end = Some(i);
    }
    if i + 1 < end && data[i] == b'\n' && data[i + 1] == b'\r' {
        line_end = Some(i + 1);
    }

    // The title may sit alone on the following line.
    if let Some(le) = line_end {
        i = le + 1;
        while i < end && data[i] == b' ' {
            i += 1;
        }
    }

    let mut title = None;
    if i + 1 < end && matches!(data[i], b'\'' | b'"' | b'(') {
        i += 1;
        let title_offset = i;
        while i < end && data[i] != b'\n' && data[i] != b'\r' {
            i += 1;
        }
        let eol = if i + 1 < end && data[i] == b'\n' && data[i + 1] == b'\r' {
            i + 1
        } else {
            i
        };

        let mut t = i - 1;
        while t > title_offset && data[t] == b' ' {
            t -= 1;
        }
        if t > title_offset && matches!(data[t], b'\'' | b'"' | b')') {
            line_end = Some(eol);
            title = Some(&data[title_offset..t]);
        }
    }

    let line_end = line_end?;
    if link_end <= link_offset {
        return None;
    }

    refs.insert(
        &data[id_offset..id_end],
        Reference {
            url: data[link_offset..link_end].to_vec(),
            title: title.filter(|t| !t.is_empty()).map(<[u8]>::to_vec),
        },
    );
    Some(line_end)
}

pub(crate) struct Parser<'a> {
    arena: &'a Arena<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn add_child(&self, parent: &'a AstNode<'a>, value: NodeValue) -> &'a AstNode<'a> {
        let node = self.arena.alloc(Node::new(value));
        parent.append(node);
        node
    }

    fn parse_block(&mut self, parent: &'a AstNode<'a>, data: &[u8]) {
        let size = data.len();
        let can_nest = self.depth < MAX_NESTING;
        if !can_nest {
            tracing::debug!(
                depth = self.depth,
                "block nesting limit reached, nested markers stay text"
            );
        }

        let mut beg = 0;
        while beg < size {
            let txt = &data[beg..];

            if is_atxheader(txt) {
                beg += self.parse_atxheader(parent, txt);
            } else if let Some(n) = is_empty(txt) {
                beg += n;
            } else if is_hrule(txt) {
                self.add_child(parent, NodeValue::ThematicBreak);
                beg += next_line(txt, 0);
            } else if let Some(n) = self.parse_fencedcode(parent, txt) {
                beg += n;
            } else if let Some(n) = table::try_parse(self, parent, txt) {
                beg += n;
            } else if can_nest && prefix_blockspoiler(txt) != 0 {
                beg += self.parse_quote(parent, txt, true);
            } else if can_nest && prefix_quote(txt) != 0 {
                beg += self.parse_quote(parent, txt, false);
            } else if prefix_code(txt) != 0 {
                beg += self.parse_blockcode(parent, txt);
            } else if can_nest && prefix_uli(txt) != 0 {
                beg += self.parse_list(parent, txt, false);
            } else if can_nest && prefix_oli(txt) != 0 {
                beg += self.parse_list(parent, txt, true);
            } else {
                beg += self.parse_paragraph(parent, txt);
            }
        }
    }

    fn parse_atxheader(&mut self, parent: &'a AstNode<'a>, data: &[u8]) -> usize {
        let size = data.len();

        let mut level = 0;
        while level < size && level < 6 && data[level] == b'#' {
            level += 1;
        }

        let mut i = level;
        while i < size && data[i] == b' ' {
            i += 1;
        }

        let mut end = i;
        while end < size && data[end] != b'\n' {
            end += 1;
        }
        let skip = end;

        while end > 0 && data[end - 1] == b'#' {
            end -= 1;
        }
        while end > 0 && data[end - 1] == b' ' {
            end -= 1;
        }

        if end > i {
            self.add_child(
                parent,
                NodeValue::Heading(NodeHeading {
                    level: level as u8,
                    content: data[i..end].to_vec(),
                }),
            );
        }

        skip
    }

    fn parse_fencedcode(&mut self, parent: &'a AstNode<'a>, data: &[u8]) -> Option<usize> {
        let size = data.len();
        let (mut beg, lang) = is_codefence(data)?;

        let mut literal = Vec::new();
        while beg < size {
            if let Some((fence_end, trail)) = is_codefence(&data[beg..]) {
                if trail.is_empty() {
                    beg += fence_end;
                    break;
                }
            }

            let end = next_line(data, beg);
            if is_empty(&data[beg..end]).is_some() {
                literal.push(b'\n');
            } else {
                literal.extend_from_slice(&data[beg..end]);
            }
            beg = end;
        }

        if literal.last().map_or(false, |&c| c != b'\n') {
            literal.push(b'\n');
        }

        self.add_child(
            parent,
            NodeValue::CodeBlock(NodeCodeBlock {
                info: (!lang.is_empty()).then(|| lang.to_vec()),
                literal,
            }),
        );
        Some(beg.min(size))
    }

    /// A block quote, or a spoiler block when `spoiler` is set. Marked
    /// lines and unmarked continuation lines make up its content, up to an
    /// empty line that is not followed by another marked line.
    fn parse_quote(&mut self, parent: &'a AstNode<'a>, data: &[u8], spoiler: bool) -> usize {
        let prefix = if spoiler {
            prefix_blockspoiler
        } else {
            prefix_quote
        };
        let size = data.len();

        let mut work = Vec::with_capacity(size);
        let mut beg = 0;
        let mut end = 0;

        while beg < size {
            end = next_line(data, beg);

            let pre = prefix(&data[beg..end]);
            if pre != 0 {
                beg += pre;
            } else if is_empty(&data[beg..end]).is_some()
                && (end >= size
                    || (prefix(&data[end..]) == 0 && is_empty(&data[end..]).is_none()))
            {
                break;
            }

            if beg < end {
                work.extend_from_slice(&data[beg..end]);
            }
            beg = end;
        }

        let node = self.add_child(
            parent,
            if spoiler {
                NodeValue::BlockSpoiler
            } else {
                NodeValue::BlockQuote
            },
        );
        self.depth += 1;
        self.parse_block(node, &work);
        self.depth -= 1;

        end
    }

    /// Code indented by four spaces.
    fn parse_blockcode(&mut self, parent: &'a AstNode<'a>, data: &[u8]) -> usize {
        let size = data.len();
        let mut literal = Vec::with_capacity(size);
        let mut beg = 0;

        while beg < size {
            let end = next_line(data, beg);
            let pre = prefix_code(&data[beg..end]);

            if pre != 0 {
                beg += pre;
            } else if is_empty(&data[beg..end]).is_none() {
                break;
            }

            if beg < end {
                if is_empty(&data[beg..end]).is_some() {
                    literal.push(b'\n');
                } else {
                    literal.extend_from_slice(&data[beg..end]);
                }
            }
            beg = end;
        }

        while literal.last() == Some(&b'\n') {
            literal.pop();
        }
        literal.push(b'\n');

        self.add_child(
            parent,
            NodeValue::CodeBlock(NodeCodeBlock {
                info: None,
                literal,
            }),
        );
        beg
    }

    fn parse_list(&mut self, parent: &'a AstNode<'a>, data: &[u8], ordered: bool) -> usize {
        let list = self.add_child(parent, NodeValue::List(NodeList { ordered }));
        let mut state = ListState {
            ordered,
            block: false,
            end: false,
        };

        let size = data.len();
        let mut i = 0;
        while i < size {
            let n = self.parse_listitem(list, &data[i..], &mut state);
            i += n;
            if n == 0 || state.end {
                break;
            }
        }

        i
    }

    fn parse_listitem(
        &mut self,
        list: &'a AstNode<'a>,
        data: &[u8],
        state: &mut ListState,
    ) -> usize {
        let size = data.len();
        let orgpre = leading_spaces(data, 3);

        let mut beg = match prefix_uli(data) {
            0 => prefix_oli(data),
            n => n,
        };
        if beg == 0 {
            return 0;
        }

        let mut end = beg;
        while end < size && data[end - 1] != b'\n' {
            end += 1;
        }

        let mut work = data[beg..end].to_vec();
        beg = end;

        // Where a nested list starts within `work`.
        let mut sublist = 0;
        let mut in_empty = false;
        let mut has_inside_empty = false;
        let mut in_fence = false;

        while beg < size {
            end = next_line(data, beg);
            let line = &data[beg..end];

            if is_empty(line).is_some() {
                in_empty = true;
                beg = end;
                continue;
            }

            let pre = leading_spaces(line, 4);
            let rest = &line[pre..];

            if is_codefence(rest).is_some() {
                in_fence = !in_fence;
            }

            // No new items inside fenced code.
            let (has_next_uli, has_next_oli) = if in_fence {
                (false, false)
            } else {
                (prefix_uli(rest) != 0, prefix_oli(rest) != 0)
            };

            // A list never switches type after an empty line.
            if in_empty && ((state.ordered && has_next_uli) || (!state.ordered && has_next_oli)) {
                state.end = true;
                break;
            }

            if (has_next_uli && !is_hrule(rest)) || has_next_oli {
                if in_empty {
                    has_inside_empty = true;
                }
                if pre == orgpre {
                    break;
                }
                if sublist == 0 {
                    sublist = work.len();
                }
            } else if in_empty && pre == 0 {
                state.end = true;
                break;
            } else if in_empty {
                work.push(b'\n');
                has_inside_empty = true;
            }

            in_empty = false;
            work.extend_from_slice(rest);
            beg = end;
        }

        if has_inside_empty {
            state.block = true;
        }

        let item = self.add_child(list, NodeValue::Item(NodeItem { block: state.block }));
        let split = sublist > 0 && sublist < work.len();

        self.depth += 1;
        if state.block {
            if split {
                self.parse_block(item, &work[..sublist]);
                self.parse_block(item, &work[sublist..]);
            } else {
                self.parse_block(item, &work);
            }
        } else if split {
            self.add_child(item, NodeValue::ItemText(work[..sublist].to_vec()));
            self.parse_block(item, &work[sublist..]);
        } else {
            self.add_child(item, NodeValue::ItemText(work));
        }
        self.depth -= 1;

        beg
    }

    /// A paragraph, or a setext header when the text is underlined with
    /// `=` or `-`.
    fn parse_paragraph(&mut self, parent: &'a AstNode<'a>, data: &[u8]) -> usize {
        let size = data.len();
        let mut i = 0;
        let mut end = 0;
        let mut level = 0;

        while i < size {
            end = next_line(data, i);
            let rest = &data[i..];

            if is_empty(rest).is_some() {
                break;
            }

            level = is_headerline(rest);
            if level != 0 {
                break;
            }

            if i > 0
                && (is_atxheader(rest)
                    || is_hrule(rest)
                    || prefix_quote(rest) != 0
                    || prefix_blockspoiler(rest) != 0)
            {
                end = i;
                break;
            }

            i = end;
        }

        let mut work_end = i;
        while work_end > 0 && data[work_end - 1] == b'\n' {
            work_end -= 1;
        }
        let work = &data[..work_end];

        if level == 0 {
            self.add_child(parent, NodeValue::Paragraph(work.to_vec()));
            return end;
        }

        // Only the last line of the text becomes the header.
        let content = match work.iter().rposition(|&c| c == b'\n') {
            Some(nl) => {
                let mut para_end = nl;
                while para_end > 0 && work[para_end - 1] == b'\n' {
                    para_end -= 1;
                }
                if para_end > 0 {
                    self.add_child(parent, NodeValue::Paragraph(work[..para_end].to_vec()));
                }
                &work[nl + 1..]
            }
            None => work,
        };

        self.add_child(
            parent,
            NodeValue::Heading(NodeHeading {
                level,
                content: content.to_vec(),
            }),
        );
        end
    }
}

/// What one list item tells the next about the list it is in.
struct ListState {
    ordered: bool,
    /// Once one item holds blocks, every later item does too.
    block: bool,
    end: bool,
}

/// The offset just past the `\n` that ends the line containing `beg`.
fn next_line(data: &[u8], beg: usize) -> usize {
    let mut end = beg + 1;
    while end < data.len() && data[end - 1] != b'\n' {
        end += 1;
    }
    end
}

fn leading_spaces(data: &[u8], max: usize) -> usize {
    data.iter().take(max).take_while(|&&c| c == b' ').count()
}

/// The length of the first line if it holds only spaces.
fn is_empty(data: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < data.len() && data[i] != b'\n' {
        if data[i] != b' ' {
            return None;
        }
        i += 1;
    }
    Some(i + 1)
}

fn is_hrule(data: &[u8]) -> bool {
    let size = data.len();
    if size < 3 {
        return false;
    }

    let mut i = leading_spaces(data, 3);
    if i + 2 >= size || !matches!(data[i], b'*' | b'-' | b'_') {
        return false;
    }
    let c = data[i];

    let mut n = 0;
    while i < size && data[i] != b'\n' {
        if data[i] == c {
            n += 1;
        } else if data[i] != b' ' {
            return false;
        }
        i += 1;
    }

    n >= 3
}

fn is_atxheader(data: &[u8]) -> bool {
    data.first() == Some(&b'#')
}

/// 1 for a `===` underline, 2 for `---`, otherwise 0.
fn is_headerline(data: &[u8]) -> u8 {
    let (c, level) = match data.first() {
        Some(b'=') => (b'=', 1),
        Some(b'-') => (b'-', 2),
        _ => return 0,
    };

    let mut i = 1;
    while i < data.len() && data[i] == c {
        i += 1;
    }
    while i < data.len() && data[i] == b' ' {
        i += 1;
    }

    if i >= data.len() || data[i] == b'\n' {
        level
    } else {
        0
    }
}

fn is_next_headerline(data: &[u8]) -> bool {
    match data.iter().position(|&c| c == b'\n') {
        Some(nl) if nl + 1 < data.len() => is_headerline(&data[nl + 1..]) != 0,
        _ => false,
    }
}

/// A fence line of three or more backticks or tildes, with its optional
/// language. Returns the line's length (newline included) and the
/// language, which is empty when absent.
fn is_codefence(data: &[u8]) -> Option<(usize, &[u8])> {
    let size = data.len();
    if size < 3 {
        return None;
    }

    let mut i = leading_spaces(data, 3);
    if i + 2 >= size || !matches!(data[i], b'~' | b'`') {
        return None;
    }

    let c = data[i];
    let mut n = 0;
    while i < size && data[i] == c {
        n += 1;
        i += 1;
    }
    if n < 3 {
        return None;
    }

    while i < size && data[i] == b' ' {
        i += 1;
    }

    let syntax = if i < size && data[i] == b'{' {
        i += 1;
        let start = i;
        while i < size && data[i] != b'}' && data[i] != b'\n' {
            i += 1;
        }
        if i == size || data[i] != b'}' {
            return None;
        }

        let mut syntax = &data[start..i];
        while let [first, rest @ ..] = syntax {
            if !is_md_space(*first) {
                break;
            }
            syntax = rest;
        }
        while let [rest @ .., last] = syntax {
            if !is_md_space(*last) {
                break;
            }
            syntax = rest;
        }

        i += 1;
        syntax
    } else {
        let start = i;
        while i < size && !is_md_space(data[i]) {
            i += 1;
        }
        &data[start..i]
    };

    while i < size && data[i] != b'\n' {
        if !is_md_space(data[i]) {
            return None;
        }
        i += 1;
    }

    Some((i + 1, syntax))
}

fn prefix_quote(data: &[u8]) -> usize {
    let i = leading_spaces(data, 3);
    if data.get(i) != Some(&b'>') {
        return 0;
    }

    match data.get(i + 1) {
        // `>!` belongs to spoilers, whether or not it opens one.
        Some(b'!') => 0,
        Some(b' ') => i + 2,
        _ => i + 1,
    }
}

/// `>!` opening a spoiler block. A line that also closes an inline
/// spoiler with `!<` is left to the inline scanner.
fn prefix_blockspoiler(data: &[u8]) -> usize {
    let i = leading_spaces(data, 3);
    if !data[i..].starts_with(b">!") {
        return 0;
    }

    let line_end = data[i..]
        .iter()
        .position(|&c| c == b'\n')
        .map_or(data.len(), |nl| i + nl);
    if data[i + 2..line_end].windows(2).any(|w| w == b"!<") {
        return 0;
    }

    if data.get(i + 2) == Some(&b' ') {
        i + 3
    } else {
        i + 2
    }
}

fn prefix_code(data: &[u8]) -> usize {
    if data.len() > 3 && data.starts_with(b"    ") {
        4
    } else {
        0
    }
}

fn prefix_uli(data: &[u8]) -> usize {
    let size = data.len();
    let i = leading_spaces(data, 3);

    if i + 1 >= size || !matches!(data[i], b'*' | b'+' | b'-') || data[i + 1] != b' ' {
        return 0;
    }
    if is_next_headerline(&data[i..]) {
        return 0;
    }

    i + 2
}

fn prefix_oli(data: &[u8]) -> usize {
    let size = data.len();
    let mut i = leading_spaces(data, 3);

    if i >= size || !isdigit(data[i]) {
        return 0;
    }
    while i < size && isdigit(data[i]) {
        i += 1;
    }

    if i + 1 >= size || data[i] != b'.' || data[i + 1] != b' ' {
        return 0;
    }
    if is_next_headerline(&data[i..]) {
        return 0;
    }

    i + 2
}
