//! The inline scanner.
//!
//! Text is copied through in runs until a byte with a registered handler
//! turns up. The handler either claims some bytes from that position,
//! writing their HTML, or declines and the byte is passed through as text.
//! Handlers for constructs with inline content (emphasis, links, spoilers,
//! superscripts) scan that content recursively into a scratch buffer, so
//! a construct that turns out not to close leaves no trace in the output.

mod lookahead;

use std::borrow::Cow;
use std::mem;

use crate::ctype::{byte_set, is_md_space, isalnum, isdigit};
use crate::entity;
use crate::html::{Renderer, Span};
use crate::parser::autolink::{self, AutolinkMatch};
use crate::parser::{RefMap, MAX_NESTING};

use self::lookahead::{Emph, Lookahead};

const ESCAPABLE: [bool; 256] = byte_set(b"\\`*_{}[]()#+-.!:|&<>/^~");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Special {
    Emphasis,
    Codespan,
    Linebreak,
    Link,
    Langle,
    Escape,
    Entity,
    Superscript,
    Spoiler,
    Url,
    Email,
    Www,
    Mention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AutolinkType {
    Normal,
    Email,
}

pub(crate) struct Subject<'o> {
    renderer: Renderer<'o>,
    refs: &'o RefMap,
    active: [Option<Special>; 256],
    in_link_body: bool,
    depth: usize,
    ahead: Lookahead,
}

impl<'o> Subject<'o> {
    pub fn new(renderer: Renderer<'o>, refs: &'o RefMap) -> Self {
        let mut active = [None; 256];
        for c in [b'*', b'_', b'~'] {
            active[c as usize] = Some(Special::Emphasis);
        }
        active[b'`' as usize] = Some(Special::Codespan);
        if renderer.has_linebreak() {
            active[b'\n' as usize] = Some(Special::Linebreak);
        }
        active[b'[' as usize] = Some(Special::Link);
        active[b'<' as usize] = Some(Special::Langle);
        active[b'\\' as usize] = Some(Special::Escape);
        active[b'&' as usize] = Some(Special::Entity);
        active[b'^' as usize] = Some(Special::Superscript);
        active[b'>' as usize] = Some(Special::Spoiler);
        if renderer.mode().autolink() {
            active[b':' as usize] = Some(Special::Url);
            active[b'@' as usize] = Some(Special::Email);
            active[b'w' as usize] = Some(Special::Www);
            active[b'/' as usize] = Some(Special::Mention);
        }

        Subject {
            renderer,
            refs,
            active,
            in_link_body: false,
            depth: 0,
            ahead: Lookahead::default(),
        }
    }

    /// Scan `text`, appending its HTML to `out`.
    pub fn parse_inline(&mut self, out: &mut Vec<u8>, text: &[u8]) {
        if self.depth >= MAX_NESTING {
            tracing::debug!(depth = self.depth, "inline nesting limit reached, emitting text");
            self.renderer.normal_text(out, text);
            return;
        }
        self.depth += 1;
        let outer = mem::take(&mut self.ahead);

        let size = text.len();
        let mut i = 0;
        let mut end = 0;
        let mut consumed = 0;

        while i < size {
            while end < size && self.active[text[end] as usize].is_none() {
                end += 1;
            }

            self.renderer.normal_text(out, &text[i..end]);

            if end >= size {
                break;
            }
            i = end;

            match self.handle(out, text, i, i - consumed) {
                0 => end = i + 1,
                n => {
                    i += n;
                    end = i;
                    consumed = i;
                }
            }
        }

        self.ahead = outer;
        self.depth -= 1;
    }

    /// Try the construct introduced by `text[pos]`. `max_rewind` is the
    /// number of bytes before `pos` that were written as plain text since
    /// the last construct. Returns the number of bytes claimed from `pos`,
    /// or 0 to decline.
    fn handle(&mut self, out: &mut Vec<u8>, text: &[u8], pos: usize, max_rewind: usize) -> usize {
        let Some(special) = self.active[text[pos] as usize] else {
            return 0;
        };

        match special {
            Special::Emphasis => self.handle_emphasis(out, text, pos, max_rewind),
            Special::Codespan => self.handle_codespan(out, text, pos),
            Special::Linebreak => self.handle_linebreak(out, text, pos, max_rewind),
            Special::Link => self.handle_link(out, text, pos, max_rewind),
            Special::Langle => self.handle_langle(out, text, pos),
            Special::Escape => self.handle_escape(out, &text[pos..]),
            Special::Entity => handle_entity(out, &text[pos..]),
            Special::Superscript => self.handle_superscript(out, text, pos),
            Special::Spoiler => self.handle_spoiler(out, text, pos),
            Special::Url => self.handle_url(out, text, pos, max_rewind),
            Special::Email => self.handle_email(out, text, pos, max_rewind),
            Special::Www => self.handle_www(out, text, pos, max_rewind),
            Special::Mention => self.handle_mention(out, text, pos, max_rewind),
        }
    }

    fn render_span(&mut self, out: &mut Vec<u8>, span: Span, content: &[u8]) -> bool {
        let mut work = Vec::with_capacity(content.len());
        self.parse_inline(&mut work, content);
        self.renderer.span(out, span, &work)
    }

    fn handle_emphasis(
        &mut self,
        out: &mut Vec<u8>,
        text: &[u8],
        pos: usize,
        max_rewind: usize,
    ) -> usize {
        let data = &text[pos..];
        let size = data.len();
        let c = data[0];

        // No intra-word underscores.
        if c == b'_' && max_rewind > 0 {
            let prev = text[pos - 1];
            if !is_md_space(prev) && prev != b'>' && prev != b'(' {
                return 0;
            }
        }

        if size > 2 && data[1] != c {
            // `~` only works doubled.
            if c == b'~' || is_md_space(data[1]) {
                return 0;
            }
            return match self.emph1(out, text, pos + 1, c) {
                0 => 0,
                n => n + 1,
            };
        }

        if size > 3 && data[1] == c && data[2] != c {
            if is_md_space(data[2]) {
                return 0;
            }
            return match self.emph2(out, text, pos + 2, c) {
                0 => 0,
                n => n + 2,
            };
        }

        if size > 4 && data[1] == c && data[2] == c && data[3] != c {
            if c == b'~' || is_md_space(data[3]) {
                return 0;
            }
            return match self.emph3(out, text, pos, c) {
                0 => 0,
                n => n + 3,
            };
        }

        0
    }

    /// Single emphasis: closed by one `c` not preceded by whitespace.
    /// `base` is where the content starts.
    fn emph1(&mut self, out: &mut Vec<u8>, text: &[u8], base: usize, c: u8) -> usize {
        let data = &text[base..];
        let size = data.len();

        // Entered from a triple opener with one closer already matched.
        let mut i = if size > 1 && data[0] == c && data[1] == c {
            1
        } else {
            0
        };

        let mut rejected = Vec::new();
        while i < size {
            let len = find_emph_char(&mut self.ahead, text, base + i, c);
            if len == 0 {
                break;
            }
            i += len;
            if i >= size || self.ahead.emph_missed(Emph::Single, c, base + i) {
                break;
            }

            if data[i] == c
                && !is_md_space(data[i - 1])
                && !(c == b'_' && i + 1 < size && isalnum(data[i + 1]))
            {
                return if self.render_span(out, Span::Emphasis, &data[..i]) {
                    i + 1
                } else {
                    0
                };
            }
            rejected.push(base + i);
        }

        self.ahead.emph_miss(Emph::Single, c, rejected);
        0
    }

    /// Double emphasis or strikethrough: closed by `cc` not preceded by
    /// whitespace.
    fn emph2(&mut self, out: &mut Vec<u8>, text: &[u8], base: usize, c: u8) -> usize {
        let data = &text[base..];
        let size = data.len();
        let span = if c == b'~' {
            Span::Strikethrough
        } else {
            Span::Strong
        };

        let mut rejected = Vec::new();
        let mut i = 0;
        while i < size {
            let len = find_emph_char(&mut self.ahead, text, base + i, c);
            if len == 0 {
                break;
            }
            i += len;
            if self.ahead.emph_missed(Emph::Double, c, base + i) {
                break;
            }

            if i + 1 < size && data[i] == c && data[i + 1] == c && !is_md_space(data[i - 1]) {
                return if self.render_span(out, span, &data[..i]) {
                    i + 2
                } else {
                    0
                };
            }
            rejected.push(base + i);
            i += 1;
        }

        self.ahead.emph_miss(Emph::Double, c, rejected);
        0
    }

    /// Triple emphasis. `base` is the three-byte opener; whichever closer
    /// comes first decides how the run is split.
    fn emph3(&mut self, out: &mut Vec<u8>, text: &[u8], base: usize, c: u8) -> usize {
        let body = &text[base + 3..];
        let size = body.len();

        let mut rejected = Vec::new();
        let mut i = 0;
        while i < size {
            let len = find_emph_char(&mut self.ahead, text, base + 3 + i, c);
            if len == 0 {
                break;
            }
            i += len;
            if self.ahead.emph_missed(Emph::Triple, c, base + 3 + i) {
                break;
            }

            if body[i] != c || is_md_space(body[i - 1]) {
                rejected.push(base + 3 + i);
                continue;
            }

            if i + 2 < size && body[i + 1] == c && body[i + 2] == c {
                return if self.render_span(out, Span::StrongEmphasis, &body[..i]) {
                    i + 3
                } else {
                    0
                };
            } else if i + 1 < size && body[i + 1] == c {
                // `***a** b*`: strong inside emphasis.
                return self.emph1(out, text, base + 1, c).saturating_sub(2);
            } else {
                // `***a* b**`: emphasis inside strong.
                return self.emph2(out, text, base + 2, c).saturating_sub(1);
            }
        }

        self.ahead.emph_miss(Emph::Triple, c, rejected);
        0
    }

    fn handle_codespan(&mut self, out: &mut Vec<u8>, text: &[u8], pos: usize) -> usize {
        let data = &text[pos..];
        let size = data.len();

        let mut nb = 0;
        while nb < size && data[nb] == b'`' {
            nb += 1;
        }

        let Some(end) = self.ahead.backtick_close(text, pos + nb, nb) else {
            return 0;
        };
        let end = end - pos;

        let mut f_begin = nb;
        while f_begin < end && data[f_begin] == b' ' {
            f_begin += 1;
        }
        let mut f_end = end - nb;
        while f_end > nb && data[f_end - 1] == b' ' {
            f_end -= 1;
        }

        let content = if f_begin < f_end {
            &data[f_begin..f_end]
        } else {
            &[][..]
        };
        self.renderer.codespan(out, content);
        end
    }

    /// Two spaces before a newline.
    fn handle_linebreak(
        &mut self,
        out: &mut Vec<u8>,
        text: &[u8],
        pos: usize,
        max_rewind: usize,
    ) -> usize {
        if max_rewind < 2 || text[pos - 1] != b' ' || text[pos - 2] != b' ' {
            return 0;
        }

        while out.last() == Some(&b' ') {
            out.pop();
        }
        self.renderer.linebreak(out);
        1
    }

    fn handle_escape(&mut self, out: &mut Vec<u8>, data: &[u8]) -> usize {
        if data.len() == 1 {
            out.push(b'\\');
            return 1;
        }

        if !ESCAPABLE[data[1] as usize] {
            return 0;
        }
        self.renderer.normal_text(out, &data[1..2]);
        2
    }

    fn handle_langle(&mut self, out: &mut Vec<u8>, text: &[u8], pos: usize) -> usize {
        let data = &text[pos..];
        let (end, autolink) = tag_length(&mut self.ahead, text, pos);
        if end <= 2 {
            return 0;
        }

        let rendered = match autolink {
            Some(kind) if self.renderer.has_autolink() => {
                let mut link = Vec::with_capacity(end - 2);
                unescape_into(&mut link, &data[1..end - 1]);
                self.renderer
                    .autolink(out, &link, kind == AutolinkType::Email)
            }
            None if self.renderer.has_raw_html() => self.renderer.raw_html(out, &data[..end]),
            _ => false,
        };

        if rendered {
            end
        } else {
            0
        }
    }

    fn handle_link(&mut self, out: &mut Vec<u8>, text: &[u8], pos: usize, max_rewind: usize) -> usize {
        let data = &text[pos..];
        let size = data.len();
        let is_img = max_rewind > 0 && text[pos - 1] == b'!';

        if is_img && !self.renderer.has_image() {
            return 0;
        }

        let Some((close, text_has_nl)) = self.ahead.bracket_close(text, pos) else {
            return 0;
        };
        let txt_e = close - pos;
        let mut i = txt_e + 1;

        while i < size && is_md_space(data[i]) {
            i += 1;
        }

        let (link, title, end): (&[u8], Option<&[u8]>, usize) = if i < size && data[i] == b'(' {
            match inline_target(data, i + 1, self.ahead.paren_miss.saturating_sub(pos)) {
                Ok(target) => target,
                Err(miss) => {
                    if miss != usize::MAX {
                        self.ahead.paren_miss = self.ahead.paren_miss.min(pos + miss);
                    }
                    return 0;
                }
            }
        } else if i < size && data[i] == b'[' {
            let id_b = i + 1;
            let Some(id_e) = self.ahead.next_byte(text, b']', pos + id_b) else {
                return 0;
            };
            i = id_e - pos;

            let id = if id_b == i {
                link_id(data, txt_e, text_has_nl)
            } else {
                Cow::Borrowed(&data[id_b..i])
            };
            let Some(reference) = self.refs.lookup(&id) else {
                return 0;
            };
            (reference.url.as_slice(), reference.title.as_deref(), i + 1)
        } else {
            let id = link_id(data, txt_e, text_has_nl);
            let Some(reference) = self.refs.lookup(&id) else {
                return 0;
            };
            // Whitespace after the brackets is not part of the link.
            (reference.url.as_slice(), reference.title.as_deref(), txt_e + 1)
        };

        if link.is_empty() {
            return 0;
        }

        let mut u_link = Vec::with_capacity(link.len());
        unescape_into(&mut u_link, link);
        if !self.renderer.accepts_target(&u_link, is_img) {
            return 0;
        }

        let mut content = Vec::new();
        if txt_e > 1 {
            if is_img {
                content.extend_from_slice(&data[1..txt_e]);
            } else {
                let was_in_link_body = self.in_link_body;
                self.in_link_body = true;
                self.parse_inline(&mut content, &data[1..txt_e]);
                self.in_link_body = was_in_link_body;
            }
        }

        if is_img {
            let mut img = Vec::new();
            if !self.renderer.image(&mut img, &u_link, title, &content) {
                return 0;
            }
            if out.last() == Some(&b'!') {
                out.pop();
            }
            out.extend_from_slice(&img);
            end
        } else if self.renderer.link(out, &u_link, title, &content) {
            end
        } else {
            0
        }
    }

    /// `^word` or `^(some words)`.
    fn handle_superscript(&mut self, out: &mut Vec<u8>, text: &[u8], pos: usize) -> usize {
        let data = &text[pos..];
        let size = data.len();
        if size < 2 {
            return 0;
        }

        let (start, mut end) = if data[1] == b'(' { (2, 2) } else { (1, 1) };
        if start == 2 {
            while end < size && data[end] != b')' {
                if pos + end >= self.ahead.paren_miss {
                    return 0;
                }
                end += if data[end] == b'\\' { 2 } else { 1 };
            }
            if end >= size {
                self.ahead.paren_miss = self.ahead.paren_miss.min(pos + 2);
                return 0;
            }
        } else {
            while end < size && !is_md_space(data[end]) {
                end += 1;
            }
        }

        if end == start {
            // `^()` vanishes; a lone `^` is text.
            return if start == 2 { 3 } else { 0 };
        }

        self.render_span(out, Span::Superscript, &data[start..end]);
        if start == 2 {
            end + 1
        } else {
            end
        }
    }

    /// `>!text!<`.
    fn handle_spoiler(&mut self, out: &mut Vec<u8>, text: &[u8], pos: usize) -> usize {
        let data = &text[pos..];
        let size = data.len();
        if size < 3 || data[1] != b'!' || is_md_space(data[2]) {
            return 0;
        }

        let mut i = 3;
        while i + 1 < size {
            if pos + i >= self.ahead.spoiler_miss {
                return 0;
            }
            if data[i] == b'!'
                && data[i + 1] == b'<'
                && !is_md_space(data[i - 1])
                && data[i - 1] != b'\\'
            {
                break;
            }
            i += 1;
        }

        if i + 1 >= size {
            self.ahead.spoiler_miss = self.ahead.spoiler_miss.min(pos + 3);
            return 0;
        }

        if self.render_span(out, Span::Spoiler, &data[2..i]) {
            i + 2
        } else {
            0
        }
    }

    /// Write an autolink over the `rewind` bytes of plain text already
    /// output plus the `len` bytes from `pos`.
    fn splice_link(&self, out: &mut Vec<u8>, rendered: &[u8], m: AutolinkMatch) -> usize {
        out.truncate(out.len().saturating_sub(m.rewind));
        out.extend_from_slice(rendered);
        m.len
    }

    fn handle_url(&mut self, out: &mut Vec<u8>, text: &[u8], pos: usize, max_rewind: usize) -> usize {
        if !self.renderer.has_autolink() || self.in_link_body {
            return 0;
        }
        let Some(m) = autolink::url_match(text, pos, max_rewind) else {
            return 0;
        };

        let mut rendered = Vec::new();
        if !self.renderer.autolink(&mut rendered, m.text(text, pos), false) {
            return 0;
        }
        self.splice_link(out, &rendered, m)
    }

    fn handle_email(&mut self, out: &mut Vec<u8>, text: &[u8], pos: usize, max_rewind: usize) -> usize {
        if !self.renderer.has_autolink() || self.in_link_body {
            return 0;
        }
        let Some(m) = autolink::email_match(text, pos, max_rewind) else {
            return 0;
        };

        let mut rendered = Vec::new();
        if !self.renderer.autolink(&mut rendered, m.text(text, pos), true) {
            return 0;
        }
        self.splice_link(out, &rendered, m)
    }

    /// A link whose href is `prefix` followed by the matched text.
    fn link_with_prefix(&self, rendered: &mut Vec<u8>, prefix: &[u8], link_text: &[u8]) -> bool {
        let mut url = Vec::with_capacity(prefix.len() + link_text.len());
        url.extend_from_slice(prefix);
        url.extend_from_slice(link_text);

        let mut content = Vec::with_capacity(link_text.len());
        self.renderer.normal_text(&mut content, link_text);

        self.renderer.link(rendered, &url, None, &content)
    }

    fn handle_www(&mut self, out: &mut Vec<u8>, text: &[u8], pos: usize, max_rewind: usize) -> usize {
        if self.in_link_body {
            return 0;
        }
        let Some(m) = autolink::www_match(text, pos, max_rewind) else {
            return 0;
        };

        let mut rendered = Vec::new();
        if !self.link_with_prefix(&mut rendered, b"http://", m.text(text, pos)) {
            return 0;
        }
        self.splice_link(out, &rendered, m)
    }

    fn handle_mention(&mut self, out: &mut Vec<u8>, text: &[u8], pos: usize, max_rewind: usize) -> usize {
        if self.in_link_body {
            return 0;
        }
        let Some(m) = autolink::subreddit_match(text, pos, max_rewind)
            .or_else(|| autolink::username_match(text, pos, max_rewind))
        else {
            return 0;
        };

        let prefix: &[u8] = if m.no_slash { b"/" } else { b"" };
        let mut rendered = Vec::new();
        if !self.link_with_prefix(&mut rendered, prefix, m.link.text(text, pos)) {
            return 0;
        }
        self.splice_link(out, &rendered, m.link)
    }
}

/// Look for the next `c` after `text[start]` that could close an emphasis
/// run, stepping over code spans and links. Returns its offset from
/// `start`, or 0 if there is none.
fn find_emph_char(ahead: &mut Lookahead, text: &[u8], start: usize, c: u8) -> usize {
    let size = text.len();
    let rel = |at: Option<usize>| at.map_or(0, |at| at - start);
    let mut i = start + 1;

    while i < size {
        while i < size && text[i] != c && text[i] != b'`' && text[i] != b'[' {
            i += 1;
        }
        if i == size {
            return 0;
        }

        if text[i - 1] == b'\\' {
            i += 1;
            continue;
        }

        if text[i] == c {
            return i - start;
        }

        if text[i] == b'`' {
            let mut span_nb = 0;
            while i < size && text[i] == b'`' {
                i += 1;
                span_nb += 1;
            }
            if i >= size {
                return 0;
            }

            // A `c` inside an unclosed span is still a candidate.
            let end = ahead.backtick_close(text, i, span_nb).unwrap_or(size);
            let inside = ahead.next_byte(text, c, i).filter(|&f| f < end);
            if end >= size {
                return rel(inside);
            }
            i = end;
        } else {
            let close = ahead.next_byte(text, b']', i + 1).unwrap_or(size);
            let mut inside = ahead.next_byte(text, c, i + 1).filter(|&f| f < close);
            i = close + 1;
            while i < size && is_md_space(text[i]) {
                i += 1;
            }
            if i >= size {
                return rel(inside);
            }

            let cc = match text[i] {
                b'[' => b']',
                b'(' => b')',
                _ => {
                    if inside.is_some() {
                        return rel(inside);
                    }
                    continue;
                }
            };

            let close = ahead.next_byte(text, cc, i + 1).unwrap_or(size);
            if inside.is_none() {
                inside = ahead.next_byte(text, c, i + 1).filter(|&f| f < close);
            }
            if close >= size {
                return rel(inside);
            }
            i = close + 1;
        }
    }

    0
}

/// Parse `url "title")` starting just after the `(`. Returns the link,
/// the title and the offset just past the `)`.
///
/// No `)` can end the target once the scan reaches `miss`. On failure the
/// error holds an offset from which no `)` is reachable, or `usize::MAX`
/// when the scan proved nothing new.
fn inline_target(
    data: &[u8],
    mut i: usize,
    miss: usize,
) -> Result<(&[u8], Option<&[u8]>, usize), usize> {
    let size = data.len();

    while i < size && is_md_space(data[i]) {
        i += 1;
    }

    let scan_b = i;
    let mut link_b = i;
    while i < size {
        if i >= miss {
            return Err(usize::MAX);
        }
        if data[i] == b'\\' {
            i += 2;
        } else if data[i] == b')' {
            break;
        } else if is_md_space(data[i - 1]) && (data[i] == b'\'' || data[i] == b'"') {
            break;
        } else {
            i += 1;
        }
    }

    if i >= size {
        return Err(scan_b);
    }

    let mut link_e = i;
    let mut title = None;

    if data[i] == b'\'' || data[i] == b'"' {
        let qtype = data[i];
        let mut in_title = true;
        let mut closed_at = usize::MAX;
        i += 1;
        let title_b = i;

        while i < size {
            if i >= miss {
                return Err(usize::MAX);
            }
            if data[i] == b'\\' {
                i += 2;
            } else if data[i] == qtype {
                if in_title {
                    closed_at = i + 1;
                }
                in_title = false;
                i += 1;
            } else if data[i] == b')' && !in_title {
                break;
            } else {
                i += 1;
            }
        }

        if i >= size {
            return Err(closed_at);
        }

        let mut title_e = i - 1;
        while title_e > title_b && is_md_space(data[title_e]) {
            title_e -= 1;
        }

        if data[title_e] == b'\'' || data[title_e] == b'"' {
            if title_e > title_b {
                title = Some(&data[title_b..title_e]);
            }
        } else {
            // No closing quote: it was all link.
            link_e = i;
        }
    }

    while link_e > link_b && is_md_space(data[link_e - 1]) {
        link_e -= 1;
    }

    if link_e > link_b && data[link_b] == b'<' {
        link_b += 1;
    }
    if link_e > link_b && data[link_e - 1] == b'>' {
        link_e -= 1;
    }

    Ok((&data[link_b..link_e], title, i + 1))
}

/// The reference id for `[text]` or `[text][]`: the bracketed text, with
/// line breaks folded into single spaces.
fn link_id(data: &[u8], txt_e: usize, text_has_nl: bool) -> Cow<'_, [u8]> {
    if !text_has_nl {
        return Cow::Borrowed(&data[1..txt_e]);
    }

    let mut id = Vec::with_capacity(txt_e);
    for j in 1..txt_e {
        if data[j] != b'\n' {
            id.push(data[j]);
        } else if data[j - 1] != b' ' {
            id.push(b' ');
        }
    }
    Cow::Owned(id)
}

/// Copy `src` to `out`, dropping each backslash and keeping the byte after
/// it. A trailing lone backslash is dropped.
fn unescape_into(out: &mut Vec<u8>, src: &[u8]) {
    let mut i = 0;
    while i < src.len() {
        let org = i;
        while i < src.len() && src[i] != b'\\' {
            i += 1;
        }
        out.extend_from_slice(&src[org..i]);

        if i + 1 >= src.len() {
            break;
        }
        out.push(src[i + 1]);
        i += 2;
    }
}

/// `&name;`, `&#digits;` or `&#xhex;`. Valid references are copied
/// through, with an `X` lowercased; anything else is declined and its `&`
/// ends up escaped.
fn handle_entity(out: &mut Vec<u8>, data: &[u8]) -> usize {
    let size = data.len();
    let mut end = 1;

    let numeric = end < size && data[end] == b'#';
    if numeric {
        end += 1;
    }
    let hex = numeric && end < size && data[end].eq_ignore_ascii_case(&b'x');
    if hex {
        end += 1;
    }

    let content_start = end;
    while end < size {
        let c = data[end];
        let ok = if hex {
            c.is_ascii_hexdigit()
        } else if numeric {
            isdigit(c)
        } else {
            isalnum(c)
        };
        if !ok {
            break;
        }
        end += 1;
    }
    let content_end = end;

    if end == content_start || end >= size || data[end] != b';' {
        return 0;
    }
    end += 1;

    if numeric {
        match entity::parse_numeric(&data[content_start..content_end], hex) {
            Some(codepoint) if entity::is_valid_numeric(codepoint) => (),
            _ => return 0,
        }
    } else if entity::lookup(&data[1..end]).is_none() {
        return 0;
    }

    out.push(b'&');
    if numeric {
        out.push(b'#');
    }
    if hex {
        out.push(b'x');
    }
    out.extend_from_slice(&data[content_start..end]);
    end
}

/// The length of the tag starting at `text[pos] == '<'`, and whether it
/// is an autolink. 0 if this is no tag at all.
fn tag_length(ahead: &mut Lookahead, text: &[u8], pos: usize) -> (usize, Option<AutolinkType>) {
    let data = &text[pos..];
    let size = data.len();
    if size < 3 || data[0] != b'<' {
        return (0, None);
    }

    let mut i = if data[1] == b'/' { 2 } else { 1 };
    if !isalnum(data[i]) {
        return (0, None);
    }

    // A scheme or the local part of an address.
    while i < size && (isalnum(data[i]) || matches!(data[i], b'.' | b'+' | b'-')) {
        i += 1;
    }

    if i > 1 && i < size && data[i] == b'@' {
        let j = mail_autolink_length(&data[i..]);
        if j != 0 {
            return (i + j, Some(AutolinkType::Email));
        }
    }

    if i > 2 && i < size && data[i] == b':' {
        i += 1;
        let j = i;
        while i < size {
            if pos + i >= ahead.angle_miss {
                return (0, None);
            }
            match data[i] {
                b'\\' => i += 2,
                b'>' | b'\'' | b'"' | b' ' | b'\n' => break,
                _ => i += 1,
            }
        }
        if i >= size {
            ahead.angle_miss = ahead.angle_miss.min(pos + j);
            return (0, None);
        }
        if i > j && data[i] == b'>' {
            return (i + 1, Some(AutolinkType::Normal));
        }
    }

    match ahead.next_byte(text, b'>', pos + i) {
        Some(close) => (close - pos + 1, None),
        None => (0, None),
    }
}

/// `data` starts at the `@` of `<local@domain>`. Returns the length up to
/// and including the `>`, or 0.
fn mail_autolink_length(data: &[u8]) -> usize {
    let mut nb = 0;
    for (i, &c) in data.iter().enumerate() {
        if isalnum(c) {
            continue;
        }
        match c {
            b'@' => {
                nb += 1;
                if nb > 1 {
                    return 0;
                }
            }
            b'-' | b'.' | b'_' => (),
            b'>' => return if nb == 1 { i + 1 } else { 0 },
            _ => return 0,
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(data: &[u8]) -> (usize, Option<AutolinkType>) {
        tag_length(&mut Lookahead::default(), data, 0)
    }

    #[test]
    fn tag_lengths() {
        assert_eq!(tag(b"<test> x"), (6, None));
        assert_eq!(tag(b"<http://a.b/c> x"), (14, Some(AutolinkType::Normal)));
        assert_eq!(tag(b"<me@x.com>"), (10, Some(AutolinkType::Email)));
        assert_eq!(tag(b"<me@x@y.com>"), (12, None));
        assert_eq!(tag(b"<http://a b>"), (12, None));
        assert_eq!(tag(b"< b>"), (0, None));
        assert_eq!(tag(b"<b"), (0, None));
        assert_eq!(tag(b"<a href"), (0, None));
    }

    #[test]
    fn unclosed_scheme_fails_every_later_tag() {
        let mut ahead = Lookahead::default();
        let text = b"<ab:x<cd:y";
        assert_eq!(tag_length(&mut ahead, text, 0), (0, None));
        assert_eq!(ahead.angle_miss, 4);
        assert_eq!(tag_length(&mut ahead, text, 5), (0, None));
    }

    fn closer(data: &[u8]) -> usize {
        find_emph_char(&mut Lookahead::default(), data, 0, b'*')
    }

    #[test]
    fn emphasis_closers() {
        assert_eq!(closer(b"*abc*"), 4);
        assert_eq!(closer(b"*a\\*b*"), 5);
        assert_eq!(closer(b"*a `*` b*"), 8);
        assert_eq!(closer(b"*a [*](x) b*"), 11);
        assert_eq!(closer(b"*a [x] b*"), 8);
        assert_eq!(closer(b"*a `b"), 0);
        assert_eq!(closer(b"*abc"), 0);
    }

    fn target(data: &[u8]) -> Result<(&[u8], Option<&[u8]>, usize), usize> {
        inline_target(data, 1, usize::MAX)
    }

    #[test]
    fn link_targets() {
        assert_eq!(target(b"(/a)"), Ok((&b"/a"[..], None, 4)));
        assert_eq!(target(b"(/a \"t\")"), Ok((&b"/a"[..], Some(&b"t"[..]), 8)));
        assert_eq!(target(b"(/a"), Err(1));
        assert_eq!(target(b"(/a \"t\" x"), Err(7));
        assert_eq!(target(b"(/a \"t"), Err(usize::MAX));
        assert_eq!(inline_target(b"(/a)", 1, 2), Err(usize::MAX));
    }

    #[test]
    fn unescaping() {
        let mut out = vec![];
        unescape_into(&mut out, b"a\\)b\\\\c\\");
        assert_eq!(out, b"a)b\\c");
    }

    #[test]
    fn entities() {
        let mut out = vec![];
        assert_eq!(handle_entity(&mut out, b"&#X7e; x"), 6);
        assert_eq!(out, b"&#x7e;");
        assert_eq!(handle_entity(&mut vec![], b"&nbsp"), 0);
        assert_eq!(handle_entity(&mut vec![], b"&#11;"), 0);
        assert_eq!(handle_entity(&mut vec![], b"&#12345678;"), 0);
    }
}
