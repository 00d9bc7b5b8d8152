//! Span-level output: the HTML each inline construct turns into.
//!
//! The same scanner drives two writers. `Body` produces the document
//! itself. `Toc` produces the text of table-of-contents entries, where
//! only the markup that makes sense inside an anchor survives and
//! everything else degrades to plain text.

use crate::html::{escape, escape_href, wiki};
use crate::parser::autolink::is_safe;
use crate::parser::options::{Options, RenderMode};

/// Which writer the inline scanner is feeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flavor {
    Body,
    Toc,
}

/// Wrapping markup for spans whose content is itself inline markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Span {
    Emphasis,
    Strong,
    StrongEmphasis,
    Strikethrough,
    Superscript,
    Spoiler,
}

impl Span {
    fn tags(self) -> (&'static [u8], &'static [u8]) {
        match self {
            Span::Emphasis => (b"<em>", b"</em>"),
            Span::Strong => (b"<strong>", b"</strong>"),
            Span::StrongEmphasis => (b"<strong><em>", b"</em></strong>"),
            Span::Strikethrough => (b"<del>", b"</del>"),
            Span::Superscript => (b"<sup>", b"</sup>"),
            Span::Spoiler => (b"<span class=\"md-spoiler-text\">", b"</span>"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Renderer<'o> {
    options: &'o Options,
    flavor: Flavor,
}

impl<'o> Renderer<'o> {
    pub fn new(options: &'o Options, flavor: Flavor) -> Self {
        Renderer { options, flavor }
    }

    pub fn mode(&self) -> RenderMode {
        self.options.mode
    }

    /// `scheme://` and email autolinks, bare or in angle brackets.
    pub fn has_autolink(&self) -> bool {
        self.flavor == Flavor::Body
    }

    pub fn has_linebreak(&self) -> bool {
        self.flavor == Flavor::Body
    }

    pub fn has_image(&self) -> bool {
        self.flavor == Flavor::Body && self.options.mode.images()
    }

    pub fn has_raw_html(&self) -> bool {
        self.flavor == Flavor::Body
    }

    pub fn normal_text(&self, out: &mut Vec<u8>, text: &[u8]) {
        match self.flavor {
            Flavor::Body => escape(out, text),
            Flavor::Toc => out.extend_from_slice(text),
        }
    }

    fn link_attributes(&self, out: &mut Vec<u8>) {
        let render = &self.options.render;
        if render.nofollow {
            out.extend_from_slice(b" rel=\"nofollow\"");
        }
        if let Some(ref target) = render.target {
            out.extend_from_slice(b" target=\"");
            escape(out, target.as_bytes());
            out.push(b'"');
        }
    }

    pub fn autolink(&self, out: &mut Vec<u8>, link: &[u8], email: bool) -> bool {
        if link.is_empty() || (!email && !is_safe(link)) {
            return false;
        }

        out.extend_from_slice(b"<a href=\"");
        if email {
            out.extend_from_slice(b"mailto:");
        }
        escape_href(out, link);
        out.push(b'"');
        self.link_attributes(out);
        out.push(b'>');
        escape(out, link.strip_prefix(b"mailto:").unwrap_or(link));
        out.extend_from_slice(b"</a>");
        true
    }

    pub fn link(
        &self,
        out: &mut Vec<u8>,
        link: &[u8],
        title: Option<&[u8]>,
        content: &[u8],
    ) -> bool {
        if !self.accepts_target(link, false) {
            return false;
        }
        if self.flavor == Flavor::Toc {
            out.extend_from_slice(content);
            return true;
        }

        out.extend_from_slice(b"<a href=\"");
        escape_href(out, link);
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            out.extend_from_slice(b"\" title=\"");
            escape(out, title);
        }
        out.push(b'"');
        self.link_attributes(out);
        out.push(b'>');
        out.extend_from_slice(content);
        out.extend_from_slice(b"</a>");
        true
    }

    /// Whether `link` (or `image`, for images) would take this target.
    pub fn accepts_target(&self, target: &[u8], image: bool) -> bool {
        if image {
            !target.is_empty() && is_safe(target)
        } else {
            self.flavor == Flavor::Toc || is_safe(target)
        }
    }

    pub fn image(&self, out: &mut Vec<u8>, link: &[u8], title: Option<&[u8]>, alt: &[u8]) -> bool {
        if !self.accepts_target(link, true) {
            return false;
        }

        out.extend_from_slice(b"<img src=\"");
        escape_href(out, link);
        out.extend_from_slice(b"\" alt=\"");
        escape(out, alt);
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            out.extend_from_slice(b"\" title=\"");
            escape(out, title);
        }
        out.extend_from_slice(b"\"/>");
        true
    }

    pub fn codespan(&self, out: &mut Vec<u8>, text: &[u8]) {
        out.extend_from_slice(b"<code>");
        escape(out, text);
        out.extend_from_slice(b"</code>");
    }

    /// Wrap already-rendered `content` in `span`'s tags. Nothing is written
    /// for empty content.
    pub fn span(&self, out: &mut Vec<u8>, span: Span, content: &[u8]) -> bool {
        if content.is_empty() {
            return false;
        }
        let (open, close) = span.tags();
        out.extend_from_slice(open);
        out.extend_from_slice(content);
        out.extend_from_slice(close);
        true
    }

    pub fn linebreak(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"<br/>\n");
    }

    /// A raw tag found in running text. Whitelisted tags pass through the
    /// attribute sanitizer in Wiki mode; everything else is shown escaped.
    pub fn raw_html(&self, out: &mut Vec<u8>, tag: &[u8]) -> bool {
        if self.flavor == Flavor::Toc {
            return false;
        }

        if self.options.mode.element_whitelist() && wiki::write_whitelisted_tag(out, tag) {
            return true;
        }

        escape(out, tag);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with<F: FnOnce(&Renderer, &mut Vec<u8>) -> bool>(options: &Options, f: F) -> Option<String> {
        let renderer = Renderer::new(options, Flavor::Body);
        let mut out = vec![];
        f(&renderer, &mut out).then(|| String::from_utf8(out).unwrap())
    }

    #[test]
    fn unsafe_links_are_refused() {
        let options = Options::default();
        assert_eq!(with(&options, |r, o| r.link(o, b"javascript:alert(1)", None, b"x")), None);
        assert_eq!(with(&options, |r, o| r.autolink(o, b"data:text/html", false)), None);
        assert_eq!(
            with(&options, |r, o| r.autolink(o, b"me@x.com", true)),
            Some("<a href=\"mailto:me@x.com\">me@x.com</a>".into())
        );
    }

    #[test]
    fn attributes_follow_the_href() {
        let mut options = Options::default();
        options.render.nofollow = true;
        options.render.target = Some("\"_blank".into());
        assert_eq!(
            with(&options, |r, o| r.link(o, b"/r/a", Some(b"t<"), b"a")),
            Some(
                "<a href=\"/r/a\" title=\"t&lt;\" rel=\"nofollow\" target=\"&quot;_blank\">a</a>"
                    .into()
            )
        );
    }

    #[test]
    fn empty_spans_write_nothing() {
        let options = Options::default();
        assert_eq!(with(&options, |r, o| r.span(o, Span::Strong, b"")), None);
        assert_eq!(
            with(&options, |r, o| r.span(o, Span::Spoiler, b"s")),
            Some("<span class=\"md-spoiler-text\">s</span>".into())
        );
    }

    #[test]
    fn targets_are_checked_before_rendering() {
        let options = Options::default();
        let body = Renderer::new(&options, Flavor::Body);
        assert!(body.accepts_target(b"/r/a", false));
        assert!(!body.accepts_target(b"javascript:x", false));
        assert!(!body.accepts_target(b"", true));

        let toc = Renderer::new(&options, Flavor::Toc);
        assert!(toc.accepts_target(b"javascript:x", false));
    }

    #[test]
    fn toc_links_keep_only_their_text() {
        let options = Options::default();
        let renderer = Renderer::new(&options, Flavor::Toc);
        let mut out = vec![];
        assert!(renderer.link(&mut out, b"javascript:x", None, b"text"));
        assert!(!renderer.raw_html(&mut out, b"<b>"));
        assert_eq!(out, b"text");
    }
}
