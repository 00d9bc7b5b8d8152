//! Configuration for the parser and renderer. The render mode affects both.

#[cfg(feature = "bon")]
use bon::Builder;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Umbrella options struct.
pub struct Options {
    /// Selects the extension set and the raw-HTML policy.
    #[cfg_attr(feature = "bon", builder(default))]
    pub mode: RenderMode,

    /// Configure render-time options.
    #[cfg_attr(feature = "bon", builder(default))]
    pub render: Render,
}

impl Options {
    /// Options for `mode` with every render option left at its default.
    pub fn with_mode(mode: RenderMode) -> Self {
        Options {
            mode,
            ..Default::default()
        }
    }
}

/// Which flavor of document is being rendered.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Comments and posts: every extension on, all raw HTML escaped, no
    /// images.
    ///
    /// ```rust
    /// # use snoomark::{markdown, RenderMode};
    /// assert_eq!(markdown("see /r/rust <b>now</b>", RenderMode::UserText),
    ///            "<p>see <a href=\"/r/rust\">/r/rust</a> &lt;b&gt;now&lt;/b&gt;</p>\n");
    /// ```
    #[default]
    UserText,

    /// Wiki pages: like `UserText`, but images render and a small set of
    /// table tags and attributes pass through.
    ///
    /// ```rust
    /// # use snoomark::{markdown, RenderMode};
    /// assert_eq!(markdown("<td colspan=\"2\" onclick=\"x()\">", RenderMode::Wiki),
    ///            "<p><td colspan=\"2\"></p>\n");
    /// ```
    Wiki,

    /// Like `UserText`, but bare URLs, emails and mentions in running text
    /// are left alone.
    ///
    /// ```rust
    /// # use snoomark::{markdown, RenderMode};
    /// assert_eq!(markdown("see /r/rust", RenderMode::UserTextWithoutLinks),
    ///            "<p>see /r/rust</p>\n");
    /// ```
    UserTextWithoutLinks,
}

impl RenderMode {
    /// Bare URLs, `www.` hosts, emails and `/r/`, `/u/` mentions link.
    pub fn autolink(self) -> bool {
        !matches!(self, RenderMode::UserTextWithoutLinks)
    }

    /// `![alt](src)` renders an `<img>`.
    pub fn images(self) -> bool {
        matches!(self, RenderMode::Wiki)
    }

    /// Whitelisted table tags pass through the attribute sanitizer instead
    /// of being escaped.
    pub fn element_whitelist(self) -> bool {
        matches!(self, RenderMode::Wiki)
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Options for formatter functions.
pub struct Render {
    /// Add `rel="nofollow"` to every link.
    ///
    /// ```rust
    /// # use snoomark::{markdown_to_html, Options};
    /// let mut options = Options::default();
    /// options.render.nofollow = true;
    /// assert_eq!(markdown_to_html("[a](http://example.com)", &options),
    ///            "<p><a href=\"http://example.com\" rel=\"nofollow\">a</a></p>\n");
    /// ```
    #[cfg_attr(feature = "bon", builder(default))]
    pub nofollow: bool,

    /// Add a `target` attribute to every link.
    ///
    /// ```rust
    /// # use snoomark::{markdown_to_html, Options};
    /// let mut options = Options::default();
    /// options.render.target = Some("_top".into());
    /// assert_eq!(markdown_to_html("/u/me", &options),
    ///            "<p><a href=\"/u/me\" target=\"_top\">/u/me</a></p>\n");
    /// ```
    pub target: Option<String>,

    /// Emit a table of contents ahead of the document and give every header
    /// an `id`.
    ///
    /// ```rust
    /// # use snoomark::{markdown_to_html, Options};
    /// let mut options = Options::default();
    /// options.render.toc = true;
    /// assert_eq!(markdown_to_html("# Hi\n", &options),
    ///            concat!("<div class=\"toc\">\n<ul>\n<li>\n",
    ///                    "<a href=\"#toc_0\">Hi</a>\n",
    ///                    "</li>\n</ul>\n</div>\n",
    ///                    "\n<h1 id=\"toc_0\">Hi</h1>\n"));
    /// ```
    #[cfg_attr(feature = "bon", builder(default))]
    pub toc: bool,

    /// Prefix for the `id`s generated when `toc` is on.
    ///
    /// ```rust
    /// # use snoomark::{markdown_to_html, Options};
    /// let mut options = Options::default();
    /// options.render.toc = true;
    /// options.render.toc_id_prefix = Some("t1_".into());
    /// assert!(markdown_to_html("## Hi\n", &options).ends_with("<h2 id=\"t1_toc_0\">Hi</h2>\n"));
    /// ```
    pub toc_id_prefix: Option<String>,
}
