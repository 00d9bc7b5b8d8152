//! Detection of bare URLs, `www.` hosts, email addresses and `/r/`, `/u/`
//! mentions inside a run of inline text.
//!
//! Every matcher is handed the whole span being scanned plus the position
//! of its trigger byte, and may look left of it: `max_rewind` bytes of
//! plain text that can be pulled back into the link, and everything up to
//! the start of the span for boundary checks.

use crate::ctype::{isalnum, isalpha, isspace, ispunct};

/// A link found by one of the matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutolinkMatch {
    /// Bytes before the trigger position that belong to the link.
    pub rewind: usize,
    /// Bytes from the trigger position onwards that belong to the link.
    pub len: usize,
}

impl AutolinkMatch {
    /// The full link text within `contents`.
    pub fn text<'c>(&self, contents: &'c [u8], i: usize) -> &'c [u8] {
        &contents[i - self.rewind..i + self.len]
    }
}

/// A `/r/` or `/u/` mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionMatch {
    pub link: AutolinkMatch,
    /// Written as `r/x` rather than `/r/x`; the href needs a leading `/`.
    pub no_slash: bool,
}

const SAFE_SCHEMES: [&[u8]; 14] = [
    b"http://",
    b"https://",
    b"ftp://",
    b"mailto://",
    b"/",
    b"git://",
    b"steam://",
    b"irc://",
    b"news://",
    b"mumble://",
    b"ssh://",
    b"ircs://",
    b"ts3server://",
    b"#",
];

/// Whether `link` starts with a scheme we are willing to emit in an href.
pub fn is_safe(link: &[u8]) -> bool {
    SAFE_SCHEMES.iter().any(|scheme| {
        let len = scheme.len();
        link.len() > len
            && link[..len].eq_ignore_ascii_case(scheme)
            && (isalnum(link[len]) || matches!(link[len], b'#' | b'/' | b'?'))
    })
}

fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len() && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Trim sentence punctuation and unbalanced closing brackets or quotes off
/// the end of `data[..link_end]`. Returns the new length, possibly 0.
fn autolink_delim(data: &[u8], mut link_end: usize) -> usize {
    if let Some(lt) = data[..link_end].iter().position(|&c| c == b'<') {
        link_end = lt;
    }

    while link_end > 0 {
        let c = data[link_end - 1];
        if c == 0 {
            break;
        }

        if matches!(c, b'?' | b'!' | b'.' | b',') {
            link_end -= 1;
        } else if c == b';' {
            if link_end < 2 {
                link_end -= 1;
                continue;
            }
            let mut new_end = link_end - 2;
            while new_end > 0 && isalpha(data[new_end]) {
                new_end -= 1;
            }
            if new_end < link_end - 2 && data[new_end] == b'&' {
                link_end = new_end;
            } else {
                link_end -= 1;
            }
        } else {
            break;
        }
    }

    if link_end == 0 {
        return 0;
    }

    let cclose = data[link_end - 1];
    let copen = match cclose {
        b'"' => b'"',
        b'\'' => b'\'',
        b')' => b'(',
        b']' => b'[',
        b'}' => b'{',
        _ => return link_end,
    };

    let mut opening = 0;
    let mut closing = 0;
    for &c in &data[..link_end] {
        if c == copen {
            opening += 1;
        } else if c == cclose {
            closing += 1;
        }
    }

    if closing != opening {
        link_end -= 1;
    }

    link_end
}

/// Length of the domain at the start of `data`, or 0 if there is none.
/// Short (dotless) domains only count when `allow_short`.
fn check_domain(data: &[u8], allow_short: bool) -> usize {
    if data.is_empty() || !isalnum(data[0]) {
        return 0;
    }

    let mut np = 0;
    let mut i = 1;
    while i + 1 < data.len() {
        if data[i] == b'.' {
            np += 1;
        } else if !isalnum(data[i]) && data[i] != b'-' {
            break;
        }
        i += 1;
    }

    if allow_short || np > 0 {
        i
    } else {
        0
    }
}

/// `www.` autolinks, triggered on the first `w`.
pub fn www_match(contents: &[u8], i: usize, max_rewind: usize) -> Option<AutolinkMatch> {
    let data = &contents[i..];

    if max_rewind > 0 {
        let prev = contents[i - 1];
        if !ispunct(prev) && !isspace(prev) {
            return None;
        }
    }

    if !data.starts_with(b"www.") {
        return None;
    }

    let mut link_end = check_domain(data, false);
    if link_end == 0 {
        return None;
    }

    while link_end < data.len() && !isspace(data[link_end]) {
        link_end += 1;
    }

    match autolink_delim(data, link_end) {
        0 => None,
        len => Some(AutolinkMatch { rewind: 0, len }),
    }
}

/// Email autolinks, triggered on the `@`.
pub fn email_match(contents: &[u8], i: usize, max_rewind: usize) -> Option<AutolinkMatch> {
    let data = &contents[i..];

    let mut rewind = 0;
    while rewind < max_rewind {
        let c = contents[i - rewind - 1];
        if c == 0 || !(isalnum(c) || matches!(c, b'.' | b'+' | b'-' | b'_')) {
            break;
        }
        rewind += 1;
    }

    if rewind == 0 {
        return None;
    }

    let mut nb = 0;
    let mut np = 0;
    let mut link_end = 0;
    while link_end < data.len() {
        let c = data[link_end];
        if isalnum(c) {
            // part of the address
        } else if c == b'@' {
            nb += 1;
            if nb > 1 {
                break;
            }
        } else if c == b'.' && link_end < data.len() - 1 {
            np += 1;
        } else if c != b'-' && c != b'_' {
            break;
        }
        link_end += 1;
    }

    if link_end < 2 || nb != 1 || np == 0 {
        return None;
    }

    match autolink_delim(data, link_end) {
        0 => None,
        len => Some(AutolinkMatch { rewind, len }),
    }
}

/// `scheme://` autolinks, triggered on the `:`.
pub fn url_match(contents: &[u8], i: usize, max_rewind: usize) -> Option<AutolinkMatch> {
    let data = &contents[i..];

    if data.len() < 4 || data[1] != b'/' || data[2] != b'/' {
        return None;
    }

    let mut rewind = 0;
    while rewind < max_rewind && isalpha(contents[i - rewind - 1]) {
        rewind += 1;
    }

    if !is_safe(&contents[i - rewind..]) {
        return None;
    }

    let domain_len = check_domain(&data[3..], false);
    if domain_len == 0 {
        return None;
    }

    let mut link_end = 3 + domain_len;
    while link_end < data.len() && !isspace(data[link_end]) {
        link_end += 1;
    }

    match autolink_delim(data, link_end) {
        0 => None,
        len => Some(AutolinkMatch { rewind, len }),
    }
}

/// How many bytes left of the `/` at `contents[i]` belong to an
/// `r/`- or `u/`-style prefix: 2 for `/r`, 1 for a bare `r` on a word
/// boundary, 0 if this is no mention.
fn mention_prefix(contents: &[u8], i: usize, max_rewind: usize, prefix: u8) -> usize {
    if contents.len() - i < 2 || max_rewind < 1 || contents[i - 1] != prefix {
        return 0;
    }

    if max_rewind > 1 {
        let boundary = contents[i - 2];
        if boundary == b'/' {
            return 2;
        }
        // Bytes of non-ASCII punctuation are neither; "a。r/x" stays text.
        if ispunct(boundary) || isspace(boundary) {
            return 1;
        }
        return 0;
    }

    // Something other than plain text sits left of the prefix. An escaped
    // slash there ("\/r/x") means the mention itself was escaped.
    if i > 2 && contents[i - 2] == b'/' && contents[i - 3] == b'\\' {
        return 0;
    }

    1
}

fn mention_path(data: &[u8], mut link_end: usize) -> usize {
    while link_end < data.len()
        && (isalnum(data[link_end]) || matches!(data[link_end], b'_' | b'/' | b'-'))
    {
        link_end += 1;
    }
    link_end
}

/// Subreddit mentions (`/r/name`, `r/name`), triggered on the `/` after
/// the `r`.
///
/// Names are 2 to 24 characters of `[A-Za-z0-9_]`, optionally prefixed
/// `t:`, or the literal `reddit.com`; several may be joined with `+` (or
/// `-` after a leading `all-`). One trailing `/path` is taken along.
pub fn subreddit_match(contents: &[u8], i: usize, max_rewind: usize) -> Option<MentionMatch> {
    let data = &contents[i..];
    let size = data.len();

    let rewind = mention_prefix(contents, i, max_rewind, b'r');
    if rewind == 0 {
        return None;
    }

    let mut link_end = 1;
    let is_allminus = starts_with_ignore_case(&data[link_end..], b"all-");

    loop {
        let start = link_end;
        let mut max_length = 24;

        if starts_with_ignore_case(&data[link_end..], b"reddit.com") {
            link_end += 10;
            // No "/r/reddit.commission".
            max_length = 10;
        } else {
            if size > link_end + 2 && starts_with_ignore_case(&data[link_end..], b"t:") {
                link_end += 2;
            }
            if link_end >= size || !isalnum(data[link_end]) {
                return None;
            }
            link_end += 1;
        }

        while link_end < size && (isalnum(data[link_end]) || data[link_end] == b'_') {
            link_end += 1;
        }

        let len = link_end - start;
        if !(2..=max_length).contains(&len) {
            return None;
        }

        if link_end < size && (data[link_end] == b'+' || (is_allminus && data[link_end] == b'-')) {
            link_end += 1;
        } else {
            break;
        }
    }

    if link_end < size && data[link_end] == b'/' {
        link_end = mention_path(data, link_end);
    }

    Some(MentionMatch {
        link: AutolinkMatch {
            rewind,
            len: link_end,
        },
        no_slash: rewind == 1,
    })
}

/// User mentions (`/u/name`, `u/name`), triggered on the `/` after the
/// `u`. The name and anything path-like after it are taken whole.
pub fn username_match(contents: &[u8], i: usize, max_rewind: usize) -> Option<MentionMatch> {
    let data = &contents[i..];

    if data.len() < 3 {
        return None;
    }

    let rewind = mention_prefix(contents, i, max_rewind, b'u');
    if rewind == 0 {
        return None;
    }

    if !isalnum(data[1]) && data[1] != b'_' && data[1] != b'-' {
        return None;
    }

    Some(MentionMatch {
        link: AutolinkMatch {
            rewind,
            len: mention_path(data, 2),
        },
        no_slash: rewind == 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn www(s: &str) -> Option<&str> {
        let m = www_match(s.as_bytes(), 0, 0)?;
        Some(&s[..m.len])
    }

    #[test]
    fn safe_schemes() {
        assert!(is_safe(b"http://x"));
        assert!(is_safe(b"HTTPS://x"));
        assert!(is_safe(b"/r/x"));
        assert!(is_safe(b"//x"));
        assert!(is_safe(b"#x"));
        assert!(!is_safe(b"/"));
        assert!(!is_safe(b"/ x"));
        assert!(!is_safe(b"javascript:alert(1)"));
        assert!(!is_safe(b"mailto:a@b.c"));
        assert!(!is_safe(b"relative/path"));
    }

    #[test]
    fn delimiters() {
        assert_eq!(www("www.example.com."), Some("www.example.com"));
        assert_eq!(www("www.example.com?!"), Some("www.example.com"));
        assert_eq!(www("www.example.com/a&amp;"), Some("www.example.com/a"));
        assert_eq!(www("www.example.com/(x)"), Some("www.example.com/(x)"));
        assert_eq!(www("www.example.com/x)"), Some("www.example.com/x"));
        assert_eq!(www("www.example.com<b>"), Some("www.example.com"));
        assert_eq!(www("www.example"), Some("www.example"));
        assert_eq!(www("www."), None);
        assert_eq!(www("wwwexample.com"), None);
    }

    #[test]
    fn www_needs_boundary() {
        assert!(www_match(b"awww.example.com", 1, 1).is_none());
        assert!(www_match(b"(www.example.com", 1, 1).is_some());
    }

    #[test]
    fn emails() {
        let s = b"mail foo.bar@example.com now";
        let m = email_match(s, 12, 12).unwrap();
        assert_eq!(m.text(s, 12), b"foo.bar@example.com");
        assert!(email_match(b"foo@example", 3, 3).is_none());
        assert!(email_match(b"@example.com", 0, 0).is_none());
        assert!(email_match(b"a@b@c.com", 1, 1).is_none());
    }

    #[test]
    fn urls_rewind_over_scheme() {
        let s = b".http://reddit.com";
        let m = url_match(s, 5, 5).unwrap();
        assert_eq!(m.rewind, 4);
        assert_eq!(m.text(s, 5), b"http://reddit.com");
        assert!(url_match(b"http://localhost", 4, 4).is_none());
        assert!(url_match(b"foo://bar.com", 3, 3).is_none());
        assert!(url_match(b"://bar.com", 0, 0).is_none());
    }

    #[test]
    fn subreddits() {
        let s = b"/r/test";
        let m = subreddit_match(s, 2, 2).unwrap();
        assert_eq!(m.link.text(s, 2), b"/r/test");
        assert!(!m.no_slash);

        let s = b"r/test";
        let m = subreddit_match(s, 1, 1).unwrap();
        assert!(m.no_slash);

        assert!(subreddit_match(b"/r/a", 2, 2).is_none());
        assert!(subreddit_match(b"/r/_ab", 2, 2).is_none());
        assert!(subreddit_match(b"/r/reddit.commission", 2, 2).is_none());
        assert!(subreddit_match(b"xr/test", 2, 2).is_none());
        assert!(subreddit_match(b"/R/test", 2, 2).is_none());

        let long = b"/r/abcdefghijklmnopqrstuvwxy";
        assert!(subreddit_match(long, 2, 2).is_none());
    }

    #[test]
    fn usernames() {
        let s = b"/u/_x-y/z";
        let m = username_match(s, 2, 2).unwrap();
        assert_eq!(m.link.text(s, 2), b"/u/_x-y/z");
        assert!(username_match(b"/u/m", 2, 2).is_none());
        assert!(username_match(b"/u/.me", 2, 2).is_none());
    }
}
