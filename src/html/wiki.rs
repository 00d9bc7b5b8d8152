//! The raw-tag allow-list used in Wiki mode.
//!
//! A tag whose name is on [`ELEMENT_WHITELIST`] is re-emitted from scratch:
//! the name, then only those attributes on [`ATTRIBUTE_WHITELIST`] that
//! carry a quoted, non-empty value, each value escaped and re-quoted with
//! `"`. Anything the attribute scanner cannot make sense of is dropped
//! rather than passed through.

use crate::ctype::isspace;
use crate::html::escape;

/// Tags that survive in Wiki mode.
pub const ELEMENT_WHITELIST: [&str; 8] = [
    "tr", "th", "td", "table", "tbody", "thead", "tfoot", "caption",
];

/// Attributes that survive on a whitelisted tag. Matched ignoring ASCII
/// case.
pub const ATTRIBUTE_WHITELIST: [&str; 5] =
    ["colspan", "rowspan", "cellspacing", "cellpadding", "scope"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
}

/// Whether the raw tag `tag` (from `<` to `>` inclusive) is a `tagname`
/// tag, and which kind. The name must match exactly, case included, and
/// be followed by whitespace or `>`.
pub fn is_tag(tag: &[u8], tagname: &str) -> Option<TagKind> {
    if tag.len() < 3 || tag[0] != b'<' {
        return None;
    }

    let (kind, start) = if tag[1] == b'/' {
        (TagKind::Close, 2)
    } else {
        (TagKind::Open, 1)
    };

    let rest = &tag[start..];
    let name = tagname.as_bytes();
    if rest.len() <= name.len() || !rest.starts_with(name) {
        return None;
    }

    let next = rest[name.len()];
    (isspace(next) || next == b'>').then_some(kind)
}

/// Write the sanitized form of `tag` if it is whitelisted; returns false
/// (writing nothing) otherwise.
pub fn write_whitelisted_tag(out: &mut Vec<u8>, tag: &[u8]) -> bool {
    for name in ELEMENT_WHITELIST {
        match is_tag(tag, name) {
            Some(TagKind::Close) => {
                out.extend_from_slice(b"</");
                out.extend_from_slice(name.as_bytes());
                out.push(b'>');
                return true;
            }
            Some(TagKind::Open) => {
                write_open_tag(out, tag, name);
                return true;
            }
            None => (),
        }
    }
    false
}

fn is_allowed_attribute(attr: &[u8]) -> bool {
    ATTRIBUTE_WHITELIST
        .iter()
        .any(|allowed| allowed.as_bytes().eq_ignore_ascii_case(attr))
}

/// Scan `name="value"` pairs. Only quoted values are kept; unquoted
/// characters after `=` are skipped, and a stray quote, space or second
/// `=` outside a value starts the next attribute afresh.
fn write_open_tag(out: &mut Vec<u8>, tag: &[u8], name: &str) {
    out.push(b'<');
    out.extend_from_slice(name.as_bytes());

    let mut attr = Vec::with_capacity(16);
    let mut value = Vec::with_capacity(16);
    let mut in_str: Option<u8> = None;
    let mut seen_equals = false;

    for &c in &tag[1 + name.len()..] {
        let mut reset = false;

        match c {
            b'>' => break,
            b'\'' | b'"' => {
                if !seen_equals {
                    reset = true;
                } else {
                    match in_str {
                        None => in_str = Some(c),
                        Some(q) if q == c => {
                            if !attr.is_empty() && !value.is_empty() && is_allowed_attribute(&attr) {
                                out.push(b' ');
                                escape(out, &attr);
                                out.extend_from_slice(b"=\"");
                                escape(out, &value);
                                out.push(b'"');
                            }
                            reset = true;
                        }
                        Some(_) => value.push(c),
                    }
                }
            }
            b' ' => {
                if in_str.is_some() {
                    value.push(b' ');
                } else {
                    reset = true;
                }
            }
            b'=' => {
                if seen_equals {
                    reset = true;
                } else {
                    seen_equals = true;
                }
            }
            _ => {
                if !seen_equals {
                    attr.push(c);
                } else if in_str.is_some() {
                    value.push(c);
                }
            }
        }

        if reset {
            seen_equals = false;
            in_str = None;
            attr.clear();
            value.clear();
        }
    }

    out.push(b'>');
}
