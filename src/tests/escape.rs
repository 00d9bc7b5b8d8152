use super::*;
use crate::{escape, escape_href};

#[test]
fn escaped_markup() {
    html("Escape\\^superscript", "<p>Escape^superscript</p>\n");
    html(
        "\\~~escaped strikethrough~~",
        "<p>~~escaped strikethrough~~</p>\n",
    );
    html("\\*not em\\*", "<p>*not em*</p>\n");
    html(
        "\\[not a link\\](/r/rust)",
        "<p>[not a link](<a href=\"/r/rust\">/r/rust</a>)</p>\n",
    );
}

#[test]
fn escaped_closer_does_not_close() {
    html("*a\\*b*", "<p><em>a*b</em></p>\n");
}

#[test]
fn unescapable_bytes_keep_backslash() {
    html("a\\b", "<p>a\\b</p>\n");
    html("blah \\", "<p>blah \\</p>\n");
}

#[test]
fn text_and_attributes_are_escaped() {
    html("a < b & \"c\"", "<p>a &lt; b &amp; &quot;c&quot;</p>\n");
    html(
        "[x](/a \"t'<\")",
        "<p><a href=\"/a\" title=\"t&#39;&lt;\">x</a></p>\n",
    );
    html("[x](/a'b)", "<p><a href=\"/a&#x27;b\">x</a></p>\n");
}

#[test]
fn escape_helpers() {
    let mut out = vec![];
    escape(&mut out, b"<a href='x'>&</a>");
    assert_eq!(out, b"&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");

    let mut out = vec![];
    escape_href(&mut out, "/r/a b/\u{fc}".as_bytes());
    assert_eq!(out, b"/r/a%20b/%C3%BC");
}
