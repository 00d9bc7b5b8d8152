use super::*;

#[test]
fn quote_nesting_stops_at_limit() {
    html(
        &format!("{}a", ">".repeat(20)),
        &format!(
            "{}<p>{}a</p>\n{}",
            "<blockquote>\n".repeat(16),
            "&gt;".repeat(4),
            "</blockquote>\n".repeat(16)
        ),
    );
}

#[test]
fn spoiler_inside_quote() {
    html(
        "> >! hidden",
        concat!(
            "<blockquote>\n",
            "<blockquote class=\"md-spoiler-text\">\n",
            "<p>hidden</p>\n",
            "</blockquote>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn closed_spoiler_line_does_not_break_paragraph() {
    html(
        "a\n>!b!< c",
        "<p>a\n<span class=\"md-spoiler-text\">b</span> c</p>\n",
    );
}

#[test]
fn open_spoiler_line_breaks_paragraph() {
    html(
        "a\n>! b",
        concat!(
            "<p>a</p>\n",
            "\n",
            "<blockquote class=\"md-spoiler-text\">\n",
            "<p>b</p>\n",
            "</blockquote>\n"
        ),
    );
}
