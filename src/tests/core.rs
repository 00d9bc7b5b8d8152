use super::*;

#[test]
fn basic() {
    html(
        concat!(
            "My **document**.\n",
            "\n",
            "It's mine.\n",
            "\n",
            "> Yes.\n",
            "\n",
            "## Hi!\n",
            "\n",
            "Okay.\n"
        ),
        concat!(
            "<p>My <strong>document</strong>.</p>\n",
            "\n",
            "<p>It&#39;s mine.</p>\n",
            "\n",
            "<blockquote>\n",
            "<p>Yes.</p>\n",
            "</blockquote>\n",
            "\n",
            "<h2>Hi!</h2>\n",
            "\n",
            "<p>Okay.</p>\n"
        ),
    );
}

#[test]
fn empty_document() {
    html("", "");
    html("\n\n   \n", "");
}

#[test]
fn thematic_breaks() {
    html(
        concat!("---\n", "\n", "- - -\n", "\n", "\n", "_        _   _\n"),
        concat!("<hr/>\n", "\n", "<hr/>\n", "\n", "<hr/>\n"),
    );
}

#[test]
fn atx_headings() {
    html("# One", "<h1>One</h1>\n");
    html("### Three ###", "<h3>Three</h3>\n");
    html("######Six", "<h6>Six</h6>\n");
    html("#", "");
}

#[test]
fn atx_heading_levels_cap_at_six() {
    html(
        "#####################################################hi",
        "<h6>###############################################hi</h6>\n",
    );
}

#[test]
fn setext_heading() {
    html(
        concat!("Hi\n", "==\n", "\n", "Ok\n", "-----\n"),
        concat!("<h1>Hi</h1>\n", "\n", "<h2>Ok</h2>\n"),
    );
}

#[test]
fn setext_heading_takes_last_line() {
    html(
        concat!("para\n", "Title\n", "===\n"),
        concat!("<p>para</p>\n", "\n", "<h1>Title</h1>\n"),
    );
}

#[test]
fn paragraphs_keep_line_breaks() {
    html("one\ntwo", "<p>one\ntwo</p>\n");
}

#[test]
fn hard_line_break() {
    html("one  \ntwo", "<p>one<br/>\ntwo</p>\n");
    html("one \ntwo", "<p>one \ntwo</p>\n");
}

#[test]
fn emphasis() {
    html("*em* _em_", "<p><em>em</em> <em>em</em></p>\n");
    html("**strong** __strong__", "<p><strong>strong</strong> <strong>strong</strong></p>\n");
    html("***both***", "<p><strong><em>both</em></strong></p>\n");
    html("words*with*asterisks", "<p>words<em>with</em>asterisks</p>\n");
    html("words_with_underscores", "<p>words_with_underscores</p>\n");
}

#[test]
fn emphasis_needs_content() {
    html("a * b * c", "<p>a * b * c</p>\n");
    html("a ** b", "<p>a ** b</p>\n");
}

#[test]
fn strikethrough() {
    html("~~normal strikethrough~~", "<p><del>normal strikethrough</del></p>\n");
    html("~test", "<p>~test</p>\n");
    html("~single~", "<p>~single~</p>\n");
}

#[test]
fn superscript() {
    html("Normal^superscript", "<p>Normal<sup>superscript</sup></p>\n");
    html("e^(i pi) + 1", "<p>e<sup>i pi</sup> + 1</p>\n");
    html("a^() b", "<p>a b</p>\n");
    html("a ^ b", "<p>a ^ b</p>\n");
}

#[test]
fn code_spans() {
    html("`a <b>`", "<p><code>a &lt;b&gt;</code></p>\n");
    html("`` a ` b ``", "<p><code>a ` b</code></p>\n");
    html("`unclosed", "<p>`unclosed</p>\n");
}

#[test]
fn raw_html_is_escaped() {
    html("<test>", "<p>&lt;test&gt;</p>\n");
    html(
        "<script>alert(1)</script>",
        "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>\n",
    );
}

#[test]
fn control_bytes_are_dropped() {
    html("anywhere\x03, you", "<p>anywhere, you</p>\n");
    html("a\0b", "<p>ab</p>\n");
}

#[test]
fn line_endings_normalize() {
    html("a\r\nb\rc", "<p>a\nb\nc</p>\n");
    html("\u{feff}bom", "<p>bom</p>\n");
}

#[test]
fn tabs_expand() {
    html("\tcode", "<pre><code>code\n</code></pre>\n");
}

#[test]
fn inline_links() {
    html(
        "[foo](http://en.wikipedia.org/wiki/Link_(film\\))",
        "<p><a href=\"http://en.wikipedia.org/wiki/Link_(film)\">foo</a></p>\n",
    );
    html(
        "[_regular_ link with nesting](/test)",
        "<p><a href=\"/test\"><em>regular</em> link with nesting</a></p>\n",
    );
    html(
        "[title](/a \"The title\")",
        "<p><a href=\"/a\" title=\"The title\">title</a></p>\n",
    );
    html("[Empty Link]()", "<p>[Empty Link]()</p>\n");
    html(
        "[foo](http://bar\nbar)",
        "<p><a href=\"http://bar%0Abar\">foo</a></p>\n",
    );
}

#[test]
fn link_schemes() {
    html("[Test](//test)", "<p><a href=\"//test\">Test</a></p>\n");
    html("[Test](//#test)", "<p><a href=\"//#test\">Test</a></p>\n");
    html("[Test](#test)", "<p><a href=\"#test\">Test</a></p>\n");
    html(
        "[Test](git://github.com)",
        "<p><a href=\"git://github.com\">Test</a></p>\n",
    );
    html("[Speculation](//?)", "<p><a href=\"//?\">Speculation</a></p>\n");
    html("[Test](///#test)", "<p><a href=\"///#test\">Test</a></p>\n");
}

#[test]
fn unsafe_links_stay_text() {
    html(
        "[click](javascript:alert(1))",
        "<p>[click](javascript:alert(1))</p>\n",
    );
    html("[rel](relative/path)", "<p>[rel](relative/path)</p>\n");
}

#[test]
fn reference_links() {
    html(
        concat!("[a][x] and [x]\n", "\n", "[X]: /r/x \"T\"\n"),
        "<p><a href=\"/r/x\" title=\"T\">a</a> and <a href=\"/r/x\" title=\"T\">x</a></p>\n",
    );
    html("[missing][nope]", "<p>[missing][nope]</p>\n");
}

#[test]
fn images_only_in_wiki() {
    html("![alt](/a.png)", "<p>![alt](/a.png)</p>\n");
    html_mode(
        RenderMode::Wiki,
        "![alt *text*](/a.png \"t\")",
        "<p><img src=\"/a.png\" alt=\"alt *text*\" title=\"t\"/></p>\n",
    );
    html_mode(
        RenderMode::Wiki,
        "![x](javascript:alert(1))",
        "<p>![x](javascript:alert(1))</p>\n",
    );
}

#[test]
fn indented_code() {
    html(
        concat!("    fn main() {\n", "\n", "        <x>\n", "    }\n"),
        concat!("<pre><code>fn main() {\n", "\n", "    &lt;x&gt;\n", "}\n", "</code></pre>\n"),
    );
}
