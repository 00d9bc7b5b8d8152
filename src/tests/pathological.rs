use super::*;
use ntest::timeout;

#[test]
#[timeout(4000)]
fn pathological_quotes() {
    let n = 50_000;
    let input = format!("{}a", ">".repeat(n));
    let exp = format!(
        "{}<p>{}a</p>\n{}",
        "<blockquote>\n".repeat(16),
        "&gt;".repeat(n - 16),
        "</blockquote>\n".repeat(16)
    );

    html(&input, &exp);
}

#[test]
#[timeout(4000)]
fn pathological_superscripts() {
    let n = 50_000;
    let input = format!("{}a", "^".repeat(n));
    let exp = format!(
        "<p>{}{}a{}</p>\n",
        "<sup>".repeat(16),
        "^".repeat(n - 16),
        "</sup>".repeat(16)
    );

    html(&input, &exp);
}

// input: python3 -c 'n = 100000; print("|" + "x|" * n + "\n|" + "-|" * n)'
#[test]
#[timeout(4000)]
fn pathological_table_columns() {
    let n = 100_000;
    let input = format!("{}{}{}{}", "|", "x|".repeat(n), "\n|", "-|".repeat(n));
    let exp = format!("<p>{}</p>\n", input);

    html(&input, &exp);
}

#[test]
#[timeout(4000)]
fn pathological_ampersands() {
    let n = 100_000;
    let input = "&#".repeat(n);
    let exp = format!("<p>{}</p>\n", "&amp;#".repeat(n));

    html(&input, &exp);
}

#[test]
#[timeout(4000)]
fn pathological_mention_paths() {
    let n = 50_000;
    let input = "r/rr/".repeat(n);
    let exp = format!("<p><a href=\"/{}\">{}</a></p>\n", input, input);

    html(&input, &exp);
}

#[test]
#[timeout(4000)]
fn pathological_unclosed_emphasis() {
    let n = 50_000;
    let input = format!("{}x", "_a ".repeat(n));
    let exp = format!("<p>{}</p>\n", input);

    html(&input, &exp);
}

#[test]
#[timeout(4000)]
fn pathological_open_brackets() {
    let n = 50_000;
    let input = "[".repeat(n);
    let exp = format!("<p>{}</p>\n", input);

    html(&input, &exp);
}

#[test]
#[timeout(4000)]
fn pathological_unclosed_link_targets() {
    let n = 50_000;
    let input = "[a](".repeat(n);
    let exp = format!("<p>{}</p>\n", input);

    html(&input, &exp);
}

#[test]
#[timeout(4000)]
fn pathological_unsafe_nested_links() {
    let n = 20_000;
    let input = format!("{}a{}", "[".repeat(n), "](javascript:x)".repeat(n));
    let exp = format!("<p>{}</p>\n", input);

    html(&input, &exp);
}

#[test]
#[timeout(4000)]
fn pathological_spoilers() {
    let n = 50_000;
    let input = format!("a {}", ">!".repeat(n));
    let exp = format!("<p>a {}</p>\n", "&gt;!".repeat(n));

    html(&input, &exp);
}

#[test]
#[timeout(4000)]
fn pathological_superscript_parens() {
    let n = 50_000;
    let input = "^(".repeat(n);
    let exp = format!("<p>{}</p>\n", input);

    html(&input, &exp);
}

#[test]
#[timeout(4000)]
fn pathological_open_tags() {
    let n = 50_000;
    let exp = format!("<p>{}</p>\n", "&lt;a".repeat(n));
    html(&"<a".repeat(n), &exp);

    let exp = format!("<p>{}</p>\n", "&lt;ab:".repeat(n));
    html(&"<ab:".repeat(n), &exp);
}

#[test]
#[timeout(4000)]
fn pathological_at_signs() {
    let n = 50_000;
    let input = "a@".repeat(n);
    let exp = format!("<p>{}</p>\n", input);

    html(&input, &exp);
}

#[test]
#[timeout(4000)]
fn pathological_unclosed_backtick_run() {
    let n = 50_000;
    let input = format!("{}{}", "`".repeat(n), "a".repeat(n));
    let exp = format!("<p>{}</p>\n", input);

    html(&input, &exp);
}
