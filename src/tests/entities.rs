use super::*;

#[test]
fn named() {
    html("&thetasym;", "<p>&thetasym;</p>\n");
    html("&frac12;", "<p>&frac12;</p>\n");
    html("aaa&frac12;aaa", "<p>aaa&frac12;aaa</p>\n");
    html("&foobar;", "<p>&amp;foobar;</p>\n");
    html("&nbsp", "<p>&amp;nbsp</p>\n");
}

#[test]
fn numeric() {
    html("&#99;", "<p>&#99;</p>\n");
    html("&#x7E;", "<p>&#x7E;</p>\n");
    html("&#X7E;", "<p>&#x7E;</p>\n");
    html("&#foobar;", "<p>&amp;#foobar;</p>\n");
    html("&#xfoobar;", "<p>&amp;#xfoobar;</p>\n");
    html("&#9999999999;", "<p>&amp;#9999999999;</p>\n");
}

#[test]
fn bare_ampersands() {
    html("&", "<p>&amp;</p>\n");
    html("&;", "<p>&amp;;</p>\n");
    html("&#;", "<p>&amp;#;</p>\n");
    html("&#x;", "<p>&amp;#x;</p>\n");
    html("fish & chips", "<p>fish &amp; chips</p>\n");
}

fn is_illegal(c: u32) -> bool {
    matches!(c, 0..=8 | 11..=12 | 14..=31 | 55296..=57343 | 65534..=65535)
}

#[test]
fn every_numeric_reference() {
    let mut input = String::new();
    let mut expected = String::from("<p>");

    for c in 0..65550u32 {
        let reference = format!("&#{};&#x{:x};", c, c);
        input.push_str(&reference);
        if is_illegal(c) {
            expected.push_str(&reference.replace('&', "&amp;"));
        } else {
            expected.push_str(&reference);
        }
    }
    expected.push_str("</p>\n");

    assert_eq!(markdown(&input, RenderMode::UserText), expected);
}
