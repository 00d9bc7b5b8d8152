use crate::{format_html, markdown, markdown_to_html, parse_document, Arena, Options, RenderMode};

mod core;
mod entities;
mod escape;
mod pathological;
mod regressions;

#[track_caller]
fn compare_strs(output: &str, expected: &str, kind: &str, original_input: &str) {
    if output != expected {
        println!("Running {} test", kind);
        println!("Got:");
        println!("==============================");
        println!("{}", output);
        println!("==============================");
        println!();
        println!("Expected:");
        println!("==============================");
        println!("{}", expected);
        println!("==============================");
        println!();
        println!("Input:");
        println!("==============================");
        println!("{:?}", original_input);
        println!("==============================");
        println!();
    }
    pretty_assertions::assert_eq!(output, expected);
}

/// Render `input` in UserText mode and compare against `expected`.
#[track_caller]
fn html(input: &str, expected: &str) {
    html_mode(RenderMode::UserText, input, expected);
}

#[track_caller]
fn html_mode(mode: RenderMode, input: &str, expected: &str) {
    html_opts_w(input, expected, &Options::with_mode(mode));
}

#[track_caller]
fn html_opts_i<F>(input: &str, expected: &str, opts: F)
where
    F: FnOnce(&mut Options),
{
    let mut options = Options::default();
    opts(&mut options);
    html_opts_w(input, expected, &options);
}

/// Both entry points must agree: the one-shot renderer, and parsing then
/// formatting a held tree.
#[track_caller]
fn html_opts_w(input: &str, expected: &str, options: &Options) {
    let output = markdown_to_html(input, options);
    compare_strs(&output, expected, "one-shot", input);

    let arena = Arena::new();
    let document = parse_document(&arena, input, options);
    let mut output = vec![];
    format_html(&document, options, &mut output).unwrap();
    compare_strs(
        &String::from_utf8(output).unwrap(),
        expected,
        "two-phase",
        input,
    );
}

macro_rules! html_opts {
    ([$($optclass:ident.$optname:ident),*], $lhs:expr, $rhs:expr $(,)?) => {
        $crate::tests::html_opts_i($lhs, $rhs, |opts| {
            $(opts.$optclass.$optname = true;)*
        });
    };
    ([$($optclass:ident.$optname:ident = $val:expr),*], $lhs:expr, $rhs:expr $(,)?) => {
        $crate::tests::html_opts_i($lhs, $rhs, |opts| {
            $(opts.$optclass.$optname = $val;)*
        });
    };
}

pub(crate) use html_opts;

#[test]
fn markdown_matches_default_options() {
    let input = "Some *text* with /r/links and http://example.com";
    assert_eq!(
        markdown(input, RenderMode::UserText),
        markdown_to_html(input, &Options::default())
    );
}
