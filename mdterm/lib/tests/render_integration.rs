//! Integration tests for the Markdown terminal renderer.
//!
//! Fixtures are located in `tests/fixtures/`:
//! - `valid/` contains well-formed documents
//! - `invalid/` contains documents that trigger diagnostics

mod common;

use common::{load_fixture, plain_options};
use mdterm_lib::markdown::{Diagnostic, RenderOptions, for_terminal, render_stream, write_terminal};
use mdterm_lib::math::MathMode;
use mdterm_lib::testing::{strip_ansi_codes, strip_escape_codes};

#[test]
fn test_document_renders_plain() {
    let content = load_fixture("valid/document.md");
    let output = for_terminal(&content, &plain_options()).unwrap();
    insta::assert_snapshot!(output, @r"
    # Notes

    Energy is E = mc² and a key idea.

    > Quoted with code.

    1. first
    2. second

    symbol │ meaning
    ───────┼────────
      α    │   angle
      ∑    │   total

    ────────────────────────────────────────

    a
    ─
    b
    ");
}

#[test]
fn test_colored_output_has_same_visible_text() {
    let content = load_fixture("valid/document.md");
    let plain = for_terminal(&content, &plain_options()).unwrap();
    let colored = for_terminal(&content, &RenderOptions::default()).unwrap();

    assert_ne!(plain, colored);
    assert!(colored.ends_with('\n'));
    // Headings carry a marker only when colour is off.
    assert_eq!(strip_ansi_codes(&colored), plain.replacen("# Notes", "Notes", 1));
}

#[test]
fn test_osc8_links_hide_the_url() {
    let mut options = RenderOptions::default();
    options.osc8 = true;
    let output = for_terminal("see [the docs](https://example.com/docs)", &options).unwrap();

    assert!(output.contains("\x1b]8;;https://example.com/docs\x07"));
    assert_eq!(strip_escape_codes(&output), "see the docs\n");
}

#[test]
fn test_wrapping_applies_continuation_prefixes() {
    let content = load_fixture("valid/wrapping.md");
    let mut options = plain_options();
    options.wrap = true;
    options.width = 10;
    let output = for_terminal(&content, &options).unwrap();
    insta::assert_snapshot!(output, @r"
    A paragrap
    h long eno
    ugh to nee
    d wrapping
    .

    - itemized
       wrapping
    ");
}

#[test]
fn test_no_line_exceeds_wrap_width() {
    let content = load_fixture("valid/document.md");
    let mut options = plain_options();
    options.wrap = true;
    options.width = 20;
    let output = for_terminal(&content, &options).unwrap();
    for line in output.lines() {
        assert!(
            mdterm_lib::terminal::str_width(line) <= 20,
            "line too wide: {line:?}"
        );
    }
}

#[test]
fn test_broken_document_reports_every_diagnostic_once() {
    let content = load_fixture("invalid/broken.md");
    let mut input = content.as_bytes();
    let mut out = Vec::new();
    let diagnostics = render_stream(&mut input, &mut out, &plain_options()).unwrap();

    assert_eq!(
        diagnostics,
        [
            Diagnostic::new(1, "unmatched inline code backticks"),
            Diagnostic::new(7, "unclosed code fence"),
            Diagnostic::new(5, "table row has 3 cells, expected 2"),
        ]
    );
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Some `stray tick.\n\na │ b\n──┼──\n1 │ 2\n\n  fn main() {}\n"
    );
}

#[test]
fn test_lint_can_be_disabled() {
    let content = load_fixture("invalid/broken.md");
    let mut options = plain_options();
    options.lint = false;
    let mut input = content.as_bytes();
    let diagnostics = render_stream(&mut input, &mut Vec::<u8>::new(), &options).unwrap();

    assert_eq!(diagnostics, [Diagnostic::new(5, "table row has 3 cells, expected 2")]);
}

#[test]
fn test_crlf_input_matches_lf_input() {
    let content = load_fixture("valid/document.md");
    let crlf = content.replace('\n', "\r\n");
    assert_eq!(
        for_terminal(&crlf, &plain_options()).unwrap(),
        for_terminal(&content, &plain_options()).unwrap()
    );
}

#[test]
fn test_ascii_math_mode() {
    let mut options = plain_options();
    options.math_mode = MathMode::Ascii;
    let output = for_terminal(r"$\alpha \to \infty$ and $\sqrt{x_1}$", &options).unwrap();
    assert_eq!(output, "alpha -> inf and sqrt(x_1)\n");
}

#[test]
fn test_ragged_table_row_reports_once() {
    let source = "| a | b |\n|---|---|\n| 1 | 2 |\n| 3 |\n| 4 | 5 |\n";
    let diagnostics = write_terminal(&mut Vec::<u8>::new(), source, &plain_options()).unwrap();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].format_for("t.md"), "t.md:4: table row has 1 cells, expected 2");
}

#[test]
fn test_empty_input_renders_nothing() {
    assert_eq!(for_terminal("", &RenderOptions::default()).unwrap(), "");
}
