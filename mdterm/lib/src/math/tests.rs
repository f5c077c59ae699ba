use super::*;

fn unicode() -> MathOptions {
    MathOptions::default()
}

fn ascii() -> MathOptions {
    MathOptions {
        mode: MathMode::Ascii,
        ..MathOptions::default()
    }
}

fn u(src: &str) -> String {
    render(src, unicode()).unwrap()
}

fn a(src: &str) -> String {
    render(src, ascii()).unwrap()
}

fn display(src: &str) -> String {
    render(src, unicode().display()).unwrap()
}

#[test]
fn test_greek_letters() {
    assert_eq!(u(r"\alpha"), "α");
    assert_eq!(a(r"\alpha"), "alpha");
    assert_eq!(u(r"\Omega\pi"), "Ωπ");
}

#[test]
fn test_superscript_group() {
    assert_eq!(u("x^{10}"), "x¹⁰");
    assert_eq!(a("x^{ab}"), "x^(ab)");
    assert_eq!(a("x^2"), "x^2");
}

#[test]
fn test_script_applies_to_single_next_character() {
    assert_eq!(u("x^2y"), "x²y");
    assert_eq!(u("a_ib"), "aᵢb");
    assert_eq!(u(r"x^\alpha"), "xα");
}

#[test]
fn test_script_without_transliteration_passes_through() {
    assert_eq!(u("x^{q}"), "xq");
    assert_eq!(u("x_{(n+1)}"), "x₍ₙ₊₁₎");
}

#[test]
fn test_trailing_script_marker_is_literal() {
    assert_eq!(u("x^"), "x^");
    assert_eq!(u("x_"), "x_");
}

#[test]
fn test_inline_fraction() {
    assert_eq!(u(r"\frac{1}{2}"), "1⁄2");
    assert_eq!(a(r"\frac{1}{2}"), "1/2");
    assert_eq!(u(r"\frac12"), "1⁄2");
}

#[test]
fn test_fraction_without_arguments_is_bare_name() {
    assert_eq!(u(r"\frac"), "frac");
}

#[test]
fn test_display_fraction_stacks() {
    assert_eq!(display(r"\frac{1}{x+y}"), " 1\n───\nx+y\n");
    assert_eq!(display(r"a = \frac{1}{2} b"), "a = \n1\n─\n2\nb");
}

#[test]
fn test_sqrt() {
    assert_eq!(u(r"\sqrt{4}"), "√(4)");
    assert_eq!(u(r"\sqrt[3]{x}"), "³√(x)");
    assert_eq!(a(r"\sqrt{x}"), "sqrt(x)");
    assert_eq!(a(r"\sqrt[3]{x}"), "root[3](x)");
    assert_eq!(u(r"\sqrt"), "√");
}

#[test]
fn test_longest_prefix_operator() {
    assert_eq!(u(r"\leq"), "≤");
    assert_eq!(u(r"\le"), "≤");
    assert_eq!(a(r"\leq"), "<=");
}

#[test]
fn test_operator_spacing() {
    assert_eq!(u(r"a\leq b"), "a ≤ b");
    assert_eq!(u(r"a \leq b"), "a ≤ b");
    assert_eq!(u(r"a\to b"), "a → b");
    assert_eq!(u(r"(a\in)"), "(a ∈)");
    assert_eq!(u(r"\infty"), "∞");
}

#[test]
fn test_prefix_leftovers_render_literally() {
    assert_eq!(u(r"\inA"), "∈ A");
}

#[test]
fn test_functions() {
    assert_eq!(u(r"\sin x"), "sin x");
    assert_eq!(u(r"\sin(x)"), "sin(x)");
    assert_eq!(u(r"\sinh\theta"), "sinh θ");
    assert_eq!(u(r"\log_2 n"), "log₂ n");
}

#[test]
fn test_accents_last_char() {
    assert_eq!(u(r"\hat{x}"), "x\u{0302}");
    assert_eq!(u(r"\vec v"), "v\u{20D7}");
    assert_eq!(u(r"\bar{ab}"), "ab\u{0304}");
}

#[test]
fn test_accents_whole_group() {
    let options = MathOptions {
        accent_scope: AccentScope::WholeGroup,
        ..unicode()
    };
    assert_eq!(render(r"\hat{ab}", options).unwrap(), "ab\u{0302}");
    assert_eq!(render(r"\bar{x\quad}", options).unwrap(), "x  \u{0304}");
    assert_eq!(u(r"\bar{x\quad}"), "x\u{0304}  ");
}

#[test]
fn test_accent_fallbacks() {
    assert_eq!(a(r"\hat{x}"), "hat(x)");
    assert_eq!(u(r"\overbrace{abc}"), "overbrace(abc)");
    assert_eq!(u(r"\hat"), "hat");
}

#[test]
fn test_text_is_verbatim() {
    assert_eq!(u(r"\text{if \alpha x^2}"), r"if \alpha x^2");
    assert_eq!(u(r"x \text{ and } y"), "x  and  y");
}

#[test]
fn test_inline_sum_with_limits() {
    assert_eq!(u(r"\sum_{i=1}^{n}"), "∑ᵢ₌₁ⁿ");
    assert_eq!(a(r"\sum_{i=1}^{n}"), "sum_(i=1)^n");
    assert_eq!(u(r"\prod\limits_{k}"), "∏ₖ");
}

#[test]
fn test_display_sum_stacks_limits() {
    assert_eq!(display(r"\sum_{i=1}^{n} i"), " n\n ∑\ni=1\ni");
}

#[test]
fn test_left_right() {
    assert_eq!(u(r"\left( x \right)"), "( x )");
    assert_eq!(u(r"\left\langle v \right\rangle"), "⟨ v ⟩");
    assert_eq!(a(r"\left\lfloor x \right\rfloor"), "[ x ]");
    assert_eq!(u(r"\left. x \right|"), " x |");
}

#[test]
fn test_left_right_nests() {
    assert_eq!(u(r"\left( a \left[ b \right] \right)"), "( a [ b ] )");
}

#[test]
fn test_unterminated_left_closes_with_paren() {
    assert_eq!(u(r"\left[ x + y"), "[ x + y)");
    assert_eq!(u(r"\left"), "()");
}

#[test]
fn test_inline_matrix() {
    assert_eq!(u(r"\begin{pmatrix} a & b \\ c & d \end{pmatrix}"), "(a b ; c d)");
    assert_eq!(u(r"\begin{bmatrix}1&0\\0&1\end{bmatrix}"), "[1 0 ; 0 1]");
}

#[test]
fn test_display_matrix() {
    assert_eq!(
        display(r"\begin{pmatrix} a & b \\ c & d \end{pmatrix}"),
        "⎛ a  b ⎞\n⎝ c  d ⎠\n"
    );
    assert_eq!(
        render(
            r"\begin{vmatrix} 1 & 2 \\ 3 & 4 \end{vmatrix}",
            ascii().display()
        )
        .unwrap(),
        "| 1  2 |\n| 3  4 |\n"
    );
}

#[test]
fn test_unknown_environment_renders_content() {
    assert_eq!(u(r"\begin{aligned}x\end{aligned}"), "x");
}

#[test]
fn test_escapes_and_spacing() {
    assert_eq!(u(r"\{a\}"), "{a}");
    assert_eq!(u(r"50\%"), "50%");
    assert_eq!(u(r"a\,b\!c"), "a bc");
    assert_eq!(u(r"a\quad b"), "a   b");
    assert_eq!(u("a~b"), "a b");
    assert_eq!(u(r"a\\b"), "a b");
    assert_eq!(display(r"a\\b"), "a\nb");
}

#[test]
fn test_lone_backslash_is_literal() {
    assert_eq!(u("\\"), "\\");
    assert_eq!(u(r"\@"), r"\@");
}

#[test]
fn test_unknown_command_is_bare_name() {
    assert_eq!(u(r"\foo x"), "foo x");
}

#[test]
fn test_mathbb_and_fonts() {
    assert_eq!(u(r"\mathbb{R}"), "ℝ");
    assert_eq!(a(r"\mathbb{R}"), "R");
    assert_eq!(u(r"\mathbf{v}"), "v");
    assert_eq!(u(r"\operatorname{rank} A"), "rank A");
}

#[test]
fn test_groups_render_without_braces() {
    assert_eq!(u("{a}{b}"), "ab");
    assert_eq!(u("{a"), "{a");
    assert_eq!(u("a}"), "a}");
}

#[test]
fn test_arguments_render_inline_in_display_mode() {
    assert_eq!(display(r"\sqrt{\frac{a}{b}}"), "√(a⁄b)");
}

#[test]
fn test_nesting_cap() {
    let deep = format!("{}x{}", "{".repeat(MAX_NESTING + 1), "}".repeat(MAX_NESTING + 1));
    assert!(matches!(
        render(&deep, unicode()),
        Err(MathError::NestingTooDeep { limit: MAX_NESTING })
    ));

    let ok = format!("{}x{}", "{".repeat(MAX_NESTING), "}".repeat(MAX_NESTING));
    assert_eq!(render(&ok, unicode()).unwrap(), "x");
}

#[test]
fn test_render_bytes_replaces_invalid_utf8() {
    assert_eq!(render_bytes(b"x\xff", unicode()).unwrap(), "x\u{FFFD}");
}

#[test]
fn test_plain_text_is_copied() {
    assert_eq!(u("a + b = c"), "a + b = c");
    assert_eq!(u("日本"), "日本");
}
