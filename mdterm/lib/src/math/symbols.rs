//! Static symbol tables for math rendering.
//!
//! Greek letters resolve by exact name. Operators and named functions
//! resolve by longest prefix so that `\leq` never splits into `\le` + `q`.

use super::types::MathMode;

/// A named glyph with its Unicode and ASCII renditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub name: &'static str,
    pub unicode: &'static str,
    pub ascii: &'static str,
    /// Binary, relational and arrow operators get a padding space on each side.
    pub spaced: bool,
}

impl Symbol {
    #[inline]
    pub fn glyph(&self, mode: MathMode) -> &'static str {
        match mode {
            MathMode::Unicode => self.unicode,
            MathMode::Ascii => self.ascii,
        }
    }
}

const fn sym(name: &'static str, unicode: &'static str, ascii: &'static str) -> Symbol {
    Symbol {
        name,
        unicode,
        ascii,
        spaced: false,
    }
}

const fn op(name: &'static str, unicode: &'static str, ascii: &'static str) -> Symbol {
    Symbol {
        name,
        unicode,
        ascii,
        spaced: true,
    }
}

static GREEK: &[Symbol] = &[
    sym("alpha", "α", "alpha"),
    sym("beta", "β", "beta"),
    sym("gamma", "γ", "gamma"),
    sym("delta", "δ", "delta"),
    sym("epsilon", "ϵ", "epsilon"),
    sym("varepsilon", "ε", "epsilon"),
    sym("zeta", "ζ", "zeta"),
    sym("eta", "η", "eta"),
    sym("theta", "θ", "theta"),
    sym("vartheta", "ϑ", "theta"),
    sym("iota", "ι", "iota"),
    sym("kappa", "κ", "kappa"),
    sym("lambda", "λ", "lambda"),
    sym("mu", "μ", "mu"),
    sym("nu", "ν", "nu"),
    sym("xi", "ξ", "xi"),
    sym("omicron", "ο", "omicron"),
    sym("pi", "π", "pi"),
    sym("varpi", "ϖ", "pi"),
    sym("rho", "ρ", "rho"),
    sym("varrho", "ϱ", "rho"),
    sym("sigma", "σ", "sigma"),
    sym("varsigma", "ς", "sigma"),
    sym("tau", "τ", "tau"),
    sym("upsilon", "υ", "upsilon"),
    sym("phi", "ϕ", "phi"),
    sym("varphi", "φ", "phi"),
    sym("chi", "χ", "chi"),
    sym("psi", "ψ", "psi"),
    sym("omega", "ω", "omega"),
    sym("Gamma", "Γ", "Gamma"),
    sym("Delta", "Δ", "Delta"),
    sym("Theta", "Θ", "Theta"),
    sym("Lambda", "Λ", "Lambda"),
    sym("Xi", "Ξ", "Xi"),
    sym("Pi", "Π", "Pi"),
    sym("Sigma", "Σ", "Sigma"),
    sym("Upsilon", "Υ", "Upsilon"),
    sym("Phi", "Φ", "Phi"),
    sym("Psi", "Ψ", "Psi"),
    sym("Omega", "Ω", "Omega"),
];

static OPERATORS: &[Symbol] = &[
    op("le", "≤", "<="),
    op("leq", "≤", "<="),
    op("ge", "≥", ">="),
    op("geq", "≥", ">="),
    op("ne", "≠", "!="),
    op("neq", "≠", "!="),
    op("approx", "≈", "~="),
    op("equiv", "≡", "=="),
    op("sim", "∼", "~"),
    op("simeq", "≃", "~="),
    op("cong", "≅", "~="),
    op("propto", "∝", "~"),
    op("ll", "≪", "<<"),
    op("gg", "≫", ">>"),
    op("pm", "±", "+-"),
    op("mp", "∓", "-+"),
    op("times", "×", "x"),
    op("div", "÷", "/"),
    op("cdot", "·", "*"),
    op("ast", "∗", "*"),
    op("setminus", "∖", "\\"),
    op("to", "→", "->"),
    op("gets", "←", "<-"),
    op("rightarrow", "→", "->"),
    op("leftarrow", "←", "<-"),
    op("leftrightarrow", "↔", "<->"),
    op("Rightarrow", "⇒", "=>"),
    op("Leftarrow", "⇐", "<="),
    op("Leftrightarrow", "⇔", "<=>"),
    op("implies", "⟹", "=>"),
    op("iff", "⟺", "<=>"),
    op("mapsto", "↦", "|->"),
    op("in", "∈", "in"),
    op("notin", "∉", "not in"),
    op("ni", "∋", "ni"),
    op("subset", "⊂", "subset"),
    op("subseteq", "⊆", "subseteq"),
    op("supset", "⊃", "supset"),
    op("supseteq", "⊇", "supseteq"),
    op("cup", "∪", "U"),
    op("cap", "∩", "n"),
    op("land", "∧", "and"),
    op("lor", "∨", "or"),
    op("wedge", "∧", "^"),
    op("vee", "∨", "v"),
    op("perp", "⊥", "_|_"),
    op("parallel", "∥", "||"),
    op("mid", "∣", "|"),
    sym("circ", "∘", "o"),
    sym("bullet", "•", "*"),
    sym("star", "⋆", "*"),
    sym("neg", "¬", "~"),
    sym("lnot", "¬", "~"),
    sym("forall", "∀", "forall "),
    sym("exists", "∃", "exists "),
    sym("nexists", "∄", "!exists "),
    sym("infty", "∞", "inf"),
    sym("partial", "∂", "d"),
    sym("nabla", "∇", "nabla"),
    sym("int", "∫", "int"),
    sym("iint", "∬", "iint"),
    sym("oint", "∮", "oint"),
    sym("ldots", "…", "..."),
    sym("cdots", "⋯", "..."),
    sym("vdots", "⋮", ":"),
    sym("ddots", "⋱", "..."),
    sym("dots", "…", "..."),
    sym("emptyset", "∅", "{}"),
    sym("varnothing", "∅", "{}"),
    sym("angle", "∠", "angle"),
    sym("prime", "′", "'"),
    sym("hbar", "ℏ", "h"),
    sym("ell", "ℓ", "l"),
    sym("aleph", "ℵ", "aleph"),
    sym("Re", "ℜ", "Re"),
    sym("Im", "ℑ", "Im"),
    sym("langle", "⟨", "<"),
    sym("rangle", "⟩", ">"),
    sym("lceil", "⌈", "["),
    sym("rceil", "⌉", "]"),
    sym("lfloor", "⌊", "["),
    sym("rfloor", "⌋", "]"),
];

/// Named functions typeset upright and followed by a space.
static FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "sinh", "cosh", "tanh", "arcsin", "arccos", "arctan", "log", "ln",
    "exp", "lim", "max", "min", "det",
];

/// Commands that only change spacing or layout hints and render as nothing.
static IGNORED: &[&str] = &[
    "limits",
    "nolimits",
    "displaystyle",
    "textstyle",
    "scriptstyle",
    "big",
    "Big",
    "bigg",
    "Bigg",
];

/// Looks up a Greek letter by exact name.
pub fn greek(name: &str) -> Option<&'static Symbol> {
    GREEK.iter().find(|s| s.name == name)
}

/// Finds the longest operator whose name is a prefix of `name`.
pub fn operator_prefix(name: &str) -> Option<&'static Symbol> {
    OPERATORS
        .iter()
        .filter(|s| name.starts_with(s.name))
        .max_by_key(|s| s.name.len())
}

/// Finds the longest function name that is a prefix of `name`.
pub fn function_prefix(name: &str) -> Option<&'static str> {
    FUNCTIONS
        .iter()
        .copied()
        .filter(|f| name.starts_with(f))
        .max_by_key(|f| f.len())
}

pub fn is_ignored(name: &str) -> bool {
    IGNORED.contains(&name)
}

/// Combining mark for an accent command.
///
/// Returns `Some(None)` for accents that exist but have no combining mark
/// (braces), and `None` for names that are not accents at all.
pub fn accent_mark(name: &str) -> Option<Option<char>> {
    let mark = match name {
        "hat" | "widehat" => '\u{0302}',
        "tilde" | "widetilde" => '\u{0303}',
        "bar" => '\u{0304}',
        "overline" => '\u{0305}',
        "breve" => '\u{0306}',
        "dot" => '\u{0307}',
        "ddot" => '\u{0308}',
        "mathring" => '\u{030A}',
        "check" => '\u{030C}',
        "acute" => '\u{0301}',
        "grave" => '\u{0300}',
        "underline" => '\u{0332}',
        "vec" => '\u{20D7}',
        "overbrace" | "underbrace" => return Some(None),
        _ => return None,
    };
    Some(Some(mark))
}

/// Opening and closing glyphs for a named `\left`/`\right` delimiter.
pub fn named_delimiter(name: &str, mode: MathMode) -> Option<&'static str> {
    let (unicode, ascii) = match name {
        "langle" => ("⟨", "<"),
        "rangle" => ("⟩", ">"),
        "lceil" => ("⌈", "["),
        "rceil" => ("⌉", "]"),
        "lfloor" => ("⌊", "["),
        "rfloor" => ("⌋", "]"),
        "lvert" | "rvert" | "vert" => ("|", "|"),
        "lVert" | "rVert" | "Vert" => ("‖", "||"),
        "lbrace" => ("{", "{"),
        "rbrace" => ("}", "}"),
        _ => return None,
    };
    Some(match mode {
        MathMode::Unicode => unicode,
        MathMode::Ascii => ascii,
    })
}

/// Superscript form of `c`, if one exists.
pub fn superscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' | '−' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'a' => 'ᵃ',
        'b' => 'ᵇ',
        'c' => 'ᶜ',
        'd' => 'ᵈ',
        'e' => 'ᵉ',
        'f' => 'ᶠ',
        'g' => 'ᵍ',
        'h' => 'ʰ',
        'i' => 'ⁱ',
        'j' => 'ʲ',
        'k' => 'ᵏ',
        'l' => 'ˡ',
        'm' => 'ᵐ',
        'n' => 'ⁿ',
        'o' => 'ᵒ',
        'p' => 'ᵖ',
        'r' => 'ʳ',
        's' => 'ˢ',
        't' => 'ᵗ',
        'u' => 'ᵘ',
        'v' => 'ᵛ',
        'w' => 'ʷ',
        'x' => 'ˣ',
        'y' => 'ʸ',
        'z' => 'ᶻ',
        _ => return None,
    })
}

/// Subscript form of `c`, if one exists.
pub fn subscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' | '−' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'h' => 'ₕ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'l' => 'ₗ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'p' => 'ₚ',
        'r' => 'ᵣ',
        's' => 'ₛ',
        't' => 'ₜ',
        'u' => 'ᵤ',
        'v' => 'ᵥ',
        'x' => 'ₓ',
        _ => return None,
    })
}

/// Double-struck form of an ASCII letter or digit.
pub fn double_struck(c: char) -> Option<char> {
    let special = match c {
        'C' => Some('ℂ'),
        'H' => Some('ℍ'),
        'N' => Some('ℕ'),
        'P' => Some('ℙ'),
        'Q' => Some('ℚ'),
        'R' => Some('ℝ'),
        'Z' => Some('ℤ'),
        _ => None,
    };
    if special.is_some() {
        return special;
    }
    let base = match c {
        'A'..='Z' => 0x1D538 + (c as u32 - 'A' as u32),
        'a'..='z' => 0x1D552 + (c as u32 - 'a' as u32),
        '0'..='9' => 0x1D7D8 + (c as u32 - '0' as u32),
        _ => return None,
    };
    char::from_u32(base)
}
