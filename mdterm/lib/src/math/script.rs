//! Superscript and subscript rendition.

use super::symbols::{subscript, superscript};
use super::types::MathMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Super,
    Sub,
}

impl ScriptKind {
    pub fn marker(self) -> char {
        match self {
            Self::Super => '^',
            Self::Sub => '_',
        }
    }

    fn map(self, c: char) -> Option<char> {
        match self {
            Self::Super => superscript(c),
            Self::Sub => subscript(c),
        }
    }
}

/// Transliterates rendered text into script glyphs.
///
/// Characters without a dedicated glyph pass through unchanged.
pub fn transliterate(text: &str, kind: ScriptKind) -> String {
    text.chars().map(|c| kind.map(c).unwrap_or(c)).collect()
}

/// Formats an already rendered script argument for attachment to its base.
///
/// Unicode mode transliterates. ASCII mode writes `^x` for single-character
/// arguments and `^(...)` otherwise.
pub fn attach(rendered: &str, kind: ScriptKind, mode: MathMode) -> String {
    match mode {
        MathMode::Unicode => transliterate(rendered, kind),
        MathMode::Ascii => {
            let mut out = String::with_capacity(rendered.len() + 3);
            out.push(kind.marker());
            if rendered.chars().count() == 1 {
                out.push_str(rendered);
            } else {
                out.push('(');
                out.push_str(rendered);
                out.push(')');
            }
            out
        }
    }
}
