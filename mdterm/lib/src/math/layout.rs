//! Multi-line display layouts: stacked limits, fractions and matrix grids.

use super::types::MathMode;
use crate::terminal::str_width;

/// Pads `text` to `width` columns, extra space on the right.
pub fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(str_width(text));
    let left = pad / 2;
    let right = pad - left;
    let mut out = String::with_capacity(text.len() + pad);
    out.extend(std::iter::repeat_n(' ', left));
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', right));
    out
}

/// Centers each line over the widest one, joined by newlines.
///
/// Trailing padding is dropped.
pub fn stack(lines: &[&str]) -> String {
    let width = lines.iter().map(|l| str_width(l)).max().unwrap_or(0);
    lines
        .iter()
        .map(|l| center(l, width).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numerator over a rule over denominator.
pub fn fraction(numerator: &str, denominator: &str, mode: MathMode) -> String {
    let width = str_width(numerator).max(str_width(denominator)).max(1);
    let rule = match mode {
        MathMode::Unicode => "─",
        MathMode::Ascii => "-",
    }
    .repeat(width);
    stack(&[numerator, &rule, denominator])
}

/// Matrix environments and their bracket style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    Plain,
    Paren,
    Bracket,
    Vert,
}

impl MatrixKind {
    pub fn from_env(name: &str) -> Option<Self> {
        match name {
            "matrix" => Some(Self::Plain),
            "pmatrix" => Some(Self::Paren),
            "bmatrix" => Some(Self::Bracket),
            "vmatrix" => Some(Self::Vert),
            _ => None,
        }
    }

    /// Single-line delimiters.
    fn inline_delims(self) -> (&'static str, &'static str) {
        match self {
            Self::Plain => ("", ""),
            Self::Paren => ("(", ")"),
            Self::Bracket => ("[", "]"),
            Self::Vert => ("|", "|"),
        }
    }

    /// Delimiters for row `row` of a grid with `rows` rows.
    fn row_delims(self, row: usize, rows: usize, mode: MathMode) -> (&'static str, &'static str) {
        if mode == MathMode::Ascii || rows == 1 || self == Self::Plain {
            return self.inline_delims();
        }
        let last = rows - 1;
        match self {
            Self::Paren if row == 0 => ("⎛", "⎞"),
            Self::Paren if row == last => ("⎝", "⎠"),
            Self::Paren => ("⎜", "⎟"),
            Self::Bracket if row == 0 => ("⎡", "⎤"),
            Self::Bracket if row == last => ("⎣", "⎦"),
            Self::Bracket => ("⎢", "⎥"),
            Self::Vert => ("│", "│"),
            Self::Plain => ("", ""),
        }
    }
}

/// Flattened one-line matrix: `(a b ; c d)`.
pub fn matrix_inline(rows: &[Vec<String>], kind: MatrixKind) -> String {
    let (open, close) = kind.inline_delims();
    let body = rows
        .iter()
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join(" ; ");
    format!("{open}{body}{close}")
}

/// Padded grid with the bracket glyphs repeated on every row.
pub fn matrix_grid(rows: &[Vec<String>], kind: MatrixKind, mode: MathMode) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(str_width(cell));
        }
    }

    let mut lines = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let cells = widths
            .iter()
            .enumerate()
            .map(|(col, &w)| center(row.get(col).map(String::as_str).unwrap_or(""), w))
            .collect::<Vec<_>>()
            .join("  ");
        let (open, close) = kind.row_delims(index, rows.len(), mode);
        let line = if kind == MatrixKind::Plain {
            cells.trim_end().to_string()
        } else {
            format!("{open} {cells} {close}")
        };
        lines.push(line);
    }
    lines.join("\n")
}
