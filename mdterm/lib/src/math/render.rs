//! Recursive-descent interpreter for the math command language.

use tracing::debug;

use super::buffer::ByteBuffer;
use super::cursor::Cursor;
use super::layout::{self, MatrixKind};
use super::script::{ScriptKind, attach, transliterate};
use super::symbols::{
    Symbol, accent_mark, double_struck, function_prefix, greek, is_ignored, named_delimiter,
    operator_prefix,
};
use super::types::{AccentScope, MathError, MathMode, MathOptions, MathResult};
use crate::terminal::char_width;

/// Maximum depth of nested groups, arguments and environments.
pub const MAX_NESTING: usize = 64;

/// Content between `\left` and `\right` is cut off beyond this many bytes.
const DELIMITED_CAP: usize = 65_536;
/// Matrix environment bodies are cut off beyond this many bytes.
const MATRIX_CAP: usize = 32_768;
const MATRIX_MAX_ROWS: usize = 64;

/// Renders a math segment (the content between `$` or `$$` delimiters).
///
/// Malformed input never fails: unknown commands render as their bare name,
/// unbalanced groups are copied literally and a missing `\right` closes with
/// a default parenthesis.
///
/// ## Examples
///
/// ```rust
/// use mdterm_lib::math::{MathMode, MathOptions, render};
///
/// let unicode = MathOptions::default();
/// assert_eq!(render(r"\alpha \leq x^{10}", unicode).unwrap(), "α ≤ x¹⁰");
///
/// let ascii = MathOptions { mode: MathMode::Ascii, ..unicode };
/// assert_eq!(render(r"\frac{1}{2}", ascii).unwrap(), "1/2");
/// ```
///
/// ## Errors
///
/// - [`MathError::Allocation`] if the output buffer cannot grow
/// - [`MathError::NestingTooDeep`] if groups nest beyond [`MAX_NESTING`]
#[tracing::instrument(level = "trace", skip(source), fields(len = source.len()))]
pub fn render(source: &str, options: MathOptions) -> MathResult<String> {
    let mut out = ByteBuffer::new();
    Renderer { options, depth: 0 }.render_into(&mut out, source)?;
    Ok(out.into_string())
}

/// Renders raw bytes, replacing invalid UTF-8 with U+FFFD first.
pub fn render_bytes(source: &[u8], options: MathOptions) -> MathResult<String> {
    render(&String::from_utf8_lossy(source), options)
}

struct Renderer {
    options: MathOptions,
    depth: usize,
}

impl Renderer {
    #[inline]
    fn mode(&self) -> MathMode {
        self.options.mode
    }

    fn descend(&self, options: MathOptions) -> MathResult<Renderer> {
        if self.depth >= MAX_NESTING {
            return Err(MathError::NestingTooDeep { limit: MAX_NESTING });
        }
        Ok(Renderer {
            options,
            depth: self.depth + 1,
        })
    }

    /// Renders an argument into a fresh string, always inline.
    fn sub(&self, src: &str) -> MathResult<String> {
        let nested = self.descend(self.options.inline())?;
        let mut out = ByteBuffer::new();
        nested.render_into(&mut out, src)?;
        Ok(out.into_string())
    }

    fn render_into(&self, out: &mut ByteBuffer, src: &str) -> MathResult<()> {
        let mut cur = Cursor::new(src);
        while let Some(c) = cur.peek() {
            match c {
                '\\' => {
                    cur.bump();
                    self.command(out, &mut cur)?;
                }
                '^' => self.script(out, &mut cur, ScriptKind::Super)?,
                '_' => self.script(out, &mut cur, ScriptKind::Sub)?,
                '{' => match cur.brace_group() {
                    Some(inner) => self.descend(self.options)?.render_into(out, inner)?,
                    None => {
                        cur.bump();
                        out.push('{')?;
                    }
                },
                '~' => {
                    cur.bump();
                    out.push(' ')?;
                }
                _ => {
                    cur.bump();
                    out.push(c)?;
                }
            }
        }
        Ok(())
    }

    fn script(&self, out: &mut ByteBuffer, cur: &mut Cursor<'_>, kind: ScriptKind) -> MathResult<()> {
        cur.bump();
        match cur.atom() {
            Some(arg) => {
                let rendered = self.sub(arg)?;
                out.push_str(&attach(&rendered, kind, self.mode()))
            }
            None => out.push(kind.marker()),
        }
    }

    /// Dispatches the command after a backslash.
    fn command(&self, out: &mut ByteBuffer, cur: &mut Cursor<'_>) -> MathResult<()> {
        let name = cur.peek_letters();
        if name.is_empty() {
            return self.escape(out, cur);
        }

        match name {
            "left" => {
                cur.advance(name.len());
                return self.left_right(out, cur);
            }
            "right" => {
                cur.advance(name.len());
                cur.skip_whitespace();
                return match self.delimiter(cur) {
                    Some(d) => out.push_str(&d),
                    None => Ok(()),
                };
            }
            _ => {}
        }
        if let Some(letter) = greek(name) {
            cur.advance(name.len());
            return out.push_str(letter.glyph(self.mode()));
        }
        if is_ignored(name) {
            cur.advance(name.len());
            return Ok(());
        }
        if let Some(symbol) = operator_prefix(name) {
            cur.advance(symbol.name.len());
            return self.operator(out, cur, symbol);
        }
        if let Some(function) = function_prefix(name) {
            cur.advance(function.len());
            out.push_str(function)?;
            return self.space_after_function(out, cur);
        }

        cur.advance(name.len());
        if let Some(mark) = accent_mark(name) {
            return self.accent(out, cur, name, mark);
        }
        match name {
            "text" | "textrm" | "textbf" | "textit" | "textsf" | "texttt" | "mbox" => {
                match cur.brace_group() {
                    Some(text) => out.push_str(text),
                    None => out.push_str(name),
                }
            }
            "mathbb" => self.double_struck(out, cur, name),
            "mathbf" | "mathrm" | "mathit" | "mathsf" | "mathtt" | "mathcal" | "boldsymbol" => {
                match cur.argument() {
                    Some(arg) => out.push_str(&self.sub(arg)?),
                    None => out.push_str(name),
                }
            }
            "operatorname" => match cur.argument() {
                Some(arg) => {
                    out.push_str(&self.sub(arg)?)?;
                    self.space_after_function(out, cur)
                }
                None => out.push_str(name),
            },
            "sum" | "prod" => self.big_operator(out, cur, name),
            "sqrt" => self.sqrt(out, cur),
            "frac" | "dfrac" | "tfrac" => self.fraction(out, cur, name),
            "begin" => self.environment(out, cur),
            "end" => {
                cur.brace_group();
                Ok(())
            }
            "quad" => out.push_str("  "),
            "qquad" => out.push_str("    "),
            _ => out.push_str(name),
        }
    }

    /// A backslash followed by a non-letter.
    fn escape(&self, out: &mut ByteBuffer, cur: &mut Cursor<'_>) -> MathResult<()> {
        let Some(c) = cur.peek() else {
            return out.push('\\');
        };
        match c {
            '{' | '}' | '$' | '%' | '&' | '#' | '_' => {
                cur.bump();
                out.push(c)
            }
            '|' => {
                cur.bump();
                out.push_str(match self.mode() {
                    MathMode::Unicode => "‖",
                    MathMode::Ascii => "||",
                })
            }
            ',' | ':' | ';' | ' ' => {
                cur.bump();
                out.push(' ')
            }
            '!' => {
                cur.bump();
                Ok(())
            }
            '\\' => {
                cur.bump();
                out.push(if self.options.display { '\n' } else { ' ' })
            }
            _ => out.push('\\'),
        }
    }

    fn operator(&self, out: &mut ByteBuffer, cur: &Cursor<'_>, symbol: &Symbol) -> MathResult<()> {
        if symbol.spaced && !out.at_break() {
            out.push(' ')?;
        }
        out.push_str(symbol.glyph(self.mode()))?;
        let tight = match cur.peek() {
            None => true,
            Some(c) => c.is_whitespace() || ",;:)]}".contains(c),
        };
        if symbol.spaced && !tight {
            out.push(' ')?;
        }
        Ok(())
    }

    fn space_after_function(&self, out: &mut ByteBuffer, cur: &Cursor<'_>) -> MathResult<()> {
        match cur.peek() {
            None => Ok(()),
            Some(c) if c.is_whitespace() || "([{_^".contains(c) => Ok(()),
            Some(_) => out.push(' '),
        }
    }

    fn accent(
        &self,
        out: &mut ByteBuffer,
        cur: &mut Cursor<'_>,
        name: &str,
        mark: Option<char>,
    ) -> MathResult<()> {
        let Some(arg) = cur.argument() else {
            return out.push_str(name);
        };
        let rendered = self.sub(arg)?;
        match (self.mode(), mark) {
            (MathMode::Unicode, Some(mark)) => {
                out.push_str(&apply_accent(&rendered, mark, self.options.accent_scope))
            }
            _ => {
                out.push_str(name)?;
                out.push('(')?;
                out.push_str(&rendered)?;
                out.push(')')
            }
        }
    }

    fn double_struck(&self, out: &mut ByteBuffer, cur: &mut Cursor<'_>, name: &str) -> MathResult<()> {
        let Some(arg) = cur.argument() else {
            return out.push_str(name);
        };
        let rendered = self.sub(arg)?;
        match self.mode() {
            MathMode::Unicode => {
                for c in rendered.chars() {
                    out.push(double_struck(c).unwrap_or(c))?;
                }
                Ok(())
            }
            MathMode::Ascii => out.push_str(&rendered),
        }
    }

    /// `\sum` and `\prod` with optional limits.
    fn big_operator(&self, out: &mut ByteBuffer, cur: &mut Cursor<'_>, name: &str) -> MathResult<()> {
        let glyph = match (self.mode(), name) {
            (MathMode::Unicode, "sum") => "∑",
            (MathMode::Unicode, _) => "∏",
            (MathMode::Ascii, _) => name,
        };

        let mut lower: Option<String> = None;
        let mut upper: Option<String> = None;
        loop {
            let rest = cur.rest();
            if let Some(skip) = ["\\limits", "\\nolimits"]
                .iter()
                .find(|cmd| rest.starts_with(**cmd))
            {
                cur.advance(skip.len());
                continue;
            }
            let slot = match cur.peek() {
                Some('_') if lower.is_none() => &mut lower,
                Some('^') if upper.is_none() => &mut upper,
                _ => break,
            };
            cur.bump();
            let limit = match cur.atom() {
                Some(arg) => self.sub(arg)?,
                None => String::new(),
            };
            *slot = Some(limit);
        }

        if !self.options.display {
            out.push_str(glyph)?;
            if let Some(lower) = &lower {
                out.push_str(&attach(lower, ScriptKind::Sub, self.mode()))?;
            }
            if let Some(upper) = &upper {
                out.push_str(&attach(upper, ScriptKind::Super, self.mode()))?;
            }
            return Ok(());
        }

        let mut lines = Vec::with_capacity(3);
        if let Some(upper) = &upper {
            lines.push(upper.as_str());
        }
        lines.push(glyph);
        if let Some(lower) = &lower {
            lines.push(lower.as_str());
        }
        self.display_block(out, cur, &layout::stack(&lines))
    }

    fn sqrt(&self, out: &mut ByteBuffer, cur: &mut Cursor<'_>) -> MathResult<()> {
        let index = match cur.bracket_group() {
            Some(index) => Some(self.sub(index)?),
            None => None,
        };
        let radicand = match cur.argument() {
            Some(arg) => Some(self.sub(arg)?),
            None => None,
        };

        match self.mode() {
            MathMode::Unicode => {
                if let Some(index) = &index {
                    out.push_str(&transliterate(index, ScriptKind::Super))?;
                }
                out.push('√')?;
            }
            MathMode::Ascii => match &index {
                Some(index) => {
                    out.push_str("root[")?;
                    out.push_str(index)?;
                    out.push(']')?;
                }
                None => out.push_str("sqrt")?,
            },
        }
        if let Some(radicand) = &radicand {
            out.push('(')?;
            out.push_str(radicand)?;
            out.push(')')?;
        }
        Ok(())
    }

    fn fraction(&self, out: &mut ByteBuffer, cur: &mut Cursor<'_>, name: &str) -> MathResult<()> {
        let Some(numerator) = cur.argument() else {
            return out.push_str(name);
        };
        let numerator = self.sub(numerator)?;
        let denominator = match cur.argument() {
            Some(arg) => self.sub(arg)?,
            None => String::new(),
        };

        if self.options.display && name != "tfrac" {
            let block = layout::fraction(&numerator, &denominator, self.mode());
            return self.display_block(out, cur, &block);
        }
        out.push_str(&numerator)?;
        out.push_str(match self.mode() {
            MathMode::Unicode => "⁄",
            MathMode::Ascii => "/",
        })?;
        out.push_str(&denominator)
    }

    /// Writes a multi-line block on lines of its own.
    ///
    /// A single following space is swallowed so the next line does not start
    /// with a blank.
    fn display_block(&self, out: &mut ByteBuffer, cur: &mut Cursor<'_>, block: &str) -> MathResult<()> {
        if out.mid_line() {
            out.push('\n')?;
        }
        out.push_str(block)?;
        out.push('\n')?;
        cur.eat(' ');
        Ok(())
    }

    fn left_right(&self, out: &mut ByteBuffer, cur: &mut Cursor<'_>) -> MathResult<()> {
        cur.skip_whitespace();
        let open = self.delimiter(cur).unwrap_or_else(|| "(".to_string());

        let rest = cur.rest();
        let (content, close) = match find_closing(rest, "left", "right") {
            Some((end, after)) => {
                cur.advance(after);
                cur.skip_whitespace();
                let close = self.delimiter(cur).unwrap_or_else(|| ")".to_string());
                (&rest[..end], close)
            }
            None => {
                debug!("unterminated \\left, closing at end of input");
                (cur.take_rest(), ")".to_string())
            }
        };

        out.push_str(&open)?;
        out.push_str(&self.sub(truncate(content, DELIMITED_CAP))?)?;
        out.push_str(&close)
    }

    /// Reads a `\left`/`\right` delimiter. `.` is the invisible delimiter.
    fn delimiter(&self, cur: &mut Cursor<'_>) -> Option<String> {
        match cur.peek()? {
            '.' => {
                cur.bump();
                Some(String::new())
            }
            '\\' => {
                cur.bump();
                let name = cur.letters();
                if !name.is_empty() {
                    let glyph = named_delimiter(name, self.mode()).unwrap_or(name);
                    return Some(glyph.to_string());
                }
                match cur.bump() {
                    Some('|') => Some(
                        match self.mode() {
                            MathMode::Unicode => "‖",
                            MathMode::Ascii => "||",
                        }
                        .to_string(),
                    ),
                    Some(c) => Some(c.to_string()),
                    None => Some("\\".to_string()),
                }
            }
            c => {
                cur.bump();
                Some(c.to_string())
            }
        }
    }

    fn environment(&self, out: &mut ByteBuffer, cur: &mut Cursor<'_>) -> MathResult<()> {
        let Some(env) = cur.brace_group() else {
            return out.push_str("begin");
        };
        let env = env.trim();

        let rest = cur.rest();
        let body = match find_closing(rest, "begin", "end") {
            Some((end, after)) => {
                cur.advance(after);
                cur.brace_group();
                &rest[..end]
            }
            None => {
                debug!(env, "unterminated environment, closing at end of input");
                cur.take_rest()
            }
        };

        match MatrixKind::from_env(env) {
            Some(kind) => self.matrix(out, cur, truncate(body, MATRIX_CAP), kind),
            None => self
                .descend(self.options)?
                .render_into(out, truncate(body, MATRIX_CAP)),
        }
    }

    fn matrix(
        &self,
        out: &mut ByteBuffer,
        cur: &mut Cursor<'_>,
        body: &str,
        kind: MatrixKind,
    ) -> MathResult<()> {
        let mut cells = split_matrix(body);
        if cells.len() > MATRIX_MAX_ROWS {
            debug!(rows = cells.len(), "matrix truncated to {MATRIX_MAX_ROWS} rows");
            cells.truncate(MATRIX_MAX_ROWS);
        }
        let rows = cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| self.sub(cell.trim()))
                    .collect::<MathResult<Vec<String>>>()
            })
            .collect::<MathResult<Vec<Vec<String>>>>()?;

        if self.options.display {
            let grid = layout::matrix_grid(&rows, kind, self.mode());
            self.display_block(out, cur, &grid)
        } else {
            out.push_str(&layout::matrix_inline(&rows, kind))
        }
    }
}

/// Places a combining mark after the last visible character, or once after
/// the whole text for [`AccentScope::WholeGroup`].
fn apply_accent(text: &str, mark: char, scope: AccentScope) -> String {
    let visible = |c: char| !c.is_whitespace() && char_width(c) > 0;
    let mut out = String::with_capacity(text.len() + mark.len_utf8());
    match scope {
        AccentScope::LastChar => {
            let last = text.char_indices().rev().find(|&(_, c)| visible(c));
            match last {
                Some((i, c)) => {
                    let split = i + c.len_utf8();
                    out.push_str(&text[..split]);
                    out.push(mark);
                    out.push_str(&text[split..]);
                }
                None => out.push_str(text),
            }
        }
        AccentScope::WholeGroup => {
            out.push_str(text);
            out.push(mark);
        }
    }
    out
}

/// Finds the `close` command that balances an already consumed `open`.
///
/// Returns the byte offset of its backslash and the offset just past its name.
fn find_closing(src: &str, open: &str, close: &str) -> Option<(usize, usize)> {
    let mut cur = Cursor::new(src);
    let mut depth = 0usize;
    while let Some(c) = cur.bump() {
        if c != '\\' {
            continue;
        }
        let start = cur.pos() - 1;
        let name = cur.letters();
        if name.is_empty() {
            cur.bump();
        } else if name == open {
            depth += 1;
        } else if name == close {
            if depth == 0 {
                return Some((start, cur.pos()));
            }
            depth -= 1;
        }
    }
    None
}

/// Splits a matrix body into rows on `\\` and cells on `&`, outside braces.
fn split_matrix(body: &str) -> Vec<Vec<&str>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell_start = 0;
    let mut depth = 0usize;
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '&' if depth == 0 => {
                row.push(&body[cell_start..i]);
                cell_start = i + 1;
            }
            '\\' => match chars.next() {
                Some((_, '\\')) if depth == 0 => {
                    row.push(&body[cell_start..i]);
                    rows.push(std::mem::take(&mut row));
                    cell_start = i + 2;
                }
                _ => {}
            },
            _ => {}
        }
    }
    row.push(&body[cell_start..]);
    let trailing_blank = row.len() == 1 && row[0].trim().is_empty();
    if !trailing_blank || rows.is_empty() {
        rows.push(row);
    }
    rows
}

/// Cuts `s` to at most `cap` bytes on a character boundary.
fn truncate(s: &str, cap: usize) -> &str {
    if s.len() <= cap {
        return s;
    }
    let mut end = cap;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    debug!(len = s.len(), cap, "math content truncated");
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_matrix_rows_and_cells() {
        assert_eq!(
            split_matrix(r"a & b \\ c & d"),
            vec![vec!["a ", " b "], vec![" c ", " d"]]
        );
    }

    #[test]
    fn test_split_matrix_drops_trailing_row_break() {
        assert_eq!(split_matrix(r"1 & 2 \\"), vec![vec!["1 ", " 2 "]]);
    }

    #[test]
    fn test_split_matrix_respects_braces() {
        assert_eq!(split_matrix(r"{a & b} & c"), vec![vec!["{a & b} ", " c"]]);
    }

    #[test]
    fn test_find_closing_counts_depth() {
        let src = r"a \left( b \right) c \right] d";
        let (start, after) = find_closing(src, "left", "right").unwrap();
        assert_eq!(&src[..start], r"a \left( b \right) c ");
        assert_eq!(&src[after..], "] d");
    }

    #[test]
    fn test_find_closing_does_not_match_longer_names() {
        assert_eq!(find_closing(r"x \rightarrow y", "left", "right"), None);
    }

    #[test]
    fn test_apply_accent_scopes() {
        assert_eq!(apply_accent("ab", '\u{0302}', AccentScope::LastChar), "ab\u{0302}");
        assert_eq!(apply_accent("ab", '\u{0302}', AccentScope::WholeGroup), "ab\u{0302}");
        assert_eq!(apply_accent("x ", '\u{0304}', AccentScope::LastChar), "x\u{0304} ");
        assert_eq!(apply_accent("x ", '\u{0304}', AccentScope::WholeGroup), "x \u{0304}");
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("αβγ", 3), "α");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
