//! Forward-only cursor over a math source slice.

/// A `(source, position)` pair shared by every nested parse step.
///
/// The position only ever moves forward. Group readers either consume a
/// complete balanced group or leave the position untouched.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Everything not yet consumed.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `c` if it is next.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Advances `n` bytes, stopping at the end of input.
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
        while !self.src.is_char_boundary(self.pos) {
            self.pos += 1;
        }
    }

    /// Consumes everything that remains.
    pub fn take_rest(&mut self) -> &'a str {
        let rest = self.rest();
        self.pos = self.src.len();
        rest
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Reads a maximal run of ASCII letters (a command name).
    pub fn letters(&mut self) -> &'a str {
        let name = self.peek_letters();
        self.pos += name.len();
        name
    }

    /// The run of ASCII letters at the cursor, without consuming it.
    pub fn peek_letters(&self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .bytes()
            .take_while(u8::is_ascii_alphabetic)
            .count();
        &rest[..len]
    }

    /// Reads a balanced `open ... close` group and returns its inner text.
    ///
    /// Backslash escapes inside the group are skipped so `\{` and `\}` never
    /// count toward the depth. Returns `None` without consuming anything when
    /// the next character is not `open` or the group never closes.
    pub fn delimited(&mut self, open: char, close: char) -> Option<&'a str> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if c == open => {}
            _ => return None,
        }
        let mut depth = 1usize;
        while let Some((i, c)) = chars.next() {
            if c == '\\' {
                chars.next();
            } else if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    self.pos += i + close.len_utf8();
                    return Some(&rest[open.len_utf8()..i]);
                }
            }
        }
        None
    }

    /// Reads a balanced `{...}` group.
    #[inline]
    pub fn brace_group(&mut self) -> Option<&'a str> {
        self.delimited('{', '}')
    }

    /// Reads an optional `[...]` argument.
    #[inline]
    pub fn bracket_group(&mut self) -> Option<&'a str> {
        self.delimited('[', ']')
    }

    /// Reads one atom: a brace group's content, a whole `\command`, or a single character.
    ///
    /// Does not skip leading whitespace. Returns `None` at end of input, on a
    /// closing brace, or on an unbalanced group.
    pub fn atom(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        match self.peek()? {
            '{' => self.brace_group(),
            '}' => None,
            '\\' => {
                let start = self.pos;
                self.bump();
                if self.letters().is_empty() {
                    self.bump();
                }
                Some(&self.src[start..self.pos])
            }
            c => {
                self.bump();
                Some(&rest[..c.len_utf8()])
            }
        }
    }

    /// Like [`Cursor::atom`] but skips leading whitespace first.
    ///
    /// The position is restored when no argument follows.
    pub fn argument(&mut self) -> Option<&'a str> {
        let saved = self.pos;
        self.skip_whitespace();
        let arg = self.atom();
        if arg.is_none() {
            self.pos = saved;
        }
        arg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brace_group_balanced() {
        let mut c = Cursor::new("{a{b}c}rest");
        assert_eq!(c.brace_group(), Some("a{b}c"));
        assert_eq!(c.rest(), "rest");
    }

    #[test]
    fn test_brace_group_unbalanced_leaves_position() {
        let mut c = Cursor::new("{a{b}");
        assert_eq!(c.brace_group(), None);
        assert_eq!(c.pos(), 0);
    }

    #[test]
    fn test_brace_group_ignores_escaped_braces() {
        let mut c = Cursor::new(r"{\{x\}}!");
        assert_eq!(c.brace_group(), Some(r"\{x\}"));
        assert_eq!(c.rest(), "!");
    }

    #[test]
    fn test_atom_forms() {
        let mut c = Cursor::new(r"x\alpha{yz}\,");
        assert_eq!(c.atom(), Some("x"));
        assert_eq!(c.atom(), Some(r"\alpha"));
        assert_eq!(c.atom(), Some("yz"));
        assert_eq!(c.atom(), Some(r"\,"));
        assert_eq!(c.atom(), None);
    }

    #[test]
    fn test_argument_restores_on_absence() {
        let mut c = Cursor::new("   ");
        assert_eq!(c.argument(), None);
        assert_eq!(c.pos(), 0);
        let mut c = Cursor::new("  {ab}");
        assert_eq!(c.argument(), Some("ab"));
        assert!(c.rest().is_empty());
    }

    #[test]
    fn test_letters_stops_at_non_letter() {
        let mut c = Cursor::new("leq2");
        assert_eq!(c.peek_letters(), "leq");
        assert_eq!(c.pos(), 0);
        assert_eq!(c.letters(), "leq");
        assert_eq!(c.peek(), Some('2'));
    }

    #[test]
    fn test_advance_respects_char_boundaries() {
        let mut c = Cursor::new("αβ");
        c.advance(1);
        assert_eq!(c.rest(), "β");
    }
}
