//! ANSI escape sequences: recognising them in a byte stream and building them.
//!
//! Two families matter to the renderer:
//!
//! - **CSI** (`ESC [ params intermediates final`), used for SGR styling.
//! - **OSC** (`ESC ] ... BEL` or `ESC ] ... ESC \`), used for OSC-8 hyperlinks.
//!
//! Both occupy zero columns and must pass through the wrap engine verbatim.
//!
//! ## Examples
//!
//! ```
//! use mdterm_lib::terminal::ansi::{AnsiBuilder, SgrColor, escape_len};
//!
//! let text = AnsiBuilder::new().bold().fg(SgrColor::Red).wrap("alert");
//! assert_eq!(text, "\x1b[1;31malert\x1b[0m");
//!
//! assert_eq!(escape_len(b"\x1b[1;31mhello"), Some(7));
//! assert_eq!(escape_len(b"hello"), None);
//! ```

/// Escape byte that starts every sequence.
pub const ESC: u8 = 0x1b;

/// BEL terminates OSC sequences in most terminals.
const BEL: u8 = 0x07;

/// Full SGR reset.
pub const RESET: &str = "\x1b[0m";

/// Opens an OSC-8 hyperlink: `ESC ] 8 ; ; <url> BEL`.
const LINK_START: &str = "\x1b]8;;";

/// Closes an OSC-8 hyperlink: `ESC ] 8 ; ; BEL`.
pub const LINK_END: &str = "\x1b]8;;\x07";

/// Returns the byte length of the escape sequence at the start of `bytes`.
///
/// Returns `None` when `bytes` does not start with `ESC`. Unterminated CSI and
/// OSC sequences extend to the end of the input; any other escape is treated
/// as `ESC` plus one byte.
pub fn escape_len(bytes: &[u8]) -> Option<usize> {
    if bytes.first() != Some(&ESC) {
        return None;
    }
    match bytes.get(1) {
        None => Some(1),
        Some(b'[') => {
            // Parameter and intermediate bytes fall in 0x20..=0x3F; the final byte in 0x40..=0x7E.
            let tail = &bytes[2..];
            let end = tail
                .iter()
                .position(|b| (0x40..=0x7E).contains(b))
                .map(|p| p + 1)
                .unwrap_or(tail.len());
            Some(2 + end)
        }
        Some(b']') => {
            let tail = &bytes[2..];
            let mut i = 0;
            while i < tail.len() {
                match tail[i] {
                    BEL => return Some(2 + i + 1),
                    ESC if tail.get(i + 1) == Some(&b'\\') => return Some(2 + i + 2),
                    _ => i += 1,
                }
            }
            Some(bytes.len())
        }
        Some(_) => Some(2),
    }
}

/// Builds the opening sequence of an OSC-8 hyperlink to `url`.
pub fn hyperlink_start(url: &str) -> String {
    format!("{LINK_START}{url}\x07")
}

/// The eight basic SGR foreground colours (codes 30-37).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SgrColor {
    Black = 30,
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
    Magenta = 35,
    Cyan = 36,
    White = 37,
}

impl SgrColor {
    /// Returns the SGR foreground parameter for this colour.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Builder for composing a single SGR escape sequence.
///
/// Codes are emitted in the order they are added, semicolon-separated.
#[derive(Debug, Clone, Default)]
pub struct AnsiBuilder {
    codes: Vec<u8>,
}

impl AnsiBuilder {
    /// Creates a new empty builder.
    #[inline]
    pub fn new() -> Self {
        Self { codes: Vec::new() }
    }

    /// Adds bold (SGR 1).
    #[inline]
    pub fn bold(mut self) -> Self {
        self.codes.push(1);
        self
    }

    /// Adds dim (SGR 2).
    #[inline]
    pub fn dim(mut self) -> Self {
        self.codes.push(2);
        self
    }

    /// Adds italic (SGR 3).
    #[inline]
    pub fn italic(mut self) -> Self {
        self.codes.push(3);
        self
    }

    /// Adds underline (SGR 4).
    #[inline]
    pub fn underline(mut self) -> Self {
        self.codes.push(4);
        self
    }

    /// Adds inverse video (SGR 7).
    #[inline]
    pub fn inverse(mut self) -> Self {
        self.codes.push(7);
        self
    }

    /// Sets a basic foreground colour (SGR 30-37).
    #[inline]
    pub fn fg(mut self, color: SgrColor) -> Self {
        self.codes.push(color.code());
        self
    }

    /// Returns `true` when no codes have been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Builds just the opening sequence, or an empty string when no codes were added.
    pub fn start_sequence(&self) -> String {
        if self.codes.is_empty() {
            return String::new();
        }
        let codes: Vec<String> = self.codes.iter().map(u8::to_string).collect();
        format!("\x1b[{}m", codes.join(";"))
    }

    /// Wraps `text` in the opening sequence and a reset.
    ///
    /// Returns the text unchanged when no codes were added.
    pub fn wrap(self, text: &str) -> String {
        if self.codes.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.start_sequence(), text, RESET)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_returns_unchanged() {
        assert_eq!(AnsiBuilder::new().wrap("hello"), "hello");
        assert_eq!(AnsiBuilder::new().start_sequence(), "");
    }

    #[test]
    fn test_combined_codes_keep_order() {
        let seq = AnsiBuilder::new()
            .bold()
            .dim()
            .italic()
            .underline()
            .inverse()
            .fg(SgrColor::Cyan)
            .start_sequence();
        assert_eq!(seq, "\x1b[1;2;3;4;7;36m");
    }

    #[test]
    fn test_csi_length() {
        assert_eq!(escape_len(b"\x1b[0m"), Some(4));
        assert_eq!(escape_len(b"\x1b[38;5;12mX"), Some(10));
        assert_eq!(escape_len(b"\x1b[K"), Some(3));
    }

    #[test]
    fn test_osc_terminators() {
        assert_eq!(escape_len(b"\x1b]8;;http://a\x07text"), Some(14));
        assert_eq!(escape_len(b"\x1b]8;;\x1b\\text"), Some(7));
    }

    #[test]
    fn test_unterminated_sequences_run_to_end() {
        assert_eq!(escape_len(b"\x1b[12;"), Some(5));
        assert_eq!(escape_len(b"\x1b]8;;never"), Some(11));
        assert_eq!(escape_len(b"\x1b"), Some(1));
    }

    #[test]
    fn test_two_byte_escape() {
        assert_eq!(escape_len(b"\x1b7rest"), Some(2));
    }

    #[test]
    fn test_hyperlink_start() {
        assert_eq!(hyperlink_start("https://e.x"), "\x1b]8;;https://e.x\x07");
    }
}
