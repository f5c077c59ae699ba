//! Codepoint display widths and a forgiving UTF-8 decoder.
//!
//! Width follows the East Asian Width property as published by
//! `unicode-width`: combining marks and control characters occupy no columns,
//! wide and fullwidth codepoints occupy two, everything else one.

use super::ansi::escape_len;
use unicode_width::UnicodeWidthChar;

/// Returns the number of terminal columns `c` occupies (0, 1 or 2).
///
/// ## Examples
///
/// ```
/// use mdterm_lib::terminal::char_width;
///
/// assert_eq!(char_width('a'), 1);
/// assert_eq!(char_width('漢'), 2);
/// assert_eq!(char_width('\u{0301}'), 0);
/// ```
#[inline]
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        return 0;
    }
    UnicodeWidthChar::width(c).unwrap_or(0).min(2)
}

/// Decodes the codepoint at the start of `bytes`.
///
/// Returns the character and the number of bytes it occupies, or `None` when
/// the leading bytes are not a well-formed UTF-8 sequence. Callers treat a
/// `None` as one opaque byte of width 1.
pub fn decode_utf8(bytes: &[u8]) -> Option<(char, usize)> {
    let lead = *bytes.first()?;
    let len = match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return None,
    };
    let chunk = bytes.get(..len)?;
    let decoded = std::str::from_utf8(chunk).ok()?;
    decoded.chars().next().map(|c| (c, len))
}

/// Returns the display width of `s`, ignoring CSI and OSC escape sequences.
///
/// Newlines contribute nothing; the result is the sum over all lines, so
/// callers measuring a block should split on `'\n'` first.
///
/// ## Examples
///
/// ```
/// use mdterm_lib::terminal::str_width;
///
/// assert_eq!(str_width("\x1b[1mbold\x1b[0m"), 4);
/// assert_eq!(str_width("\x1b]8;;https://x.y\x07link\x1b]8;;\x07"), 4);
/// assert_eq!(str_width("日本"), 4);
/// ```
pub fn str_width(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut width = 0;
    let mut i = 0;
    while i < bytes.len() {
        if let Some(len) = escape_len(&bytes[i..]) {
            i += len;
            continue;
        }
        match decode_utf8(&bytes[i..]) {
            Some((c, len)) => {
                width += char_width(c);
                i += len;
            }
            None => {
                width += 1;
                i += 1;
            }
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_printable_is_narrow() {
        for c in ' '..='~' {
            assert_eq!(char_width(c), 1, "{c:?}");
        }
    }

    #[test]
    fn test_controls_are_zero_width() {
        assert_eq!(char_width('\n'), 0);
        assert_eq!(char_width('\t'), 0);
        assert_eq!(char_width('\u{7f}'), 0);
        assert_eq!(char_width('\u{9b}'), 0);
    }

    #[test]
    fn test_wide_and_combining() {
        assert_eq!(char_width('界'), 2);
        assert_eq!(char_width('ｱ'), 1);
        assert_eq!(char_width('Ａ'), 2);
        assert_eq!(char_width('\u{0302}'), 0);
        assert_eq!(char_width('\u{20D7}'), 0);
    }

    #[test]
    fn test_decode_multibyte() {
        assert_eq!(decode_utf8("α".as_bytes()), Some(('α', 2)));
        assert_eq!(decode_utf8("√x".as_bytes()), Some(('√', 3)));
        assert_eq!(decode_utf8("😀".as_bytes()), Some(('😀', 4)));
    }

    #[test]
    fn test_decode_malformed() {
        assert_eq!(decode_utf8(&[]), None);
        assert_eq!(decode_utf8(&[0x80]), None);
        assert_eq!(decode_utf8(&[0xC0, 0x80]), None);
        assert_eq!(decode_utf8(&[0xE2, 0x88]), None);
        assert_eq!(decode_utf8(&[0xFF, b'a']), None);
    }

    #[test]
    fn test_str_width_skips_escapes() {
        assert_eq!(str_width(""), 0);
        assert_eq!(str_width("\x1b[0m\x1b[1;3;34m"), 0);
        assert_eq!(str_width("a\x1b[4mb\x1b[0mc"), 3);
        assert_eq!(str_width("x\u{0302}"), 1);
    }
}
