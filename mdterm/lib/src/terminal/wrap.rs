//! Greedy soft-wrap engine that understands escapes and display widths.
//!
//! The caller owns the column counter and threads it through successive
//! calls, so one visual line can be assembled from several writes (styled
//! spans, hyperlinks, math). Breaking is purely column-driven: there is no
//! word-boundary awareness, and a glyph that would cross the right edge is
//! moved to the next line whole.

use super::ansi::escape_len;
use super::width::{char_width, decode_utf8, str_width};
use std::io::{self, Write};

/// Writes `text` to `out`, soft-wrapping at `width` display columns.
///
/// - When `*column` is 0 the `prefix_first` string is written first and counted
///   into the column.
/// - A literal `'\n'` is a hard break: newline, then `prefix_next`.
/// - A glyph whose width would cross `width` is preceded by a soft break
///   (newline plus `prefix_next`); glyphs wider than `width` are never split.
/// - CSI and OSC sequences pass through verbatim and occupy no columns.
/// - Malformed UTF-8 bytes are copied as-is and counted as one column each.
/// - A `width` of 0 disables soft wrapping; prefixes are still applied.
///
/// The whole run is assembled in memory and written with one `write_all`, so
/// on error nothing partial is emitted and `*column` is left unchanged.
///
/// ## Examples
///
/// ```
/// use mdterm_lib::terminal::wrap_write;
///
/// let mut out = Vec::new();
/// let mut column = 0;
/// wrap_write(&mut out, "abcdef", 4, &mut column, "", "").unwrap();
/// assert_eq!(out, b"abcd\nef");
/// assert_eq!(column, 2);
/// ```
pub fn wrap_write<W, T>(
    out: &mut W,
    text: T,
    width: usize,
    column: &mut usize,
    prefix_first: &str,
    prefix_next: &str,
) -> io::Result<()>
where
    W: Write + ?Sized,
    T: AsRef<[u8]>,
{
    let bytes = text.as_ref();
    if bytes.is_empty() {
        return Ok(());
    }

    let next_width = str_width(prefix_next);
    let mut buf = Vec::with_capacity(bytes.len() + prefix_first.len() + 8);
    let mut col = *column;

    if col == 0 && !prefix_first.is_empty() {
        buf.extend_from_slice(prefix_first.as_bytes());
        col = str_width(prefix_first);
    }

    let mut i = 0;
    while i < bytes.len() {
        if let Some(len) = escape_len(&bytes[i..]) {
            buf.extend_from_slice(&bytes[i..i + len]);
            i += len;
            continue;
        }

        if bytes[i] == b'\n' {
            buf.push(b'\n');
            buf.extend_from_slice(prefix_next.as_bytes());
            col = next_width;
            i += 1;
            continue;
        }

        let (len, glyph_width) = match decode_utf8(&bytes[i..]) {
            Some((c, len)) => (len, char_width(c)),
            None => (1, 1),
        };

        if width > 0 && glyph_width > 0 {
            let at_edge = col >= width;
            let would_cross = col + glyph_width > width && glyph_width <= width;
            if at_edge || would_cross {
                buf.push(b'\n');
                buf.extend_from_slice(prefix_next.as_bytes());
                col = next_width;
            }
        }

        buf.extend_from_slice(&bytes[i..i + len]);
        col += glyph_width;
        i += len;
    }

    out.write_all(&buf)?;
    *column = col;
    Ok(())
}
