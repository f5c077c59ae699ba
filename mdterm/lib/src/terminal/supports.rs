//! Terminal capability detection.
//!
//! Only two capabilities matter to the renderer: how wide the output is and
//! whether OSC-8 hyperlinks will be understood. Both are best-effort; callers
//! always have an explicit override.

use supports_hyperlinks::Stream;
use terminal_size::{Width, terminal_size};

/// Upper bound accepted for widths coming from the environment.
pub const MAX_WIDTH: usize = 1_000_000;

/// Parses a positive column count, rejecting zero, garbage and absurd values.
pub(crate) fn parse_width(value: &str) -> Option<usize> {
    match value.trim().parse::<usize>() {
        Ok(w) if w > 0 && w < MAX_WIDTH => Some(w),
        _ => None,
    }
}

/// Best-effort detection of the output width in columns.
///
/// Honours `COLUMNS` first, then asks the terminal. Returns 0 when the width
/// is unknown, which the wrap engine treats as "do not wrap".
///
/// ## Examples
///
/// ```
/// use mdterm_lib::terminal::detect_width;
///
/// let width = detect_width();
/// assert!(width < 1_000_000);
/// ```
pub fn detect_width() -> usize {
    if let Some(width) = std::env::var("COLUMNS").ok().as_deref().and_then(parse_width) {
        tracing::debug!(width, "Width from COLUMNS");
        return width;
    }
    match terminal_size() {
        Some((Width(w), _)) if w > 0 => {
            tracing::debug!(width = w, "Width from terminal size");
            usize::from(w)
        }
        _ => {
            tracing::debug!("Terminal width unknown");
            0
        }
    }
}

/// Returns whether stdout is likely to understand OSC-8 hyperlinks.
#[inline]
pub fn supports_osc8() -> bool {
    supports_hyperlinks::on(Stream::Stdout)
}
