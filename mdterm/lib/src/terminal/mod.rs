//! Terminal primitives: display width, escape sequences, soft wrapping and
//! capability detection.
//!
//! These are the leaves every render path builds on. Nothing here knows about
//! Markdown; the wrap engine only understands bytes, escapes and columns.

pub mod ansi;
pub mod supports;
pub mod width;
pub mod wrap;

pub use supports::{detect_width, supports_osc8};
pub use width::{char_width, decode_utf8, str_width};
pub use wrap::wrap_write;
