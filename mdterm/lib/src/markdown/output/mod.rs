//! Output backends for rendered Markdown.

mod style;
mod table;
pub mod terminal;

pub use terminal::{for_terminal, normalize_newlines, render_stream, write_terminal};
