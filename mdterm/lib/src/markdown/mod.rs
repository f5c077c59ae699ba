//! Markdown document rendering.
//!
//! Parsing is CommonMark plus `$`/`$$` math. Pipe tables are recognised from
//! paragraph source and laid out by display width. Recoverable problems in
//! the input (unclosed fences, stray backticks, ragged tables) are reported
//! as [`Diagnostic`]s and never stop rendering.
//!
//! ## Examples
//!
//! ```
//! use mdterm_lib::markdown::{RenderOptions, lint, write_terminal};
//!
//! let source = "| a | b |\n|---|---|\n| 1 |\n";
//! let mut options = RenderOptions::default();
//! options.color = false;
//!
//! let mut out = Vec::new();
//! let mut diagnostics = lint(source);
//! diagnostics.extend(write_terminal(&mut out, source, &options).unwrap());
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].to_string(), "line 3: table row has 1 cells, expected 2");
//! ```

mod lint;
mod options;
pub mod output;
mod types;

pub use lint::lint;
pub use options::RenderOptions;
pub use output::{for_terminal, normalize_newlines, render_stream, write_terminal};
pub use types::{Diagnostic, RenderError, RenderResult};
