//! LaTeX-style math rendering for terminals.
//!
//! Converts the content of `$...$` and `$$...$$` segments into Unicode or
//! ASCII notation. The renderer is a single left-to-right scan with recursive
//! descent into groups and command arguments.
//!
//! ## Examples
//!
//! ```rust
//! use mdterm_lib::math::{MathOptions, render};
//!
//! let out = render(r"\sum_{i=1}^{n} i^2", MathOptions::default()).unwrap();
//! assert_eq!(out, "∑ᵢ₌₁ⁿ i²");
//! ```

mod buffer;
mod cursor;
mod layout;
mod render;
mod script;
mod symbols;
mod types;

pub use buffer::ByteBuffer;
pub use render::{MAX_NESTING, render, render_bytes};
pub use types::{AccentScope, MathError, MathMode, MathOptions, MathResult, ParseOptionError};

#[cfg(test)]
mod tests;
