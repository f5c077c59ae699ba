//! Testing utilities for terminal output verification.
//!
//! ## Text-Based Verification
//!
//! Use `strip_ansi_codes()` to drop SGR styling when only the text matters,
//! or `strip_escape_codes()` to drop OSC-8 hyperlinks as well:
//!
//! ```rust
//! use mdterm_lib::testing::{strip_ansi_codes, strip_escape_codes};
//!
//! let output = "\x1b[1mTitle\x1b[0m";
//! assert_eq!(strip_ansi_codes(output), "Title");
//!
//! let link = "\x1b]8;;https://example.com\x07site\x1b]8;;\x07";
//! assert_eq!(strip_escape_codes(link), "site");
//! ```
//!
//! ## Environment
//!
//! `ScopedEnv` sets a variable for the lifetime of a guard. Pair it with
//! `#[serial]` from `serial_test`, since the process environment is shared.

pub mod terminal;

pub use terminal::{ScopedEnv, strip_ansi_codes, strip_escape_codes};
