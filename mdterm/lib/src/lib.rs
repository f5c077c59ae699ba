//! Markdown and LaTeX-style math rendering for ANSI terminals.
//!
//! This library turns Markdown source (with `$...$` / `$$...$$` math segments)
//! into styled, width-aware terminal output: SGR styling, OSC-8 hyperlinks,
//! greedy soft wrapping with list/quote continuation prefixes, and GFM table
//! layout measured in display columns.
//!
//! ## Modules
//!
//! - [`markdown`] - Document rendering, options, diagnostics and the lint checker
//! - [`math`] - The math-segment renderer (Unicode or ASCII notation)
//! - [`terminal`] - Display width, escape scanning, soft wrapping and capability detection
//! - [`testing`] - Helpers for asserting on terminal output
//!
//! ## Examples
//!
//! ```
//! use mdterm_lib::markdown::{RenderOptions, for_terminal};
//!
//! let mut options = RenderOptions::default();
//! options.color = false;
//! let output = for_terminal("Euler: $e^{i\\pi} + 1 = 0$", &options).unwrap();
//! assert_eq!(output, "Euler: eⁱπ + 1 = 0\n");
//! ```

pub mod markdown;
pub mod math;
pub mod terminal;

pub mod testing;
