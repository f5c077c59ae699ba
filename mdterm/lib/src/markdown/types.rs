//! Type definitions for the markdown module.

use std::fmt;
use thiserror::Error;

use crate::math::MathError;

/// Errors that can abort rendering a Markdown stream.
///
/// Malformed Markdown and math never produce these; they degrade to literal
/// output and, where useful, a [`Diagnostic`].
#[derive(Error, Debug)]
pub enum RenderError {
    /// Writing to the output sink failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// The math renderer ran out of memory.
    #[error("Failed to render math: {0}")]
    Math(#[from] MathError),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// A line-numbered, non-fatal warning about the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based source line.
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    /// Formats the diagnostic as `<file>:<line>: <message>`.
    pub fn format_for(&self, file: &str) -> String {
        format!("{file}:{}: {}", self.line, self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_format_for() {
        let d = Diagnostic::new(3, "unclosed code fence");
        assert_eq!(d.format_for("notes.md"), "notes.md:3: unclosed code fence");
        assert_eq!(d.to_string(), "line 3: unclosed code fence");
    }

    #[test]
    fn test_render_error_from_math() {
        let err: RenderError = MathError::NestingTooDeep { limit: 64 }.into();
        assert_eq!(err.to_string(), "Failed to render math: Math nesting exceeds 64 levels");
    }
}
