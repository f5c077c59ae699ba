//! Type definitions for the math module.

use std::collections::TryReserveError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Notation used for rendered math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MathMode {
    /// Unicode glyphs: `α`, `≤`, `x²`, `√(x)`.
    #[default]
    Unicode,
    /// Plain ASCII fallbacks: `alpha`, `<=`, `x^2`, `sqrt(x)`.
    Ascii,
}

/// How far an accent command reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccentScope {
    /// The combining mark lands on the last character of the argument.
    #[default]
    LastChar,
    /// The mark is appended once, after the whole rendered argument.
    WholeGroup,
}

/// Options for a single math render call.
///
/// `display` selects the stacked multi-line layout for sums, fractions and
/// matrices. It is an explicit per-call flag: sub-renders of arguments are
/// always inline, whatever the outer call asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MathOptions {
    pub mode: MathMode,
    pub accent_scope: AccentScope,
    pub display: bool,
}

impl MathOptions {
    /// Returns a copy of these options with the display flag cleared.
    #[inline]
    pub fn inline(self) -> Self {
        Self {
            display: false,
            ..self
        }
    }

    /// Returns a copy of these options with the display flag set.
    #[inline]
    pub fn display(self) -> Self {
        Self {
            display: true,
            ..self
        }
    }
}

/// Errors that can abort a math render.
///
/// Malformed input never produces an error; it degrades to literal or partial
/// output instead.
#[derive(Error, Debug)]
pub enum MathError {
    /// The output buffer could not grow.
    #[error("Out of memory while rendering math: {0}")]
    Allocation(#[from] TryReserveError),

    /// Groups were nested deeper than the renderer allows.
    #[error("Math nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Result type for math rendering.
pub type MathResult<T> = Result<T, MathError>;

/// Error returned when an option value string is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} '{value}' (expected {expected})")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for MathMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unicode" => Ok(Self::Unicode),
            "ascii" => Ok(Self::Ascii),
            _ => Err(ParseOptionError {
                kind: "math mode",
                value: s.to_string(),
                expected: "unicode or ascii",
            }),
        }
    }
}

impl fmt::Display for MathMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unicode => "unicode",
            Self::Ascii => "ascii",
        })
    }
}

impl FromStr for AccentScope {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last" => Ok(Self::LastChar),
            "group" => Ok(Self::WholeGroup),
            _ => Err(ParseOptionError {
                kind: "accent scope",
                value: s.to_string(),
                expected: "last or group",
            }),
        }
    }
}

impl fmt::Display for AccentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LastChar => "last",
            Self::WholeGroup => "group",
        })
    }
}
