//! SGR style state for the terminal renderer.

use crate::terminal::ansi::{AnsiBuilder, RESET, SgrColor};

/// A set of SGR attributes. Pushed as a delta and merged onto the active style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub inverse: bool,
    pub fg: Option<SgrColor>,
}

impl Style {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn dim() -> Self {
        Self {
            dim: true,
            ..Self::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Self::default()
        }
    }

    pub fn inverse() -> Self {
        Self {
            inverse: true,
            ..Self::default()
        }
    }

    pub fn fg(color: SgrColor) -> Self {
        Self {
            fg: Some(color),
            ..Self::default()
        }
    }

    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Layers `delta` on top of `self`; a colour in `delta` wins.
    pub fn merge(self, delta: Style) -> Self {
        Self {
            bold: self.bold || delta.bold,
            dim: self.dim || delta.dim,
            italic: self.italic || delta.italic,
            underline: self.underline || delta.underline,
            inverse: self.inverse || delta.inverse,
            fg: delta.fg.or(self.fg),
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// The SGR sequence that selects exactly this style after a reset.
    pub fn sequence(&self) -> String {
        let mut builder = AnsiBuilder::new();
        if self.bold {
            builder = builder.bold();
        }
        if self.dim {
            builder = builder.dim();
        }
        if self.italic {
            builder = builder.italic();
        }
        if self.underline {
            builder = builder.underline();
        }
        if self.inverse {
            builder = builder.inverse();
        }
        if let Some(color) = self.fg {
            builder = builder.fg(color);
        }
        builder.start_sequence()
    }
}

/// Stack of cumulative styles.
///
/// Every change emits a full reset followed by the complete active style.
/// When colour is disabled nothing is ever emitted.
#[derive(Debug)]
pub struct StyleStack {
    enabled: bool,
    stack: Vec<Style>,
    reset_pending: bool,
}

impl StyleStack {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            stack: Vec::new(),
            reset_pending: false,
        }
    }

    pub fn current(&self) -> Style {
        self.stack.last().copied().unwrap_or_default()
    }

    pub fn push(&mut self, delta: Style) -> String {
        let style = self.current().merge(delta);
        self.stack.push(style);
        self.apply(style)
    }

    pub fn pop(&mut self) -> String {
        self.stack.pop();
        self.apply(self.current())
    }

    /// The reset owed by a stream that ends while styled.
    pub fn finish(&mut self) -> String {
        self.stack.clear();
        if std::mem::take(&mut self.reset_pending) {
            RESET.to_string()
        } else {
            String::new()
        }
    }

    fn apply(&mut self, style: Style) -> String {
        if !self.enabled {
            return String::new();
        }
        self.reset_pending = !style.is_plain();
        format!("{RESET}{}", style.sequence())
    }
}
