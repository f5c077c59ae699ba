//! Render options and their environment overrides.

use tracing::debug;

use crate::math::{AccentScope, MathMode, MathOptions};
use crate::terminal::{detect_width, supports, supports_osc8};

/// Options for rendering a Markdown stream. Read-only once rendering starts.
///
/// ## Examples
///
/// ```
/// use mdterm_lib::markdown::RenderOptions;
/// use mdterm_lib::math::MathMode;
///
/// let mut options = RenderOptions::default();
/// options.wrap = true;
/// options.width = 72;
/// options.math_mode = MathMode::Ascii;
/// assert_eq!(options.wrap_width(), 72);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RenderOptions {
    /// Emit SGR styling and OSC-8 links.
    pub color: bool,
    /// Wrap width in columns. 0 means "detect" when wrapping is on.
    pub width: usize,
    /// Notation for math segments.
    pub math_mode: MathMode,
    /// Reach of accent commands such as `\hat`.
    pub accent_scope: AccentScope,
    /// Run the lint checker before rendering.
    pub lint: bool,
    /// Soft-wrap paragraphs at the wrap width.
    pub wrap: bool,
    /// Wrap links in OSC-8 hyperlink sequences.
    pub osc8: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            width: 0,
            math_mode: MathMode::Unicode,
            accent_scope: AccentScope::LastChar,
            lint: true,
            wrap: false,
            osc8: false,
        }
    }
}

impl RenderOptions {
    /// Defaults with OSC-8 support detected for stdout and environment
    /// overrides applied.
    pub fn detect() -> Self {
        let mut options = Self {
            osc8: supports_osc8(),
            ..Self::default()
        };
        options.apply_env_overrides();
        options
    }

    /// Applies `NO_COLOR` and the `MDTERM_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies environment-style overrides read through `lookup`.
    ///
    /// Unparseable values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).is_some_and(|v| !v.is_empty());

        if set("NO_COLOR") || set("MDTERM_NO_COLOR") {
            self.color = false;
        }
        if let Some(value) = lookup("MDTERM_WIDTH") {
            match supports::parse_width(&value) {
                Some(width) => self.width = width,
                None => debug!(value = %value, "Ignoring invalid MDTERM_WIDTH"),
            }
        }
        if let Some(value) = lookup("MDTERM_MATH") {
            match value.trim().parse() {
                Ok(mode) => self.math_mode = mode,
                Err(e) => debug!(error = %e, "Ignoring MDTERM_MATH"),
            }
        }
        if let Some(value) = lookup("MDTERM_ACCENT") {
            match value.trim().parse() {
                Ok(scope) => self.accent_scope = scope,
                Err(e) => debug!(error = %e, "Ignoring MDTERM_ACCENT"),
            }
        }
        if set("MDTERM_NO_LINT") {
            self.lint = false;
        }
        if let Some(value) = lookup("MDTERM_WRAP") {
            match parse_flag(&value) {
                Some(wrap) => self.wrap = wrap,
                None => debug!(value = %value, "Ignoring invalid MDTERM_WRAP"),
            }
        }
        if set("MDTERM_NO_OSC8") {
            self.osc8 = false;
        }
    }

    /// Math options for a segment rendered inline or as a display block.
    pub fn math_options(&self, display: bool) -> MathOptions {
        MathOptions {
            mode: self.math_mode,
            accent_scope: self.accent_scope,
            display,
        }
    }

    /// Width the wrap engine should use, or 0 for no wrapping.
    ///
    /// With wrapping on and no explicit width, falls back to
    /// [`detect_width`].
    pub fn wrap_width(&self) -> usize {
        match (self.wrap, self.width) {
            (false, _) => 0,
            (true, 0) => detect_width(),
            (true, width) => width,
        }
    }

    /// Whether links should be emitted as OSC-8 hyperlinks.
    #[inline]
    pub fn hyperlinks(&self) -> bool {
        self.color && self.osc8
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
