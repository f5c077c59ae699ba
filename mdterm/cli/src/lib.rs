//! Command-line front end for `mdterm`.
//!
//! Option precedence, lowest first: built-in defaults (with OSC-8 support
//! detected for stdout), `NO_COLOR` and the `MDTERM_*` environment
//! variables, then the flags parsed here.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueHint};
use clap_complete::Shell;
use mdterm_lib::markdown::{RenderOptions, render_stream};
use mdterm_lib::math::{AccentScope, MathMode};
use mdterm_lib::terminal::ansi::AnsiBuilder;
use mdterm_lib::terminal::detect_width;
use mdterm_lib::terminal::supports::MAX_WIDTH;
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "mdterm",
    about = "Render Markdown with LaTeX math as styled terminal output",
    version
)]
pub struct Cli {
    /// Input files ("-" for stdin; reads stdin when none are given)
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub inputs: Vec<PathBuf>,

    /// Disable ANSI styling and hyperlinks
    #[arg(long)]
    pub no_color: bool,

    /// Wrap width in columns (0 detects the terminal width when wrapping)
    #[arg(long, value_name = "N", value_parser = parse_width)]
    pub width: Option<usize>,

    /// Math notation: unicode or ascii
    #[arg(long, value_name = "MODE", value_parser = parse_math_mode)]
    pub math: Option<MathMode>,

    /// Accent reach: last (final glyph) or group (every glyph)
    #[arg(long, value_name = "SCOPE", value_parser = parse_accent_scope)]
    pub accent: Option<AccentScope>,

    /// Report unmatched backticks and unclosed fences
    #[arg(long, overrides_with = "no_lint")]
    pub lint: bool,

    /// Skip the lint checker
    #[arg(long, overrides_with = "lint")]
    pub no_lint: bool,

    /// Soft-wrap paragraphs at the wrap width
    #[arg(long, overrides_with = "no_wrap")]
    pub wrap: bool,

    /// Never soft-wrap
    #[arg(long, overrides_with = "wrap")]
    pub no_wrap: bool,

    /// Emit OSC-8 hyperlinks even if the terminal was not detected as supporting them
    #[arg(long, overrides_with = "no_osc8")]
    pub osc8: bool,

    /// Print link targets in parentheses instead of OSC-8 hyperlinks
    #[arg(long, overrides_with = "osc8")]
    pub no_osc8: bool,

    /// Increase verbosity (-v INFO, -vv DEBUG, -vvv TRACE, -vvvv TRACE with file/line)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

fn parse_width(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(width) if width <= MAX_WIDTH => Ok(width),
        _ => Err(format!("invalid width '{s}' (expected 0-{MAX_WIDTH})")),
    }
}

fn parse_math_mode(s: &str) -> Result<MathMode, String> {
    s.parse().map_err(|e: mdterm_lib::math::ParseOptionError| e.to_string())
}

fn parse_accent_scope(s: &str) -> Result<AccentScope, String> {
    s.parse().map_err(|e: mdterm_lib::math::ParseOptionError| e.to_string())
}

/// Collapses a `--x`/`--no-x` pair into an optional override.
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Cli {
    /// Layers the command-line flags over `base`.
    ///
    /// When wrapping ends up enabled with no width, the terminal width is
    /// detected once here so every input shares it.
    pub fn resolve_options(&self, base: RenderOptions) -> RenderOptions {
        let mut options = base;
        if self.no_color {
            options.color = false;
        }
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(mode) = self.math {
            options.math_mode = mode;
        }
        if let Some(scope) = self.accent {
            options.accent_scope = scope;
        }
        if let Some(lint) = flag_pair(self.lint, self.no_lint) {
            options.lint = lint;
        }
        if let Some(wrap) = flag_pair(self.wrap, self.no_wrap) {
            options.wrap = wrap;
        }
        if let Some(osc8) = flag_pair(self.osc8, self.no_osc8) {
            options.osc8 = osc8;
        }
        if options.wrap && options.width == 0 {
            options.width = detect_width();
            debug!(width = options.width, "Detected wrap width");
        }
        options
    }

    /// Inputs to render, with stdin standing in for an empty list.
    pub fn input_paths(&self) -> Vec<PathBuf> {
        if self.inputs.is_empty() {
            vec![PathBuf::from("-")]
        } else {
            self.inputs.clone()
        }
    }
}

/// Renders every input in order to `out`, reporting problems on `err`.
///
/// Unreadable inputs and failed renders are reported and skipped. Returns
/// `true` when every input rendered.
///
/// ## Errors
///
/// Returns an error only if writing to `out` or `err` fails outside of a
/// render (the file separator or a report line).
pub fn run<O, E>(
    paths: &[PathBuf],
    options: &RenderOptions,
    out: &mut O,
    err: &mut E,
) -> io::Result<bool>
where
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    let separator = if options.color {
        format!("\n{}\n", AnsiBuilder::new().dim().wrap("---"))
    } else {
        "\n---\n".to_string()
    };

    let mut ok = true;
    let mut first = true;
    for path in paths {
        let mut input: Box<dyn Read> = if is_stdin(path) {
            Box::new(io::stdin().lock())
        } else {
            match File::open(path) {
                Ok(file) => Box::new(file),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cannot open input");
                    writeln!(err, "mdterm: cannot open '{}': {e}", path.display())?;
                    ok = false;
                    continue;
                }
            }
        };

        if !first {
            out.write_all(separator.as_bytes())?;
        }
        first = false;

        let name = display_name(path);
        info!(input = %name, "Rendering");
        match render_stream(&mut input, out, options) {
            Ok(diagnostics) => {
                for diagnostic in diagnostics {
                    writeln!(err, "{}", diagnostic.format_for(&name))?;
                }
            }
            Err(e) => {
                warn!(input = %name, error = %e, "Render failed");
                writeln!(err, "mdterm: {name}: {e}")?;
                ok = false;
            }
        }
    }
    out.flush()?;
    Ok(ok)
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}
