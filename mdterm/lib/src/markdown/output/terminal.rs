//! Terminal output with ANSI styling, soft wrapping and OSC-8 hyperlinks.
//!
//! The renderer walks `pulldown-cmark` events with their source offsets and
//! keeps one piece of output state per stream: the current column, the style
//! stack, and a stack of container prefixes for block quotes and list items.
//! Every visible run goes through [`wrap_write`], so continuation prefixes are
//! re-applied at both hard and soft breaks.
//!
//! ## Examples
//!
//! ```
//! use mdterm_lib::markdown::{RenderOptions, for_terminal};
//!
//! let mut options = RenderOptions::default();
//! options.color = false;
//! let output = for_terminal("> quoted\n\n- one\n- two\n", &options).unwrap();
//! assert_eq!(output, "> quoted\n\n- one\n- two\n");
//! ```

use std::borrow::Cow;
use std::io::{self, Read, Write};
use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use tracing::{debug, warn};

use super::style::{Style, StyleStack};
use super::table::{self, TableScan};
use crate::markdown::lint::lint;
use crate::markdown::options::RenderOptions;
use crate::markdown::types::{Diagnostic, RenderResult};
use crate::math::{self, MathError};
use crate::terminal::ansi::{LINK_END, SgrColor, hyperlink_start};
use crate::terminal::{str_width, wrap_write};

/// Rule length when no wrap width is known.
const DEFAULT_RULE_WIDTH: usize = 40;

/// Replaces CRLF line endings with LF.
pub fn normalize_newlines(source: &str) -> Cow<'_, str> {
    if source.contains("\r\n") {
        Cow::Owned(source.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(source)
    }
}

/// Renders Markdown to a string of terminal output.
///
/// ## Examples
///
/// ```
/// use mdterm_lib::markdown::{RenderOptions, for_terminal};
///
/// let output = for_terminal("**bold**", &RenderOptions::default()).unwrap();
/// assert_eq!(output, "\x1b[0m\x1b[1mbold\x1b[0m\n");
/// ```
///
/// ## Errors
///
/// Returns [`crate::markdown::RenderError::Math`] if math rendering runs out of memory.
pub fn for_terminal(source: &str, options: &RenderOptions) -> RenderResult<String> {
    let mut out = Vec::with_capacity(source.len() * 2);
    write_terminal(&mut out, source, options)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Renders Markdown into `out` and returns the table diagnostics found.
///
/// ## Errors
///
/// Returns an error if writing to `out` fails or math rendering runs out of
/// memory. Malformed Markdown is never an error.
#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn write_terminal<W>(
    out: &mut W,
    source: &str,
    options: &RenderOptions,
) -> RenderResult<Vec<Diagnostic>>
where
    W: Write + ?Sized,
{
    let source = normalize_newlines(source);
    let mut writer = TerminalWriter::new(out, &source, options);
    writer.run()?;
    Ok(writer.diagnostics)
}

/// Reads one input stream to completion and renders it.
///
/// Invalid UTF-8 is replaced rather than rejected. When linting is enabled
/// the lint diagnostics come first, followed by those found while rendering.
///
/// ## Errors
///
/// Returns an error if reading `input` or writing `out` fails, or if math
/// rendering runs out of memory.
pub fn render_stream<R, W>(
    input: &mut R,
    out: &mut W,
    options: &RenderOptions,
) -> RenderResult<Vec<Diagnostic>>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    let text = String::from_utf8_lossy(&bytes);
    let source = normalize_newlines(&text);

    let mut diagnostics = if options.lint {
        lint(&source)
    } else {
        Vec::new()
    };
    diagnostics.extend(write_terminal(out, &source, options)?);
    Ok(diagnostics)
}

/// One open block quote or list item.
#[derive(Debug)]
struct Container {
    first: String,
    next: String,
    quote: bool,
    started: bool,
}

#[derive(Debug)]
struct LinkState {
    url: String,
    text: String,
}

struct TerminalWriter<'a, W: Write + ?Sized> {
    out: &'a mut W,
    source: &'a str,
    options: &'a RenderOptions,
    width: usize,
    column: usize,
    styles: StyleStack,
    containers: Vec<Container>,
    /// Next number for ordered lists, `None` for bullet lists.
    lists: Vec<Option<u64>>,
    links: Vec<LinkState>,
    image: Option<LinkState>,
    code_block: Option<String>,
    skipping_table: bool,
    /// Escapes opened since the last visible text, written after the next prefix.
    pending_escapes: String,
    /// A line break owed before the next visible text.
    break_pending: bool,
    blank_pending: bool,
    line_starts: Vec<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, W: Write + ?Sized> TerminalWriter<'a, W> {
    fn new(out: &'a mut W, source: &'a str, options: &'a RenderOptions) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        let width = options.wrap_width();
        debug!(width, color = options.color, "Rendering stream");
        Self {
            out,
            source,
            options,
            width,
            column: 0,
            styles: StyleStack::new(options.color),
            containers: Vec::new(),
            lists: Vec::new(),
            links: Vec::new(),
            image: None,
            code_block: None,
            skipping_table: false,
            pending_escapes: String::new(),
            break_pending: false,
            blank_pending: false,
            line_starts,
            diagnostics: Vec::new(),
        }
    }

    fn run(&mut self) -> RenderResult<()> {
        let parser = Parser::new_ext(self.source, Options::ENABLE_MATH);
        for (event, range) in parser.into_offset_iter() {
            self.event(event, range)?;
        }
        self.end_line()?;
        let reset = self.styles.finish();
        self.out.write_all(reset.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) -> RenderResult<()> {
        if self.skipping_table {
            if matches!(event, Event::End(TagEnd::Paragraph)) {
                self.skipping_table = false;
                self.end_block()?;
            }
            return Ok(());
        }
        if let Some(code) = self.code_block.as_mut() {
            match event {
                Event::Text(text) => code.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(code) = self.code_block.take() {
                        self.write_code_block(&code)?;
                    }
                }
                _ => {}
            }
            return Ok(());
        }
        if let Some(image) = self.image.as_mut() {
            match event {
                Event::Text(text) | Event::Code(text) => image.text.push_str(&text),
                Event::End(TagEnd::Image) => {
                    if let Some(image) = self.image.take() {
                        self.write_image(image)?;
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.inline_text(&text),
            Event::Code(code) => {
                self.push_style(Style::inverse())?;
                self.inline_text(&code)?;
                Ok(self.pop_style()?)
            }
            Event::InlineMath(src) => self.math(&src, false),
            Event::DisplayMath(src) => self.math(&src, true),
            Event::Html(html) => {
                for line in html.lines() {
                    self.push_style(Style::dim())?;
                    self.write_fixed(line)?;
                    self.pop_style()?;
                    self.end_line()?;
                }
                Ok(())
            }
            Event::InlineHtml(html) => {
                self.push_style(Style::dim())?;
                self.write_text(&html)?;
                Ok(self.pop_style()?)
            }
            Event::SoftBreak if self.options.wrap => {
                if self.column > 0 {
                    self.inline_text(" ")?;
                }
                Ok(())
            }
            Event::SoftBreak | Event::HardBreak => {
                self.break_pending = true;
                Ok(())
            }
            Event::Rule => self.write_rule(),
            _ => Ok(()),
        }
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) -> RenderResult<()> {
        match tag {
            Tag::Paragraph => self.paragraph(range)?,
            Tag::Heading { level, .. } => {
                self.begin_block()?;
                if self.options.color {
                    let style = match level {
                        HeadingLevel::H1 => Style::fg(SgrColor::Magenta),
                        HeadingLevel::H2 => Style::fg(SgrColor::Cyan),
                        _ => Style::default(),
                    };
                    self.push_style(style.with_bold())?;
                } else {
                    let marker = format!("{} ", "#".repeat(level as usize));
                    self.write_text(&marker)?;
                }
            }
            Tag::BlockQuote(_) => {
                self.begin_block()?;
                self.containers.push(Container {
                    first: "> ".to_string(),
                    next: "  ".to_string(),
                    quote: true,
                    started: false,
                });
            }
            Tag::CodeBlock(_) => {
                self.begin_block()?;
                self.code_block = Some(String::new());
            }
            Tag::HtmlBlock => self.begin_block()?,
            Tag::List(start) => {
                self.begin_block()?;
                self.lists.push(start);
            }
            Tag::Item => {
                self.begin_block()?;
                let marker = match self.lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{number}. ");
                        *number += 1;
                        marker
                    }
                    _ => "- ".to_string(),
                };
                let next = " ".repeat(str_width(&marker));
                self.containers.push(Container {
                    first: marker,
                    next,
                    quote: false,
                    started: false,
                });
            }
            Tag::Emphasis => self.push_style(Style::italic())?,
            Tag::Strong => self.push_style(Style::bold())?,
            Tag::Link { dest_url, .. } => {
                self.push_style(Style::fg(SgrColor::Blue).with_underline())?;
                if self.options.hyperlinks() {
                    self.pending_escapes.push_str(&hyperlink_start(&dest_url));
                }
                self.links.push(LinkState {
                    url: dest_url.to_string(),
                    text: String::new(),
                });
            }
            Tag::Image { dest_url, .. } => {
                self.image = Some(LinkState {
                    url: dest_url.to_string(),
                    text: String::new(),
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, tag: TagEnd) -> RenderResult<()> {
        match tag {
            TagEnd::Paragraph | TagEnd::HtmlBlock => self.end_block()?,
            TagEnd::Heading(_) => {
                if self.options.color {
                    self.pop_style()?;
                }
                self.end_block()?;
            }
            TagEnd::BlockQuote(_) => {
                self.end_line()?;
                self.containers.pop();
                self.blank_pending = true;
            }
            TagEnd::List(_) => {
                self.end_line()?;
                self.lists.pop();
                self.blank_pending = self.lists.is_empty();
            }
            TagEnd::Item => {
                self.end_line()?;
                self.containers.pop();
            }
            TagEnd::Emphasis | TagEnd::Strong => self.pop_style()?,
            TagEnd::Link => self.end_link()?,
            _ => {}
        }
        Ok(())
    }

    /// Starts a paragraph, or renders it as a table when its source is one.
    fn paragraph(&mut self, range: Range<usize>) -> RenderResult<()> {
        let first_line = self.line_of(range.start);
        let lines = self.paragraph_lines(range);
        match table::scan(&lines, first_line) {
            TableScan::Table { table, diagnostics } => {
                debug!(line = first_line, "Rendering paragraph as table");
                self.diagnostics.extend(diagnostics);
                let rendered = table::layout(&table, self.options)?;
                self.begin_block()?;
                for line in &rendered {
                    self.write_fixed(line)?;
                    self.end_line()?;
                }
                self.skipping_table = true;
            }
            TableScan::Malformed(diagnostic) => {
                self.diagnostics.push(diagnostic);
                self.begin_block()?;
            }
            TableScan::NotATable => self.begin_block()?,
        }
        Ok(())
    }

    /// Source lines of a paragraph with block quote markers removed.
    fn paragraph_lines(&self, range: Range<usize>) -> Vec<&'a str> {
        let source: &'a str = self.source;
        let depth = self.containers.iter().filter(|c| c.quote).count();
        source
            .get(range)
            .unwrap_or_default()
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    line
                } else {
                    strip_quote_markers(line, depth)
                }
            })
            .collect()
    }

    /// 1-based line number of a byte offset.
    fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    fn math(&mut self, src: &str, display: bool) -> RenderResult<()> {
        let src = if display { src.trim() } else { src };
        let rendered = match math::render(src, self.options.math_options(display)) {
            Ok(rendered) => rendered,
            Err(MathError::NestingTooDeep { limit }) => {
                warn!(limit, "Math nesting too deep, emitting source");
                let delimiter = if display { "$$" } else { "$" };
                format!("{delimiter}{src}{delimiter}")
            }
            Err(e) => return Err(e.into()),
        };

        if !display {
            return self.inline_text(&rendered);
        }
        self.end_line()?;
        for line in rendered.trim_end_matches('\n').split('\n') {
            if line.is_empty() {
                self.blank_line()?;
            } else {
                self.write_fixed(line)?;
                self.end_line()?;
            }
        }
        Ok(())
    }

    fn write_code_block(&mut self, code: &str) -> RenderResult<()> {
        for line in code.lines() {
            if line.is_empty() {
                self.blank_line()?;
                continue;
            }
            self.push_style(Style::fg(SgrColor::Yellow))?;
            self.write_fixed(&format!("  {line}"))?;
            self.pop_style()?;
            self.end_line()?;
        }
        self.end_block()?;
        Ok(())
    }

    fn write_rule(&mut self) -> RenderResult<()> {
        self.begin_block()?;
        let prefix = str_width(&self.prefixes().0);
        let length = match self.width {
            0 => DEFAULT_RULE_WIDTH,
            width => width.saturating_sub(prefix).max(3),
        };
        self.push_style(Style::dim())?;
        self.write_fixed(&"─".repeat(length))?;
        self.pop_style()?;
        self.end_block()?;
        Ok(())
    }

    fn write_image(&mut self, image: LinkState) -> RenderResult<()> {
        let label = format!("[image: {}]", image.text);
        self.push_style(Style::dim())?;
        if self.options.hyperlinks() {
            self.pending_escapes.push_str(&hyperlink_start(&image.url));
            self.write_text(&label)?;
            self.write_escape(LINK_END)?;
            self.pop_style()?;
        } else {
            self.write_text(&label)?;
            self.pop_style()?;
            if !image.url.is_empty() {
                self.write_text(&format!(" ({})", image.url))?;
            }
        }
        Ok(())
    }

    fn end_link(&mut self) -> RenderResult<()> {
        let Some(link) = self.links.pop() else {
            return Ok(());
        };
        if self.options.hyperlinks() {
            self.write_escape(LINK_END)?;
            self.pop_style()?;
        } else {
            self.pop_style()?;
            if !link.url.is_empty() && link.text != link.url {
                self.write_text(&format!(" ({})", link.url))?;
            }
        }
        Ok(())
    }

    fn inline_text(&mut self, text: &str) -> RenderResult<()> {
        if let Some(link) = self.links.last_mut() {
            link.text.push_str(text);
        }
        self.write_text(text)?;
        Ok(())
    }

    /// Composite (first, next) prefixes of all open containers.
    ///
    /// Quotes always start a line with their marker. On continuation lines
    /// only the innermost quote turns its `>` into a space.
    fn prefixes(&self) -> (String, String) {
        let innermost_quote = self.containers.iter().rposition(|c| c.quote);
        let mut first = String::new();
        let mut next = String::new();
        for (i, container) in self.containers.iter().enumerate() {
            let continuation = if container.quote && Some(i) != innermost_quote {
                &container.first
            } else {
                &container.next
            };
            first.push_str(if container.quote || !container.started {
                &container.first
            } else {
                continuation
            });
            next.push_str(continuation);
        }
        (first, next)
    }

    fn mark_started(&mut self) {
        for container in &mut self.containers {
            container.started = true;
        }
    }

    fn write_wrapped(&mut self, text: &str, width: usize) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if std::mem::take(&mut self.break_pending) && self.column > 0 {
            let (_, next) = self.prefixes();
            wrap_write(&mut *self.out, "\n", width, &mut self.column, "", &next)?;
        }
        let (first, next) = self.prefixes();
        let pending = std::mem::take(&mut self.pending_escapes);
        let run = if pending.is_empty() {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(pending + text)
        };
        wrap_write(&mut *self.out, run.as_bytes(), width, &mut self.column, &first, &next)?;
        self.mark_started();
        Ok(())
    }

    /// Writes text that soft-wraps at the stream width.
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.write_wrapped(text, self.width)
    }

    /// Writes text with prefixes but without soft wrapping.
    fn write_fixed(&mut self, text: &str) -> io::Result<()> {
        self.write_wrapped(text, 0)
    }

    /// Opening escapes wait for the next text so they land after its prefix.
    fn push_style(&mut self, delta: Style) -> io::Result<()> {
        let sequence = self.styles.push(delta);
        self.pending_escapes.push_str(&sequence);
        Ok(())
    }

    fn pop_style(&mut self) -> io::Result<()> {
        let sequence = self.styles.pop();
        self.write_escape(&sequence)
    }

    /// Writes a closing escape, queueing it behind any still-pending openers.
    fn write_escape(&mut self, sequence: &str) -> io::Result<()> {
        if self.pending_escapes.is_empty() {
            self.out.write_all(sequence.as_bytes())
        } else {
            self.pending_escapes.push_str(sequence);
            Ok(())
        }
    }

    fn end_line(&mut self) -> io::Result<()> {
        self.break_pending = false;
        let pending = std::mem::take(&mut self.pending_escapes);
        self.out.write_all(pending.as_bytes())?;
        if self.column > 0 {
            self.out.write_all(b"\n")?;
            self.column = 0;
        }
        Ok(())
    }

    /// An empty line carrying only the container markers.
    fn blank_line(&mut self) -> io::Result<()> {
        self.end_line()?;
        let (first, _) = self.prefixes();
        self.out.write_all(first.trim_end().as_bytes())?;
        self.out.write_all(b"\n")?;
        self.mark_started();
        Ok(())
    }

    fn begin_block(&mut self) -> io::Result<()> {
        self.end_line()?;
        if std::mem::take(&mut self.blank_pending) {
            self.blank_line()?;
        }
        Ok(())
    }

    fn end_block(&mut self) -> io::Result<()> {
        self.end_line()?;
        self.blank_pending = true;
        Ok(())
    }
}

/// Removes up to `depth` leading `>` markers (each with one optional space).
fn strip_quote_markers(mut line: &str, depth: usize) -> &str {
    for _ in 0..depth {
        match line.trim_start_matches(' ').strip_prefix('>') {
            Some(rest) => line = rest.strip_prefix(' ').unwrap_or(rest),
            None => break,
        }
    }
    line
}
