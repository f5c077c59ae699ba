//! GFM pipe tables recovered from paragraph source spans.
//!
//! The Markdown parser runs without its table extension, so a pipe table
//! arrives as an ordinary paragraph. The renderer hands each paragraph's
//! source lines to [`scan`], which decides whether they form a table.
//! Column widths are measured on the rendered cell text, so emphasis and
//! code markup do not count toward padding.

use std::borrow::Cow;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use tracing::{debug, warn};

use super::style::{Style, StyleStack};
use crate::markdown::options::RenderOptions;
use crate::markdown::types::{Diagnostic, RenderResult};
use crate::math::{self, MathError};
use crate::terminal::ansi::{LINK_END, SgrColor, hyperlink_start};
use crate::terminal::str_width;

lazy_static::lazy_static! {
    static ref SEPARATOR_CELL: Regex = Regex::new(r"^:?-{3,}:?$").unwrap();
    /// Cell openings the parser would read as a list, heading, quote, fence,
    /// thematic break or link reference definition.
    static ref BLOCK_MARKER: Regex = Regex::new(
        r"^(?:[-+*](?:\s|$)|#{1,6}(?:\s|$)|>|`{3}|~{3}|\[[^\]]*\]:|(?:-[ \t]*){3,}$|(?:\*[ \t]*){3,}$|(?:_[ \t]*){3,}$)"
    )
    .unwrap();
    static ref ORDERED_MARKER: Regex = Regex::new(r"^(\d{1,9})([.)](?:\s|$))").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    fn from_separator(cell: &str) -> Self {
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Self::Center,
            (false, true) => Self::Right,
            _ => Self::Left,
        }
    }

    /// Pads `text` (already `text_width` columns wide) to `width`.
    pub fn pad(self, text: &str, text_width: usize, width: usize) -> String {
        let pad = width.saturating_sub(text_width);
        let (left, right) = match self {
            Self::Left => (0, pad),
            Self::Right => (pad, 0),
            Self::Center => (pad / 2, pad - pad / 2),
        };
        format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
    }
}

/// Raw cells of a detected table. Every row has exactly `alignments.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable<'a> {
    pub header: Vec<&'a str>,
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<&'a str>>,
}

/// Outcome of examining a paragraph for a table.
#[derive(Debug)]
pub enum TableScan<'a> {
    NotATable,
    /// Looked like a table but the separator row is invalid.
    Malformed(Diagnostic),
    Table {
        table: RawTable<'a>,
        diagnostics: Vec<Diagnostic>,
    },
}

/// Examines paragraph `lines` starting at 1-based source line `first_line`.
pub fn scan<'a>(lines: &[&'a str], first_line: usize) -> TableScan<'a> {
    let (Some(head), Some(separator)) = (lines.first(), lines.get(1)) else {
        return TableScan::NotATable;
    };
    if !head.contains('|') || !separator.contains('|') || !separator.contains('-') {
        return TableScan::NotATable;
    }

    let separator_cells = split_row(*separator);
    if separator_cells.is_empty() || !separator_cells.iter().all(|c| SEPARATOR_CELL.is_match(c)) {
        let diagnostic = Diagnostic::new(first_line + 1, "malformed table separator row");
        warn!(line = diagnostic.line, "{}", diagnostic.message);
        return TableScan::Malformed(diagnostic);
    }
    let alignments: Vec<Alignment> = separator_cells
        .iter()
        .map(|c| Alignment::from_separator(c))
        .collect();
    let columns = alignments.len();

    let mut diagnostics = Vec::new();
    let mut fit = |cells: Vec<&'a str>, line: usize| -> Vec<&'a str> {
        if cells.len() != columns {
            let diagnostic = Diagnostic::new(
                line,
                format!("table row has {} cells, expected {columns}", cells.len()),
            );
            warn!(line, "{}", diagnostic.message);
            diagnostics.push(diagnostic);
        }
        let mut cells = cells;
        cells.resize(columns, "");
        cells
    };

    let header = fit(split_row(*head), first_line);
    let rows = lines[2..]
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| fit(split_row(line), first_line + 2 + i))
        .collect();

    TableScan::Table {
        table: RawTable {
            header,
            alignments,
            rows,
        },
        diagnostics,
    }
}

/// Splits a row on unescaped pipes, dropping the optional outer pipes.
pub fn split_row(line: &str) -> Vec<&str> {
    let mut row = line.trim();
    if let Some(rest) = row.strip_prefix('|') {
        row = rest;
    }
    if row.ends_with('|') && !row.ends_with("\\|") {
        row = &row[..row.len() - 1];
    }
    if row.trim().is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, b) in row.bytes().enumerate() {
        match b {
            b'\\' if !escaped => {
                escaped = true;
                continue;
            }
            b'|' if !escaped => {
                cells.push(row[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
        escaped = false;
    }
    cells.push(row[start..].trim());
    cells
}

/// A cell rendered to styled text plus its display width.
struct Cell {
    text: String,
    width: usize,
}

/// Backslash-escapes a leading block marker so the cell parses as one
/// paragraph of inline content.
fn escape_block_marker(cell: &str) -> Cow<'_, str> {
    if let Some(caps) = ORDERED_MARKER.captures(cell) {
        return Cow::Owned(format!("{}\\{}", &caps[1], &cell[caps[1].len()..]));
    }
    if BLOCK_MARKER.is_match(cell) {
        return Cow::Owned(format!("\\{cell}"));
    }
    Cow::Borrowed(cell)
}

/// Renders the inline Markdown of one cell with a nested parser walk.
fn render_cell(source: &str, options: &RenderOptions, base: Style) -> RenderResult<Cell> {
    let mut styles = StyleStack::new(options.color);
    let mut text = String::new();
    if !base.is_plain() {
        text.push_str(&styles.push(base));
    }
    // (url, link text) of each open link.
    let mut links: Vec<(String, String)> = Vec::new();

    let source = source.replace("\\|", "|");
    let source = escape_block_marker(&source);
    for event in Parser::new_ext(&source, Options::ENABLE_MATH) {
        match event {
            Event::Text(t) => {
                if let Some((_, link_text)) = links.last_mut() {
                    link_text.push_str(&t);
                }
                text.push_str(&t);
            }
            Event::Code(code) => {
                text.push_str(&styles.push(Style::inverse()));
                text.push_str(&code);
                text.push_str(&styles.pop());
            }
            Event::InlineMath(src) | Event::DisplayMath(src) => {
                match math::render(&src, options.math_options(false)) {
                    Ok(rendered) => text.push_str(&rendered),
                    Err(MathError::NestingTooDeep { limit }) => {
                        warn!(limit, "math nesting too deep in table cell, emitting source");
                        text.push_str(&src);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Event::Start(Tag::Emphasis) => text.push_str(&styles.push(Style::italic())),
            Event::Start(Tag::Strong) => text.push_str(&styles.push(Style::bold())),
            Event::Start(Tag::Link { dest_url, .. }) => {
                text.push_str(&styles.push(Style::fg(SgrColor::Blue).with_underline()));
                if options.hyperlinks() {
                    text.push_str(&hyperlink_start(&dest_url));
                }
                links.push((dest_url.to_string(), String::new()));
            }
            Event::End(TagEnd::Link) => {
                let Some((url, link_text)) = links.pop() else {
                    continue;
                };
                if options.hyperlinks() {
                    text.push_str(LINK_END);
                    text.push_str(&styles.pop());
                } else {
                    text.push_str(&styles.pop());
                    if !url.is_empty() && link_text != url {
                        text.push_str(&format!(" ({url})"));
                    }
                }
            }
            Event::End(TagEnd::Emphasis | TagEnd::Strong) => text.push_str(&styles.pop()),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::InlineHtml(html) | Event::Html(html) => text.push_str(&html),
            _ => {}
        }
    }
    text.push_str(&styles.finish());

    let width = str_width(&text);
    Ok(Cell { text, width })
}

/// Lays out a table as lines of text, without trailing newlines.
#[tracing::instrument(level = "debug", skip_all, fields(columns = table.alignments.len(), rows = table.rows.len()))]
pub fn layout(table: &RawTable<'_>, options: &RenderOptions) -> RenderResult<Vec<String>> {
    let header = table
        .header
        .iter()
        .map(|c| render_cell(c, options, Style::bold()))
        .collect::<RenderResult<Vec<_>>>()?;
    let rows = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|c| render_cell(c, options, Style::default()))
                .collect::<RenderResult<Vec<_>>>()
        })
        .collect::<RenderResult<Vec<_>>>()?;

    let mut widths: Vec<usize> = header.iter().map(|c| c.width).collect();
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.width);
        }
    }
    debug!(?widths, "table column widths");

    let format_row = |cells: &[Cell]| -> String {
        cells
            .iter()
            .zip(&table.alignments)
            .zip(&widths)
            .map(|((cell, align), &w)| align.pad(&cell.text, cell.width, w))
            .collect::<Vec<_>>()
            .join(" │ ")
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(&header));
    lines.push(
        widths
            .iter()
            .map(|&w| "─".repeat(w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    for row in &rows {
        lines.push(format_row(row));
    }
    Ok(lines)
}
