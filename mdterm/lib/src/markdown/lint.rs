//! Line-oriented lint checker for code fences and inline code spans.
//!
//! Two problems are reported, both non-fatal:
//!
//! - a fenced code block (three or more `` ` `` or `~`) that is never closed
//! - a line outside fences with an odd number of single-backtick runs
//!
//! ## Examples
//!
//! ```
//! use mdterm_lib::markdown::lint;
//!
//! let issues = lint("Use `cargo\n\n```rust\nfn main() {}\n");
//! let messages: Vec<_> = issues.iter().map(|d| d.format_for("-")).collect();
//! assert_eq!(
//!     messages,
//!     ["-:1: unmatched inline code backticks", "-:3: unclosed code fence"]
//! );
//! ```

use super::types::Diagnostic;

struct Fence {
    mark: u8,
    len: usize,
    line: usize,
}

fn run_len(bytes: &[u8], mark: u8) -> usize {
    bytes.iter().take_while(|&&b| b == mark).count()
}

/// Scans `source` and returns diagnostics in line order, with an unclosed
/// fence reported last.
pub fn lint(source: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut fence: Option<Fence> = None;

    for (index, line) in source.lines().enumerate() {
        let number = index + 1;
        let bytes = line.as_bytes();
        let trimmed = line.trim_start_matches([' ', '\t']).as_bytes();
        let lead = trimmed.first().copied();

        let on_fence_line = match fence.as_ref().map(|f| (f.mark, f.len)) {
            None => match lead {
                Some(mark @ (b'`' | b'~')) if bytes.len() >= 3 => {
                    let len = run_len(trimmed, mark);
                    if len >= 3 {
                        fence = Some(Fence {
                            mark,
                            len,
                            line: number,
                        });
                    }
                    len >= 3
                }
                _ => false,
            },
            Some((mark, len)) => {
                if lead == Some(mark) && run_len(trimmed, mark) >= len {
                    fence = None;
                }
                // Every line inside a fence is exempt from the inline check.
                true
            }
        };

        if !on_fence_line && has_unmatched_backtick(bytes) {
            diagnostics.push(Diagnostic::new(number, "unmatched inline code backticks"));
        }
    }

    if let Some(open) = fence {
        diagnostics.push(Diagnostic::new(open.line, "unclosed code fence"));
    }
    diagnostics
}

/// Toggles on each run of exactly one backtick; longer runs are ignored.
fn has_unmatched_backtick(line: &[u8]) -> bool {
    let mut open = false;
    let mut run = 0usize;
    for &b in line.iter().chain(std::iter::once(&b'\n')) {
        if b == b'`' {
            run += 1;
            continue;
        }
        if run == 1 {
            open = !open;
        }
        run = 0;
    }
    open
}
