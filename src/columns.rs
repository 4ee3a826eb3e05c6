//! Two-column repair.
//!
//! PDF extraction of two-column papers breaks sentences at every column edge
//! and leaves stray fragments (page letters, lone digits) on their own lines:
//!
//! ```text
//! Extracted:                      Repaired:
//! "Transformers have been"        "Transformers have been applied to vision
//! "applied to vision tasks."       tasks."
//! "a"                             (dropped)
//! "We evaluate on four bench-"    "We evaluate on four benchmarks."
//! "marks."
//! ```
//!
//! The join decision is a two-state machine over lines:
//!
//! ```text
//!             line ends in . ! ? :
//!   Normal ─────────────────────────▶ emit, stay Normal
//!     │
//!     │ line ends mid-sentence
//!     ▼
//!   PendingJoin(held)
//!     │ next line starts lowercase  → held + next, re-evaluate
//!     │ otherwise                   → emit held, process next from Normal
//! ```
//!
//! Lines shorter than three characters are dropped before they reach the
//! machine, so a held line joins across them. Running headers and footers
//! ("Page 3", "Copyright ...") are emitted on their own without touching the
//! held line, so a sentence broken by a page boundary still joins and the
//! header stays a separate line for the page-furniture stage to remove.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::clean::is_page_furniture;

/// Lines with fewer characters than this are column-split artifacts.
const MIN_LINE_CHARS: usize = 3;

static HYPHEN_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)-\s*\n\s*(\w+)").expect("valid regex"));

/// Where the merger is between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnState {
    /// Nothing held back.
    Normal,
    /// A line that ends mid-sentence is held, waiting for its continuation.
    PendingJoin,
}

/// Line-by-line two-column merger.
///
/// ```rust
/// use paperslab::{ColumnMerger, ColumnState};
///
/// let mut merger = ColumnMerger::new();
/// merger.feed("Transformers have been");
/// assert_eq!(merger.state(), ColumnState::PendingJoin);
/// merger.feed("applied to vision tasks.");
/// assert_eq!(merger.state(), ColumnState::Normal);
///
/// assert_eq!(
///     merger.finish(),
///     vec!["Transformers have been applied to vision tasks.".to_string()]
/// );
/// ```
#[derive(Debug, Default)]
pub struct ColumnMerger {
    held: Option<String>,
    lines: Vec<String>,
}

impl ColumnMerger {
    /// Create an empty merger in the `Normal` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the machine.
    #[must_use]
    pub const fn state(&self) -> ColumnState {
        if self.held.is_some() {
            ColumnState::PendingJoin
        } else {
            ColumnState::Normal
        }
    }

    /// Feed one raw line.
    pub fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.chars().count() < MIN_LINE_CHARS {
            return;
        }
        if is_page_furniture(line) {
            self.lines.push(line.to_string());
            return;
        }

        let current = match self.held.take() {
            Some(held) if starts_lowercase(line) => join_fragments(&held, line),
            Some(held) => {
                self.lines.push(held);
                line.to_string()
            }
            None => line.to_string(),
        };

        if ends_sentence(&current) {
            self.lines.push(current);
        } else {
            self.held = Some(current);
        }
    }

    /// Emit anything still held and return the repaired lines.
    #[must_use]
    pub fn finish(mut self) -> Vec<String> {
        self.lines.extend(self.held.take());
        self.lines
    }
}

/// Merge column-wrapped lines, then rejoin words hyphenated across breaks.
pub fn merge_columns(text: &str) -> String {
    let mut merger = ColumnMerger::new();
    for line in text.lines() {
        merger.feed(line);
    }
    let joined = merger.finish().join("\n");
    HYPHEN_BREAK.replace_all(&joined, "${1}${2}").into_owned()
}

fn ends_sentence(line: &str) -> bool {
    line.ends_with(['.', '!', '?', ':'])
}

fn starts_lowercase(line: &str) -> bool {
    line.chars().next().is_some_and(char::is_lowercase)
}

/// Join a held line with its continuation, undoing a hyphenated word break.
fn join_fragments(held: &str, next: &str) -> String {
    let mut chars = held.chars().rev();
    let hyphenated =
        chars.next() == Some('-') && chars.next().is_some_and(char::is_alphanumeric);

    if hyphenated {
        format!("{}{next}", &held[..held.len() - 1])
    } else {
        format!("{held} {next}")
    }
}
