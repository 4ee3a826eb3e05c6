//! Academic paper cleaning.
//!
//! Extracted paper text carries a lot that isn't prose: running headers, page
//! numbers, author blocks, the bibliography, column-split debris. The
//! [`Cleaner`] strips it with six surface-pattern stages, always in this order:
//!
//! | # | Stage | Removes |
//! |---|-------|---------|
//! | 1 | `References` | everything from the first REFERENCES / BIBLIOGRAPHY / WORKS CITED heading |
//! | 2 | `Columns` | column-split fragments; rejoins wrapped lines and hyphenated words |
//! | 3 | `FrontMatter` | author and affiliation lines above the title |
//! | 4 | `PageFurniture` | page numbers, copyright, DOI, bare URLs, venue boilerplate |
//! | 5 | `MainSections` | anything outside the abstract-to-conclusion body |
//! | 6 | `Normalize` | citation markers, mojibake, excess whitespace |
//!
//! Later stages assume earlier ones ran: front matter detection expects
//! wrapped lines to be rejoined, section extraction expects the bibliography
//! to be gone.
//!
//! Every stage is a pure `&str -> String` function and fails open. When its
//! trigger never matches, the text comes back as it went in. Cleaning never
//! errors.
//!
//! ```rust
//! let raw = "Abstract\nWe study   attention [4].\nREFERENCES\n[4] Someone, 2017.";
//! assert_eq!(paperslab::clean(raw), "Abstract\nWe study attention .");
//! ```

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};
use tracing::debug;

use crate::columns::merge_columns;

const REFERENCE_HEADINGS: [&str; 3] = ["references", "bibliography", "works cited"];

const CONTENT_MARKERS: [&str; 2] = ["abstract", "introduction"];

/// Minimum characters, exclusive, for a line to be taken as the title.
const TITLE_MIN_CHARS: usize = 20;

const SECTION_NAMES: [&str; 14] = [
    "abstract",
    "introduction",
    "background",
    "related work",
    "methodology",
    "method",
    "approach",
    "implementation",
    "experiments",
    "results",
    "evaluation",
    "discussion",
    "conclusion",
    "future work",
];

const SECTION_STOPS: [&str; 3] = ["references", "acknowledgment", "appendix"];

/// UTF-8 replacement character decoded as Latin-1.
const MOJIBAKE: &str = "ï¿½";

static METADATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)@|\.edu|\.com|department\s+of|university\s+of|institute\s+of|\d{5}")
        .expect("valid regex")
});

static PAGE_FURNITURE: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        // page numbers
        r"(?i)^page\s+\d+$",
        r"^\d+$",
        r"(?i)^\d+\s*\|\s*page$",
        // copyright and venue boilerplate
        r"(?i)^copyright\s",
        r"^©",
        r"(?i)^\d{4}\s+ieee",
        r"(?i)^ieee\s",
        r"(?i)^proceedings\s+of",
        r"(?i)^(?:volume|issue)\s+\d+$",
        // identifiers
        r"(?i)^doi:",
        r"(?i)^(?:https?://|www\.)\S*$",
        r"^\[\d+\]$",
    ])
    .expect("valid regex set")
});

static CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d+(?:,\s*\d+)*\]").expect("valid regex"));

static HORIZONTAL_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid regex"));

static EXTRA_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// One cleaning stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Truncate at the bibliography heading.
    References,
    /// Repair two-column extraction.
    Columns,
    /// Drop author and affiliation lines above the title.
    FrontMatter,
    /// Drop headers, footers and identifiers.
    PageFurniture,
    /// Keep only the main body sections.
    MainSections,
    /// Normalize whitespace, strip citation markers and mojibake.
    Normalize,
}

impl Stage {
    /// All stages, in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::References,
        Self::Columns,
        Self::FrontMatter,
        Self::PageFurniture,
        Self::MainSections,
        Self::Normalize,
    ];

    /// Short name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::References => "references",
            Self::Columns => "columns",
            Self::FrontMatter => "front_matter",
            Self::PageFurniture => "page_furniture",
            Self::MainSections => "main_sections",
            Self::Normalize => "normalize",
        }
    }

    /// Run this stage alone.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::References => strip_references(text),
            Self::Columns => merge_columns(text),
            Self::FrontMatter => strip_front_matter(text),
            Self::PageFurniture => strip_page_furniture(text),
            Self::MainSections => extract_main_sections(text),
            Self::Normalize => normalize(text),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered cleaning pipeline.
///
/// ## Example
///
/// ```rust
/// use paperslab::{Cleaner, Stage};
///
/// // Keep the bibliography, clean everything else.
/// let cleaner = Cleaner::new().without(Stage::References);
/// assert_eq!(cleaner.stages().len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct Cleaner {
    stages: Vec<Stage>,
}

impl Cleaner {
    /// A cleaner running every stage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stages: Stage::ALL.to_vec(),
        }
    }

    /// Skip a stage. Order of the remaining stages is unchanged.
    #[must_use]
    pub fn without(mut self, stage: Stage) -> Self {
        self.stages.retain(|s| *s != stage);
        self
    }

    /// Stages this cleaner runs, in order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Clean raw extracted text.
    pub fn clean(&self, raw: &str) -> String {
        let mut text = raw.to_string();
        for stage in &self.stages {
            let before = text.len();
            text = stage.apply(&text);
            debug!(stage = stage.name(), before, after = text.len(), "cleaning stage");
        }
        text
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Clean raw extracted text with every stage.
pub fn clean(raw: &str) -> String {
    Cleaner::new().clean(raw)
}

/// Drop everything from the first bibliography heading onward.
///
/// The heading must be the whole line, in any case.
pub fn strip_references(text: &str) -> String {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let heading = line.trim();
        if REFERENCE_HEADINGS
            .iter()
            .any(|h| heading.eq_ignore_ascii_case(h))
        {
            return text[..offset].trim_end().to_string();
        }
        offset += line.len();
    }
    text.to_string()
}

/// Drop author, affiliation and venue lines above the title.
///
/// The title is the nearest line above the first abstract or introduction
/// line that is longer than 20 characters and carries no contact or
/// affiliation markers.
pub fn strip_front_matter(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();

    let Some(content_start) = lines.iter().position(|line| {
        let lower = line.to_lowercase();
        CONTENT_MARKERS.iter().any(|m| lower.contains(m))
    }) else {
        return text.to_string();
    };

    lines[..content_start]
        .iter()
        .rposition(|line| is_title_candidate(line.trim()))
        .map(|title| lines[title..].join("\n"))
        .unwrap_or_else(|| text.to_string())
}

fn is_title_candidate(line: &str) -> bool {
    line.chars().count() > TITLE_MIN_CHARS && !METADATA.is_match(line)
}

/// Whether a trimmed line is a header, footer or bare identifier.
pub(crate) fn is_page_furniture(line: &str) -> bool {
    PAGE_FURNITURE.is_match(line)
}

/// Drop blank lines and page furniture.
///
/// Kept lines are returned untrimmed.
pub fn strip_page_furniture(text: &str) -> String {
    text.split('\n')
        .filter(|line| {
            let line = line.trim();
            !line.is_empty() && !is_page_furniture(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep lines from the first main-section heading until a references,
/// acknowledgment or appendix line.
///
/// Text with no recognizable section heading is returned whole.
pub fn extract_main_sections(text: &str) -> String {
    let mut kept = Vec::new();
    let mut in_section = false;

    for line in text.split('\n') {
        let lower = line.trim().to_lowercase();
        if SECTION_NAMES.iter().any(|s| lower.contains(s)) {
            in_section = true;
            kept.push(line);
        } else if in_section {
            if SECTION_STOPS.iter().any(|s| lower.contains(s)) {
                break;
            }
            kept.push(line);
        }
    }

    if kept.is_empty() {
        text.to_string()
    } else {
        kept.join("\n")
    }
}

/// Strip citation markers and mojibake, then tidy whitespace.
///
/// Markers go first so the gaps they leave are collapsed in the same pass.
pub fn normalize(text: &str) -> String {
    let text = text.replace(MOJIBAKE, "");
    let text = CITATION.replace_all(&text, "");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let text = text.split('\n').map(str::trim).collect::<Vec<_>>().join("\n");
    let text = EXTRA_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}
