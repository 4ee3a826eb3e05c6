//! Paragraph-first chunking with a one-unit overlap.
//!
//! ## The Algorithm
//!
//! ```text
//! 1. Whole text fits the budget?        → one chunk, returned verbatim
//! 2. Split on blank lines (paragraphs)
//! 3. Greedily pack paragraphs until the next one would overflow
//!    - close the chunk (paragraphs joined with a blank line)
//!    - seed the next chunk with the closed chunk's last paragraph
//! 4. A paragraph that alone overflows:
//!    - flush what is pending
//!    - pack its sentences with the same rule, each piece its own chunk
//! 5. Flush the remainder
//! ```
//!
//! Sentences are found by a plain rule: `.`, `!` or `?` followed by
//! whitespace. Academic prose is full of "et al." and "Fig. 3", so this
//! over-splits a little; the pieces are re-joined with a space, so nothing is
//! lost.
//!
//! ## Overlap
//!
//! The repeated unit is the last paragraph (or sentence) of the chunk just
//! closed. It has to fit twice: inside the overlap budget, and beside the
//! incoming unit under the chunk ceiling. A unit too long for that is cut to
//! its trailing sentences, so the next chunk still opens with the end of the
//! previous one. Only when not even the final sentence fits does the next
//! chunk start fresh:
//!
//! ```text
//! max = 60 chars, paragraphs of ~16 chars
//!
//! Chunk 0: [P1 P2 P3]
//! Chunk 1: [P3 P4 P5]   <- P3 repeated
//!
//! overlap = 80 chars, P2 = 118 chars in four sentences
//!
//! Chunk 0: [P1 P2]
//! Chunk 1: [s3 s4 P3]   <- last two sentences of P2
//! ```
//!
//! A single sentence longer than the ceiling is emitted as is. There is no
//! splitting below sentence granularity.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{Chunk, Result, TokenBudget};

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const SENTENCE_SEPARATOR: &str = " ";

static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("valid regex"));

/// Paragraph-first chunker bounded by a [`TokenBudget`].
///
/// ## Example
///
/// ```rust
/// use paperslab::{ParagraphChunker, TokenBudget};
///
/// let chunker = ParagraphChunker::new(TokenBudget::new(15).unwrap());
/// let text = "First paragraph.\n\nSecond paragraph.\n\nThird paragraph.\n\n\
///             Fourth paragraph.\n\nFifth paragraph.";
/// let chunks = chunker.chunk(text);
///
/// assert_eq!(chunks.len(), 2);
/// assert!(chunks[0].text.ends_with("Third paragraph."));
/// assert!(chunks[1].text.starts_with("Third paragraph."));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParagraphChunker {
    budget: TokenBudget,
}

impl ParagraphChunker {
    /// Create a chunker for the given budget.
    #[must_use]
    pub const fn new(budget: TokenBudget) -> Self {
        Self { budget }
    }

    /// Create a chunker with `max_tokens` and the default overlap.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_tokens == 0`.
    pub fn with_max_tokens(max_tokens: usize) -> Result<Self> {
        Ok(Self::new(TokenBudget::new(max_tokens)?))
    }

    /// The budget this chunker packs against.
    #[must_use]
    pub const fn budget(&self) -> &TokenBudget {
        &self.budget
    }

    /// Split text into chunk strings, in document order.
    ///
    /// Empty or blank input yields no chunks. Input that fits the budget is
    /// returned unchanged as the only element.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return vec![];
        }
        if self.budget.fits(text) {
            return vec![text.to_string()];
        }

        let max_chars = self.budget.max_chars();
        let mut chunks = Vec::new();
        let mut packer = Packer::new(PARAGRAPH_SEPARATOR, &self.budget);

        for paragraph in paragraphs(text) {
            let len = paragraph.chars().count();
            if len > max_chars {
                chunks.extend(packer.flush());
                chunks.extend(self.split_paragraph(paragraph));
                continue;
            }
            chunks.extend(packer.push(paragraph, len));
        }
        chunks.extend(packer.flush());

        debug!(
            chunks = chunks.len(),
            max_tokens = self.budget.max_tokens(),
            "split text into chunks"
        );
        chunks
    }

    /// Split text into [`Chunk`]s tagged with index and total.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let pieces = self.split(text);
        let total = pieces.len();
        pieces
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk::new(text, index, total))
            .collect()
    }

    /// Pack the sentences of one oversized paragraph.
    fn split_paragraph(&self, paragraph: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut packer = Packer::new(SENTENCE_SEPARATOR, &self.budget);
        for sentence in sentences(paragraph) {
            pieces.extend(packer.push(sentence, sentence.chars().count()));
        }
        pieces.extend(packer.flush());
        pieces
    }
}

/// Greedy accumulator shared by the paragraph and sentence passes.
///
/// `chars` always equals the character length of `units` joined with
/// `separator`.
struct Packer<'a> {
    units: Vec<&'a str>,
    last_len: usize,
    chars: usize,
    separator: &'static str,
    separator_len: usize,
    budget: TokenBudget,
}

impl<'a> Packer<'a> {
    fn new(separator: &'static str, budget: &TokenBudget) -> Self {
        Self {
            units: Vec::new(),
            last_len: 0,
            chars: 0,
            separator,
            separator_len: separator.chars().count(),
            budget: *budget,
        }
    }

    /// Add a unit, returning the chunk it closed, if any.
    fn push(&mut self, unit: &'a str, len: usize) -> Option<String> {
        let mut closed = None;

        if !self.units.is_empty()
            && self
                .budget
                .would_overflow(self.chars, self.separator_len + len)
        {
            let seed = self.units.last().copied();
            let seed_len = self.last_len;
            closed = self.flush();

            if let Some(seed) = seed {
                match self.overlap(seed, seed_len, len) {
                    Some((overlap, overlap_len)) => self.append(overlap, overlap_len),
                    None => debug!(seed_len, "overlap unit dropped"),
                }
            }
        }

        self.append(unit, len);
        closed
    }

    /// The part of `seed` to repeat before a unit of `len` characters.
    ///
    /// The whole seed when it fits both the overlap budget and the room left
    /// beside the unit, else its longest run of trailing sentences that does.
    fn overlap(&self, seed: &'a str, seed_len: usize, len: usize) -> Option<(&'a str, usize)> {
        let room = self
            .budget
            .max_chars()
            .saturating_sub(self.separator_len + len)
            .min(self.budget.overlap_chars());
        if seed_len <= room {
            return Some((seed, seed_len));
        }

        let tail = trailing_sentences(seed, room)?;
        debug!(seed_len, kept = tail.chars().count(), "overlap unit trimmed");
        Some((tail, tail.chars().count()))
    }

    fn append(&mut self, unit: &'a str, len: usize) {
        if !self.units.is_empty() {
            self.chars += self.separator_len;
        }
        self.units.push(unit);
        self.chars += len;
        self.last_len = len;
    }

    fn flush(&mut self) -> Option<String> {
        if self.units.is_empty() {
            return None;
        }
        let joined = self.units.join(self.separator);
        self.units.clear();
        self.chars = 0;
        self.last_len = 0;
        Some(joined)
    }
}

/// Blank-line separated paragraphs, trimmed, empty ones skipped.
fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    BLANK_LINE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

/// Split on `.`, `!` or `?` followed by whitespace.
///
/// The terminator stays with its sentence; the whitespace is dropped.
fn sentences(paragraph: &str) -> Vec<&str> {
    sentence_starts(paragraph)
        .windows(2)
        .map(|w| paragraph[w[0]..w[1]].trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Byte offsets where each sentence starts, followed by `paragraph.len()`.
fn sentence_starts(paragraph: &str) -> Vec<usize> {
    let mut starts = vec![0];
    let mut chars = paragraph.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if !chars.peek().is_some_and(|&(_, next)| next.is_whitespace()) {
            continue;
        }
        while chars.peek().is_some_and(|&(_, w)| w.is_whitespace()) {
            chars.next();
        }
        if let Some(&(start, _)) = chars.peek() {
            starts.push(start);
        }
    }
    starts.push(paragraph.len());
    starts
}

/// Longest suffix of `text` that starts at a sentence and has at most
/// `max_chars` characters.
fn trailing_sentences(text: &str, max_chars: usize) -> Option<&str> {
    let starts = sentence_starts(text);
    starts[..starts.len() - 1]
        .iter()
        .rev()
        .map(|&start| text[start..].trim())
        .take_while(|tail| tail.chars().count() <= max_chars)
        .filter(|tail| !tail.is_empty())
        .last()
}
