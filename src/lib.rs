//! # paperslab
//!
//! Turn academic papers into study questions with a token-limited LLM.
//!
//! ## The Problem
//!
//! Text pulled out of a paper PDF is noisy. Page numbers, running headers,
//! author blocks and the bibliography sit in the middle of the prose, and
//! two-column layouts break sentences at every column edge. Feed that to a
//! model and half the questions are about the DOI.
//!
//! Papers are also long. A generation API takes a bounded prompt, so the text
//! has to be split, and splitting mid-argument loses the context a good
//! question needs.
//!
//! ## The Pipeline
//!
//! ```text
//! raw text ──▶ Cleaner ──▶ cleaned text ──▶ ParagraphChunker ──▶ [Chunk]
//!                                                                   │
//!     QuestionSet ◀── merge / dedupe / truncate ◀── Generator ◀─────┘
//!                                                   (one call per chunk)
//! ```
//!
//! ### Cleaning
//!
//! Six surface-pattern stages, in fixed order: bibliography truncation,
//! two-column repair, front-matter stripping, header/footer removal,
//! main-section extraction, normalization. Every stage fails open: if its
//! pattern never matches, text passes through untouched.
//!
//! ### Chunking
//!
//! Sizes are estimated at 4 characters per token. Short documents stay whole.
//! Longer ones are packed paragraph by paragraph; the last paragraph of each
//! chunk is repeated at the start of the next for continuity. A paragraph too
//! large on its own is packed sentence by sentence instead.
//!
//! ### Generation
//!
//! The model call is a [`Generator`]: prompt in, text out. Responses are
//! parsed into factual and conceptual lists, merged across chunks in order,
//! deduplicated case-insensitively and cut to 7 factual and 3 conceptual.
//!
//! ## Quick Start
//!
//! ```rust
//! use paperslab::{clean, ParagraphChunker, TokenBudget};
//!
//! let raw = "Abstract\nWe measure   sleep [2] in mice.\nREFERENCES\n[2] Lab, 2019.";
//! let text = clean(raw);
//! assert_eq!(text, "Abstract\nWe measure sleep in mice.");
//!
//! let chunker = ParagraphChunker::new(TokenBudget::new(3000).unwrap());
//! let chunks = chunker.chunk(&text);
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].text, text);
//! ```
//!
//! ## Features
//!
//! | Feature | Enables |
//! |---------|---------|
//! | `pdf` | [`Document::open`] on `.pdf` files via `pdf-extract` |

mod budget;
mod chunk;
mod clean;
mod columns;
mod document;
mod error;
mod generate;
mod paragraph;
mod parse;
mod pipeline;
mod prompt;
mod questions;
mod stats;

pub use budget::{estimate_tokens, TokenBudget, CHARS_PER_TOKEN};
pub use chunk::Chunk;
pub use clean::{
    clean, extract_main_sections, normalize, strip_front_matter, strip_page_furniture,
    strip_references, Cleaner, Stage,
};
pub use columns::{merge_columns, ColumnMerger, ColumnState};
pub use document::{decode_text, Document, Format};
pub use error::{Error, GenerationError, Result};
pub use generate::{Generator, QuestionGenerator, RetryPolicy};
pub use paragraph::ParagraphChunker;
pub use parse::{extract_question, parse_response, CONCEPTUAL_MARKER, FACTUAL_MARKER};
pub use pipeline::{Pipeline, PipelineConfig, Report};
pub use prompt::{Prompt, SYSTEM_MESSAGE};
pub use questions::{dedupe, normalize_question, QuestionLimits, QuestionSet};
pub use stats::{ChunkStats, TextStats};

/// Clean `raw` text and split it into chunks for `max_tokens`.
///
/// The one-call form of [`Cleaner`] followed by [`ParagraphChunker`], with
/// the default overlap.
///
/// # Errors
///
/// Returns an error if `max_tokens == 0`.
///
/// ```rust
/// let chunks = paperslab::prepare("", 3000).unwrap();
/// assert!(chunks.is_empty());
/// ```
pub fn prepare(raw: &str, max_tokens: usize) -> Result<Vec<Chunk>> {
    let chunker = ParagraphChunker::with_max_tokens(max_tokens)?;
    Ok(chunker.chunk(&clean(raw)))
}
