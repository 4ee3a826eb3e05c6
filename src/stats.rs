//! Size statistics for cleaned text and chunk sequences.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::{estimate_tokens, Chunk};

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Counts over a piece of text.
///
/// ```rust
/// use paperslab::TextStats;
///
/// let stats = TextStats::of("One sentence. Another one!\n\nNew paragraph.");
/// assert_eq!(stats.words, 6);
/// assert_eq!(stats.sentences, 3);
/// assert_eq!(stats.paragraphs, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    /// Characters, not bytes.
    pub characters: usize,
    /// Words by Unicode word boundaries (UAX #29).
    pub words: usize,
    /// Non-blank runs between `.`, `!` and `?`.
    pub sentences: usize,
    /// Blank-line separated pieces.
    pub paragraphs: usize,
}

impl TextStats {
    /// Compute statistics for `text`.
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            words: text.unicode_words().count(),
            sentences: SENTENCE_END
                .split(text)
                .filter(|s| !s.trim().is_empty())
                .count(),
            paragraphs: text.split("\n\n").count(),
        }
    }
}

/// Estimated sizes of a chunk sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkStats {
    /// Number of chunks.
    pub num_chunks: usize,
    /// Estimated tokens per chunk, in order.
    pub chunk_tokens: Vec<usize>,
    /// Sum of `chunk_tokens`. Overlap is counted once per chunk it appears in.
    pub total_tokens: usize,
}

impl ChunkStats {
    /// Compute statistics for a chunk sequence.
    #[must_use]
    pub fn of(chunks: &[Chunk]) -> Self {
        let chunk_tokens: Vec<usize> = chunks.iter().map(|c| estimate_tokens(&c.text)).collect();
        Self {
            num_chunks: chunks.len(),
            total_tokens: chunk_tokens.iter().sum(),
            chunk_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_stats_empty() {
        let stats = TextStats::of("");
        assert_eq!(stats.characters, 0);
        assert_eq!(stats.words, 0);
        assert_eq!(stats.sentences, 0);
        // one (empty) paragraph, as with any split
        assert_eq!(stats.paragraphs, 1);
    }

    #[test]
    fn test_text_stats_counts_chars_not_bytes() {
        let stats = TextStats::of("naïve café");
        assert_eq!(stats.characters, 10);
        assert_eq!(stats.words, 2);
    }

    #[test]
    fn test_chunk_stats() {
        let chunks = vec![
            Chunk::new("a".repeat(40), 0, 2),
            Chunk::new("b".repeat(22), 1, 2),
        ];
        let stats = ChunkStats::of(&chunks);
        assert_eq!(stats.num_chunks, 2);
        assert_eq!(stats.chunk_tokens, vec![10, 5]);
        assert_eq!(stats.total_tokens, 15);
    }
}
