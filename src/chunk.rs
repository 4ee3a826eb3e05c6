//! The Chunk type: a bounded piece of cleaned text with its sequence position.

/// A segment of cleaned document text, sized for one generation call.
///
/// Chunks are value objects. `index` is zero-based; `total` is the length of
/// the sequence the chunk was produced in, so every chunk can describe itself
/// as "chunk K of N" without looking at its siblings.
///
/// ## Overlap
///
/// Adjacent chunks may share a unit of text. The last paragraph (or sentence)
/// of one chunk is repeated at the start of the next:
///
/// ```text
/// Paragraphs: [P1] [P2] [P3] [P4]
/// Chunk 0:    P1 P2
/// Chunk 1:       P2 P3 P4     <- P2 repeated for context
/// ```
///
/// ```rust
/// use paperslab::Chunk;
///
/// let chunk = Chunk::new("Results improve by 4%.", 1, 3);
/// assert_eq!(chunk.number(), 2);
/// assert_eq!(chunk.to_string(), "chunk 2 of 3 (22 chars)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
    /// Number of chunks in the sequence.
    pub total: usize,
}

impl Chunk {
    /// Create a new chunk.
    #[must_use]
    pub fn new(text: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            text: text.into(),
            index,
            total,
        }
    }

    /// One-based position, as used in prompts.
    #[must_use]
    pub const fn number(&self) -> usize {
        self.index + 1
    }

    /// Whether this is the only chunk of its document.
    #[must_use]
    pub const fn is_whole(&self) -> bool {
        self.total == 1
    }

    /// Estimated token count of the chunk text.
    #[must_use]
    pub fn estimated_tokens(&self) -> usize {
        crate::estimate_tokens(&self.text)
    }

    /// The length of this chunk in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "chunk {} of {} ({} chars)",
            self.number(),
            self.total,
            self.len()
        )
    }
}
