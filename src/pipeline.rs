//! End-to-end wiring: document → cleaned text → chunks → questions.
//!
//! All settings arrive through [`PipelineConfig`]. Nothing is read from the
//! process environment; a binary that wants `MAX_TOKENS` or an API key reads
//! them itself and passes values in.

use tracing::info;

use crate::{
    ChunkStats, Cleaner, Chunk, Document, Generator, ParagraphChunker, QuestionGenerator,
    QuestionLimits, QuestionSet, Result, RetryPolicy, TextStats, TokenBudget,
};

/// Settings for one pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineConfig {
    /// Chunk size and overlap.
    pub budget: TokenBudget,
    /// Final question counts.
    pub limits: QuestionLimits,
    /// Retry policy for each generation call.
    pub retry: RetryPolicy,
}

impl PipelineConfig {
    /// Set the chunk budget.
    #[must_use]
    pub const fn with_budget(mut self, budget: TokenBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Set the question limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: QuestionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Statistics of the cleaned text.
    pub text_stats: TextStats,
    /// Statistics of the chunk sequence.
    pub chunk_stats: ChunkStats,
    /// The final, deduplicated and truncated questions.
    pub questions: QuestionSet,
}

/// A cleaner, a chunker and a question generator run in sequence.
///
/// ```rust
/// use paperslab::{Document, Format, GenerationError, Pipeline, PipelineConfig, Prompt};
///
/// let generator = |_: &Prompt| -> Result<String, GenerationError> {
///     Ok("FACTUAL QUESTIONS:\n1. What is studied?\n\n\
///         CONCEPTUAL QUESTIONS:\n1. Why does it matter?".to_string())
/// };
/// let pipeline = Pipeline::new(generator, PipelineConfig::default());
///
/// let doc = Document::from_text("Abstract\nWe study sleep.", Format::PlainText);
/// let report = pipeline.run(&doc).unwrap();
///
/// assert_eq!(report.chunk_stats.num_chunks, 1);
/// assert_eq!(report.questions.factual, vec!["What is studied?"]);
/// ```
pub struct Pipeline<G> {
    cleaner: Cleaner,
    chunker: ParagraphChunker,
    generator: QuestionGenerator<G>,
}

impl<G: Generator> Pipeline<G> {
    /// Build a pipeline from a generator and settings.
    pub fn new(generator: G, config: PipelineConfig) -> Self {
        Self {
            cleaner: Cleaner::new(),
            chunker: ParagraphChunker::new(config.budget),
            generator: QuestionGenerator::new(generator)
                .with_limits(config.limits)
                .with_retry(config.retry),
        }
    }

    /// Replace the cleaner.
    #[must_use]
    pub fn with_cleaner(mut self, cleaner: Cleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Replace the question generator, keeping cleaning and chunking.
    #[must_use]
    pub fn with_generator(mut self, generator: QuestionGenerator<G>) -> Self {
        self.generator = generator;
        self
    }

    /// Clean and chunk a document without generating anything.
    pub fn prepare(&self, document: &Document) -> Vec<Chunk> {
        let cleaned = self.cleaner.clean(document.text());
        self.chunker.chunk(&cleaned)
    }

    /// Run the whole pipeline on a document.
    ///
    /// # Errors
    ///
    /// Propagates the first generation failure or a cancellation.
    pub fn run(&self, document: &Document) -> Result<Report> {
        let cleaned = self.cleaner.clean(document.text());
        let text_stats = TextStats::of(&cleaned);
        let chunks = self.chunker.chunk(&cleaned);
        let chunk_stats = ChunkStats::of(&chunks);
        info!(
            format = ?document.format(),
            chars = text_stats.characters,
            chunks = chunk_stats.num_chunks,
            tokens = chunk_stats.total_tokens,
            "document prepared"
        );

        let questions = self.generator.generate(&chunks)?;
        info!(
            factual = questions.factual.len(),
            conceptual = questions.conceptual.len(),
            "questions generated"
        );

        Ok(Report {
            text_stats,
            chunk_stats,
            questions,
        })
    }
}
