//! Error types for paperslab.

use std::path::PathBuf;

/// Errors that can occur while loading, chunking, or generating.
///
/// The cleaner never produces errors; every stage fails open.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid token budget (must be > 0).
    #[error("invalid max tokens: {0} (must be > 0)")]
    InvalidMaxTokens(usize),

    /// Question limit configuration that can never yield a question.
    #[error("invalid question limits: factual {factual}, conceptual {conceptual}")]
    InvalidLimits {
        /// Requested factual limit.
        factual: usize,
        /// Requested conceptual limit.
        conceptual: usize,
    },

    /// Retry policy with zero attempts.
    #[error("retry policy needs at least one attempt")]
    NoAttempts,

    /// Input file extension is not `.pdf` or `.txt`.
    #[error("unsupported file format: {extension:?} (use .pdf or .txt)")]
    UnsupportedFormat {
        /// The lowercased extension, empty when the path has none.
        extension: String,
    },

    /// Input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// PDF text extraction failed.
    #[error("pdf extraction failed: {0}")]
    Pdf(String),

    /// PDF loading requires the `pdf` feature.
    #[error("pdf support requires the 'pdf' feature")]
    PdfFeatureRequired,

    /// The generation call for a chunk failed after all attempts.
    #[error("generation failed for chunk {chunk} of {total}: {source}")]
    Generation {
        /// One-based chunk number.
        chunk: usize,
        /// Total chunk count.
        total: usize,
        /// The last error reported by the generator.
        #[source]
        source: GenerationError,
    },

    /// The run was cancelled between chunks.
    #[error("cancelled after {completed} of {total} chunks")]
    Cancelled {
        /// Chunks fully processed before cancellation.
        completed: usize,
        /// Total chunk count.
        total: usize,
    },
}

/// Errors reported by a [`Generator`](crate::Generator) backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Network or transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Backend refused the call because of quota or rate limiting.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The call did not complete in time.
    #[error("generation timed out")]
    Timeout,

    /// Backend rejected the request outright.
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl GenerationError {
    /// Whether another attempt may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Result type for paperslab operations.
pub type Result<T> = std::result::Result<T, Error>;
