//! Token budget configuration.
//!
//! ## The Problem
//!
//! Generation APIs take a bounded prompt. We don't run a real tokenizer, so
//! sizes are estimated with the usual rule of thumb:
//!
//! ```text
//! 1 token ≈ 4 characters
//!
//! "The quick brown fox jumps" (25 chars) → 6 tokens
//! ```
//!
//! The estimate is coarse. Callers must not expect it to match any model's
//! tokenizer.
//!
//! ## Max vs Overlap
//!
//! `TokenBudget` carries two numbers:
//!
//! - `max_tokens`: the ceiling for one chunk.
//! - `overlap_tokens`: the most context one chunk may repeat from the previous
//!   one. A trailing paragraph larger than this is not repeated.

use crate::{Error, Result};

/// Characters per estimated token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of `text`.
///
/// Counts characters, not bytes, so multibyte text isn't over-counted.
///
/// ```rust
/// use paperslab::estimate_tokens;
///
/// assert_eq!(estimate_tokens("abcdefgh"), 2);
/// assert_eq!(estimate_tokens("abc"), 0);
/// assert_eq!(estimate_tokens("日本語の文"), 1);
/// ```
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Chunk size limits expressed in estimated tokens.
///
/// # Examples
///
/// ```rust
/// use paperslab::TokenBudget;
///
/// let budget = TokenBudget::new(3000).unwrap();
/// assert_eq!(budget.max_chars(), 12_000);
/// assert_eq!(budget.overlap_tokens(), 200);
///
/// let budget = budget.with_overlap(50);
/// assert_eq!(budget.overlap_chars(), 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    max_tokens: usize,
    overlap_tokens: usize,
}

impl TokenBudget {
    /// Default overlap, in tokens.
    pub const DEFAULT_OVERLAP: usize = 200;

    /// Create a budget with the default overlap.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_tokens == 0`.
    pub fn new(max_tokens: usize) -> Result<Self> {
        if max_tokens == 0 {
            return Err(Error::InvalidMaxTokens(max_tokens));
        }
        Ok(Self {
            max_tokens,
            overlap_tokens: Self::DEFAULT_OVERLAP,
        })
    }

    /// Set the overlap budget. Zero disables overlap.
    #[must_use]
    pub const fn with_overlap(self, overlap_tokens: usize) -> Self {
        Self {
            overlap_tokens,
            ..self
        }
    }

    /// Maximum estimated tokens per chunk.
    #[must_use]
    pub const fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Maximum tokens repeated from the previous chunk.
    #[must_use]
    pub const fn overlap_tokens(&self) -> usize {
        self.overlap_tokens
    }

    /// Maximum characters per chunk.
    #[must_use]
    pub const fn max_chars(&self) -> usize {
        self.max_tokens.saturating_mul(CHARS_PER_TOKEN)
    }

    /// Maximum characters repeated from the previous chunk.
    #[must_use]
    pub const fn overlap_chars(&self) -> usize {
        self.overlap_tokens.saturating_mul(CHARS_PER_TOKEN)
    }

    /// Whether the whole of `text` fits in one chunk.
    #[must_use]
    pub fn fits(&self, text: &str) -> bool {
        estimate_tokens(text) <= self.max_tokens
    }

    /// Whether `additional` more characters on top of `current` would pass the
    /// chunk ceiling.
    #[must_use]
    pub const fn would_overflow(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) > self.max_chars()
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self {
            max_tokens: 3000,
            overlap_tokens: Self::DEFAULT_OVERLAP,
        }
    }
}

impl TryFrom<usize> for TokenBudget {
    type Error = Error;

    fn try_from(max_tokens: usize) -> Result<Self> {
        Self::new(max_tokens)
    }
}
