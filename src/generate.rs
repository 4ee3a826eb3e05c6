//! Question generation over a chunk sequence.
//!
//! The model call itself lives behind [`Generator`]: given a [`Prompt`], return
//! the raw response text. Everything around it is here:
//!
//! ```text
//! chunks ──▶ for each, in order:
//!              prompt ──▶ Generator (retried per RetryPolicy) ──▶ parse
//!        ──▶ concatenate ──▶ dedupe ──▶ truncate (7 factual, 3 conceptual)
//! ```
//!
//! Calls are strictly sequential. A call that still fails after its last
//! attempt aborts the run; questions from earlier chunks are not returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    parse_response, Chunk, Error, GenerationError, Prompt, QuestionLimits, QuestionSet, Result,
};

/// The external text-generation capability.
///
/// Closures implement it, which is handy for tests and for wrapping a client:
///
/// ```rust
/// use paperslab::{GenerationError, Generator, Prompt};
///
/// let canned = |_: &Prompt| -> Result<String, GenerationError> {
///     Ok("FACTUAL QUESTIONS:\n1. What is measured?".to_string())
/// };
/// assert!(canned.generate(&Prompt::new("text", None)).is_ok());
/// ```
pub trait Generator {
    /// Send one prompt and return the response text.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] describing why the call failed.
    fn generate(&self, prompt: &Prompt) -> std::result::Result<String, GenerationError>;
}

impl<F> Generator for F
where
    F: Fn(&Prompt) -> std::result::Result<String, GenerationError>,
{
    fn generate(&self, prompt: &Prompt) -> std::result::Result<String, GenerationError> {
        self(prompt)
    }
}

/// Bounded retry with exponential backoff.
///
/// The default makes a single attempt.
///
/// ```rust
/// use std::time::Duration;
/// use paperslab::RetryPolicy;
///
/// let policy = RetryPolicy::new(3, Duration::from_millis(100)).unwrap();
/// assert_eq!(policy.backoff(1), Duration::from_millis(100));
/// assert_eq!(policy.backoff(2), Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    multiplier: u32,
}

impl RetryPolicy {
    /// Create a policy doubling the backoff after each failure.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_attempts == 0`.
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(Error::NoAttempts);
        }
        Ok(Self {
            max_attempts,
            initial_backoff,
            multiplier: 2,
        })
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn once() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            multiplier: 2,
        }
    }

    /// Set the backoff growth factor.
    #[must_use]
    pub const fn with_multiplier(self, multiplier: u32) -> Self {
        Self { multiplier, ..self }
    }

    /// Total attempts per call, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `retry` (one-based).
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once()
    }
}

/// Drives a [`Generator`] over a chunk sequence.
pub struct QuestionGenerator<G> {
    generator: G,
    limits: QuestionLimits,
    retry: RetryPolicy,
    cancel: Option<Arc<AtomicBool>>,
}

impl<G: Generator> QuestionGenerator<G> {
    /// Wrap a generator with default limits and no retries.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            limits: QuestionLimits::default(),
            retry: RetryPolicy::default(),
            cancel: None,
        }
    }

    /// Set the final question limits.
    #[must_use]
    pub fn with_limits(mut self, limits: QuestionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the retry policy for each call.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Abandon the run before the next chunk once `flag` is set.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The configured limits.
    pub fn limits(&self) -> QuestionLimits {
        self.limits
    }

    /// Generate and parse questions for one chunk.
    ///
    /// The result is neither deduplicated nor truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Generation`] when every attempt failed.
    pub fn generate_for_chunk(&self, chunk: &Chunk) -> Result<QuestionSet> {
        let prompt = Prompt::for_chunk(chunk);
        let response = self.call_with_retry(&prompt).map_err(|source| Error::Generation {
            chunk: chunk.number(),
            total: chunk.total,
            source,
        })?;

        let questions = parse_response(&response);
        debug!(
            chunk = chunk.number(),
            factual = questions.factual.len(),
            conceptual = questions.conceptual.len(),
            "parsed response"
        );
        Ok(questions)
    }

    /// Generate questions for every chunk, in order, and merge them.
    ///
    /// Zero chunks yield an empty set without any call.
    ///
    /// # Errors
    ///
    /// Returns the first chunk's [`Error::Generation`], or
    /// [`Error::Cancelled`] if the cancel flag was set between chunks.
    pub fn generate(&self, chunks: &[Chunk]) -> Result<QuestionSet> {
        let total = chunks.len();
        let mut all = QuestionSet::default();

        for (completed, chunk) in chunks.iter().enumerate() {
            if self.is_cancelled() {
                warn!(completed, total, "generation cancelled");
                return Err(Error::Cancelled { completed, total });
            }
            info!(chunk = chunk.number(), total, "generating questions");
            all.extend(self.generate_for_chunk(chunk)?);
        }

        Ok(all.finalize(self.limits))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn call_with_retry(&self, prompt: &Prompt) -> std::result::Result<String, GenerationError> {
        let mut attempt = 1;
        loop {
            match self.generator.generate(prompt) {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    warn!(attempt, ?delay, error = %err, "generation failed, retrying");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    type Reply = std::result::Result<String, GenerationError>;

    fn response(factual: &[&str], conceptual: &[&str]) -> String {
        let mut out = String::from("FACTUAL QUESTIONS:\n");
        for (i, q) in factual.iter().enumerate() {
            out.push_str(&format!("{}. {q}\n", i + 1));
        }
        out.push_str("\nCONCEPTUAL QUESTIONS:\n");
        for (i, q) in conceptual.iter().enumerate() {
            out.push_str(&format!("{}. {q}\n", i + 1));
        }
        out
    }

    fn chunks(n: usize) -> Vec<Chunk> {
        (0..n).map(|i| Chunk::new(format!("Chunk body {i}."), i, n)).collect()
    }

    #[test]
    fn test_zero_chunks_make_no_calls() {
        let calls = Cell::new(0);
        let generator = |_: &Prompt| -> Reply {
            calls.set(calls.get() + 1);
            Ok(String::new())
        };
        let set = QuestionGenerator::new(generator).generate(&[]).unwrap();
        assert!(set.is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_chunks_processed_in_order_with_notes() {
        let prompts = RefCell::new(Vec::new());
        let generator = |p: &Prompt| -> Reply {
            prompts.borrow_mut().push(p.user.clone());
            Ok(response(&["What is measured here?"], &[]))
        };
        QuestionGenerator::new(generator).generate(&chunks(3)).unwrap();

        let prompts = prompts.into_inner();
        assert_eq!(prompts.len(), 3);
        for (i, prompt) in prompts.iter().enumerate() {
            assert!(prompt.contains(&format!("chunk {} of 3", i + 1)));
            assert!(prompt.contains(&format!("Chunk body {i}.")));
        }
    }

    #[test]
    fn test_merge_dedupes_and_truncates() {
        let call = Cell::new(0);
        let generator = |_: &Prompt| -> Reply {
            call.set(call.get() + 1);
            let n = call.get();
            let factual: Vec<String> = (0..7).map(|i| format!("Fact {}?", n * 5 + i)).collect();
            let factual: Vec<&str> = factual.iter().map(String::as_str).collect();
            Ok(response(&factual, &["Why does it hold?", "How is it built?"]))
        };
        let set = QuestionGenerator::new(generator).generate(&chunks(2)).unwrap();

        // chunk 1: Fact 5..=11, chunk 2: Fact 10..=16 (10 and 11 repeat)
        assert_eq!(
            set.factual,
            (5..=11).map(|i| format!("Fact {i}?")).collect::<Vec<_>>()
        );
        assert_eq!(set.conceptual, vec!["Why does it hold?", "How is it built?"]);
    }

    #[test]
    fn test_malformed_response_degrades() {
        let generator = |_: &Prompt| -> Reply { Ok("I cannot help with that.".to_string()) };
        let set = QuestionGenerator::new(generator).generate(&chunks(2)).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_failure_propagates_with_chunk_number() {
        let call = Cell::new(0);
        let generator = |_: &Prompt| -> Reply {
            call.set(call.get() + 1);
            if call.get() == 2 {
                Err(GenerationError::Rejected("quota".into()))
            } else {
                Ok(response(&["What is measured here?"], &[]))
            }
        };
        let err = QuestionGenerator::new(generator)
            .generate(&chunks(3))
            .unwrap_err();
        assert!(matches!(err, Error::Generation { chunk: 2, total: 3, .. }));
        assert_eq!(call.get(), 2);
    }

    #[test]
    fn test_retry_recovers_transient_failure() {
        let call = Cell::new(0);
        let generator = |_: &Prompt| -> Reply {
            call.set(call.get() + 1);
            if call.get() < 3 {
                Err(GenerationError::Timeout)
            } else {
                Ok(response(&["What is measured here?"], &[]))
            }
        };
        let retry = RetryPolicy::new(3, Duration::ZERO).unwrap();
        let set = QuestionGenerator::new(generator)
            .with_retry(retry)
            .generate(&chunks(1))
            .unwrap();
        assert_eq!(set.factual, vec!["What is measured here?"]);
        assert_eq!(call.get(), 3);
    }

    #[test]
    fn test_retry_skips_rejections() {
        let call = Cell::new(0);
        let generator = |_: &Prompt| -> Reply {
            call.set(call.get() + 1);
            Err(GenerationError::Rejected("bad request".into()))
        };
        let retry = RetryPolicy::new(5, Duration::ZERO).unwrap();
        let result = QuestionGenerator::new(generator)
            .with_retry(retry)
            .generate(&chunks(1));
        assert!(result.is_err());
        assert_eq!(call.get(), 1);
    }

    #[test]
    fn test_cancel_between_chunks() {
        let flag = Arc::new(AtomicBool::new(false));
        let call = Cell::new(0);
        let generator = |_: &Prompt| -> Reply {
            call.set(call.get() + 1);
            flag.store(true, Ordering::Relaxed);
            Ok(response(&["What is measured here?"], &[]))
        };
        let err = QuestionGenerator::new(generator)
            .with_cancel_flag(Arc::clone(&flag))
            .generate(&chunks(3))
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled { completed: 1, total: 3 }));
        assert_eq!(call.get(), 1);
    }

    #[test]
    fn test_limits_default_and_override() {
        let generator = |_: &Prompt| -> Reply { Ok(String::new()) };
        assert_eq!(
            QuestionGenerator::new(generator).limits(),
            QuestionLimits::default()
        );

        let limits = QuestionLimits::new(2, 1).unwrap();
        let questions = QuestionGenerator::new(generator).with_limits(limits);
        assert_eq!(questions.limits(), limits);
    }

    #[test]
    fn test_backoff_growth() {
        let policy = RetryPolicy::new(4, Duration::from_millis(10))
            .unwrap()
            .with_multiplier(3);
        assert_eq!(policy.backoff(1), Duration::from_millis(10));
        assert_eq!(policy.backoff(3), Duration::from_millis(90));
        assert!(RetryPolicy::new(0, Duration::ZERO).is_err());
    }
}
