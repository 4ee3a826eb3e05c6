//! Prompt construction for question generation.

use crate::{parse::CONCEPTUAL_MARKER, parse::FACTUAL_MARKER, Chunk};

/// System message sent with every request.
pub const SYSTEM_MESSAGE: &str =
    "You are an expert educator who creates clear, relevant study questions.";

/// A system message plus the user prompt for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Role instructions for the model.
    pub system: String,
    /// Requirements, response format and the document text.
    pub user: String,
}

impl Prompt {
    /// Build the prompt for a chunk.
    ///
    /// A chunk that is the whole document carries no "chunk K of N" note.
    ///
    /// ```rust
    /// use paperslab::{Chunk, Prompt};
    ///
    /// let prompt = Prompt::for_chunk(&Chunk::new("Body text.", 1, 3));
    /// assert!(prompt.user.contains("chunk 2 of 3"));
    /// assert!(prompt.user.contains("DOCUMENT:\nBody text.\n"));
    ///
    /// let whole = Prompt::for_chunk(&Chunk::new("Body text.", 0, 1));
    /// assert!(!whole.user.contains("chunk 1 of 1"));
    /// ```
    #[must_use]
    pub fn for_chunk(chunk: &Chunk) -> Self {
        let position = (!chunk.is_whole()).then(|| (chunk.number(), chunk.total));
        Self::new(&chunk.text, position)
    }

    /// Build a prompt for `text`, optionally noting its one-based position.
    #[must_use]
    pub fn new(text: &str, position: Option<(usize, usize)>) -> Self {
        let note = position
            .map(|(k, n)| {
                format!("\n(Note: This is chunk {k} of {n} from a larger document)")
            })
            .unwrap_or_default();

        let user = format!(
            "You are an expert educator creating study questions from academic or educational content.

Given the following document{note}, generate high-quality questions that help students understand and test their comprehension.

REQUIREMENTS:
1. Generate 5-10 factual questions (who, what, when, where, which)
   - These should test recall of specific facts from the document
   - Prefer questions with one-word or short answers

2. Generate 3-5 conceptual questions (why, how, explain)
   - These should test deeper understanding
   - Focus on concepts, relationships, and reasoning

3. All questions must:
   - Be directly answerable from the document content
   - Be grammatically correct and clear
   - Not be vague or ambiguous
   - Not repeat or be too similar to each other
   - Cover different sections/topics in the document

4. Format your response EXACTLY as follows:
{FACTUAL_MARKER}
1. [Question]
2. [Question]
...

{CONCEPTUAL_MARKER}
1. [Question]
2. [Question]
...

DOCUMENT:
{text}

Now generate the questions following the format above:"
        );

        Self {
            system: SYSTEM_MESSAGE.to_string(),
            user,
        }
    }
}
