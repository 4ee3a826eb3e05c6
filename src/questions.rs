//! Question sets: merging, deduplication, limits, rendering.

use std::collections::HashSet;

use crate::{Error, Result};

const RULE_WIDTH: usize = 70;

/// Upper bounds on the final question counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionLimits {
    factual: usize,
    conceptual: usize,
}

impl QuestionLimits {
    /// Create limits.
    ///
    /// # Errors
    ///
    /// Returns an error if both limits are zero.
    pub fn new(factual: usize, conceptual: usize) -> Result<Self> {
        if factual == 0 && conceptual == 0 {
            return Err(Error::InvalidLimits {
                factual,
                conceptual,
            });
        }
        Ok(Self {
            factual,
            conceptual,
        })
    }

    /// Maximum factual questions.
    #[must_use]
    pub const fn factual(&self) -> usize {
        self.factual
    }

    /// Maximum conceptual questions.
    #[must_use]
    pub const fn conceptual(&self) -> usize {
        self.conceptual
    }
}

impl Default for QuestionLimits {
    fn default() -> Self {
        Self {
            factual: 7,
            conceptual: 3,
        }
    }
}

/// Factual and conceptual questions, in generation order.
///
/// ```rust
/// use paperslab::{QuestionLimits, QuestionSet};
///
/// let first = QuestionSet::new(vec!["What is X?".into()], vec![]);
/// let second = QuestionSet::new(vec!["what is x".into(), "Why Y?".into()], vec![]);
///
/// let merged = QuestionSet::merge([first, second], QuestionLimits::default());
/// assert_eq!(merged.factual, vec!["What is X?", "Why Y?"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    /// Recall questions (who, what, when, where, which).
    pub factual: Vec<String>,
    /// Understanding questions (why, how, explain).
    pub conceptual: Vec<String>,
}

impl QuestionSet {
    /// Create a set from two lists, as given.
    #[must_use]
    pub const fn new(factual: Vec<String>, conceptual: Vec<String>) -> Self {
        Self {
            factual,
            conceptual,
        }
    }

    /// Whether neither list has a question.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factual.is_empty() && self.conceptual.is_empty()
    }

    /// Append another set's questions after this one's.
    pub fn extend(&mut self, other: Self) {
        self.factual.extend(other.factual);
        self.conceptual.extend(other.conceptual);
    }

    /// Deduplicate each list and cut it to its limit.
    #[must_use]
    pub fn finalize(self, limits: QuestionLimits) -> Self {
        let mut factual = dedupe(self.factual);
        let mut conceptual = dedupe(self.conceptual);
        factual.truncate(limits.factual);
        conceptual.truncate(limits.conceptual);
        Self {
            factual,
            conceptual,
        }
    }

    /// Concatenate per-chunk sets in order, then [`finalize`](Self::finalize).
    #[must_use]
    pub fn merge(sets: impl IntoIterator<Item = Self>, limits: QuestionLimits) -> Self {
        let mut all = Self::default();
        for set in sets {
            all.extend(set);
        }
        all.finalize(limits)
    }

    /// Render the fixed plain-text report.
    ///
    /// ```text
    /// ----------------------------------------------------------------------
    /// GENERATED QUESTIONS
    /// ----------------------------------------------------------------------
    /// Source Document: paper.pdf
    /// ----------------------------------------------------------------------
    ///
    /// FACTUAL QUESTIONS
    /// ----------------------------------------------------------------------
    /// 1. ...
    /// ```
    #[must_use]
    pub fn render(&self, document_name: &str, limits: QuestionLimits) -> String {
        let rule = "-".repeat(RULE_WIDTH);
        let mut out = vec![
            rule.clone(),
            "GENERATED QUESTIONS".to_string(),
            rule.clone(),
            format!("Source Document: {document_name}"),
            rule.clone(),
            "\nFACTUAL QUESTIONS".to_string(),
            rule.clone(),
        ];
        out.extend(enumerate(&self.factual, limits.factual));
        out.push("\nCONCEPTUAL QUESTIONS".to_string());
        out.push(rule);
        out.extend(enumerate(&self.conceptual, limits.conceptual));
        out.join("\n")
    }
}

fn enumerate(questions: &[String], limit: usize) -> impl Iterator<Item = String> + '_ {
    questions
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, q)| format!("{}. {q}", i + 1))
}

/// The key two questions are compared by: trimmed, lowercased, trailing `?`
/// removed.
#[must_use]
pub fn normalize_question(question: &str) -> String {
    question.trim().to_lowercase().trim_end_matches('?').to_string()
}

/// Remove duplicates by [`normalize_question`], keeping first occurrences in
/// order.
#[must_use]
pub fn dedupe(questions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    questions
        .into_iter()
        .filter(|q| seen.insert(normalize_question(q)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_dedupe_keeps_first_casing() {
        let out = dedupe(strings(&["What is X?", "what is x", "Why Y?"]));
        assert_eq!(out, strings(&["What is X?", "Why Y?"]));
    }

    #[test]
    fn test_dedupe_trailing_marks() {
        let out = dedupe(strings(&["How?", "how??", "  HOW  "]));
        assert_eq!(out, strings(&["How?"]));
    }

    #[test]
    fn test_merge_truncates_after_dedupe() {
        let first = QuestionSet::new(
            (1..=7).map(|i| format!("Question {i}?")).collect(),
            strings(&["Why A?", "Why B?"]),
        );
        let second = QuestionSet::new(
            strings(&[
                "question 3",
                "Question 8?",
                "QUESTION 1?",
                "Question 9?",
                "Question 10?",
                "Question 11?",
                "Question 12?",
            ]),
            strings(&["why b", "How C?", "How D?"]),
        );

        let merged = QuestionSet::merge([first, second], QuestionLimits::default());
        assert_eq!(
            merged.factual,
            (1..=7).map(|i| format!("Question {i}?")).collect::<Vec<_>>()
        );
        assert_eq!(merged.conceptual, strings(&["Why A?", "Why B?", "How C?"]));
    }

    #[test]
    fn test_merge_of_nothing() {
        let merged = QuestionSet::merge(Vec::new(), QuestionLimits::default());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_limits_validation() {
        assert!(QuestionLimits::new(0, 0).is_err());
        let limits = QuestionLimits::new(5, 0).unwrap();
        assert_eq!(limits.factual(), 5);
        assert_eq!(limits.conceptual(), 0);
    }

    #[test]
    fn test_render() {
        let set = QuestionSet::new(
            strings(&["What is attention?", "Who wrote it?"]),
            strings(&["Why does it work?"]),
        );
        let rule = "-".repeat(70);
        let expected = format!(
            "{rule}\nGENERATED QUESTIONS\n{rule}\nSource Document: paper.pdf\n{rule}\n\
             \nFACTUAL QUESTIONS\n{rule}\n1. What is attention?\n2. Who wrote it?\n\
             \nCONCEPTUAL QUESTIONS\n{rule}\n1. Why does it work?"
        );
        assert_eq!(set.render("paper.pdf", QuestionLimits::default()), expected);
    }

    #[test]
    fn test_render_respects_limits() {
        let set = QuestionSet::new(strings(&["First one?", "Second one?"]), vec![]);
        let limits = QuestionLimits::new(1, 1).unwrap();
        let rendered = set.render("notes.txt", limits);
        assert!(rendered.contains("1. First one?"));
        assert!(!rendered.contains("Second one?"));
        assert!(rendered.ends_with(&"-".repeat(70)));
    }
}
