//! Parsing generated text into a [`QuestionSet`].
//!
//! The prompt asks for this shape:
//!
//! ```text
//! FACTUAL QUESTIONS:
//! 1. What dataset is used?
//! 2. Who proposed the method?
//!
//! CONCEPTUAL QUESTIONS:
//! 1. Why does attention help?
//! ```
//!
//! Models drift from it, so parsing is lenient. Each section runs from its
//! marker to the other marker (or the end). Within a section only lines
//! starting with a digit or a dash count; the enumerator and any `Q3:` style
//! prefix are stripped, and what remains must be longer than five characters.
//! A response with neither marker yields an empty set rather than an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::QuestionSet;

/// Marker opening the factual section.
pub const FACTUAL_MARKER: &str = "FACTUAL QUESTIONS:";

/// Marker opening the conceptual section.
pub const CONCEPTUAL_MARKER: &str = "CONCEPTUAL QUESTIONS:";

/// Questions must be longer than this, in characters.
const MIN_QUESTION_CHARS: usize = 5;

static ENUMERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+\s*[.)]?|-+)\s*").expect("valid regex"));

static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i:q(?:uestion)?\s*\d+\s*[.):])\s*").expect("valid regex"));

/// Parse a generation response.
///
/// ```rust
/// use paperslab::parse_response;
///
/// let response = "FACTUAL QUESTIONS:\n1. What is BLEU?\n2) Who wrote it?\n\n\
///                 CONCEPTUAL QUESTIONS:\n- Why is BLEU imperfect?";
/// let set = parse_response(response);
///
/// assert_eq!(set.factual, vec!["What is BLEU?", "Who wrote it?"]);
/// assert_eq!(set.conceptual, vec!["Why is BLEU imperfect?"]);
/// ```
pub fn parse_response(response: &str) -> QuestionSet {
    let factual = section(response, FACTUAL_MARKER, CONCEPTUAL_MARKER);
    let conceptual = section(response, CONCEPTUAL_MARKER, FACTUAL_MARKER);

    QuestionSet::new(
        factual.map(questions).unwrap_or_default(),
        conceptual.map(questions).unwrap_or_default(),
    )
}

/// Text after `marker`, up to the next `other` marker.
fn section<'a>(response: &'a str, marker: &str, other: &str) -> Option<&'a str> {
    let start = response.find(marker)? + marker.len();
    let rest = &response[start..];
    let end = rest.find(other).unwrap_or(rest.len());
    Some(&rest[..end])
}

fn questions(section: &str) -> Vec<String> {
    section.lines().filter_map(extract_question).collect()
}

/// Pull the question out of one enumerated line.
///
/// Returns `None` for lines that aren't enumerated or are too short to be a
/// question.
pub fn extract_question(line: &str) -> Option<String> {
    let line = line.trim();
    let first = line.chars().next()?;
    if !(first.is_ascii_digit() || first == '-') {
        return None;
    }

    let rest = ENUMERATOR.replace(line, "");
    let question = ORDINAL.replace(&rest, "");
    let question = question.trim();

    (question.chars().count() > MIN_QUESTION_CHARS).then(|| question.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_response() {
        let response = "FACTUAL QUESTIONS:\n1. What is the corpus size?\n\
            2. Which optimizer is used?\n\nCONCEPTUAL QUESTIONS:\n\
            1. Why does pretraining help?";
        let set = parse_response(response);
        assert_eq!(
            set.factual,
            vec!["What is the corpus size?", "Which optimizer is used?"]
        );
        assert_eq!(set.conceptual, vec!["Why does pretraining help?"]);
    }

    #[test]
    fn test_preamble_and_chatter_ignored() {
        let response = "Sure! Here are your questions.\n1. Not in a section.\n\n\
            FACTUAL QUESTIONS:\nThese test recall.\n1. Who introduced dropout?\n\n\
            CONCEPTUAL QUESTIONS:\n1. How does dropout regularize?\n\nHope this helps!";
        let set = parse_response(response);
        assert_eq!(set.factual, vec!["Who introduced dropout?"]);
        assert_eq!(set.conceptual, vec!["How does dropout regularize?"]);
    }

    #[test]
    fn test_missing_markers_yields_nothing() {
        let set = parse_response("1. What is this?\n2. Where is that?");
        assert!(set.is_empty());
    }

    #[test]
    fn test_only_conceptual_marker() {
        let set = parse_response("CONCEPTUAL QUESTIONS:\n1. Why are we here?");
        assert!(set.factual.is_empty());
        assert_eq!(set.conceptual, vec!["Why are we here?"]);
    }

    #[test]
    fn test_short_candidates_dropped() {
        let set = parse_response("FACTUAL QUESTIONS:\n1. Q1\n2. Q2\n3. What?\n4. Whose?!");
        assert_eq!(set.factual, vec!["Whose?!"]);
    }

    #[test]
    fn test_extract_question_prefixes() {
        assert_eq!(extract_question("  3. What is X?  ").as_deref(), Some("What is X?"));
        assert_eq!(extract_question("12) What is X?").as_deref(), Some("What is X?"));
        assert_eq!(extract_question("- What is X?").as_deref(), Some("What is X?"));
        assert_eq!(
            extract_question("1. Q1: What is X?").as_deref(),
            Some("What is X?")
        );
        assert_eq!(
            extract_question("2. Question 2) What is X?").as_deref(),
            Some("What is X?")
        );
        assert_eq!(
            extract_question("4. What does f(x) denote?").as_deref(),
            Some("What does f(x) denote?")
        );
        assert_eq!(extract_question("What is X?"), None);
        assert_eq!(extract_question(""), None);
    }
}
