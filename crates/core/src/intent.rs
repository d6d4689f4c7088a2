//! Intent Classification
//!
//! Maps raw query text to the agent that should handle it. The rules are a
//! fixed priority list of keyword tables: quiz, then teach, then search, with
//! search as the fallback for anything else.

use serde::{Deserialize, Serialize};
use std::fmt;

const QUIZ_KEYWORDS: &[&str] = &[
    "quiz",
    "test",
    "question",
    "assess",
    "check my",
    "evaluate",
    "challenge",
    "exercise",
];

const TEACH_KEYWORDS: &[&str] = &[
    "teach",
    "explain",
    "lesson",
    "start",
    "begin",
    "chapter",
    "tell me about",
    "walk me through",
    "introduce",
    "overview",
];

const SEARCH_KEYWORDS: &[&str] = &[
    "what",
    "how",
    "why",
    "when",
    "where",
    "find",
    "search",
    "does the book say",
    "according to",
    "mentions",
];

/// The classified purpose of a user query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Teach,
    Search,
    Quiz,
}

impl Intent {
    /// Classifies a query by case-insensitive substring match.
    ///
    /// The first matching table wins, so a query mentioning both a quiz and a
    /// lesson is a quiz. Queries matching nothing are searches.
    pub fn classify(query: &str) -> Self {
        let query = query.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|k| query.contains(k));

        if matches(QUIZ_KEYWORDS) {
            Intent::Quiz
        } else if matches(TEACH_KEYWORDS) {
            Intent::Teach
        } else if matches(SEARCH_KEYWORDS) {
            Intent::Search
        } else {
            Intent::Search
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Teach => write!(f, "teach"),
            Intent::Search => write!(f, "search"),
            Intent::Quiz => write!(f, "quiz"),
        }
    }
}
