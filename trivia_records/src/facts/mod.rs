//! Fact records - the true/false statements served by the quiz.

mod source;

pub use source::*;

use serde::{Deserialize, Serialize};

/// Identifier of a fact, unique within one loaded source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactId(pub u32);

impl FactId {
    /// The id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for FactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labeled factual claim.
///
/// Records are created in bulk when a source is loaded and never mutated;
/// a reload replaces the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    pub id: FactId,

    /// Text of the claim.
    pub statement: String,

    /// Ground truth for the claim.
    pub is_true: bool,

    /// Elaboration shown after the player answers.
    pub trivia: String,
}

impl FactRecord {
    /// Create a fact record.
    pub fn new(id: u32, statement: impl Into<String>, is_true: bool) -> Self {
        Self {
            id: FactId(id),
            statement: statement.into(),
            is_true,
            trivia: String::new(),
        }
    }

    /// Set the trivia text.
    pub fn with_trivia(mut self, trivia: impl Into<String>) -> Self {
        self.trivia = trivia.into();
        self
    }
}

/// Truth labels accepted as "true" in a fact source, compared case-insensitively.
pub const TRUE_LABELS: &[&str] = &["verdadeiro", "true", "1"];

/// Interpret a truth-label column. Anything not recognized as true is false.
pub fn parse_truth_label(label: &str) -> bool {
    let label = label.trim();
    TRUE_LABELS.iter().any(|t| t.eq_ignore_ascii_case(label))
}

/// The label written for a truth value when appending to a fact source.
pub fn truth_label(is_true: bool) -> &'static str {
    if is_true {
        "Verdadeiro"
    } else {
        "Falso"
    }
}
