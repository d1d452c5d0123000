//! Best-effort answers for questions the fact store cannot resolve.

use serde::{Deserialize, Serialize};

use crate::matcher::normalize;

/// A guessed answer with its confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    pub answer: bool,
    /// Confidence from 0.0 to 1.0.
    pub confidence: f64,
}

impl Guess {
    /// A guess with the given answer and confidence.
    pub const fn new(answer: bool, confidence: f64) -> Self {
        Self { answer, confidence }
    }
}

/// Answers a question without the fact store, e.g. a heuristic or a trained model.
pub trait FallbackAnswerer: Send + Sync {
    fn guess(&self, question: &str) -> Guess;
}

/// A known claim recognized by the words it contains.
struct PatternRule {
    /// Every one of these must appear.
    all_of: &'static [&'static str],
    /// At least one of these must appear, when non-empty.
    any_of: &'static [&'static str],
    guess: Guess,
}

impl PatternRule {
    fn matches(&self, text: &str) -> bool {
        self.all_of.iter().all(|w| text.contains(w))
            && (self.any_of.is_empty() || self.any_of.iter().any(|w| text.contains(w)))
    }
}

const PATTERN_RULES: &[PatternRule] = &[
    // Common myths.
    PatternRule {
        all_of: &["viking", "chifre"],
        any_of: &[],
        guess: Guess::new(false, 0.85),
    },
    PatternRule {
        all_of: &["muralha", "china", "espaco"],
        any_of: &[],
        guess: Guess::new(false, 0.90),
    },
    PatternRule {
        all_of: &["einstein", "matematica", "ruim"],
        any_of: &[],
        guess: Guess::new(false, 0.85),
    },
    PatternRule {
        all_of: &["10%", "cerebro"],
        any_of: &[],
        guess: Guess::new(false, 0.90),
    },
    // Well-known truths.
    PatternRule {
        all_of: &["terra"],
        any_of: &["redonda", "esferica"],
        guess: Guess::new(true, 0.95),
    },
    PatternRule {
        all_of: &["terra", "sol", "gira"],
        any_of: &[],
        guess: Guess::new(true, 0.95),
    },
];

/// Words that tend to appear in false claims.
const FALSE_HINTS: &[&str] = &[
    "alienigena",
    "alien",
    "100%",
    "sempre",
    "nunca",
    "impossivel",
    "chifre",
];

/// Words that tend to appear in true claims.
const TRUE_HINTS: &[&str] = &[
    "terra", "redonda", "esferica", "gira", "sol", "lua", "satelite", "natural",
];

const HINT_BASE_CONFIDENCE: f64 = 0.60;
const HINT_STEP: f64 = 0.05;

/// The default fallback: known myth/truth patterns, then a vote between
/// hint words. Matching is by substring on normalized text.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordHeuristic;

impl KeywordHeuristic {
    /// The built-in pattern rules and hint lists.
    pub fn new() -> Self {
        Self
    }
}

impl FallbackAnswerer for KeywordHeuristic {
    fn guess(&self, question: &str) -> Guess {
        let text = normalize(question);

        if let Some(rule) = PATTERN_RULES.iter().find(|rule| rule.matches(&text)) {
            return rule.guess;
        }

        let false_hits = FALSE_HINTS.iter().filter(|w| text.contains(*w)).count();
        let true_hits = TRUE_HINTS.iter().filter(|w| text.contains(*w)).count();
        let confidence = |hits: usize| (HINT_BASE_CONFIDENCE + hits as f64 * HINT_STEP).min(1.0);

        match false_hits.cmp(&true_hits) {
            std::cmp::Ordering::Greater => Guess::new(false, confidence(false_hits)),
            std::cmp::Ordering::Less => Guess::new(true, confidence(true_hits)),
            std::cmp::Ordering::Equal => Guess::new(true, 0.50),
        }
    }
}
