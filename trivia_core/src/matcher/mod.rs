//! Matcher - finds the stored fact a free-text question refers to.
//!
//! Lookup runs an ordered cascade of strategies and the first hit wins:
//! 1. **Exact**: normalized statement equals the normalized question
//! 2. **Substring**: either normalized text contains the other
//! 3. **KeywordOverlap**: best keyword similarity, strictly above the threshold

mod normalize;
mod strategy;

pub use normalize::*;
pub use strategy::*;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use trivia_records::FactRecord;

/// A set of keywords extracted from a text.
pub type Keywords = HashSet<String>;

/// Words ignored when extracting keywords.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "o", "a", "de", "da", "do", "em", "na", "no", "e", "ou", "um", "uma", "é", "são",
];

/// Characters that separate words besides whitespace.
const WORD_SEPARATORS: &[char] = &[',', '.', '!', '?'];

/// Configuration for keyword extraction and fuzzy matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Keyword similarity must be strictly greater than this to match.
    pub keyword_threshold: f64,

    /// Shorter words are not keywords.
    pub min_keyword_len: usize,

    /// Words never treated as keywords.
    pub stop_words: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            keyword_threshold: 0.5,
            min_keyword_len: 3,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Keyword extraction and the lookup cascade, built from a [`MatcherConfig`].
#[derive(Debug, Clone)]
pub struct Matcher {
    keyword_threshold: f64,
    min_keyword_len: usize,
    stop_words: HashSet<String>,
}

impl Matcher {
    /// Create a matcher with the given configuration.
    pub fn new(config: &MatcherConfig) -> Self {
        Self {
            keyword_threshold: config.keyword_threshold,
            min_keyword_len: config.min_keyword_len,
            stop_words: config.stop_words.iter().cloned().collect(),
        }
    }

    /// Create a matcher with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(&MatcherConfig::default())
    }

    /// Overlap a keyword match has to exceed.
    pub fn keyword_threshold(&self) -> f64 {
        self.keyword_threshold
    }

    /// Split on any Unicode whitespace and `, . ! ?`, then drop short words
    /// and stop words.
    pub fn extract_keywords(&self, text: &str) -> Keywords {
        text.split(|c: char| c.is_whitespace() || WORD_SEPARATORS.contains(&c))
            .filter(|word| !word.is_empty() && word.chars().count() >= self.min_keyword_len)
            .filter(|word| !self.stop_words.contains(*word))
            .map(str::to_string)
            .collect()
    }

    /// Prepare a stored fact for matching.
    pub fn index(&self, record: FactRecord) -> IndexedFact {
        let normalized = normalize(&record.statement);
        let keywords = self.extract_keywords(&normalized);
        IndexedFact {
            record,
            normalized,
            keywords,
        }
    }

    /// Prepare a question for matching. Blank questions yield `None`.
    pub fn query(&self, question: &str) -> Option<Query> {
        let normalized = normalize(question);
        if normalized.is_empty() {
            return None;
        }
        let keywords = self.extract_keywords(&normalized);
        Some(Query {
            normalized,
            keywords,
        })
    }

    /// Run the cascade over `entries` and report the first strategy that hits.
    pub fn find<'a>(&self, entries: &'a [IndexedFact], question: &str) -> Option<FactMatch<'a>> {
        let query = self.query(question)?;

        let (strategy, hit) = exact_match(entries, &query)
            .map(|hit| (MatchStrategy::Exact, hit))
            .or_else(|| substring_match(entries, &query).map(|hit| (MatchStrategy::Substring, hit)))
            .or_else(|| {
                keyword_overlap(entries, &query, self.keyword_threshold)
                    .map(|hit| (MatchStrategy::KeywordOverlap, hit))
            })?;

        Some(FactMatch {
            fact: &entries[hit.index].record,
            strategy,
            score: hit.score,
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Overlap of two keyword sets: shared words over the size of the larger set.
///
/// Returns 0 when either set is empty.
pub fn similarity_score(a: &Keywords, b: &Keywords) -> f64 {
    let larger = a.len().max(b.len());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    a.intersection(b).count() as f64 / larger as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Keywords {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn entries(matcher: &Matcher, statements: &[&str]) -> Vec<IndexedFact> {
        statements
            .iter()
            .enumerate()
            .map(|(i, s)| matcher.index(FactRecord::new(i as u32 + 1, *s, i % 2 == 0)))
            .collect()
    }

    #[test]
    fn test_extract_keywords() {
        let matcher = Matcher::with_defaults();
        let words = matcher.extract_keywords("a guerra do paraguai terminou em 1870, com derrota!");

        assert_eq!(
            words,
            keywords(&["guerra", "paraguai", "terminou", "1870", "com", "derrota"])
        );
    }

    #[test]
    fn test_extract_keywords_drops_stop_words_and_short_words() {
        let matcher = Matcher::with_defaults();
        assert!(matcher.extract_keywords("o a de da do em na no e ou").is_empty());
        assert!(matcher.extract_keywords("uma").is_empty());
        assert!(matcher.extract_keywords("são").is_empty());
        assert_eq!(matcher.extract_keywords("rei é Luís"), keywords(&["rei", "Luís"]));
    }

    #[test]
    fn test_keyword_length_counts_characters() {
        let matcher = Matcher::with_defaults();
        // "só" is two characters but three bytes.
        assert!(matcher.extract_keywords("só").is_empty());
    }

    #[test]
    fn test_extract_keywords_splits_on_any_whitespace() {
        let matcher = Matcher::with_defaults();
        assert_eq!(
            matcher.extract_keywords("terra\tredonda\nplana\u{a0}lua"),
            keywords(&["terra", "redonda", "plana", "lua"])
        );
    }

    #[test]
    fn test_custom_config() {
        let matcher = Matcher::new(&MatcherConfig {
            keyword_threshold: 0.3,
            min_keyword_len: 5,
            stop_words: vec!["brasil".to_string()],
        });
        assert_eq!(
            matcher.extract_keywords("brasil imperio vargas"),
            keywords(&["imperio", "vargas"])
        );
        assert_eq!(matcher.keyword_threshold(), 0.3);
    }

    #[test]
    fn test_similarity_score() {
        let a = keywords(&["guerra", "fria", "terminou", "1991"]);
        let b = keywords(&["guerra", "fria", "comecou"]);
        assert_eq!(similarity_score(&a, &b), 0.5);
        assert_eq!(similarity_score(&a, &a), 1.0);
        assert_eq!(similarity_score(&a, &Keywords::new()), 0.0);
        assert_eq!(similarity_score(&Keywords::new(), &Keywords::new()), 0.0);
    }

    #[test]
    fn test_cascade_prefers_exact() {
        let matcher = Matcher::with_defaults();
        let entries = entries(
            &matcher,
            &["A Terra é redonda e gira", "A Terra é redonda", "Terra redonda plana"],
        );

        let found = matcher.find(&entries, "a terra e redonda").unwrap();
        assert_eq!(found.strategy, MatchStrategy::Exact);
        assert_eq!(found.fact.statement, "A Terra é redonda");
        assert_eq!(found.score, 1.0);
    }

    #[test]
    fn test_cascade_substring_before_keywords() {
        let matcher = Matcher::with_defaults();
        let entries = entries(
            &matcher,
            &["Cabral chegou ao Brasil navegando", "Cabral chegou ao Brasil em 1500"],
        );

        let found = matcher
            .find(&entries, "É verdade que Cabral chegou ao Brasil em 1500?")
            .unwrap();
        assert_eq!(found.strategy, MatchStrategy::Substring);
        assert_eq!(found.fact.id.0, 2);
    }

    #[test]
    fn test_cascade_keyword_threshold_is_strict() {
        let matcher = Matcher::with_defaults();
        let entries = entries(&matcher, &["napoleao perdeu batalha waterloo"]);

        // 2 of 4 keywords shared: exactly 0.5, not enough.
        assert!(matcher.find(&entries, "napoleao perdeu guerra russia").is_none());

        // 3 of 4 keywords shared.
        let found = matcher.find(&entries, "napoleao perdeu batalha russia").unwrap();
        assert_eq!(found.strategy, MatchStrategy::KeywordOverlap);
        assert_eq!(found.score, 0.75);
    }

    #[test]
    fn test_blank_question_matches_nothing() {
        let matcher = Matcher::with_defaults();
        let entries = entries(&matcher, &["Qualquer coisa"]);
        assert!(matcher.find(&entries, "   ").is_none());
        assert!(matcher.find(&[], "Qualquer coisa").is_none());
    }
}
