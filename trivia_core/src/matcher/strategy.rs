//! The individual lookup strategies.
//!
//! Each strategy is a pure function over the indexed facts of one
//! generation. A hit carries the position of the matching entry and a score
//! in [0, 1].

use serde::{Deserialize, Serialize};
use trivia_records::FactRecord;

use super::{similarity_score, Keywords};

/// Which strategy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// Normalized texts are equal.
    Exact,
    /// One normalized text contains the other.
    Substring,
    /// Keyword overlap above the threshold.
    KeywordOverlap,
}

impl MatchStrategy {
    /// Lowercase name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::Substring => "substring",
            MatchStrategy::KeywordOverlap => "keyword_overlap",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fact with its statement pre-normalized and its keywords extracted.
#[derive(Debug, Clone)]
pub struct IndexedFact {
    pub record: FactRecord,
    pub normalized: String,
    pub keywords: Keywords,
}

/// A normalized question ready for matching.
#[derive(Debug, Clone)]
pub struct Query {
    pub normalized: String,
    pub keywords: Keywords,
}

/// Result of a single strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyHit {
    /// Position of the matching entry.
    pub index: usize,
    pub score: f64,
}

/// The fact a question resolved to, and how.
#[derive(Debug, Clone, PartialEq)]
pub struct FactMatch<'a> {
    pub fact: &'a FactRecord,
    pub strategy: MatchStrategy,
    pub score: f64,
}

/// First entry whose normalized statement equals the question.
pub fn exact_match(entries: &[IndexedFact], query: &Query) -> Option<StrategyHit> {
    entries
        .iter()
        .position(|entry| entry.normalized == query.normalized)
        .map(|index| StrategyHit { index, score: 1.0 })
}

/// First entry whose statement contains the question or is contained in it.
///
/// The score is the length of the shorter text over the longer one.
pub fn substring_match(entries: &[IndexedFact], query: &Query) -> Option<StrategyHit> {
    entries.iter().enumerate().find_map(|(index, entry)| {
        if entry.normalized.is_empty() {
            return None;
        }
        let contained = entry.normalized.contains(&query.normalized)
            || query.normalized.contains(&entry.normalized);
        contained.then(|| {
            let a = entry.normalized.chars().count();
            let b = query.normalized.chars().count();
            StrategyHit {
                index,
                score: a.min(b) as f64 / a.max(b) as f64,
            }
        })
    })
}

/// Highest keyword similarity strictly above `threshold`; ties go to the earliest entry.
pub fn keyword_overlap(
    entries: &[IndexedFact],
    query: &Query,
    threshold: f64,
) -> Option<StrategyHit> {
    let mut best: Option<StrategyHit> = None;

    for (index, entry) in entries.iter().enumerate() {
        let score = similarity_score(&query.keywords, &entry.keywords);
        if score <= threshold {
            continue;
        }
        if best.map_or(true, |b| score > b.score) {
            best = Some(StrategyHit { index, score });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Matcher;

    fn setup(statements: &[&str]) -> (Matcher, Vec<IndexedFact>) {
        let matcher = Matcher::with_defaults();
        let entries = statements
            .iter()
            .enumerate()
            .map(|(i, s)| matcher.index(FactRecord::new(i as u32, *s, true)))
            .collect();
        (matcher, entries)
    }

    #[test]
    fn test_exact_ignores_case_and_accents() {
        let (matcher, entries) = setup(&["Outra coisa", "Dom Pedro I proclamou a Independência"]);
        let query = matcher.query("dom pedro i proclamou a independencia").unwrap();

        assert_eq!(
            exact_match(&entries, &query),
            Some(StrategyHit { index: 1, score: 1.0 })
        );
    }

    #[test]
    fn test_substring_either_direction() {
        let (matcher, entries) = setup(&["A Lei Áurea aboliu a escravidão no Brasil", "Tiradentes"]);

        let shorter = matcher.query("lei aurea aboliu a escravidao").unwrap();
        assert_eq!(substring_match(&entries, &shorter).map(|h| h.index), Some(0));

        let longer = matcher.query("Tiradentes foi enforcado em 1792").unwrap();
        let hit = substring_match(&entries, &longer).unwrap();
        assert_eq!(hit.index, 1);
        assert!(hit.score > 0.0 && hit.score < 1.0);
    }

    #[test]
    fn test_substring_first_in_store_order() {
        let (matcher, entries) = setup(&["getulio vargas", "vargas"]);
        let query = matcher.query("getulio vargas governou").unwrap();
        assert_eq!(substring_match(&entries, &query).map(|h| h.index), Some(0));
    }

    #[test]
    fn test_keyword_overlap_picks_best() {
        let (matcher, entries) = setup(&[
            "imperio romano caiu ano 476",
            "imperio romano oriente caiu 1453",
        ]);
        let query = matcher.query("imperio romano oriente caiu constantinopla").unwrap();

        let hit = keyword_overlap(&entries, &query, 0.5).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.score, 0.8);
    }

    #[test]
    fn test_keyword_overlap_tie_goes_to_first() {
        let (matcher, entries) = setup(&["alpha beta gamma", "alpha beta delta"]);
        let query = matcher.query("alpha beta").unwrap();

        let hit = keyword_overlap(&entries, &query, 0.5).unwrap();
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn test_keyword_overlap_below_threshold() {
        let (matcher, entries) = setup(&["alpha beta gamma delta"]);
        let query = matcher.query("alpha beta omega sigma").unwrap();
        assert!(keyword_overlap(&entries, &query, 0.5).is_none());
    }
}
