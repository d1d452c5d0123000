//! One immutable snapshot of the loaded facts.

use rand::seq::index;
use rand::seq::SliceRandom;
use rand::Rng;

use trivia_records::{FactId, FactRecord};

use crate::matcher::{FactMatch, IndexedFact, Matcher};
use crate::StoreError;

/// The facts from one load, indexed for matching.
///
/// A generation never changes after it is built. Reloading the store builds
/// a new generation and swaps it in whole.
#[derive(Debug, Clone)]
pub struct FactGeneration {
    number: u64,
    entries: Vec<IndexedFact>,
}

impl FactGeneration {
    /// Index `records` with `matcher`, keeping their order.
    pub fn build(number: u64, records: Vec<FactRecord>, matcher: &Matcher) -> Self {
        Self {
            number,
            entries: records.into_iter().map(|r| matcher.index(r)).collect(),
        }
    }

    /// Sequence number of this generation, increasing with every load.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Number of facts in this generation.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All records in source order.
    pub fn records(&self) -> impl Iterator<Item = &FactRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    /// The fact with `id`, if present.
    pub fn get(&self, id: FactId) -> Option<&FactRecord> {
        self.records().find(|r| r.id == id)
    }

    /// Indexed entries in source order.
    pub fn entries(&self) -> &[IndexedFact] {
        &self.entries
    }

    /// Pick one record uniformly at random.
    pub fn random_fact<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&FactRecord, StoreError> {
        self.entries
            .choose(rng)
            .map(|e| &e.record)
            .ok_or(StoreError::EmptyStore)
    }

    /// Pick `min(count, len)` distinct records in random order.
    pub fn random_facts<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<&FactRecord>, StoreError> {
        if self.is_empty() {
            return Err(StoreError::EmptyStore);
        }
        let amount = count.min(self.len());
        Ok(index::sample(rng, self.len(), amount)
            .into_iter()
            .map(|i| &self.entries[i].record)
            .collect())
    }

    /// Resolve a question to a stored fact.
    pub fn find_match(&self, matcher: &Matcher, question: &str) -> Option<FactMatch<'_>> {
        matcher.find(&self.entries, question)
    }
}
