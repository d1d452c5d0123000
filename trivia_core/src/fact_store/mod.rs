//! Fact Store - the in-memory collection of quiz facts.
//!
//! The store owns one [`FactGeneration`] at a time behind an `Arc`. Readers
//! clone the `Arc` and work on that snapshot; a reload builds the next
//! generation off to the side and swaps the pointer, so no reader ever sees
//! a half-loaded collection or mixes records from two loads.
//!
//! Writers (reload and append) are serialized by a separate guard, so
//! generations are swapped in the order their numbers were assigned.

mod generation;

pub use generation::*;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::Rng;
use serde::{Deserialize, Serialize};
use trivia_records::{append_fact, read_facts, FactId, FactRecord, LocalFiles, NewFact, TextFiles};

use crate::matcher::{MatchStrategy, Matcher};
use crate::StoreError;

/// A resolved question, detached from the generation it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundFact {
    pub fact: FactRecord,
    pub strategy: MatchStrategy,
    pub score: f64,
}

/// Holds the current generation of facts and serves sampling and lookup.
pub struct FactStore {
    files: Arc<dyn TextFiles>,
    source: Option<PathBuf>,
    matcher: Matcher,
    current: RwLock<Arc<FactGeneration>>,
    generations: AtomicU64,
    writer: Mutex<()>,
}

impl FactStore {
    /// Load the fact source at `source`.
    ///
    /// Fails with [`trivia_records::RecordsError::SourceMissing`] when the file
    /// does not exist; malformed rows are skipped.
    pub fn load(
        files: Arc<dyn TextFiles>,
        source: impl Into<PathBuf>,
        matcher: Matcher,
    ) -> Result<Self, StoreError> {
        let source = source.into();
        let records = read_facts(files.as_ref(), &source)?;
        let store = Self::assemble(files, Some(source), matcher, records);
        tracing::info!(count = store.count(), "fact store loaded");
        Ok(store)
    }

    /// Load a fact source from the local filesystem with the default matcher.
    pub fn open(source: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::load(Arc::new(LocalFiles::new()), source, Matcher::with_defaults())
    }

    /// Build a store over fixed records. It has no source, so it cannot reload.
    ///
    /// Records repeating an earlier id are dropped with a warning, the same
    /// way a loaded source treats them.
    pub fn from_records(records: Vec<FactRecord>, matcher: Matcher) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let records = records
            .into_iter()
            .filter(|record| {
                let fresh = seen.insert(record.id);
                if !fresh {
                    tracing::warn!(id = %record.id, "duplicate fact id dropped");
                }
                fresh
            })
            .collect();
        Self::assemble(Arc::new(LocalFiles::new()), None, matcher, records)
    }

    fn assemble(
        files: Arc<dyn TextFiles>,
        source: Option<PathBuf>,
        matcher: Matcher,
        records: Vec<FactRecord>,
    ) -> Self {
        let first = FactGeneration::build(1, records, &matcher);
        Self {
            files,
            source,
            matcher,
            current: RwLock::new(Arc::new(first)),
            generations: AtomicU64::new(1),
            writer: Mutex::new(()),
        }
    }

    /// Path of the fact source, `None` for an in-memory store.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The matcher used to index and resolve questions.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// The current generation. Queries against it stay consistent across reloads.
    pub fn snapshot(&self) -> Arc<FactGeneration> {
        Arc::clone(&self.current.read())
    }

    /// Re-read the source and replace the current generation.
    ///
    /// On failure the current generation stays in place.
    pub fn reload(&self) -> Result<(), StoreError> {
        let source = self.source.as_deref().ok_or(StoreError::NoSource)?;
        let _writer = self.writer.lock();
        self.reload_locked(source)
    }

    // Caller holds `writer`.
    fn reload_locked(&self, source: &Path) -> Result<(), StoreError> {
        let records = read_facts(self.files.as_ref(), source)?;

        let number = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let next = Arc::new(FactGeneration::build(number, records, &self.matcher));
        let count = next.len();

        *self.current.write() = next;
        tracing::info!(generation = number, count, "fact store reloaded");
        Ok(())
    }

    /// Number of loaded facts.
    pub fn count(&self) -> usize {
        self.snapshot().len()
    }

    /// One fact picked uniformly at random.
    pub fn random_fact(&self) -> Result<FactRecord, StoreError> {
        self.random_fact_with(&mut rand::thread_rng())
    }

    /// [`random_fact`](Self::random_fact) with a caller-supplied generator.
    pub fn random_fact_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<FactRecord, StoreError> {
        self.snapshot().random_fact(rng).cloned()
    }

    /// Up to `count` distinct facts in random order.
    pub fn random_facts(&self, count: usize) -> Result<Vec<FactRecord>, StoreError> {
        self.random_facts_with(&mut rand::thread_rng(), count)
    }

    /// [`random_facts`](Self::random_facts) with a caller-supplied generator.
    pub fn random_facts_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<FactRecord>, StoreError> {
        let snapshot = self.snapshot();
        let picked = snapshot.random_facts(rng, count)?;
        Ok(picked.into_iter().cloned().collect())
    }

    /// The stored fact a question refers to, if any.
    pub fn find_by_question(&self, question: &str) -> Option<FactRecord> {
        self.find_match(question).map(|found| found.fact)
    }

    /// Like [`find_by_question`](Self::find_by_question), also reporting the
    /// strategy that matched and its score.
    pub fn find_match(&self, question: &str) -> Option<FoundFact> {
        let snapshot = self.snapshot();
        let found = snapshot.find_match(&self.matcher, question);

        match &found {
            Some(m) => tracing::debug!(
                id = %m.fact.id,
                strategy = %m.strategy,
                score = m.score,
                "question matched a stored fact"
            ),
            None => tracing::debug!("no stored fact matched the question"),
        }

        found.map(|m| FoundFact {
            fact: m.fact.clone(),
            strategy: m.strategy,
            score: m.score,
        })
    }

    /// Append a fact to the source and reload so it becomes visible.
    pub fn add_fact(&self, fact: &NewFact) -> Result<FactId, StoreError> {
        let source = self.source.as_deref().ok_or(StoreError::NoSource)?;
        let _writer = self.writer.lock();
        let id = append_fact(self.files.as_ref(), source, fact)?;
        self.reload_locked(source)?;
        Ok(id)
    }
}

impl std::fmt::Debug for FactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("FactStore")
            .field("source", &self.source)
            .field("generation", &snapshot.number())
            .field("count", &snapshot.len())
            .finish_non_exhaustive()
    }
}
