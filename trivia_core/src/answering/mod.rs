//! Answering Desk - turns a question into an answer and a ledger event.
//!
//! A question is answered in this order:
//! 1. **Lookup**: the fact store resolves it to a stored fact
//! 2. **Fallback**: otherwise the fallback answerer guesses
//! 3. **Record**: the answer is appended to the ledger with no vote
//!
//! A later vote on the same answer is appended as a second event.

mod clock;
mod fallback;

pub use clock::*;
pub use fallback::*;

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use trivia_records::{
    AnswerSource, FactId, FactRecord, FeedbackLedger, FeedbackRecord, FeedbackStatistics,
    LocalFiles, NewFact,
};

use crate::config::{AnsweringConfig, TriviaConfig};
use crate::fact_store::FactStore;
use crate::matcher::{MatchStrategy, Matcher};
use crate::DeskError;

/// The answer handed back to the asker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub timestamp: NaiveDateTime,
    pub question: String,
    pub answer: bool,
    /// Trivia for a stored fact, or the fallback note for a guess.
    pub explanation: String,
    pub confidence: f64,
    pub source: AnswerSource,
    /// The stored fact, when the answer came from the store.
    pub fact_id: Option<FactId>,
    pub strategy: Option<MatchStrategy>,
}

impl Answer {
    /// The ledger event for this answer, with no vote yet.
    pub fn to_feedback_record(&self) -> FeedbackRecord {
        FeedbackRecord::new(self.timestamp, &self.question, self.answer, self.source.clone())
            .with_explanation(&self.explanation)
            .with_confidence(self.confidence)
    }
}

/// A usefulness vote on a previously given answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    /// Timestamp of the original answer.
    pub timestamp: NaiveDateTime,
    pub question: String,
    pub answer: bool,
    pub explanation: String,
    pub confidence: f64,
    pub source: AnswerSource,
    pub is_useful: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

impl FeedbackSubmission {
    /// Vote on an answer given by the desk.
    pub fn for_answer(answer: &Answer, is_useful: bool, comment: Option<String>) -> Self {
        Self {
            timestamp: answer.timestamp,
            question: answer.question.clone(),
            answer: answer.answer,
            explanation: answer.explanation.clone(),
            confidence: answer.confidence,
            source: answer.source.clone(),
            is_useful,
            comment,
        }
    }

    fn into_record(self) -> FeedbackRecord {
        let record = FeedbackRecord::new(self.timestamp, self.question, self.answer, self.source)
            .with_explanation(self.explanation)
            .with_confidence(self.confidence)
            .with_usefulness(self.is_useful);
        match self.comment {
            Some(comment) => record.with_comment(comment),
            None => record,
        }
    }
}

/// Answers questions, serves quiz facts, and records feedback.
pub struct TriviaDesk {
    store: Arc<FactStore>,
    ledger: Arc<FeedbackLedger>,
    fallback: Box<dyn FallbackAnswerer>,
    clock: Box<dyn Clock>,
    config: AnsweringConfig,
}

impl TriviaDesk {
    /// Create a desk with the keyword heuristic, the system clock, and default settings.
    pub fn new(store: Arc<FactStore>, ledger: Arc<FeedbackLedger>) -> Self {
        Self {
            store,
            ledger,
            fallback: Box::new(KeywordHeuristic::new()),
            clock: Box::new(SystemClock),
            config: AnsweringConfig::default(),
        }
    }

    /// Open the fact source and feedback logs named in `config` on the local disk.
    pub fn from_config(config: &TriviaConfig) -> Result<Self, DeskError> {
        let files = Arc::new(LocalFiles::new());
        let store = FactStore::load(
            files.clone(),
            &config.storage.facts_path,
            Matcher::new(&config.matcher),
        )?;
        let ledger = FeedbackLedger::open(files, &config.storage.feedback_dir)?;

        Ok(Self::new(Arc::new(store), Arc::new(ledger)).with_config(config.answering.clone()))
    }

    /// Replace the answerer used when no stored fact matches.
    pub fn with_fallback(mut self, fallback: impl FallbackAnswerer + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    /// Replace the clock that stamps answers.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the answering settings.
    pub fn with_config(mut self, config: AnsweringConfig) -> Self {
        self.config = config;
        self
    }

    /// The fact store answers are resolved against.
    pub fn store(&self) -> &FactStore {
        &self.store
    }

    /// The ledger every answer and vote is appended to.
    pub fn ledger(&self) -> &FeedbackLedger {
        &self.ledger
    }

    /// Answer a free-text question and record it in the ledger.
    pub fn ask(&self, question: &str) -> Result<Answer, DeskError> {
        if question.trim().is_empty() {
            return Err(DeskError::EmptyQuestion);
        }

        let answer = match self.store.find_match(question) {
            Some(found) => Answer {
                timestamp: self.clock.now(),
                question: question.to_string(),
                answer: found.fact.is_true,
                explanation: found.fact.trivia,
                confidence: self.config.dataset_confidence,
                source: AnswerSource::Dataset,
                fact_id: Some(found.fact.id),
                strategy: Some(found.strategy),
            },
            None => {
                let guess = self.fallback.guess(question);
                Answer {
                    timestamp: self.clock.now(),
                    question: question.to_string(),
                    answer: guess.answer,
                    explanation: self.config.fallback_note.clone(),
                    confidence: guess.confidence.clamp(0.0, 1.0),
                    source: AnswerSource::Ml,
                    fact_id: None,
                    strategy: None,
                }
            }
        };

        tracing::info!(
            source = %answer.source,
            answer = answer.answer,
            confidence = answer.confidence,
            "question answered"
        );
        self.ledger.append(&answer.to_feedback_record());
        Ok(answer)
    }

    /// Record a usefulness vote as a new ledger event.
    pub fn submit_feedback(&self, submission: FeedbackSubmission) -> Result<(), DeskError> {
        if submission.question.trim().is_empty() {
            return Err(DeskError::InvalidFeedback("question is empty".to_string()));
        }
        if !submission.confidence.is_finite() {
            return Err(DeskError::InvalidFeedback(format!(
                "confidence {} is not a number",
                submission.confidence
            )));
        }

        tracing::info!(is_useful = submission.is_useful, "feedback received");
        self.ledger.append(&submission.into_record());
        Ok(())
    }

    /// A random quiz question.
    pub fn next_question(&self) -> Result<FactRecord, DeskError> {
        Ok(self.store.random_fact()?)
    }

    /// Up to `count` distinct quiz questions.
    pub fn questions(&self, count: usize) -> Result<Vec<FactRecord>, DeskError> {
        Ok(self.store.random_facts(count)?)
    }

    /// Number of facts in the current generation.
    pub fn total_facts(&self) -> usize {
        self.store.count()
    }

    /// Add a question to the fact source and make it available immediately.
    pub fn save_question(&self, fact: &NewFact) -> Result<FactId, DeskError> {
        if fact.statement.trim().is_empty() {
            return Err(DeskError::EmptyQuestion);
        }
        Ok(self.store.add_fact(fact)?)
    }

    /// Aggregate counters over the whole ledger.
    pub fn statistics(&self) -> FeedbackStatistics {
        self.ledger.statistics()
    }

    /// The newest `limit` ledger events, newest first.
    pub fn recent_feedback(&self, limit: usize) -> Vec<FeedbackRecord> {
        self.ledger.recent(limit)
    }
}

impl std::fmt::Debug for TriviaDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriviaDesk")
            .field("store", &self.store)
            .field("ledger", &self.ledger)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
