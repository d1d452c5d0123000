//! The append-only feedback ledger.
//!
//! Two CSV logs share one header: the "all" log receives every record, the
//! "useful" log additionally receives records voted useful. A single mutex
//! covers both files, so an append (up to two writes) and a read never
//! interleave.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{AnswerSource, FeedbackRecord, FEEDBACK_HEADER};
use crate::{csv_line, RecordsError, TextFiles};

/// File name of the log holding every record.
pub const ALL_FEEDBACK_FILE: &str = "all_feedback.csv";

/// File name of the log holding records voted useful.
pub const USEFUL_FEEDBACK_FILE: &str = "useful_feedback.csv";

/// Aggregate counts over the logs.
///
/// These count log events, not distinct questions: a question that later
/// received a vote appears once as "no feedback" and once with its vote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeedbackStatistics {
    pub total_requests: usize,
    /// Size of the useful log.
    pub useful_requests: usize,
    pub not_useful_requests: usize,
    pub no_feedback_requests: usize,
    /// Mean confidence over the all log, 0 when empty.
    pub average_confidence: f64,
    pub dataset_source_count: usize,
    pub ml_source_count: usize,
}

/// Append-only store of [`FeedbackRecord`] events.
pub struct FeedbackLedger {
    files: Arc<dyn TextFiles>,
    all_path: PathBuf,
    useful_path: PathBuf,
    lock: Mutex<()>,
}

impl FeedbackLedger {
    /// Open the ledger kept in `dir`, creating missing logs with their header.
    pub fn open(files: Arc<dyn TextFiles>, dir: impl AsRef<Path>) -> Result<Self, RecordsError> {
        let dir = dir.as_ref();
        Self::with_paths(
            files,
            dir.join(ALL_FEEDBACK_FILE),
            dir.join(USEFUL_FEEDBACK_FILE),
        )
    }

    /// Open a ledger with explicit log paths.
    pub fn with_paths(
        files: Arc<dyn TextFiles>,
        all_path: impl Into<PathBuf>,
        useful_path: impl Into<PathBuf>,
    ) -> Result<Self, RecordsError> {
        let ledger = Self {
            files,
            all_path: all_path.into(),
            useful_path: useful_path.into(),
            lock: Mutex::new(()),
        };
        ledger.initialize()?;
        Ok(ledger)
    }

    fn initialize(&self) -> Result<(), RecordsError> {
        let _guard = self.lock.lock();
        for path in [&self.all_path, &self.useful_path] {
            if !self.files.exists(path) {
                self.files
                    .write_all_text(path, &format!("{}\n", FEEDBACK_HEADER))?;
                tracing::info!(path = %path.display(), "feedback log created");
            }
        }
        Ok(())
    }

    /// Log that receives every event.
    pub fn all_path(&self) -> &Path {
        &self.all_path
    }

    /// Log that receives only events voted useful.
    pub fn useful_path(&self) -> &Path {
        &self.useful_path
    }

    /// Append a record.
    ///
    /// The record always goes to the all log, and to the useful log only when
    /// `is_useful` is `Some(true)`. Write failures are logged and the record
    /// is dropped.
    pub fn append(&self, record: &FeedbackRecord) {
        let line = format!("{}\n", record.to_csv_line());
        let _guard = self.lock.lock();

        if let Err(e) = self.files.append_text(&self.all_path, &line) {
            tracing::error!(error = %e, question = %record.question, "failed to append feedback");
            return;
        }

        if record.is_useful == Some(true) {
            if let Err(e) = self.files.append_text(&self.useful_path, &line) {
                tracing::error!(error = %e, question = %record.question, "failed to append useful feedback");
            }
        }
    }

    /// Every record in the all log, in append order.
    pub fn read_all(&self) -> Vec<FeedbackRecord> {
        self.read_log(&self.all_path)
    }

    /// Every record in the useful log, in append order.
    pub fn read_useful(&self) -> Vec<FeedbackRecord> {
        self.read_log(&self.useful_path)
    }

    /// The newest `limit` records of the all log, newest first.
    pub fn recent(&self, limit: usize) -> Vec<FeedbackRecord> {
        let mut records = self.read_all();
        // Stable sort, so equal timestamps keep the later append first after reversal.
        records.reverse();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        records
    }

    /// Statistics computed from the current contents of both logs.
    pub fn statistics(&self) -> FeedbackStatistics {
        let all = self.read_all();
        let useful = self.read_useful();

        let count = |pred: &dyn Fn(&FeedbackRecord) -> bool| all.iter().filter(|&r| pred(r)).count();

        FeedbackStatistics {
            total_requests: all.len(),
            useful_requests: useful.len(),
            not_useful_requests: count(&|r| r.is_useful == Some(false)),
            no_feedback_requests: count(&|r| r.is_useful.is_none()),
            average_confidence: if all.is_empty() {
                0.0
            } else {
                all.iter().map(|r| r.confidence).sum::<f64>() / all.len() as f64
            },
            dataset_source_count: count(&|r| r.source == AnswerSource::Dataset),
            ml_source_count: count(&|r| r.source == AnswerSource::Ml),
        }
    }

    fn read_log(&self, path: &Path) -> Vec<FeedbackRecord> {
        let _guard = self.lock.lock();

        if !self.files.exists(path) {
            return Vec::new();
        }

        let lines = match self.files.read_all_lines(path) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::error!(error = %e, "failed to read feedback log");
                return Vec::new();
            }
        };

        csv_line::join_records(&lines)
            .into_iter()
            .skip(1)
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(line_no, line)| match FeedbackRecord::from_csv_line(&line) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        line = line_no,
                        error = %e,
                        "skipping malformed feedback line"
                    );
                    None
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for FeedbackLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackLedger")
            .field("all_path", &self.all_path)
            .field("useful_path", &self.useful_path)
            .finish_non_exhaustive()
    }
}
