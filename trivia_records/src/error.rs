//! Error types for record persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing record files.
#[derive(Debug, Error)]
pub enum RecordsError {
    /// The fact source does not exist. Loading aborts entirely.
    #[error("fact source not found: {}", path.display())]
    SourceMissing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Underlying file I/O failed.
    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Original error.
        #[source]
        source: std::io::Error,
    },

    /// A single fact-source row could not be parsed.
    #[error("row {line}: {reason}")]
    RowParse {
        /// One-based line number in the source.
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },

    /// A single feedback-log line could not be parsed.
    #[error("feedback line: {reason}")]
    LineParse {
        /// What was wrong with the line.
        reason: String,
    },
}

impl RecordsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn line(reason: impl Into<String>) -> Self {
        Self::LineParse {
            reason: reason.into(),
        }
    }
}
