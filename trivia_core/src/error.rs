//! Error types for the fact store and the answering desk.

use thiserror::Error;
use trivia_records::RecordsError;

/// Errors from fact store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Sampling was requested while no facts are loaded.
    #[error("no facts loaded")]
    EmptyStore,

    /// The store was built in memory and has no source to reload from.
    #[error("fact store has no source to reload")]
    NoSource,

    /// Reading or appending to the fact source failed.
    #[error(transparent)]
    Records(#[from] RecordsError),
}

/// Errors from the answering desk.
#[derive(Debug, Error)]
pub enum DeskError {
    /// The question was blank.
    #[error("question is empty")]
    EmptyQuestion,

    /// A feedback submission was rejected before reaching the ledger.
    #[error("invalid feedback: {0}")]
    InvalidFeedback(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Records(#[from] RecordsError),
}
