//! # Trivia Core
//!
//! The lookup and answering side of the trivia desk. This crate resolves
//! free-text questions against the fact collection from `trivia_records`,
//! guesses when nothing matches, and records every answer in the feedback
//! ledger.
//!
//! ## Core Components
//!
//! - **matcher**: Text normalization, keyword extraction, and the match cascade
//! - **fact_store**: Generation-swapped snapshots of the fact source
//! - **answering**: The desk tying lookup, fallback, and ledger together
//! - **config**: TOML configuration for all of the above
//!
//! ## Design Philosophy
//!
//! - **Snapshot reads**: Readers hold an immutable generation; reloads swap it whole
//! - **Precision first**: Exact matches beat substring matches beat keyword overlap
//! - **Event log**: Feedback is only ever appended, never rewritten

pub mod answering;
pub mod config;
pub mod error;
pub mod fact_store;
pub mod matcher;

pub use answering::*;
pub use config::*;
pub use error::*;
pub use fact_store::*;
pub use matcher::*;
