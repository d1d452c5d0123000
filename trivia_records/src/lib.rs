//! # Trivia Records
//!
//! The data side of the trivia desk: fact and feedback records, and the flat
//! files they live in. This crate holds no matching or answering logic.
//!
//! ## Core Components
//!
//! - **facts**: True/false fact records and the delimited fact source
//! - **feedback**: Feedback records, the log line codec, and the append-only ledger
//! - **csv_line**: Quoted-field splitting and quoting shared by both file formats
//! - **text_file**: The text-file collaborator used for every read and write

pub mod csv_line;
pub mod error;
pub mod facts;
pub mod feedback;
pub mod text_file;

pub use error::*;
pub use facts::*;
pub use feedback::*;
pub use text_file::*;
