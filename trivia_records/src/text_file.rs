//! The text-file collaborator.
//!
//! Every read and write of fact sources and feedback logs goes through
//! [`TextFiles`], so stores and ledgers can run against the local disk or a
//! test double.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::RecordsError;

/// Line-oriented UTF-8 file access.
pub trait TextFiles: Send + Sync {
    /// Read the whole file and split it into lines (without terminators).
    fn read_all_lines(&self, path: &Path) -> Result<Vec<String>, RecordsError>;

    /// Append text to the end of a file, creating it when absent.
    fn append_text(&self, path: &Path, text: &str) -> Result<(), RecordsError>;

    /// Check whether a file exists.
    fn exists(&self, path: &Path) -> bool;

    /// Replace the contents of a file, creating parent directories as needed.
    fn write_all_text(&self, path: &Path, text: &str) -> Result<(), RecordsError>;
}

/// [`TextFiles`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl LocalFiles {
    /// Files on the local disk, read and written as UTF-8.
    pub fn new() -> Self {
        Self
    }
}

impl TextFiles for LocalFiles {
    fn read_all_lines(&self, path: &Path) -> Result<Vec<String>, RecordsError> {
        let content = fs::read_to_string(path).map_err(|e| RecordsError::io(path, e))?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn append_text(&self, path: &Path, text: &str) -> Result<(), RecordsError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| RecordsError::io(path, e))?;
        // One write call per append keeps a line contiguous in the file.
        file.write_all(text.as_bytes())
            .map_err(|e| RecordsError::io(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn write_all_text(&self, path: &Path, text: &str) -> Result<(), RecordsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RecordsError::io(parent, e))?;
        }
        fs::write(path, text).map_err(|e| RecordsError::io(path, e))
    }
}
