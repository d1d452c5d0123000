//! Reading and extending the delimited fact source.
//!
//! The source is a header row followed by rows of
//! `id,statement,truth-label,trivia`. A bad row is skipped with a warning;
//! only a missing or unreadable file fails the whole read.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{parse_truth_label, truth_label, FactId, FactRecord};
use crate::{csv_line, RecordsError, TextFiles};

/// Header written when a fact source is created from scratch.
pub const FACT_SOURCE_HEADER: &str = "Id,Statement,Label,Trivia";

/// A fact to be appended to the source. The id is assigned on append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFact {
    pub statement: String,
    pub is_true: bool,
    pub trivia: String,
}

impl NewFact {
    /// A fact to append; its id is assigned on write.
    pub fn new(statement: impl Into<String>, is_true: bool, trivia: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            is_true,
            trivia: trivia.into(),
        }
    }
}

/// Parse a single data row. `line` is the one-based line number for diagnostics.
pub fn parse_fact_row(row: &str, line: usize) -> Result<FactRecord, RecordsError> {
    let fields = csv_line::split(row);
    if fields.len() < 4 {
        return Err(RecordsError::RowParse {
            line,
            reason: format!("expected 4 fields, found {}", fields.len()),
        });
    }

    let id = fields[0]
        .trim()
        .parse::<u32>()
        .map_err(|e| RecordsError::RowParse {
            line,
            reason: format!("invalid id {:?}: {}", fields[0], e),
        })?;

    let statement = fields[1].trim();
    if statement.is_empty() {
        return Err(RecordsError::RowParse {
            line,
            reason: "empty statement".to_string(),
        });
    }

    Ok(FactRecord {
        id: FactId(id),
        statement: statement.to_string(),
        is_true: parse_truth_label(&fields[2]),
        trivia: fields[3].trim().to_string(),
    })
}

/// Read every fact from the source at `path`.
///
/// Rows that fail to parse, and rows repeating an id already seen, are
/// skipped and logged.
pub fn read_facts(files: &dyn TextFiles, path: &Path) -> Result<Vec<FactRecord>, RecordsError> {
    if !files.exists(path) {
        tracing::error!(path = %path.display(), "fact source not found");
        return Err(RecordsError::SourceMissing {
            path: path.to_path_buf(),
        });
    }

    let lines = files.read_all_lines(path)?;
    let mut facts = Vec::with_capacity(lines.len().saturating_sub(1));
    let mut seen = HashSet::new();

    for (index, row) in lines.iter().enumerate().skip(1) {
        if row.trim().is_empty() {
            continue;
        }
        let line = index + 1;

        match parse_fact_row(row, line) {
            Ok(fact) if !seen.insert(fact.id) => {
                tracing::warn!(line, id = %fact.id, "skipping fact row with duplicate id");
            }
            Ok(fact) => facts.push(fact),
            Err(e) => tracing::warn!(line, error = %e, "skipping malformed fact row"),
        }
    }

    tracing::info!(path = %path.display(), count = facts.len(), "fact source read");
    Ok(facts)
}

/// Append a fact to the source, returning the id it was given.
///
/// The new id is one past the highest id already present. A missing source
/// is created with [`FACT_SOURCE_HEADER`].
pub fn append_fact(
    files: &dyn TextFiles,
    path: &Path,
    fact: &NewFact,
) -> Result<FactId, RecordsError> {
    let exists = files.exists(path);
    let last_id = if exists {
        files
            .read_all_lines(path)?
            .iter()
            .skip(1)
            .filter_map(|row| csv_line::split(row).first()?.trim().parse::<u32>().ok())
            .max()
            .map(FactId)
            .unwrap_or(FactId(0))
    } else {
        FactId(0)
    };

    let id = last_id.next();
    let row = format!(
        "{},{},{},{}",
        id,
        csv_line::quote(fact.statement.trim()),
        csv_line::quote(truth_label(fact.is_true)),
        csv_line::quote(fact.trivia.trim())
    );

    // Sources are kept without a trailing newline, so each row starts one.
    if exists {
        files.append_text(path, &format!("\n{}", row))?;
    } else {
        files.write_all_text(path, &format!("{}\n{}", FACT_SOURCE_HEADER, row))?;
    }

    tracing::info!(path = %path.display(), id = %id, "fact appended to source");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocalFiles;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("facts.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_row() {
        let fact = parse_fact_row(
            r#"12,"A Revolução Francesa começou em 1789",Verdadeiro,"Com a queda da Bastilha, em 14 de julho.""#,
            2,
        )
        .unwrap();

        assert_eq!(fact.id, FactId(12));
        assert_eq!(fact.statement, "A Revolução Francesa começou em 1789");
        assert!(fact.is_true);
        assert_eq!(fact.trivia, "Com a queda da Bastilha, em 14 de julho.");
    }

    #[test]
    fn test_parse_row_errors() {
        assert!(matches!(
            parse_fact_row("1,so dois", 5),
            Err(RecordsError::RowParse { line: 5, .. })
        ));
        assert!(matches!(
            parse_fact_row("x,texto,True,curiosidade", 6),
            Err(RecordsError::RowParse { line: 6, .. })
        ));
        assert!(matches!(
            parse_fact_row("3,  ,True,curiosidade", 7),
            Err(RecordsError::RowParse { line: 7, .. })
        ));
    }

    #[test]
    fn test_read_skips_bad_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_source(
            &dir,
            "Id,Statement,Label,Trivia\n\
             1,Roma foi fundada em 753 a.C.,Verdadeiro,Segundo a lenda.\n\
             nao-numero,Linha quebrada,Falso,x\n\
             \n\
             2,Napoleão era muito baixo,Falso,Tinha altura média para a época.\n\
             2,Duplicado,Falso,x\n\
             3,incompleta\n",
        );

        let facts = read_facts(&LocalFiles::new(), &path).unwrap();

        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].id, FactId(1));
        assert_eq!(facts[1].statement, "Napoleão era muito baixo");
        assert!(!facts[1].is_true);
    }

    #[test]
    fn test_read_missing_source() {
        let dir = TempDir::new().unwrap();
        let result = read_facts(&LocalFiles::new(), &dir.path().join("absent.csv"));
        assert!(matches!(result, Err(RecordsError::SourceMissing { .. })));
    }

    #[test]
    fn test_read_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "Id,Statement,Label,Trivia\n");
        assert!(read_facts(&LocalFiles::new(), &path).unwrap().is_empty());
    }

    #[test]
    fn test_append_continues_after_highest_id() {
        let dir = TempDir::new().unwrap();
        let path = write_source(
            &dir,
            "Id,Statement,Label,Trivia\n5,Primeiro,Verdadeiro,a\n9,Segundo,Falso,b",
        );
        let files = LocalFiles::new();

        let id = append_fact(
            &files,
            &path,
            &NewFact::new("O Brasil tem 26 estados, mais o DF", true, "Desde 1988."),
        )
        .unwrap();
        assert_eq!(id, FactId(10));

        let facts = read_facts(&files, &path).unwrap();
        assert_eq!(facts.len(), 3);
        assert_eq!(facts[2].statement, "O Brasil tem 26 estados, mais o DF");
        assert!(facts[2].is_true);
        assert_eq!(facts[2].trivia, "Desde 1988.");
    }

    #[test]
    fn test_append_creates_missing_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("facts.csv");
        let files = LocalFiles::new();

        let first = append_fact(&files, &path, &NewFact::new("Um", false, "")).unwrap();
        let second = append_fact(&files, &path, &NewFact::new("Dois", true, "")).unwrap();
        assert_eq!(first, FactId(1));
        assert_eq!(second, FactId(2));

        let lines = files.read_all_lines(&path).unwrap();
        assert_eq!(lines[0], FACT_SOURCE_HEADER);
        assert_eq!(lines[1], r#"1,"Um","Falso","""#);
        assert_eq!(read_facts(&files, &path).unwrap().len(), 2);
    }
}
