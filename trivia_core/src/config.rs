//! Configuration loaded from TOML.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below.
//!
//! ```toml
//! [storage]
//! facts_path = "data/facts.csv"
//! feedback_dir = "feedback"
//!
//! [matcher]
//! keyword_threshold = 0.5
//! min_keyword_len = 3
//!
//! [answering]
//! dataset_confidence = 1.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matcher::MatcherConfig;

/// Errors from reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where the fact source and feedback logs live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub facts_path: PathBuf,
    /// Directory holding `all_feedback.csv` and `useful_feedback.csv`.
    pub feedback_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            facts_path: PathBuf::from("data/facts.csv"),
            feedback_dir: PathBuf::from("feedback"),
        }
    }
}

/// How answers are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnsweringConfig {
    /// Confidence reported for answers found in the fact store.
    pub dataset_confidence: f64,

    /// Explanation shown with fallback guesses.
    pub fallback_note: String,
}

impl Default for AnsweringConfig {
    fn default() -> Self {
        Self {
            dataset_confidence: 1.0,
            fallback_note: "Não encontrei essa informação no meu banco de dados. \
                            Esta é uma análise baseada em padrões!"
                .to_string(),
        }
    }
}

/// Complete configuration for a trivia desk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriviaConfig {
    pub storage: StorageConfig,
    pub matcher: MatcherConfig,
    pub answering: AnsweringConfig,
}

impl TriviaConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check that numeric settings are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.matcher.keyword_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "matcher.keyword_threshold must be within [0, 1], got {}",
                threshold
            )));
        }

        let confidence = self.answering.dataset_confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ConfigError::Invalid(format!(
                "answering.dataset_confidence must be within [0, 1], got {}",
                confidence
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::DEFAULT_STOP_WORDS;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = TriviaConfig::from_toml_str("").unwrap();
        assert_eq!(config, TriviaConfig::default());
        assert_eq!(config.matcher.keyword_threshold, 0.5);
        assert_eq!(config.matcher.min_keyword_len, 3);
        assert_eq!(config.matcher.stop_words.len(), DEFAULT_STOP_WORDS.len());
    }

    #[test]
    fn test_partial_overrides() {
        let config = TriviaConfig::from_toml_str(
            r#"
            [storage]
            facts_path = "/srv/quiz/fatos.csv"

            [matcher]
            keyword_threshold = 0.6
            stop_words = ["o", "a"]
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.facts_path, PathBuf::from("/srv/quiz/fatos.csv"));
        assert_eq!(config.storage.feedback_dir, PathBuf::from("feedback"));
        assert_eq!(config.matcher.keyword_threshold, 0.6);
        assert_eq!(config.matcher.min_keyword_len, 3);
        assert_eq!(config.matcher.stop_words, vec!["o", "a"]);
        assert_eq!(config.answering, AnsweringConfig::default());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(matches!(
            TriviaConfig::from_toml_str("[matcher]\nkeyword_threshold = 1.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TriviaConfig::from_toml_str("[answering]\ndataset_confidence = -0.1"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            TriviaConfig::from_toml_str("[matcher\nkeyword_threshold = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            TriviaConfig::load(dir.path().join("trivia.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
