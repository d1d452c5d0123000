//! Feedback records and the log line format.
//!
//! Every answered question produces one record, and a later usefulness vote
//! produces another. The log is an event stream: nothing is rewritten, so a
//! single logical question normally owns two lines (one with `IsUseful` of
//! `null`, one with the vote). Counts derived from the log are event counts.

mod ledger;

pub use ledger::*;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{csv_line, RecordsError};

/// Header line shared by both feedback logs.
pub const FEEDBACK_HEADER: &str =
    "Timestamp,Question,Answer,Curiosity,Confidence,Source,IsUseful,UserFeedbackComment";

/// Timestamp layout used in the logs.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TIMESTAMP_FALLBACK_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Where an answer came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum AnswerSource {
    /// Found in the fact store by exact or fuzzy match.
    Dataset,
    /// Guessed by the fallback answerer.
    Ml,
    /// Entered by an operator.
    Manual,
    /// Any other tag found in a log.
    Other(String),
}

impl AnswerSource {
    /// The label written to the `Source` column.
    pub fn as_str(&self) -> &str {
        match self {
            AnswerSource::Dataset => "dataset",
            AnswerSource::Ml => "ml",
            AnswerSource::Manual => "manual",
            AnswerSource::Other(tag) => tag,
        }
    }
}

impl From<&str> for AnswerSource {
    fn from(tag: &str) -> Self {
        match tag {
            "dataset" => AnswerSource::Dataset,
            "ml" => AnswerSource::Ml,
            "manual" => AnswerSource::Manual,
            other => AnswerSource::Other(other.to_string()),
        }
    }
}

impl From<String> for AnswerSource {
    fn from(tag: String) -> Self {
        AnswerSource::from(tag.as_str())
    }
}

impl From<AnswerSource> for String {
    fn from(source: AnswerSource) -> Self {
        source.as_str().to_string()
    }
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event in the feedback log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Set by whoever produced the record.
    pub timestamp: NaiveDateTime,

    pub question: String,

    /// Answer given to the user.
    pub answer: bool,

    /// Trivia text shown with the answer.
    pub explanation: String,

    /// Confidence from 0.0 to 1.0.
    pub confidence: f64,

    pub source: AnswerSource,

    /// `None` until the user votes.
    pub is_useful: Option<bool>,

    pub comment: Option<String>,
}

impl FeedbackRecord {
    /// Create a record with no usefulness vote yet.
    pub fn new(
        timestamp: NaiveDateTime,
        question: impl Into<String>,
        answer: bool,
        source: AnswerSource,
    ) -> Self {
        Self {
            timestamp,
            question: question.into(),
            answer,
            explanation: String::new(),
            confidence: 0.0,
            source,
            is_useful: None,
            comment: None,
        }
    }

    /// Set the explanation text.
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Set the confidence, clamped to [0, 1].
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }

    /// Record the user's usefulness vote.
    pub fn with_usefulness(mut self, is_useful: bool) -> Self {
        self.is_useful = Some(is_useful);
        self
    }

    /// Attach a user comment. Blank comments are dropped.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = (!comment.trim().is_empty()).then_some(comment);
        self
    }

    /// Encode as one log line (no terminator).
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{:.2},{},{},{}",
            csv_line::quote(&self.timestamp.format(TIMESTAMP_FORMAT).to_string()),
            csv_line::quote(&self.question),
            bool_literal(self.answer),
            csv_line::quote(&self.explanation),
            self.confidence,
            csv_line::quote(self.source.as_str()),
            self.is_useful.map(bool_literal).unwrap_or("null"),
            csv_line::quote(self.comment.as_deref().unwrap_or_default()),
        )
    }

    /// Decode one log line. The comment column may be absent.
    pub fn from_csv_line(line: &str) -> Result<Self, RecordsError> {
        let fields = csv_line::split(line);
        if fields.len() < 7 {
            return Err(RecordsError::line(format!(
                "expected at least 7 fields, found {}",
                fields.len()
            )));
        }

        let confidence = fields[4]
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .ok_or_else(|| RecordsError::line(format!("invalid confidence {:?}", fields[4])))?;

        let is_useful = match fields[6].trim() {
            "" | "null" => None,
            other => Some(parse_bool(other)?),
        };

        Ok(Self {
            timestamp: parse_timestamp(&fields[0])?,
            question: fields[1].clone(),
            answer: parse_bool(&fields[2])?,
            explanation: fields[3].clone(),
            confidence: clamp_confidence(confidence),
            source: AnswerSource::from(fields[5].as_str()),
            is_useful,
            comment: fields.get(7).filter(|c| !c.is_empty()).cloned(),
        })
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

fn bool_literal(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn parse_bool(field: &str) -> Result<bool, RecordsError> {
    let field = field.trim();
    if field.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if field.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(RecordsError::line(format!("invalid boolean {:?}", field)))
    }
}

fn parse_timestamp(field: &str) -> Result<NaiveDateTime, RecordsError> {
    let field = field.trim();
    std::iter::once(TIMESTAMP_FORMAT)
        .chain(TIMESTAMP_FALLBACK_FORMATS.iter().copied())
        .find_map(|format| NaiveDateTime::parse_from_str(field, format).ok())
        .ok_or_else(|| RecordsError::line(format!("invalid timestamp {:?}", field)))
}
