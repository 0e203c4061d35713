use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::model::chapter::{Chapter, ChapterKey, RawChapter};
use crate::model::question::{Question, QuestionError, RawQuestion};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("no content")]
    NoContent,

    #[error("chapter {index}: `chapterNumber` is missing or empty")]
    MissingChapterNumber { index: usize },

    #[error("chapter {index}: `chapterFile` is missing or empty")]
    MissingChapterFile { index: usize },

    #[error("chapter {index}: `{field}` has the wrong type")]
    InvalidChapterField { index: usize, field: &'static str },

    #[error("chapter {index}: duplicate `chapterNumber` {number}")]
    DuplicateChapter { index: usize, number: String },

    #[error("question {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Root quiz document, before validation.
///
/// Either `chapters` (each pointing at a chapter file) or a flat `questions`
/// list is expected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuizDefinition {
    #[serde(default)]
    pub chapters: Option<Vec<RawChapter>>,
    #[serde(default)]
    pub questions: Option<Vec<RawQuestion>>,
}

/// A definition that passed validation, split by layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedDefinition {
    Chapters(Vec<Chapter>),
    Flat(Vec<Question>),
}

impl QuizDefinition {
    /// Validate the definition.
    ///
    /// A non-empty `chapters` list takes precedence; any root `questions` are
    /// then ignored with a warning.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NoContent` when neither list has entries, or the
    /// first chapter/question violation found, naming its index.
    pub fn validate(&self) -> Result<ValidatedDefinition, ValidationError> {
        if let Some(chapters) = self.chapters.as_deref().filter(|c| !c.is_empty()) {
            if self.questions.as_ref().is_some_and(|q| !q.is_empty()) {
                log::warn!("quiz defines both chapters and questions; root questions are ignored");
            }
            return validate_chapters(chapters).map(ValidatedDefinition::Chapters);
        }

        match self.questions.as_deref() {
            Some(questions) if !questions.is_empty() => {
                validate_questions(questions).map(ValidatedDefinition::Flat)
            }
            _ => Err(ValidationError::NoContent),
        }
    }
}

/// Contents of a single chapter file. A missing `questions` list is an empty chapter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChapterDocument {
    #[serde(default)]
    pub questions: Option<Vec<RawQuestion>>,
}

impl ChapterDocument {
    /// Validate every question in the chapter.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Question` for the first invalid question.
    pub fn validate(&self) -> Result<Vec<Question>, ValidationError> {
        self.questions
            .as_deref()
            .map_or_else(|| Ok(Vec::new()), validate_questions)
    }
}

fn validate_chapters(chapters: &[RawChapter]) -> Result<Vec<Chapter>, ValidationError> {
    let mut seen = HashSet::new();
    let mut validated = Vec::with_capacity(chapters.len());

    for (index, raw) in chapters.iter().enumerate() {
        let invalid = |field| ValidationError::InvalidChapterField { index, field };

        let key = match present(raw.chapter_number.as_ref()) {
            None => None,
            Some(Value::Number(n)) => ChapterKey::new(n.to_string()),
            Some(Value::String(s)) => ChapterKey::new(s),
            Some(_) => return Err(invalid("chapterNumber")),
        }
        .ok_or(ValidationError::MissingChapterNumber { index })?;

        let file = match present(raw.chapter_file.as_ref()) {
            None => None,
            Some(Value::String(file)) => Some(file.trim()).filter(|f| !f.is_empty()),
            Some(_) => return Err(invalid("chapterFile")),
        }
        .ok_or(ValidationError::MissingChapterFile { index })?;

        let title = match present(raw.chapter_title.as_ref()) {
            None => None,
            Some(Value::String(title)) => Some(title.clone()),
            Some(_) => return Err(invalid("chapterTitle")),
        };
        let enabled = match present(raw.enabled.as_ref()) {
            None => false,
            Some(Value::Bool(enabled)) => *enabled,
            Some(_) => return Err(invalid("enabled")),
        };

        if !seen.insert(key.clone()) {
            return Err(ValidationError::DuplicateChapter {
                index,
                number: key.to_string(),
            });
        }

        validated.push(Chapter::new(key, title, file, enabled));
    }

    Ok(validated)
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn validate_questions(questions: &[RawQuestion]) -> Result<Vec<Question>, ValidationError> {
    questions
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            raw.clone()
                .into_question()
                .map_err(|source| ValidationError::Question { index, source })
        })
        .collect()
}
