use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("`question` text is missing or empty")]
    EmptyText,

    #[error("`question` must be a string")]
    InvalidText,

    #[error("`options` must contain at least one option")]
    NoOptions,

    #[error("`options` must be a list of strings")]
    InvalidOptions,

    #[error("option {option} must be a string")]
    InvalidOption { option: usize },

    #[error("`{field}` has the wrong type")]
    InvalidField { field: &'static str },

    #[error("`correctAnswer` is missing")]
    MissingCorrectAnswer,

    #[error("`correctAnswer` must be a non-negative integer, got {raw}")]
    NonIntegerCorrectAnswer { raw: String },

    #[error("`correctAnswer` {index} is out of range for {len} options")]
    CorrectAnswerOutOfRange { index: usize, len: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
///
/// Immutable once built; `correct_answer` is always a valid index into `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: Option<String>,
    text: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: Option<String>,
    section: Option<String>,
}

impl Question {
    /// Build a question from its text, options and the index of the correct option.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the text is blank,
    /// `QuestionError::NoOptions` if there are no options, and
    /// `QuestionError::CorrectAnswerOutOfRange` if `correct_answer` does not index `options`.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                len: options.len(),
            });
        }

        Ok(Self {
            id: None,
            text,
            options,
            correct_answer,
            explanation: None,
            section: None,
        })
    }

    /// Attach the id from the quiz file. Blank ids are dropped.
    #[must_use]
    pub fn with_id(mut self, id: impl AsRef<str>) -> Self {
        let trimmed = id.as_ref().trim();
        self.id = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Attach an explanation. Blank explanations are dropped.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        let explanation = explanation.into();
        self.explanation = (!explanation.trim().is_empty()).then_some(explanation);
        self
    }

    /// Tag the question with a section label. The label is stored trimmed; blank labels are dropped.
    #[must_use]
    pub fn with_section(mut self, section: impl AsRef<str>) -> Self {
        let trimmed = section.as_ref().trim();
        self.section = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Id as written in the quiz file; numeric ids are kept in their textual form.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// Text of the correct option.
    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer]
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Trimmed, non-empty section tag, if any.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }
}

//
// ─── WIRE SHAPE ────────────────────────────────────────────────────────────────
//

/// Question as it appears in quiz JSON, before validation.
///
/// Fields are kept as raw JSON values so that a missing or mistyped field
/// surfaces as a `QuestionError` naming the field instead of a parse failure.
/// `null` is treated like an absent field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub id: Option<Value>,
    pub question: Option<Value>,
    pub options: Option<Value>,
    pub correct_answer: Option<Value>,
    pub explanation: Option<Value>,
    pub section: Option<Value>,
}

impl RawQuestion {
    /// Validate and convert into a `Question`.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` found, checking text, options,
    /// `correctAnswer` and then the optional fields.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let text = match present(self.question) {
            None => return Err(QuestionError::EmptyText),
            Some(Value::String(text)) => text,
            Some(_) => return Err(QuestionError::InvalidText),
        };
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        let options = match present(self.options) {
            None => return Err(QuestionError::NoOptions),
            Some(Value::Array(items)) => option_texts(items)?,
            Some(_) => return Err(QuestionError::InvalidOptions),
        };
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        let raw_answer = present(self.correct_answer).ok_or(QuestionError::MissingCorrectAnswer)?;
        let correct_answer = answer_index(&raw_answer, options.len())?;

        let id = match present(self.id) {
            None => None,
            Some(Value::String(id)) => Some(id),
            Some(Value::Number(id)) => Some(id.to_string()),
            Some(_) => return Err(QuestionError::InvalidField { field: "id" }),
        };
        let explanation = optional_text(self.explanation, "explanation")?;
        let section = optional_text(self.section, "section")?;

        let mut question = Question::new(text, options, correct_answer)?;
        if let Some(id) = id {
            question = question.with_id(id);
        }
        if let Some(explanation) = explanation {
            question = question.with_explanation(explanation);
        }
        if let Some(section) = section {
            question = question.with_section(section);
        }
        Ok(question)
    }
}

fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

fn option_texts(items: Vec<Value>) -> Result<Vec<String>, QuestionError> {
    items
        .into_iter()
        .enumerate()
        .map(|(option, item)| match item {
            Value::String(text) => Ok(text),
            _ => Err(QuestionError::InvalidOption { option }),
        })
        .collect()
}

fn optional_text(value: Option<Value>, field: &'static str) -> Result<Option<String>, QuestionError> {
    match present(value) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => Err(QuestionError::InvalidField { field }),
    }
}

/// Interpret a JSON `correctAnswer` value as an option index.
///
/// Whole floats such as `1.0` are accepted; negative numbers are out of range.
fn answer_index(raw: &Value, len: usize) -> Result<usize, QuestionError> {
    let non_integer = || QuestionError::NonIntegerCorrectAnswer {
        raw: raw.to_string(),
    };
    let Value::Number(number) = raw else {
        return Err(non_integer());
    };

    if let Some(index) = number.as_u64() {
        let index = usize::try_from(index).unwrap_or(usize::MAX);
        return if index < len {
            Ok(index)
        } else {
            Err(QuestionError::CorrectAnswerOutOfRange { index, len })
        };
    }
    if number.as_i64().is_some() {
        // Negative integer.
        return Err(QuestionError::CorrectAnswerOutOfRange { index: usize::MAX, len });
    }
    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && value >= 0.0 && value < len as f64 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = value as usize;
            Ok(index)
        }
        Some(value) if value.fract() == 0.0 => Err(QuestionError::CorrectAnswerOutOfRange {
            index: if value < 0.0 { usize::MAX } else { len },
            len,
        }),
        _ => Err(non_integer()),
    }
}
