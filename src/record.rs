//! Study record types: flashcards and questions.
//!
//! Both record kinds expose their fields by name through [`FilterFields`],
//! which is all the filter engine needs. [`StudyRecord`] closes the set of
//! kinds for code that handles either.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Field names a flashcard list is filtered by.
pub const FLASHCARD_FILTER_KEYS: [&str; 2] = ["category", "difficulty"];

/// Field names a question list is filtered by.
pub const QUESTION_FILTER_KEYS: [&str; 3] = ["difficulty", "type", "chapter"];

/// Field lookup by name, used by the filter engine.
pub trait FilterFields {
    /// Returns the value of the named field, or `None` for unknown or
    /// non-scalar fields.
    fn field(&self, key: &str) -> Option<&str>;
}

/// Record identifier. The service sends either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawRecordId", into = "String")]
pub struct RecordId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecordId {
    Number(i64),
    Text(String),
}

impl From<RawRecordId> for RecordId {
    fn from(raw: RawRecordId) -> Self {
        match raw {
            RawRecordId::Number(number) => Self(number.to_string()),
            RawRecordId::Text(text) => Self(text),
        }
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl RecordId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Difficulty level of a flashcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Returns the wire string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(format!("invalid difficulty: {s}")),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Difficulty> for String {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.as_str().to_string()
    }
}

/// Kind of question. Unknown kinds are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    MultipleChoice,
    ShortAnswer,
    Essay,
    Other(String),
}

impl QuestionType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::ShortAnswer => "short-answer",
            Self::Essay => "essay",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for QuestionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "multiple-choice" => Self::MultipleChoice,
            "short-answer" => Self::ShortAnswer,
            "essay" => Self::Essay,
            _ => Self::Other(value),
        }
    }
}

impl From<QuestionType> for String {
    fn from(kind: QuestionType) -> Self {
        kind.as_str().to_string()
    }
}

/// A generated flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: RecordId,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl FilterFields for Flashcard {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "id" => Some(self.id.as_str()),
            "front" => Some(self.front.as_str()),
            "back" => Some(self.back.as_str()),
            "category" => Some(self.category.as_str()),
            "difficulty" => Some(self.difficulty.as_str()),
            _ => None,
        }
    }
}

/// A generated practice question.
///
/// `options` and `correct_option` are only present for multiple-choice
/// questions. `difficulty` is kept verbatim; unlike flashcards, questions
/// are not limited to easy/medium/hard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: RecordId,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: String,
    #[serde(default)]
    pub chapter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(
        default,
        rename = "correct_option",
        alias = "correctOption",
        skip_serializing_if = "Option::is_none"
    )]
    pub correct_option: Option<String>,
    #[serde(default)]
    pub answer: String,
}

impl Question {
    /// Answer options for multiple-choice questions; empty otherwise.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        match (&self.question_type, &self.options) {
            (QuestionType::MultipleChoice, Some(options)) => options,
            _ => &[],
        }
    }

    /// Whether `option` is the correct choice.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_option.as_deref() == Some(option)
    }
}

impl FilterFields for Question {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "id" => Some(self.id.as_str()),
            "question" => Some(self.question.as_str()),
            "type" => Some(self.question_type.as_str()),
            "difficulty" => Some(self.difficulty.as_str()),
            "chapter" => Some(self.chapter.as_str()),
            "answer" => Some(self.answer.as_str()),
            "correct_option" => self.correct_option.as_deref(),
            _ => None,
        }
    }
}

/// Either kind of study record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyRecord {
    Flashcard(Flashcard),
    Question(Question),
}

impl StudyRecord {
    #[must_use]
    pub fn id(&self) -> &RecordId {
        match self {
            Self::Flashcard(card) => &card.id,
            Self::Question(question) => &question.id,
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        match self {
            Self::Flashcard(card) => card.difficulty.as_str(),
            Self::Question(question) => &question.difficulty,
        }
    }
}

impl FilterFields for StudyRecord {
    fn field(&self, key: &str) -> Option<&str> {
        match self {
            Self::Flashcard(card) => card.field(key),
            Self::Question(question) => question.field(key),
        }
    }
}

impl From<Flashcard> for StudyRecord {
    fn from(card: Flashcard) -> Self {
        Self::Flashcard(card)
    }
}

impl From<Question> for StudyRecord {
    fn from(question: Question) -> Self {
        Self::Question(question)
    }
}
