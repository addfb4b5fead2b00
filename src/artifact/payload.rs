//! Structured payloads carried by ready artifacts.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::record::{Flashcard, Question};

/// Generated course content: title, summary and chapters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseContent {
    /// Course title.
    #[serde(default)]
    pub course_title: String,
    /// Short course summary.
    #[serde(default)]
    pub course_summary: String,
    /// Chapters in reading order.
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// One chapter of generated course content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub chapter_title: String,
    #[serde(default)]
    pub chapter_summary: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Generated flashcards for a course.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlashcardSet {
    #[serde(default, deserialize_with = "skip_malformed")]
    pub flashcards: Vec<Flashcard>,
}

/// Generated practice questions for a course.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionSet {
    #[serde(default, deserialize_with = "skip_malformed")]
    pub questions: Vec<Question>,
}

/// Decodes a record list, dropping entries that do not fit the record type.
///
/// One bad record must not hide the rest of the set.
fn skip_malformed<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(index, %error, "Skipping malformed study record");
                None
            }
        })
        .collect())
}

/// Payload kinds decodable from a course artifact field.
///
/// `KIND` names the payload in decode errors and logs.
pub trait Payload: serde::de::DeserializeOwned {
    const KIND: &'static str;

    /// Number of study items carried (chapters, cards or questions).
    fn item_count(&self) -> usize;
}

impl Payload for CourseContent {
    const KIND: &'static str = "course content";

    fn item_count(&self) -> usize {
        self.chapters.len()
    }
}

impl Payload for FlashcardSet {
    const KIND: &'static str = "flashcard set";

    fn item_count(&self) -> usize {
        self.flashcards.len()
    }
}

impl Payload for QuestionSet {
    const KIND: &'static str = "question set";

    fn item_count(&self) -> usize {
        self.questions.len()
    }
}
