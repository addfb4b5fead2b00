//! Artifact parsing for generated course material.
//!
//! The remote service stores each generated artifact (course content,
//! flashcards, questions) as a string field on the course resource. A field
//! is either missing, the sentinel `"loading"` while generation runs, or a
//! JSON document encoded as a string.
//!
//! [`Artifact::parse`] turns such a field into one of three states and never
//! fails: malformed payloads are logged and read as [`Artifact::Absent`].
//!
//! # Example
//!
//! ```
//! use coursekit_core::artifact::{Artifact, FlashcardSet};
//!
//! let pending: Artifact<FlashcardSet> = Artifact::parse(Some("loading"));
//! assert!(pending.is_pending());
//!
//! let ready: Artifact<FlashcardSet> = Artifact::parse(Some(r#"{"flashcards": []}"#));
//! assert!(ready.is_ready());
//! ```

mod error;
mod payload;

use tracing::warn;

pub use error::DecodeError;
pub use payload::{Chapter, CourseContent, FlashcardSet, Payload, QuestionSet};

/// Sentinel value the service stores while an artifact is being generated.
pub const LOADING_SENTINEL: &str = "loading";

/// Availability of one generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Artifact<T> {
    /// Not requested yet, or unreadable.
    #[default]
    Absent,
    /// Generation in progress on the service.
    Pending,
    /// Generated and decoded.
    Ready(T),
}

impl<T: Payload> Artifact<T> {
    /// Parses a raw artifact field.
    ///
    /// - `None` or empty text is [`Artifact::Absent`]
    /// - exactly `"loading"` is [`Artifact::Pending`]
    /// - a decodable payload is [`Artifact::Ready`]
    /// - anything else is logged and read as [`Artifact::Absent`]
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|value| !value.is_empty()) else {
            return Self::Absent;
        };
        if raw == LOADING_SENTINEL {
            return Self::Pending;
        }

        match decode::<T>(raw) {
            Ok(payload) => Self::Ready(payload),
            Err(error) => {
                warn!(kind = T::KIND, line = error.line(), error = %error, "Ignoring undecodable artifact");
                Self::Absent
            }
        }
    }

    /// Tab badge shown next to the artifact's label.
    ///
    /// `"(Generating...)"` while pending, `"(N)"` with the item count when
    /// ready and non-empty, empty otherwise.
    #[must_use]
    pub fn badge(&self) -> String {
        match self {
            Self::Pending => "(Generating...)".to_string(),
            Self::Ready(payload) if payload.item_count() > 0 => {
                format!("({})", payload.item_count())
            }
            _ => String::new(),
        }
    }
}

impl<T> Artifact<T> {
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns the payload when ready.
    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    /// A tab for this artifact is selectable only once it is ready.
    #[must_use]
    pub fn is_browsable(&self) -> bool {
        self.is_ready()
    }

    /// Short state label for status lines.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Pending => "pending",
            Self::Ready(_) => "ready",
        }
    }
}

/// Decodes an artifact payload from its JSON text.
///
/// # Errors
///
/// Returns [`DecodeError`] when the text is not valid JSON for `T`.
pub fn decode<T: Payload>(raw: &str) -> Result<T, DecodeError> {
    serde_json::from_str(raw).map_err(|source| DecodeError::new(T::KIND, source))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_none_is_absent() {
        let artifact: Artifact<CourseContent> = Artifact::parse(None);
        assert!(artifact.is_absent());
    }

    #[test]
    fn test_parse_empty_is_absent() {
        let artifact: Artifact<CourseContent> = Artifact::parse(Some(""));
        assert!(artifact.is_absent());
    }

    #[test]
    fn test_parse_loading_sentinel_is_pending() {
        let artifact: Artifact<QuestionSet> = Artifact::parse(Some("loading"));
        assert_eq!(artifact, Artifact::Pending);
    }

    #[test]
    fn test_parse_sentinel_is_case_sensitive() {
        // "Loading" is not the sentinel and not JSON either.
        let artifact: Artifact<QuestionSet> = Artifact::parse(Some("Loading"));
        assert!(artifact.is_absent());
    }

    #[test]
    fn test_parse_valid_json_is_ready() {
        let artifact: Artifact<CourseContent> =
            Artifact::parse(Some(r#"{"courseTitle":"Rust","courseSummary":"","chapters":[]}"#));
        let content = artifact.ready().unwrap();
        assert_eq!(content.course_title, "Rust");
    }

    #[test]
    fn test_parse_invalid_json_is_absent() {
        let artifact: Artifact<FlashcardSet> = Artifact::parse(Some("{not json"));
        assert!(artifact.is_absent());
    }

    #[test]
    fn test_parse_wrong_shape_is_absent() {
        let artifact: Artifact<FlashcardSet> = Artifact::parse(Some(r#"{"flashcards": 3}"#));
        assert!(artifact.is_absent());
    }

    #[test]
    fn test_parse_keeps_set_with_unusual_question() {
        let artifact: Artifact<QuestionSet> = Artifact::parse(Some(
            r#"{"questions":[
                {"id":1,"question":"Q1","type":"essay","difficulty":"beginner","chapter":"C","answer":"A"},
                {"id":2,"question":"Q2","type":"essay","difficulty":"hard","chapter":"C","answer":"B"}
            ]}"#,
        ));
        assert_eq!(artifact.ready().map(|set| set.questions.len()), Some(2));
    }

    #[test]
    fn test_parse_drops_malformed_card_only() {
        let artifact: Artifact<FlashcardSet> = Artifact::parse(Some(
            r#"{"flashcards": [{"id": 1}, {"id": 2, "front": "F", "back": "B", "difficulty": "easy"}]}"#,
        ));
        assert_eq!(artifact.ready().map(|set| set.flashcards.len()), Some(1));
    }

    #[test]
    fn test_decode_reports_kind() {
        let error = decode::<QuestionSet>("[1, 2").unwrap_err();
        assert_eq!(error.kind, "question set");
    }

    #[test]
    fn test_badge_reflects_state() {
        let pending: Artifact<FlashcardSet> = Artifact::Pending;
        assert_eq!(pending.badge(), "(Generating...)");

        let empty: Artifact<FlashcardSet> = Artifact::Ready(FlashcardSet::default());
        assert_eq!(empty.badge(), "");

        let ready: Artifact<QuestionSet> = Artifact::parse(Some(
            r#"{"questions":[{"id":1,"question":"Q","type":"essay","difficulty":"hard","chapter":"C","answer":"A"}]}"#,
        ));
        assert_eq!(ready.badge(), "(1)");

        let absent: Artifact<QuestionSet> = Artifact::Absent;
        assert_eq!(absent.badge(), "");
        assert!(!absent.is_browsable());
    }
}
