//! Observable state of a course session.

use std::fmt;

use crate::api::ApiError;
use crate::artifact::{Artifact, CourseContent, FlashcardSet, QuestionSet};

/// Why the last fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFailure {
    /// Message for display.
    pub message: String,
    /// The token was rejected; the owner should log out.
    pub unauthorized: bool,
}

impl SessionFailure {
    /// Failure raised before any request when no token is available.
    #[must_use]
    pub fn not_logged_in() -> Self {
        Self {
            message: "Please login first".to_string(),
            unauthorized: true,
        }
    }
}

impl From<&ApiError> for SessionFailure {
    fn from(error: &ApiError) -> Self {
        Self {
            message: error.to_string(),
            unauthorized: error.is_unauthorized(),
        }
    }
}

impl fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Lifecycle of a course session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No course, or not started.
    #[default]
    Idle,
    /// A request is in flight.
    Fetching,
    /// Last response applied; some artifact is not ready yet.
    Settled,
    /// Every artifact is ready. Polling has stopped.
    Stable,
    /// Last request failed. Polling has stopped until a refetch.
    Failed(SessionFailure),
}

impl SessionStatus {
    /// Returns the stable label for display output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Settled => "settled",
            Self::Stable => "stable",
            Self::Failed(_) => "failed",
        }
    }

    /// `Stable` and `Failed` end the poll loop.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stable | Self::Failed(_))
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which artifact a tab shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
    Course,
    Flashcards,
    Questions,
}

/// Tab label, badge and availability derived from artifact state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub kind: TabKind,
    pub label: &'static str,
    pub badge: String,
    pub enabled: bool,
}

/// Point-in-time view of a course session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CourseSnapshot {
    pub course_id: Option<String>,
    pub status: SessionStatus,
    pub content: Artifact<CourseContent>,
    pub flashcards: Artifact<FlashcardSet>,
    pub questions: Artifact<QuestionSet>,
    /// Requests issued for the current course id.
    pub requests_issued: u64,
}

impl CourseSnapshot {
    /// Fresh state for `course_id`.
    #[must_use]
    pub fn idle(course_id: Option<String>) -> Self {
        Self {
            course_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn all_ready(&self) -> bool {
        self.content.is_ready() && self.flashcards.is_ready() && self.questions.is_ready()
    }

    /// Any artifact still being generated.
    #[must_use]
    pub fn any_pending(&self) -> bool {
        self.content.is_pending() || self.flashcards.is_pending() || self.questions.is_pending()
    }

    /// First load still in progress (nothing to show yet).
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Fetching && self.requests_issued <= 1
    }

    #[must_use]
    pub fn failure(&self) -> Option<&SessionFailure> {
        match &self.status {
            SessionStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Whether the poll loop should keep running.
    pub(crate) fn needs_polling(&self) -> bool {
        match self.status {
            SessionStatus::Idle | SessionStatus::Stable | SessionStatus::Failed(_) => false,
            SessionStatus::Fetching => true,
            SessionStatus::Settled => !self.all_ready(),
        }
    }

    /// Tabs for the course view: content is always selectable, flashcards
    /// and questions once ready.
    #[must_use]
    pub fn tabs(&self) -> [TabInfo; 3] {
        [
            TabInfo {
                kind: TabKind::Course,
                label: "Course Content",
                badge: String::new(),
                enabled: true,
            },
            TabInfo {
                kind: TabKind::Flashcards,
                label: "Flashcards",
                badge: self.flashcards.badge(),
                enabled: self.flashcards.is_browsable(),
            },
            TabInfo {
                kind: TabKind::Questions,
                label: "Q&A",
                badge: self.questions.badge(),
                enabled: self.questions.is_browsable(),
            },
        ]
    }
}
