//! Course session controller.
//!
//! A [`CourseSession`] fetches `GET /courses/{id}` repeatedly, parses the
//! three artifact fields and publishes a [`CourseSnapshot`] after every
//! change, until all artifacts are ready.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --start(id)--> Fetching --ok, something not ready--> Settled --interval--> Fetching
//!                        |  \--ok, all ready--> Stable (polling stops)
//!                        \--error--> Failed (polling stops until refetch)
//! ```
//!
//! Changing the course id or disposing discards all state. Responses that
//! belong to an earlier course id are never applied; see [`ApplyPolicy`] for
//! responses racing within one course id.

mod session;
mod snapshot;

use async_trait::async_trait;

use crate::api::{ApiClient, ApiError, RawCourse};

pub use session::{ApplyPolicy, CourseSession, DEFAULT_POLL_INTERVAL, SessionConfig};
pub use snapshot::{CourseSnapshot, SessionFailure, SessionStatus, TabInfo, TabKind};

/// Source of course resources.
///
/// Implemented by [`ApiClient`]; tests substitute scripted fetchers.
#[async_trait]
pub trait CourseFetcher: Send + Sync {
    /// Fetches one course resource.
    async fn fetch_course(&self, course_id: &str, token: &str) -> Result<RawCourse, ApiError>;
}

#[async_trait]
impl CourseFetcher for ApiClient {
    async fn fetch_course(&self, course_id: &str, token: &str) -> Result<RawCourse, ApiError> {
        self.get_course(course_id, token).await
    }
}

/// Read-only accessor for the current auth token.
///
/// Read at the start of every fetch so a re-login takes effect on the next
/// poll tick.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl<F> TokenSource for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}
