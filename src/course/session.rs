//! Poll loop for one course id at a time.
//!
//! Every request carries the session epoch (bumped on `start` and `dispose`)
//! and a sequence number within that epoch. A response is applied only if its
//! epoch is current, so nothing from a previous course id or a disposed
//! session ever reaches the snapshot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use super::snapshot::{CourseSnapshot, SessionFailure, SessionStatus};
use super::{CourseFetcher, TokenSource};
use crate::api::RawCourse;
use crate::artifact::Artifact;

/// Default delay between polls while an artifact is not ready.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// How responses racing within one course id are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyPolicy {
    /// Apply a response only if no request was issued after it. A ready
    /// artifact is never replaced by a field that is not ready.
    #[default]
    LatestRequest,
    /// Apply every response for the current course id in arrival order.
    /// A slow older response can overwrite newer state.
    ArrivalOrder,
}

/// Session tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub poll_interval: Duration,
    pub apply_policy: ApplyPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            apply_policy: ApplyPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Poll,
    Refetch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextStep {
    Poll,
    Stop,
}

struct Ticket {
    epoch: u64,
    seq: u64,
    course_id: String,
}

struct Tracker {
    epoch: u64,
    issued: u64,
    /// A poll loop for the current epoch is alive.
    polling: bool,
    poller: Option<JoinHandle<()>>,
    snapshot: CourseSnapshot,
}

struct Shared {
    fetcher: Arc<dyn CourseFetcher>,
    tokens: Arc<dyn TokenSource>,
    config: SessionConfig,
    tracker: Mutex<Tracker>,
    updates: watch::Sender<CourseSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Tracker> {
        self.tracker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, tracker: &Tracker) {
        self.updates.send_replace(tracker.snapshot.clone());
    }

    /// Starts a new epoch; polls immediately when a course id is given.
    fn restart(self: &Arc<Self>, course_id: Option<String>) {
        let mut tracker = self.lock();
        tracker.epoch += 1;
        tracker.issued = 0;
        tracker.polling = false;
        if let Some(handle) = tracker.poller.take() {
            handle.abort();
        }
        let start = course_id.is_some();
        tracker.snapshot = CourseSnapshot::idle(course_id);
        self.publish(&tracker);

        if start {
            let epoch = tracker.epoch;
            self.spawn_poller(&mut tracker, epoch, false);
        }
    }

    fn spawn_poller(self: &Arc<Self>, tracker: &mut Tracker, epoch: u64, delay_first: bool) {
        tracker.polling = true;
        let handle = tokio::spawn(Arc::clone(self).poll_loop(epoch, delay_first));
        if let Some(previous) = tracker.poller.replace(handle) {
            previous.abort();
        }
    }

    /// Resumes polling after a refetch left something not ready.
    fn ensure_poller(self: &Arc<Self>, epoch: u64) {
        let mut tracker = self.lock();
        if tracker.epoch != epoch || tracker.polling || !tracker.snapshot.needs_polling() {
            return;
        }
        debug!("Resuming course polling");
        self.spawn_poller(&mut tracker, epoch, true);
    }

    async fn poll_loop(self: Arc<Self>, epoch: u64, delay_first: bool) {
        if delay_first {
            tokio::time::sleep(self.config.poll_interval).await;
        }
        while self.fetch_once(epoch, Origin::Poll).await == NextStep::Poll {
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    async fn fetch_once(&self, epoch: u64, origin: Origin) -> NextStep {
        let Some(ticket) = self.begin(epoch, origin) else {
            return NextStep::Stop;
        };

        // Read per request so a fresh login applies on the next tick.
        let result = match self.tokens.token().filter(|token| !token.is_empty()) {
            Some(token) => self
                .fetcher
                .fetch_course(&ticket.course_id, &token)
                .await
                .map_err(|error| SessionFailure::from(&error)),
            None => Err(SessionFailure::not_logged_in()),
        };

        self.finish(&ticket, result, origin)
    }

    fn begin(&self, epoch: u64, origin: Origin) -> Option<Ticket> {
        let mut tracker = self.lock();
        if tracker.epoch != epoch {
            return None;
        }
        let course_id = tracker.snapshot.course_id.clone()?;
        if origin == Origin::Poll && tracker.snapshot.status.is_terminal() {
            tracker.polling = false;
            return None;
        }

        tracker.issued += 1;
        let seq = tracker.issued;
        tracker.snapshot.requests_issued = seq;
        tracker.snapshot.status = SessionStatus::Fetching;
        self.publish(&tracker);
        debug!(course_id = %course_id, seq, ?origin, "Fetching course");
        Some(Ticket {
            epoch,
            seq,
            course_id,
        })
    }

    fn finish(
        &self,
        ticket: &Ticket,
        result: Result<RawCourse, SessionFailure>,
        origin: Origin,
    ) -> NextStep {
        let mut tracker = self.lock();
        if tracker.epoch != ticket.epoch {
            debug!(course_id = %ticket.course_id, "Ignoring response for a previous session");
            return NextStep::Stop;
        }

        let superseded = ticket.seq < tracker.issued;
        if superseded && self.config.apply_policy == ApplyPolicy::LatestRequest {
            debug!(
                seq = ticket.seq,
                latest = tracker.issued,
                "Discarding superseded response"
            );
        } else {
            apply(&mut tracker.snapshot, result, self.config.apply_policy);
            match &tracker.snapshot.status {
                SessionStatus::Stable => info!(course_id = %ticket.course_id, "Course materials ready"),
                SessionStatus::Failed(failure) => {
                    warn!(course_id = %ticket.course_id, error = %failure, "Course fetch failed");
                }
                _ => debug!(course_id = %ticket.course_id, "Course materials still generating"),
            }
            self.publish(&tracker);
        }

        if tracker.snapshot.needs_polling() {
            NextStep::Poll
        } else {
            if origin == Origin::Poll {
                tracker.polling = false;
            }
            NextStep::Stop
        }
    }
}

/// Applies one response. Failures keep the current artifacts.
///
/// Under [`ApplyPolicy::LatestRequest`] a `Ready` artifact is never replaced
/// by a response that is not `Ready` for the same field.
fn apply(
    snapshot: &mut CourseSnapshot,
    result: Result<RawCourse, SessionFailure>,
    policy: ApplyPolicy,
) {
    match result {
        Ok(raw) => {
            merge(&mut snapshot.content, Artifact::parse(raw.json.as_deref()), policy);
            merge(&mut snapshot.flashcards, Artifact::parse(raw.flash_card.as_deref()), policy);
            merge(&mut snapshot.questions, Artifact::parse(raw.qna.as_deref()), policy);
            snapshot.status = if snapshot.all_ready() {
                SessionStatus::Stable
            } else {
                SessionStatus::Settled
            };
        }
        Err(failure) => snapshot.status = SessionStatus::Failed(failure),
    }
}

fn merge<T>(current: &mut Artifact<T>, next: Artifact<T>, policy: ApplyPolicy) {
    if policy == ApplyPolicy::LatestRequest && current.is_ready() && !next.is_ready() {
        debug!(incoming = next.label(), "Keeping ready artifact");
        return;
    }
    *current = next;
}

/// Polls one course until its artifacts are ready.
///
/// Must be used inside a tokio runtime. Dropping the session cancels any
/// scheduled poll and in-flight refetch.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use coursekit_core::api::ApiClient;
/// use coursekit_core::course::{CourseSession, SessionConfig, SessionStatus};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = Arc::new(ApiClient::new("http://localhost:3000/api")?);
/// let token = || Some("token".to_string());
/// let mut session = CourseSession::new(api, Arc::new(token), SessionConfig::default());
/// let mut updates = session.subscribe();
/// session.start("65f0c2");
/// let done = updates
///     .wait_for(|s| matches!(s.status, SessionStatus::Stable | SessionStatus::Failed(_)))
///     .await?
///     .clone();
/// println!("{}", done.status);
/// # Ok(())
/// # }
/// ```
pub struct CourseSession {
    shared: Arc<Shared>,
    refetches: JoinSet<()>,
}

impl CourseSession {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn CourseFetcher>,
        tokens: Arc<dyn TokenSource>,
        config: SessionConfig,
    ) -> Self {
        let snapshot = CourseSnapshot::default();
        let (updates, _) = watch::channel(snapshot.clone());
        let tracker = Tracker {
            epoch: 0,
            issued: 0,
            polling: false,
            poller: None,
            snapshot,
        };
        Self {
            shared: Arc::new(Shared {
                fetcher,
                tokens,
                config,
                tracker: Mutex::new(tracker),
                updates,
            }),
            refetches: JoinSet::new(),
        }
    }

    /// Receiver that sees every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CourseSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CourseSnapshot {
        self.shared.lock().snapshot.clone()
    }

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.shared.config
    }

    /// Whether a poll loop is scheduled or running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.shared.lock().polling
    }

    /// Discards all state and starts polling `course_id`.
    ///
    /// An empty id leaves the session idle without any request.
    pub fn start(&mut self, course_id: &str) {
        self.refetches.abort_all();
        let course_id = course_id.trim();
        if course_id.is_empty() {
            debug!("No course id; session stays idle");
            self.shared.restart(None);
            return;
        }
        info!(course_id, "Loading course");
        self.shared.restart(Some(course_id.to_string()));
    }

    /// Issues one immediate fetch for the current course.
    ///
    /// Also the retry path after a failure: polling resumes if the response
    /// still has artifacts that are not ready.
    pub fn refetch(&mut self) {
        while self.refetches.try_join_next().is_some() {}

        let epoch = {
            let tracker = self.shared.lock();
            if tracker.snapshot.course_id.is_none() {
                return;
            }
            tracker.epoch
        };

        let shared = Arc::clone(&self.shared);
        self.refetches.spawn(async move {
            shared.fetch_once(epoch, Origin::Refetch).await;
            shared.ensure_poller(epoch);
        });
    }

    /// Cancels polling and in-flight requests and clears all state.
    pub fn dispose(&mut self) {
        self.refetches.abort_all();
        self.shared.restart(None);
    }
}

impl Drop for CourseSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
