//! Course command: poll a course until its materials are generated.

use anyhow::{Result, bail};
use coursekit_core::course::{CourseSnapshot, SessionStatus};
use coursekit_core::state::{AppState, StateError};
use tracing::debug;

use super::explain;
use crate::app::Settings;
use crate::app::terminal;
use crate::cli::CourseArgs;
use crate::output;

/// When to stop polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WaitMode {
    /// First applied response.
    FirstResponse,
    /// Every artifact ready.
    Stable,
}

impl WaitMode {
    fn is_done(self, snapshot: &CourseSnapshot) -> bool {
        match snapshot.status {
            SessionStatus::Stable | SessionStatus::Failed(_) => true,
            SessionStatus::Settled => self == Self::FirstResponse,
            SessionStatus::Idle | SessionStatus::Fetching => false,
        }
    }
}

/// Runs a course session for `course_id` until `mode` is satisfied.
///
/// A rejected token logs the user out.
pub(crate) async fn load_course(
    state: &mut AppState,
    settings: &Settings,
    course_id: &str,
    mode: WaitMode,
) -> Result<CourseSnapshot> {
    if !state.is_authenticated() {
        return Err(explain(StateError::NotLoggedIn));
    }

    let mut session = state.course_session(settings.session);
    let mut updates = session.subscribe();
    session.start(course_id);

    let bar = terminal::spinner(settings.quiet, "Loading course...");
    let snapshot = loop {
        let current = updates.borrow_and_update().clone();
        bar.set_message(output::status_line(&current));
        if mode.is_done(&current) || updates.changed().await.is_err() {
            break current;
        }
    };
    bar.finish_and_clear();
    session.dispose();
    debug!(status = %snapshot.status, requests = snapshot.requests_issued, "Course session finished");

    if let Some(failure) = snapshot.failure() {
        if failure.unauthorized {
            return Err(explain(state.expire_session()));
        }
        bail!("Failed to load course {course_id}: {}", failure.message);
    }
    Ok(snapshot)
}

pub async fn run_course_command(
    state: &mut AppState,
    settings: &Settings,
    args: &CourseArgs,
) -> Result<()> {
    let mode = if args.no_wait {
        WaitMode::FirstResponse
    } else {
        WaitMode::Stable
    };
    let snapshot = load_course(state, settings, &args.id, mode).await?;

    println!("{}", output::status_line(&snapshot));
    println!();
    match snapshot.content.ready() {
        Some(content) => print!("{}", output::render_course(content)),
        None if snapshot.content.is_pending() => println!("Course content is still being generated."),
        None => println!("No course content available."),
    }
    Ok(())
}
