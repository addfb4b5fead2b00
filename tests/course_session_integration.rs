//! Integration tests for course polling against a mock service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use coursekit_core::api::ApiClient;
use coursekit_core::course::SessionFailure;
use coursekit_core::state::{AppState, MemoryStore};
use coursekit_core::{
    ApplyPolicy, CourseSession, CourseSnapshot, SessionConfig, SessionStatus,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const COURSE_JSON: &str = r#"{"courseTitle":"Ownership","courseSummary":"Borrowing rules","chapters":[{"chapterTitle":"Moves","topics":["copy","move"]}]}"#;
const FLASHCARDS_JSON: &str = r#"{"flashcards":[{"id":"f1","front":"What is a move?","back":"Ownership transfer","category":"Basics","difficulty":"easy"}]}"#;
const QUESTIONS_JSON: &str = r#"{"questions":[{"id":"q1","question":"Name a Copy type","type":"short-answer","difficulty":"medium","answer":"i32"}]}"#;

/// Serves `loading` artifacts for the first `pending_polls` requests, then
/// the finished course.
struct GeneratingCourse {
    pending_polls: usize,
    calls: Arc<AtomicUsize>,
}

impl Respond for GeneratingCourse {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.pending_polls {
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "json": COURSE_JSON,
                "flashCard": "loading",
                "qna": "loading"
            }))
        } else {
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "json": COURSE_JSON,
                "flashCard": FLASHCARDS_JSON,
                "qna": QUESTIONS_JSON
            }))
        }
    }
}

fn fast_config() -> SessionConfig {
    SessionConfig {
        poll_interval: Duration::from_millis(50),
        apply_policy: ApplyPolicy::LatestRequest,
    }
}

async fn logged_in_state(server: &MockServer) -> AppState {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "tok-123",
            "user": {"email": "ada@example.com"}
        })))
        .mount(server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("mock server URL is valid");
    let mut state = AppState::new(api, Box::new(MemoryStore::new()));
    state
        .login("ada@example.com", "secret1")
        .await
        .expect("login should succeed");
    state
}

async fn wait_until_done(session: &CourseSession) -> CourseSnapshot {
    let mut updates = session.subscribe();
    tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|snapshot| {
            matches!(snapshot.status, SessionStatus::Stable | SessionStatus::Failed(_))
        }),
    )
    .await
    .expect("session should settle within the timeout")
    .expect("session stays alive")
    .clone()
}

#[tokio::test]
async fn test_session_polls_until_all_artifacts_ready() {
    let server = MockServer::start().await;
    let state = logged_in_state(&server).await;
    let calls = Arc::new(AtomicUsize::new(0));
    Mock::given(method("GET"))
        .and(path("/courses/c1"))
        .and(header("Authorization", "tok-123"))
        .respond_with(GeneratingCourse {
            pending_polls: 2,
            calls: Arc::clone(&calls),
        })
        .mount(&server)
        .await;

    let mut session = state.course_session(fast_config());
    session.start("c1");
    let done = wait_until_done(&session).await;

    assert_eq!(done.status, SessionStatus::Stable);
    assert_eq!(done.course_id.as_deref(), Some("c1"));
    assert_eq!(
        done.content.ready().map(|content| content.course_title.as_str()),
        Some("Ownership")
    );
    assert_eq!(done.flashcards.ready().map(|set| set.flashcards.len()), Some(1));
    assert_eq!(done.questions.ready().map(|set| set.questions.len()), Some(1));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // Stable means no further requests.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(!session.is_polling());
}

#[tokio::test]
async fn test_session_reports_rejected_token() {
    let server = MockServer::start().await;
    let state = logged_in_state(&server).await;
    Mock::given(method("GET"))
        .and(path("/courses/c1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = state.course_session(fast_config());
    session.start("c1");
    let done = wait_until_done(&session).await;

    let SessionStatus::Failed(SessionFailure { unauthorized, .. }) = done.status else {
        panic!("expected failure, got {:?}", done.status);
    };
    assert!(unauthorized);

    // A failure stops polling until the caller retries.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!session.is_polling());
}

#[tokio::test]
async fn test_session_retry_after_server_error() {
    let server = MockServer::start().await;
    let state = logged_in_state(&server).await;
    Mock::given(method("GET"))
        .and(path("/courses/c1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/courses/c1"))
        .respond_with(GeneratingCourse {
            pending_polls: 0,
            calls: Arc::new(AtomicUsize::new(0)),
        })
        .mount(&server)
        .await;

    let mut session = state.course_session(fast_config());
    session.start("c1");
    let failed = wait_until_done(&session).await;
    let failure = failed.failure().expect("first response fails").clone();
    assert!(!failure.unauthorized);

    session.refetch();
    let mut updates = session.subscribe();
    let done = tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|snapshot| snapshot.status == SessionStatus::Stable),
    )
    .await
    .expect("retry should settle")
    .expect("session stays alive")
    .clone();
    assert!(done.all_ready());
}
