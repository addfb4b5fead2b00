//! Integration tests for session state: login persistence, upload
//! validation and token expiry.

use std::path::Path;

use coursekit_core::api::ApiClient;
use coursekit_core::state::{AUTH_STORAGE_KEY, FileKeyValueStore, KeyValueStore, MemoryStore};
use coursekit_core::{AppState, Route, StateError, ValidationError};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "tok-123",
            "user": {"email": "ada@example.com", "name": "Ada"}
        })))
        .mount(server)
        .await;
}

fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri()).expect("mock server URL is valid")
}

async fn logged_in(server: &MockServer) -> AppState {
    mount_login(server).await;
    let mut state = AppState::new(api(server), Box::new(MemoryStore::new()));
    let route = state
        .login("ada@example.com", "secret1")
        .await
        .expect("login should succeed");
    assert_eq!(route, Route::Dashboard);
    state
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let file = dir.join(name);
    std::fs::write(&file, bytes).expect("should write file");
    file
}

#[tokio::test]
async fn test_login_persists_and_restores_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let store_path = temp_dir.path().join("state.json");

    let mut state = AppState::new(api(&server), Box::new(FileKeyValueStore::new(&store_path)));
    state
        .login("ada@example.com", "secret1")
        .await
        .expect("login should succeed");
    assert!(state.is_authenticated());

    let saved = FileKeyValueStore::new(&store_path)
        .get(AUTH_STORAGE_KEY)
        .expect("store is readable")
        .expect("auth record saved");
    assert_eq!(saved["token"], "tok-123");
    assert_eq!(saved["isAuthenticated"], true);
    assert_eq!(saved["user"]["name"], "Ada");

    let restored =
        AppState::restore(api(&server), Box::new(FileKeyValueStore::new(&store_path)))
            .expect("restore should succeed");
    assert!(restored.is_authenticated());
    assert_eq!(restored.token_source().get().as_deref(), Some("tok-123"));
}

#[tokio::test]
async fn test_invalid_credentials_send_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut state = AppState::new(api(&server), Box::new(MemoryStore::new()));
    let err = state
        .login("not-an-email", "secret1")
        .await
        .expect_err("invalid email");
    assert!(matches!(err, StateError::Validation(_)), "got {err:?}");

    let err = state
        .login("ada@example.com", "12345")
        .await
        .expect_err("short password");
    assert!(err.to_string().contains("6 characters"), "{err}");
}

#[tokio::test]
async fn test_upload_rejects_unsupported_type_without_request() {
    let server = MockServer::start().await;
    let mut state = logged_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let image = write_file(temp_dir.path(), "diagram.png", b"\x89PNG");

    let err = state.upload(&image).await.expect_err("png is rejected");
    assert!(
        matches!(err, StateError::Validation(ValidationError::UnsupportedFileType { .. })),
        "got {err:?}"
    );
    assert!(state.is_authenticated(), "validation failure keeps the session");
}

#[tokio::test]
async fn test_upload_returns_course_route() {
    let server = MockServer::start().await;
    let mut state = logged_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("Authorization", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"courseId": "c9"})))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let notes = write_file(temp_dir.path(), "Lecture.MD", b"# Traits");

    let route = state.upload(&notes).await.expect("upload should succeed");
    assert_eq!(route, Route::Course("c9".to_string()));
    assert_eq!(route.to_string(), "/course/c9");
}

#[tokio::test]
async fn test_rejected_token_logs_out() {
    let server = MockServer::start().await;
    let mut state = logged_in(&server).await;
    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = state.fetch_courses().await.expect_err("token rejected");
    assert!(matches!(err, StateError::SessionExpired), "got {err:?}");
    assert_eq!(err.redirect(), Some(Route::Login));
    assert!(!state.is_authenticated());
    assert!(state.token_source().get().is_none());

    // Logged out now: no further request is sent.
    let err = state.fetch_courses().await.expect_err("not logged in");
    assert!(matches!(err, StateError::NotLoggedIn), "got {err:?}");
}

#[tokio::test]
async fn test_fetch_courses_keeps_list() {
    let server = MockServer::start().await;
    let mut state = logged_in(&server).await;
    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"_id": "c1", "title": "Physics"}
        ])))
        .mount(&server)
        .await;

    let courses = state.fetch_courses().await.expect("list should succeed");
    assert_eq!(courses.len(), 1);
    assert_eq!(state.courses()[0].id, "c1");

    let route = state.logout().expect("logout should succeed");
    assert_eq!(route, Route::Login);
    assert!(state.courses().is_empty());
}
