//! End-to-end CLI tests for the coursekit binary.
//!
//! Every test points `HOME` and `XDG_CONFIG_HOME` at a temp dir so the
//! user's real session and config are never touched.

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn coursekit(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("coursekit").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("COURSEKIT_BACKEND_URL")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn save_session(home: &Path, token: &str) {
    let dir = home.join("config").join("coursekit");
    std::fs::create_dir_all(&dir).unwrap();
    let record = serde_json::json!({
        "auth-storage": {"token": token, "user": null, "isAuthenticated": true}
    });
    std::fs::write(dir.join("state.json"), record.to_string()).unwrap();
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    coursekit(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Study companion"))
        .stdout(predicate::str::contains("flashcards"));
}

/// Test that a subcommand is required.
#[test]
fn test_binary_without_subcommand_fails() {
    let home = TempDir::new().unwrap();
    coursekit(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_courses_requires_login() {
    let home = TempDir::new().unwrap();
    coursekit(home.path())
        .arg("courses")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please login first"))
        .stderr(predicate::str::contains("coursekit login"));
}

#[test]
fn test_upload_rejects_unsupported_type() {
    let home = TempDir::new().unwrap();
    let image = home.path().join("diagram.png");
    std::fs::write(&image, b"\x89PNG").unwrap();

    coursekit(home.path())
        .arg("upload")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("File type not supported"));
}

#[test]
fn test_login_rejects_invalid_email_before_network() {
    let home = TempDir::new().unwrap();
    coursekit(home.path())
        .args(["--base-url", "http://127.0.0.1:9", "login", "--email", "nope", "--password", "secret1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a valid email address"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("config").join("coursekit");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "concurrency = 4\n").unwrap();

    coursekit(home.path())
        .arg("logout")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_logout_clears_saved_session() {
    let home = TempDir::new().unwrap();
    save_session(home.path(), "tok-123");

    coursekit(home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    let saved = std::fs::read_to_string(home.path().join("config/coursekit/state.json")).unwrap();
    assert!(!saved.contains("tok-123"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_courses_lists_titles_from_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/courses"))
        .and(header("Authorization", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"_id": "c1", "title": "An Introduction to Ownership and Borrowing"},
            {"_id": "c2"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    save_session(home.path(), "tok-123");
    let mut cmd = coursekit(home.path());
    cmd.env("COURSEKIT_BACKEND_URL", server.uri()).arg("courses");

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("c1  An Introduction to Ownership a..."))
        .stdout(predicate::str::contains("c2  Untitled Course"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_logs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    save_session(home.path(), "stale");
    let mut cmd = coursekit(home.path());
    cmd.args(["--base-url", &server.uri(), "courses"]);

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();
    output
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session expired. Please login again."));

    let saved = std::fs::read_to_string(home.path().join("config/coursekit/state.json")).unwrap();
    assert!(!saved.contains("stale"));
}
