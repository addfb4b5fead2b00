//! Client for the remote course service.
//!
//! Endpoints (paths relative to the configured base URL):
//!
//! - `POST /login`, `POST /register` with `{email, password}`
//! - `GET /courses` and `GET /courses/{id}` with the raw token in `Authorization`
//! - `POST /upload` with a multipart `file` field
//!
//! The service generates course material asynchronously; see
//! [`course`](crate::course) for polling a course until its artifacts are ready.

mod client;
mod error;
mod types;

pub use client::{
    ApiClient, ApiTimeouts, AuthMode, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use error::ApiError;
pub use types::{AuthResponse, CourseSummary, Credentials, RawCourse, UploadFile, UploadResponse};
