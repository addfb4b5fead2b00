//! HTTP client for the course service.
//!
//! Authenticated calls send the raw token in the `Authorization` header,
//! without a `Bearer` prefix, as the service expects.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::error::ApiError;
use super::types::{
    AuthResponse, CourseSummary, Credentials, ErrorBody, RawCourse, UploadFile, UploadResponse,
};
use crate::user_agent;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default total request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Timeouts applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for ApiTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Which auth endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    fn path(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }
}

/// Client for the course service endpoints.
///
/// Cheap to clone; clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// use coursekit_core::api::{ApiClient, Credentials};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = ApiClient::new("https://study.example.com/api")?;
/// let auth = api.login(&Credentials::new("ada@example.com", "hunter22")).await?;
/// let courses = api.list_courses(auth.token.as_deref().unwrap_or_default()).await?;
/// println!("{} courses", courses.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] for a malformed base URL and
    /// [`ApiError::Client`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeouts(base_url, ApiTimeouts::default())
    }

    /// Creates a client with explicit timeouts.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_timeouts(base_url: &str, timeouts: ApiTimeouts) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .user_agent(user_agent::default_user_agent())
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.request)
            .gzip(true)
            .build()
            .map_err(|source| ApiError::Client { source })?;
        Ok(Self { client, base_url })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|_| ApiError::invalid_url(format!("{}{path}", self.base_url)))
    }

    /// `POST /login`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a rejected status, or a
    /// success body without a token.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.authenticate(AuthMode::Login, credentials).await
    }

    /// `POST /register`.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    pub async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.authenticate(AuthMode::Register, credentials).await
    }

    /// `POST /login` or `POST /register` with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(mode.path())?;
        let request = self.client.post(url.clone()).json(credentials);
        let response = send(request, url.as_str()).await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(ApiError::rejected(
                url.as_str(),
                status.as_u16(),
                auth_failure_message(status, &body),
            ));
        }

        let auth: AuthResponse = decode_json(response, url.as_str()).await?;
        if auth.token.as_deref().is_none_or(str::is_empty) {
            return Err(ApiError::invalid_response(
                url.as_str(),
                "Invalid response from server",
            ));
        }
        debug!("Authentication succeeded");
        Ok(auth)
    }

    /// `GET /courses`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on 401, other [`ApiError`]
    /// variants on transport or decoding failures.
    #[instrument(skip(self, token))]
    pub async fn list_courses(&self, token: &str) -> Result<Vec<CourseSummary>, ApiError> {
        let url = self.endpoint("courses")?;
        let request = self.client.get(url.clone()).header(AUTHORIZATION, token);
        let response = checked(send(request, url.as_str()).await?, url.as_str()).await?;
        decode_json(response, url.as_str()).await
    }

    /// `GET /courses/{id}`.
    ///
    /// # Errors
    ///
    /// Same as [`list_courses`](Self::list_courses).
    #[instrument(skip(self, token))]
    pub async fn get_course(&self, course_id: &str, token: &str) -> Result<RawCourse, ApiError> {
        let url = self.endpoint(&format!("courses/{}", urlencoding::encode(course_id)))?;
        let request = self.client.get(url.clone()).header(AUTHORIZATION, token);
        let response = checked(send(request, url.as_str()).await?, url.as_str()).await?;
        decode_json(response, url.as_str()).await
    }

    /// `POST /upload` with a multipart `file` field.
    ///
    /// File type and size are not checked here; see
    /// [`validate_upload`](crate::validation::validate_upload).
    ///
    /// # Errors
    ///
    /// Same as [`list_courses`](Self::list_courses).
    #[instrument(skip(self, file, token), fields(file = %file.file_name, bytes = file.bytes.len()))]
    pub async fn upload(&self, file: UploadFile, token: &str) -> Result<UploadResponse, ApiError> {
        let url = self.endpoint("upload")?;
        let part = Part::bytes(file.bytes).file_name(file.file_name);
        let form = Form::new().part("file", part);
        let request = self
            .client
            .post(url.clone())
            .header(AUTHORIZATION, token)
            .multipart(form);
        let response = checked(send(request, url.as_str()).await?, url.as_str()).await?;
        decode_json(response, url.as_str()).await
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|_| ApiError::invalid_url(trimmed))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::invalid_url(trimmed));
    }
    // Url::join replaces the last segment unless the path ends with '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn send(request: RequestBuilder, url: &str) -> Result<Response, ApiError> {
    debug!(url, "Sending request");
    request
        .send()
        .await
        .map_err(|source| ApiError::transport(url, source))
}

/// Maps non-success statuses of authenticated endpoints to errors.
async fn checked(response: Response, url: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::unauthorized(url));
    }

    let body = error_body(response).await;
    let message = body.text().map_or_else(
        || default_status_message(status).to_string(),
        str::to_string,
    );
    Err(ApiError::rejected(url, status.as_u16(), message))
}

async fn error_body(response: Response) -> ErrorBody {
    match response.text().await {
        Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
        Err(_) => ErrorBody::default(),
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ApiError> {
    let text = response
        .text()
        .await
        .map_err(|source| ApiError::transport(url, source))?;
    serde_json::from_str(&text).map_err(|error| ApiError::invalid_response(url, error.to_string()))
}

fn default_status_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "Invalid request data",
        403 => "Access denied",
        404 => "Not found",
        429 => "Too many attempts. Please try again later.",
        500..=599 => "Server error. Please try again later.",
        _ => "Request failed",
    }
}

fn auth_failure_message(status: StatusCode, body: &ErrorBody) -> String {
    let message = match status.as_u16() {
        400 => return body.text().unwrap_or("Invalid request data").to_string(),
        401 => "Invalid email or password",
        409 => "Email already exists. Please use a different email.",
        429 => "Too many attempts. Please try again later.",
        500 => "Server error. Please try again later.",
        _ => return body.text().unwrap_or("Authentication failed").to_string(),
    };
    message.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_appends_slash() {
        let url = normalize_base_url("https://study.example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://study.example.com/api/");
        assert_eq!(
            url.join("courses").unwrap().as_str(),
            "https://study.example.com/api/courses"
        );
    }

    #[test]
    fn test_normalize_base_url_rejects_garbage() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(ApiError::InvalidUrl { .. })
        ));
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(ApiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_course_id_is_path_encoded() {
        let api = ApiClient::new("http://localhost:9000").unwrap();
        let url = api
            .endpoint(&format!("courses/{}", urlencoding::encode("a/b c")))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/courses/a%2Fb%20c");
    }

    #[test]
    fn test_auth_failure_messages() {
        let empty = ErrorBody::default();
        assert_eq!(
            auth_failure_message(StatusCode::UNAUTHORIZED, &empty),
            "Invalid email or password"
        );
        assert!(auth_failure_message(StatusCode::CONFLICT, &empty).contains("already exists"));

        let body = ErrorBody {
            error: Some("Password too weak".to_string()),
            message: None,
        };
        assert_eq!(
            auth_failure_message(StatusCode::BAD_REQUEST, &body),
            "Password too weak"
        );
        assert_eq!(
            auth_failure_message(StatusCode::IM_A_TEAPOT, &empty),
            "Authentication failed"
        );
    }

    #[test]
    fn test_default_status_messages() {
        assert_eq!(
            default_status_message(StatusCode::BAD_GATEWAY),
            "Server error. Please try again later."
        );
        assert_eq!(default_status_message(StatusCode::NOT_FOUND), "Not found");
    }
}
