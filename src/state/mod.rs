//! Application session state.
//!
//! [`AppState`] is owned by the application root and passed by reference to
//! every screen. It holds the auth record (persisted under
//! [`AUTH_STORAGE_KEY`]), the course list and the API client, and hands out
//! [`CourseSession`]s that read the current token through [`SharedToken`].

mod route;
mod store;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiClient, ApiError, AuthMode, CourseSummary, Credentials, UploadFile};
use crate::course::{CourseSession, SessionConfig, TokenSource};
use crate::validation::{
    ValidationError, validate_credentials, validate_file_size, validate_file_type,
};

pub use route::Route;
pub use store::{FileKeyValueStore, KeyValueStore, MemoryStore, StorageError, default_config_dir};

/// Storage key of the persisted auth record.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Errors from state operations.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Please login first")]
    NotLoggedIn,

    #[error("Session expired. Please login again.")]
    SessionExpired,
}

impl StateError {
    /// Screen to switch to, when the error ends the session.
    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::NotLoggedIn | Self::SessionExpired => Some(Route::Login),
            _ => None,
        }
    }
}

/// Persisted auth record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRecord {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
    #[serde(default)]
    pub is_authenticated: bool,
}

/// Token shared between [`AppState`] and running course sessions.
#[derive(Clone, Default)]
pub struct SharedToken(Arc<RwLock<Option<String>>>);

impl SharedToken {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self(Arc::new(RwLock::new(token)))
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, token: Option<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

impl TokenSource for SharedToken {
    fn token(&self) -> Option<String> {
        self.get()
    }
}

impl fmt::Debug for SharedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.get().is_some() { "set" } else { "unset" };
        f.debug_tuple("SharedToken").field(&state).finish()
    }
}

/// Injectable session state for one user of the course service.
pub struct AppState {
    api: ApiClient,
    store: Box<dyn KeyValueStore>,
    auth: AuthRecord,
    token: SharedToken,
    courses: Vec<CourseSummary>,
}

impl AppState {
    /// Logged-out state over `store`.
    #[must_use]
    pub fn new(api: ApiClient, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            api,
            store,
            auth: AuthRecord::default(),
            token: SharedToken::default(),
            courses: Vec::new(),
        }
    }

    /// State with the auth record loaded from `store`.
    ///
    /// An unreadable record is treated as logged out.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Storage`] if the store itself cannot be read.
    pub fn restore(api: ApiClient, store: Box<dyn KeyValueStore>) -> Result<Self, StateError> {
        let mut state = Self::new(api, store);
        if let Some(value) = state.store.get(AUTH_STORAGE_KEY)? {
            match serde_json::from_value::<AuthRecord>(value) {
                Ok(record) if record.is_authenticated && record.token.is_some() => {
                    debug!("Restored saved session");
                    state.token.set(record.token.clone());
                    state.auth = record;
                }
                Ok(_) => debug!("Saved session is logged out"),
                Err(error) => warn!(%error, "Ignoring unreadable saved session"),
            }
        }
        Ok(state)
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn auth(&self) -> &AuthRecord {
        &self.auth
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated && self.auth.token.is_some()
    }

    /// Handle that always sees the current token.
    #[must_use]
    pub fn token_source(&self) -> SharedToken {
        self.token.clone()
    }

    /// Courses from the last successful [`fetch_courses`](Self::fetch_courses).
    #[must_use]
    pub fn courses(&self) -> &[CourseSummary] {
        &self.courses
    }

    /// New course session bound to this state's client and token.
    #[must_use]
    pub fn course_session(&self, config: SessionConfig) -> CourseSession {
        CourseSession::new(
            Arc::new(self.api.clone()),
            Arc::new(self.token.clone()),
            config,
        )
    }

    /// Validates, logs in and persists the session.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Validation`] before any request for bad input,
    /// [`StateError::Api`] if the service rejects the credentials.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Route, StateError> {
        self.authenticate(AuthMode::Login, email, password).await
    }

    /// Validates, registers and persists the session.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    pub async fn register(&mut self, email: &str, password: &str) -> Result<Route, StateError> {
        self.authenticate(AuthMode::Register, email, password).await
    }

    #[instrument(skip(self, password))]
    async fn authenticate(
        &mut self,
        mode: AuthMode,
        email: &str,
        password: &str,
    ) -> Result<Route, StateError> {
        validate_credentials(email, password)?;
        let credentials = Credentials::new(email, password);
        let response = self.api.authenticate(mode, &credentials).await?;

        let record = AuthRecord {
            token: response.token,
            user: response.user,
            is_authenticated: true,
        };
        let value = serde_json::to_value(&record).map_err(StorageError::from)?;
        self.store.set(AUTH_STORAGE_KEY, value)?;
        self.token.set(record.token.clone());
        self.auth = record;
        info!(email = %credentials.email, "Logged in");
        Ok(Route::Dashboard)
    }

    /// Clears the token, user and course list, persisted and in memory.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Storage`] if the persisted record cannot be removed.
    /// In-memory state is cleared regardless.
    pub fn logout(&mut self) -> Result<Route, StateError> {
        self.token.set(None);
        self.auth = AuthRecord::default();
        self.courses.clear();
        self.store.remove(AUTH_STORAGE_KEY)?;
        info!("Logged out");
        Ok(Route::Login)
    }

    /// Logs out after the service rejected the token and returns the error
    /// to report: [`StateError::SessionExpired`], or the storage failure if
    /// the logout could not be persisted.
    pub fn expire_session(&mut self) -> StateError {
        warn!("Token rejected by the service; logging out");
        match self.logout() {
            Ok(_) => StateError::SessionExpired,
            Err(error) => error,
        }
    }

    fn require_token(&self) -> Result<String, StateError> {
        self.token.get().ok_or(StateError::NotLoggedIn)
    }

    /// Refreshes the course list.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NotLoggedIn`] without a request when logged out,
    /// and [`StateError::SessionExpired`] after logging out on a 401.
    pub async fn fetch_courses(&mut self) -> Result<&[CourseSummary], StateError> {
        let token = self.require_token()?;
        match self.api.list_courses(&token).await {
            Ok(courses) => {
                debug!(count = courses.len(), "Fetched courses");
                self.courses = courses;
                Ok(&self.courses)
            }
            Err(error) if error.is_unauthorized() => Err(self.expire_session()),
            Err(error) => Err(error.into()),
        }
    }

    /// Validates and uploads a document, returning the new course's route.
    ///
    /// Type and size are checked from the file name and metadata before the
    /// file is read or any request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Validation`] for a rejected file, [`StateError::Api`]
    /// if the file cannot be read,
    /// [`StateError::NotLoggedIn`] when logged out, and
    /// [`StateError::SessionExpired`] after logging out on a 401.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn upload(&mut self, path: &Path) -> Result<Route, StateError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        validate_file_type(&file_name)?;
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| ApiError::io(PathBuf::from(path), source))?;
        validate_file_size(metadata.len())?;

        let token = self.require_token()?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ApiError::io(PathBuf::from(path), source))?;

        match self.api.upload(UploadFile { file_name, bytes }, &token).await {
            Ok(response) => {
                info!(course_id = %response.course_id, "Uploaded document");
                Ok(Route::Course(response.course_id))
            }
            Err(error) if error.is_unauthorized() => Err(self.expire_session()),
            Err(error) => Err(error.into()),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("base_url", &self.api.base_url().as_str())
            .field("authenticated", &self.is_authenticated())
            .field("courses", &self.courses.len())
            .finish_non_exhaustive()
    }
}
