//! Error types for the remote course service client.
//!
//! Each variant carries the request URL so messages stay actionable.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient) calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response: DNS, connection refused, TLS, reset.
    #[error("network error calling {url}: {source}")]
    Network {
        /// The request URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete in time.
    #[error("request timeout calling {url}. Please try again.")]
    Timeout {
        /// The request URL.
        url: String,
    },

    /// The service rejected the stored token (HTTP 401 on an authenticated call).
    #[error("[AUTH] unauthorized access to {url}\n  Suggestion: run `coursekit login` again.")]
    Unauthorized {
        /// The request URL.
        url: String,
    },

    /// Any other non-success status, with a user-facing message.
    #[error("{message} (HTTP {status})")]
    Rejected {
        /// The request URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Message shown to the user.
        message: String,
    },

    /// The service answered with a body this client cannot use.
    #[error("invalid response from {url}: {reason}")]
    InvalidResponse {
        /// The request URL.
        url: String,
        /// What was wrong with the body.
        reason: String,
    },

    /// The base URL or a derived endpoint URL is malformed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    /// Reading a local file for upload failed.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// The file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Classifies a transport error as timeout or network failure.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(url: impl Into<String>) -> Self {
        Self::Unauthorized { url: url.into() }
    }

    /// Creates a rejected-status error.
    pub fn rejected(url: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the stored credentials are no longer accepted.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Whether retrying the same request later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
