//! Error types for artifact decoding.

use thiserror::Error;

/// A generated artifact field held text that is not a valid payload.
///
/// Produced by [`decode`](super::decode) and consumed by
/// [`Artifact::parse`](super::Artifact::parse), which logs it and treats the
/// artifact as absent. It never reaches the poll loop or the user.
#[derive(Debug, Error)]
#[error("malformed {kind} payload: {source}")]
pub struct DecodeError {
    /// Payload kind being decoded (used in log output).
    pub kind: &'static str,
    /// The underlying JSON error.
    #[source]
    pub source: serde_json::Error,
}

impl DecodeError {
    /// Creates a decode error for the given payload kind.
    pub fn new(kind: &'static str, source: serde_json::Error) -> Self {
        Self { kind, source }
    }

    /// Line of the raw text where decoding failed.
    #[must_use]
    pub fn line(&self) -> usize {
        self.source.line()
    }
}
