//! Request and response bodies of the course service.

use serde::{Deserialize, Deserializer, Serialize};

/// Login/registration body. Build with [`Credentials::new`], which applies
/// the email normalization the service expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Trims and lower-cases the email; the password is sent verbatim.
    #[must_use]
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            password: password.to_string(),
        }
    }
}

/// Successful login/registration response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    /// User object as returned by the service; stored opaquely.
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

/// Entry of the course list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        rename = "courseTitle",
        skip_serializing_if = "Option::is_none"
    )]
    pub course_title: Option<String>,
}

impl CourseSummary {
    /// Title for display: `title`, then `courseTitle`, then a placeholder.
    #[must_use]
    pub fn display_title(&self) -> &str {
        [&self.title, &self.course_title]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|title| !title.trim().is_empty())
            .unwrap_or("Untitled Course")
    }
}

/// Course resource with its three artifact fields still unparsed.
///
/// Each field is absent, the `"loading"` sentinel, or JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawCourse {
    #[serde(default, deserialize_with = "artifact_field")]
    pub json: Option<String>,
    #[serde(default, rename = "flashCard", deserialize_with = "artifact_field")]
    pub flash_card: Option<String>,
    #[serde(default, deserialize_with = "artifact_field")]
    pub qna: Option<String>,
}

/// Accepts the documented string form, and re-encodes a field the service
/// sent as inline JSON so the artifact parser sees text either way.
fn artifact_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

/// Successful upload response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "courseId", deserialize_with = "string_or_number")]
    pub course_id: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// A document to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Error body shape used by the service for rejected requests.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn text(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}
