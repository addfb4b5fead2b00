//! Local checks run before any request is sent.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Minimum password length accepted by the service.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Largest document the service accepts (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Document extensions the service accepts, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".txt", ".md"];

#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// A field failed a local check. The message is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email is required")]
    EmailRequired,

    #[error("Please enter a valid email address")]
    EmailInvalid,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Please select a file to upload")]
    NoFile,

    #[error("File size must be less than 10MB")]
    FileTooLarge { size: u64, max: u64 },

    #[error("File type not supported. Please upload: {}", ALLOWED_EXTENSIONS.join(", "))]
    UnsupportedFileType { extension: String },
}

/// Checks the email and password of a login or registration form.
///
/// # Errors
///
/// Returns the first failing check, email before password.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::EmailInvalid);
    }
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Extension of `file_name` with a leading dot, lowercased.
#[must_use]
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
}

/// Checks a document's type by extension.
///
/// # Errors
///
/// Returns [`ValidationError::NoFile`] for an empty name and
/// [`ValidationError::UnsupportedFileType`] for anything not in
/// [`ALLOWED_EXTENSIONS`].
pub fn validate_file_type(file_name: &str) -> Result<(), ValidationError> {
    if file_name.trim().is_empty() {
        return Err(ValidationError::NoFile);
    }
    let extension = file_extension(file_name).unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedFileType { extension });
    }
    Ok(())
}

/// Checks a document's size in bytes.
///
/// # Errors
///
/// Returns [`ValidationError::FileTooLarge`] above [`MAX_UPLOAD_BYTES`].
pub fn validate_file_size(size: u64) -> Result<(), ValidationError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// Checks a document before upload: type by extension, then size.
///
/// # Errors
///
/// Returns the first failure of [`validate_file_type`] or [`validate_file_size`].
pub fn validate_upload(file_name: &str, size: u64) -> Result<(), ValidationError> {
    validate_file_type(file_name)?;
    validate_file_size(size)
}
