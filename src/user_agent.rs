//! User-Agent string sent with every service request.

/// Default User-Agent (tool name and crate version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("coursekit/{version}")
}
