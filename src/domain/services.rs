//! Pure domain logic: API error payload inspection and form validation.

use crate::domain::errors::{DomainError, DomainResult};
use serde_json::Value;

/// Pulls the first human-readable message out of a structured API error
/// payload.
///
/// The upstream service reports validation failures as
/// `{"data": [{"messages": [{"message": "..."}]}]}`. Transport layers may
/// hand us that body wrapped in `{"response": {"data": <body>}}`; both shapes
/// are accepted. Any missing segment along the path yields `None` rather than
/// an error, so callers can fall back to a generic message.
pub fn extract_api_error_message(payload: &Value) -> Option<&str> {
    let body = payload
        .get("response")
        .and_then(|response| response.get("data"))
        .unwrap_or(payload);

    body.get("data")?
        .get(0)?
        .get("messages")?
        .get(0)?
        .get("message")?
        .as_str()
}

/// Checks sign-in form input before it is sent anywhere.
pub fn validate_credentials(email: &str, password: &str) -> DomainResult<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::InvalidEmail(email.to_string()));
    }
    if password.is_empty() {
        return Err(DomainError::EmptyPassword);
    }
    Ok(())
}

/// Checks sign-up form input: username rules plus the sign-in rules.
pub fn validate_registration(username: &str, email: &str, password: &str) -> DomainResult<()> {
    let username = username.trim();
    if username.len() < 3 || !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DomainError::InvalidUsername(username.to_string()));
    }
    validate_credentials(email, password)
}
