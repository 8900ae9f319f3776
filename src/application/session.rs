//! Authentication session state and its transitions.
//!
//! The session is an explicitly owned value (no process-wide singleton); all
//! external effects go through the collaborator traits defined here, so tests
//! can drive the transitions with stubs.

use crate::domain::{extract_api_error_message, SignInResponse, User};
use serde_json::Value;

/// Namespaced key under which the jwt is persisted between runs.
pub const TOKEN_STORAGE_KEY: &str = "@termgram/token";

/// Shown when a sign-in rejection carries no usable server message.
pub const SIGN_IN_FALLBACK_MESSAGE: &str = "There was an error signing in, check your data";
/// Shown when a sign-up rejection carries no usable server message.
pub const SIGN_UP_FALLBACK_MESSAGE: &str = "There was an error signing up, check your data";

/// Failure reported by the API collaborator.
///
/// `body` holds the parsed JSON error payload when the server produced one;
/// `message` describes the transport-level failure otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: Option<u16>,
    pub body: Option<Value>,
    pub message: String,
}

impl ApiError {
    /// A failure before any response arrived (connection refused, bad URL).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }

    /// A non-success response with its parsed body.
    pub fn rejection(status: u16, body: Value) -> Self {
        Self {
            status: Some(status),
            body: Some(body),
            message: format!("request rejected with status {}", status),
        }
    }

    /// The text to put in front of the user: the first server-provided
    /// message when the payload has one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        self.body
            .as_ref()
            .and_then(extract_api_error_message)
            .unwrap_or(fallback)
            .to_string()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "API error (status {}): {}", status, self.message),
            None => write!(f, "API error: {}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Authentication endpoints of the backing service.
pub trait AuthApi {
    /// `POST auth/local {identifier, password}` -> `{jwt, user}`.
    fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, ApiError>;
    /// `POST auth/local/register`. Registration alone yields no session.
    fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError>;
}

/// Secure key-value storage for the session token.
pub trait TokenStore {
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

/// Titled, fire-and-forget user notifications.
pub trait AlertSink {
    fn alert(&mut self, title: &str, message: &str);
}

/// In-memory record of the current authenticated user.
///
/// Invariant: `signed` is true only while `token` holds a non-empty value.
/// `loading` marks an in-flight authentication request; it is advisory for
/// the UI but also acts as a reentrancy guard, so a second request issued
/// while one is pending is rejected without side effects.
///
/// # Examples
///
/// ```
/// use termgram::application::Session;
///
/// let session = Session::default();
/// assert!(!session.signed);
/// assert!(session.token.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub signed: bool,
    pub loading: bool,
}

impl Session {
    /// Attempts to establish a session with the given credentials.
    ///
    /// On success the token is persisted under [`TOKEN_STORAGE_KEY`] before
    /// the signed flag flips. On any failure (API rejection, transport
    /// failure, or token store failure) an alert titled "Login Failed" is
    /// raised with the server's message or the generic fallback, and the
    /// session stays signed out.
    ///
    /// Returns true iff the session ended up signed in.
    pub fn sign_in_request(
        &mut self,
        api: &dyn AuthApi,
        tokens: &dyn TokenStore,
        alerts: &mut dyn AlertSink,
        email: &str,
        password: &str,
    ) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;

        match api.sign_in(email, password) {
            Ok(SignInResponse { jwt, user }) => {
                if let Err(err) = tokens.set(TOKEN_STORAGE_KEY, &jwt) {
                    alerts.alert("Login Failed", &err);
                    self.loading = false;
                    return false;
                }
                self.sign_in_success(jwt, user);
                true
            }
            Err(err) => {
                alerts.alert("Login Failed", &err.user_message(SIGN_IN_FALLBACK_MESSAGE));
                self.loading = false;
                false
            }
        }
    }

    /// Applies a successful authentication result. Cannot fail.
    pub fn sign_in_success(&mut self, token: String, user: User) {
        self.user = Some(user);
        self.token = Some(token);
        self.signed = true;
        self.loading = false;
    }

    /// Registers a new account and, on success, chains straight into
    /// [`Session::sign_in_request`] with the same credentials.
    ///
    /// A failed registration raises a "Register Failed" alert and never
    /// attempts the sign-in.
    pub fn sign_up_request(
        &mut self,
        api: &dyn AuthApi,
        tokens: &dyn TokenStore,
        alerts: &mut dyn AlertSink,
        username: &str,
        email: &str,
        password: &str,
    ) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;

        match api.register(username, email, password) {
            Ok(()) => {
                self.loading = false;
                self.sign_in_request(api, tokens, alerts, email, password)
            }
            Err(err) => {
                alerts.alert("Register Failed", &err.user_message(SIGN_UP_FALLBACK_MESSAGE));
                self.loading = false;
                false
            }
        }
    }

    /// Clears the session back to its initial state.
    ///
    /// The persisted token is removed best-effort: sign-out never blocks on
    /// storage, so a removal failure is ignored.
    pub fn sign_out(&mut self, tokens: &dyn TokenStore) {
        let _ = tokens.remove(TOKEN_STORAGE_KEY);
        *self = Session::default();
    }
}
