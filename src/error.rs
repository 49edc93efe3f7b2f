//! Unified error types for the auth client.

use std::fmt;

// ---------------------------------------------------------------------------
// AuthError
// ---------------------------------------------------------------------------

/// Structured, user-displayable authentication failure.
///
/// Every failure that leaves the token authority is converted into this
/// shape; raw transport errors never cross that boundary. The fields map
/// directly onto what a UI layer needs to show a "please log in" message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub status_code: u16,
    pub status_phrase: String,
    pub message: String,
    /// Specific failure reasons, in order of occurrence.
    pub message_args: Vec<String>,
}

impl AuthError {
    /// Build the standard "you must be logged in" failure with the given
    /// reasons attached as message arguments.
    pub(crate) fn no_session<I, S>(reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            status_code: 401,
            status_phrase: "Forbidden".to_string(),
            message: "You must be logged in".to_string(),
            message_args: reasons.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.status_code, self.status_phrase, self.message
        )?;
        if !self.message_args.is_empty() {
            write!(f, " ({})", self.message_args.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for AuthError {}

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Network-level failure reaching an endpoint.
///
/// Carries no HTTP status: a response with a failing status is still a
/// successful transport round-trip and is surfaced as [`ApiResponse`]
/// data, not as this error.
///
/// [`ApiResponse`]: crate::transport::ApiResponse
#[derive(Debug)]
pub enum TransportError {
    /// reqwest-level error (DNS, TLS, connect, body read).
    Http(reqwest::Error),
    /// Connection-style failure from a non-reqwest transport.
    Unreachable(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "http: {err}"),
            Self::Unreachable(msg) => write!(f, "unreachable: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

// ---------------------------------------------------------------------------
// RequestError
// ---------------------------------------------------------------------------

/// Errors surfaced by the authenticated request gate.
#[derive(Debug)]
pub enum RequestError {
    /// Token acquisition failed; the wrapped request was not (re)attempted.
    Auth(AuthError),
    /// The wrapped request resolved with a failing HTTP status.
    Status(u16, String),
    /// Network-level failure issuing the wrapped request.
    Transport(TransportError),
    /// The response body could not be decoded into the requested type.
    Decode(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth(err) => write!(f, "auth: {err}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::Transport(err) => write!(f, "transport: {err}"),
            Self::Decode(msg) => write!(f, "decode: {msg}"),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<AuthError> for RequestError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<TransportError> for RequestError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when resolving client configuration.
#[derive(Debug)]
pub enum ConfigError {
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
