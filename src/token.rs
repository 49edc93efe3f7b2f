//! Pure token decoding, validation, and cookie-derived auth state.
//!
//! The access token is an opaque signed string in dot-separated form whose
//! middle segment is base64url-encoded JSON carrying an `exp` claim. This
//! module only decodes that claim; signature verification is the authority
//! server's responsibility.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Tokens expiring within this many seconds are treated as already invalid,
/// so a token cannot expire while its request is in flight.
pub const EXPIRY_SAFETY_WINDOW_SECS: i64 = 10;

/// Claims this client cares about; everything else in the payload is opaque.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
}

/// Auth state derived from durable cookie contents.
///
/// No state is held between calls: the authority re-derives this from the
/// cookie jar on every invocation, which keeps it safe to call from
/// independent request handlers at the cost of occasional redundant
/// refresh round-trips under concurrent expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// A usable access token was found.
    Valid(String),
    /// No usable access token, but a refresh token to mint one with.
    NeedsRefresh(String),
    /// Neither credential present; the caller has no session at all.
    NoCredential,
}

/// Extract the `exp` claim (seconds since epoch) from a signed token.
///
/// Returns `None` for anything that does not decode: wrong segment count,
/// bad base64, non-JSON payload, or a payload without `exp`.
pub fn decode_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    claims.exp
}

/// True when the token decodes and its expiry is at least
/// [`EXPIRY_SAFETY_WINDOW_SECS`] in the future of `now`.
///
/// Total over its input: empty or malformed tokens are `false`, never an
/// error.
pub fn validate_token_at(token: &str, now: i64) -> bool {
    if token.is_empty() {
        return false;
    }
    match decode_expiry(token) {
        Some(exp) => exp.saturating_sub(now) >= EXPIRY_SAFETY_WINDOW_SECS,
        None => false,
    }
}

/// [`validate_token_at`] against the current wall clock.
pub fn validate_token(token: &str) -> bool {
    validate_token_at(token, unix_now_secs())
}

/// Derive the auth state from the cookie tuple at a given instant.
///
/// Pure over `{access, refresh, now}`; the token authority is written on
/// top of this so the state transitions stay unit-testable without any
/// network involvement.
pub fn derive_auth_state(access: Option<&str>, refresh: Option<&str>, now: i64) -> AuthState {
    if let Some(token) = access {
        if validate_token_at(token, now) {
            return AuthState::Valid(token.to_string());
        }
    }
    match refresh {
        Some(refresh_token) if !refresh_token.is_empty() => {
            AuthState::NeedsRefresh(refresh_token.to_string())
        }
        _ => AuthState::NoCredential,
    }
}

pub(crate) fn unix_now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
